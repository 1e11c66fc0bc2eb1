/*!
This module implements the square occupancy matrices that describe piece
shapes, and their pure 90° rotation transform.
*/

/// Side length of the largest shape bounding matrix (the straight piece's 4×4).
pub const MAX_SHAPE_SIZE: usize = 4;

/// A square boolean matrix describing which cells a shape occupies, in
/// piece-local coordinates (row 0 at the top, column 0 at the left).
///
/// Matrices are plain values: [`Self::rotated_clockwise`] produces a new
/// matrix, and the entries returned by [`Tetromino::matrix`] are never
/// mutated.
///
/// [`Tetromino::matrix`]: crate::Tetromino::matrix
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapeMatrix {
    size: usize,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl ShapeMatrix {
    /// Builds a matrix from `N`×`N` rows of `0`/`1` cell values.
    pub(crate) const fn from_rows<const N: usize>(rows: [[u8; N]; N]) -> Self {
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < N {
            let mut c = 0;
            while c < N {
                cells[r][c] = rows[r][c] != 0;
                c += 1;
            }
            r += 1;
        }
        Self { size: N, cells }
    }

    /// The side length of the bounding matrix (2, 3 or 4).
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the cell at `(row, col)` is occupied.
    pub const fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells[row][col]
    }

    /// Returns the matrix rotated 90° clockwise within its bounding box:
    /// `rotated[c][N-1-r] = self[r][c]`.
    ///
    /// Four successive rotations yield the original matrix again.
    pub const fn rotated_clockwise(&self) -> Self {
        let n = self.size;
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < n {
            let mut c = 0;
            while c < n {
                cells[c][n - 1 - r] = self.cells[r][c];
                c += 1;
            }
            r += 1;
        }
        Self { size: n, cells }
    }

    /// Iterates over the `(row, col)` coordinates of all occupied cells, in
    /// row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.size).flat_map(move |r| {
            (0..self.size).filter_map(move |c| self.cells[r][c].then_some((r, c)))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Tetromino;

    #[test]
    fn four_rotations_restore_every_shape() {
        for tetromino in Tetromino::VARIANTS {
            let original = tetromino.matrix();
            let mut matrix = original;
            for _ in 0..4 {
                matrix = matrix.rotated_clockwise();
            }
            assert_eq!(matrix, original, "{tetromino:?}");
        }
    }

    #[test]
    fn square_shape_is_rotation_invariant() {
        let original = Tetromino::O.matrix();
        assert_eq!(original.rotated_clockwise(), original);
    }

    #[test]
    fn straight_shape_turns_upright() {
        let matrix = Tetromino::I.matrix().rotated_clockwise();
        let filled: Vec<_> = matrix.filled_cells().collect();
        assert_eq!(filled, vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn every_shape_occupies_exactly_four_cells() {
        for tetromino in Tetromino::VARIANTS {
            assert_eq!(
                tetromino.matrix().filled_cells().count(),
                4,
                "{tetromino:?}"
            );
        }
    }

    #[test]
    fn bounding_sizes_are_fixed_per_shape() {
        assert_eq!(Tetromino::I.matrix().size(), 4);
        assert_eq!(Tetromino::O.matrix().size(), 2);
        for tetromino in [
            Tetromino::S,
            Tetromino::Z,
            Tetromino::T,
            Tetromino::L,
            Tetromino::J,
        ] {
            assert_eq!(tetromino.matrix().size(), 3, "{tetromino:?}");
        }
    }
}
