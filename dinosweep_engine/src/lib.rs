/*!
This crate implements the engine of a small grid-sweeping puzzle: hazards
("dinos") hide under a 10×10 field, and the player reveals cells, using
adjacency counts to avoid them. Revealing a zero-count cell opens up its
whole connected region.

The [`Field`] struct is the entry point; it owns the full round state and is
agnostic of input devices and rendering.

## Example

```rust
use dinosweep_engine::{Field, Status};

let mut field = Field::with_seed(7);
assert_eq!(field.status(), Status::InProgress);

// Flag a suspect, then change your mind.
field.toggle_flag(0, 0);
field.toggle_flag(0, 0);
assert!(!field.cells()[0][0].flagged);
```

Optional features:
- `serde`: derives `serde::{Serialize, Deserialize}` for the engine's types.
*/

#![warn(missing_docs)]

use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha12Rng};

/// The pseudorandom number generator driving hazard placement.
///
/// Portable and stable across platforms so that a `u64` seed reproduces the
/// same field everywhere.
pub type FieldRng = ChaCha12Rng;

/// The type of the entire cell grid, addressed as `grid[row][col]`.
pub type Grid = [[Cell; Field::COLS]; Field::ROWS];

/// The displacements of the eight cells surrounding a cell.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One cell of the field.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    /// Whether a hazard hides under this cell.
    ///
    /// Part of the snapshot so frontends can paint the end-of-round reveal;
    /// fair renderers keep it hidden while the round is in progress.
    pub has_dino: bool,
    /// Whether the player has uncovered this cell.
    pub revealed: bool,
    /// Whether the player has put a marker on this cell.
    pub flagged: bool,
    /// How many of the up to eight surrounding cells hide a hazard.
    pub adjacent_dinos: u8,
}

/// The lifecycle of one round.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The field still accepts reveals and flag toggles.
    InProgress,
    /// Every safe cell was revealed.
    Won,
    /// A hazard was revealed.
    Lost,
}

/// The full state of one round of the puzzle.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    seed: u64,
    cells: Grid,
    status: Status,
}

impl Field {
    /// Number of rows of the field.
    pub const ROWS: usize = 10;
    /// Number of columns of the field.
    pub const COLS: usize = 10;
    /// Number of hazards hidden in a freshly generated field.
    pub const DINO_COUNT: usize = 10;

    /// Creates a new field with a seed drawn from operating system entropy.
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Creates a new field with hazard placement reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = FieldRng::seed_from_u64(seed);
        let mut cells = [[Cell::default(); Self::COLS]; Self::ROWS];
        let mut placed = 0;
        while placed < Self::DINO_COUNT {
            let r = rng.random_range(0..Self::ROWS);
            let c = rng.random_range(0..Self::COLS);
            if !cells[r][c].has_dino {
                cells[r][c].has_dino = true;
                placed += 1;
            }
        }
        compute_adjacency(&mut cells);
        Self {
            seed,
            cells,
            status: Status::InProgress,
        }
    }

    /// Resets the session to a fresh field with a newly drawn seed.
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    /// Read access to the cell grid.
    pub const fn cells(&self) -> &Grid {
        &self.cells
    }

    /// Where the round currently stands.
    pub const fn status(&self) -> Status {
        self.status
    }

    /// The seed this field's hazard placement is derived from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Uncovers the cell at `(row, col)`.
    ///
    /// No-op if the round has ended or the cell is already revealed or
    /// flagged. Revealing a hazard loses the round; revealing a zero-count
    /// cell opens its whole connected region plus the numbered cells on its
    /// rim. Revealing the last safe cell wins the round.
    pub fn reveal(&mut self, row: usize, col: usize) {
        if self.status != Status::InProgress {
            return;
        }
        let cell = self.cells[row][col];
        if cell.revealed || cell.flagged {
            return;
        }
        if cell.has_dino {
            self.cells[row][col].revealed = true;
            self.status = Status::Lost;
            return;
        }

        // Explicit work list; the zero region can span the whole field.
        let mut pending = vec![(row, col)];
        while let Some((r, c)) = pending.pop() {
            let cell = &mut self.cells[r][c];
            if cell.revealed || cell.flagged {
                continue;
            }
            cell.revealed = true;
            if cell.adjacent_dinos == 0 {
                pending.extend(neighbors(r, c));
            }
        }

        // Hazards are never flood-revealed (a zero-count cell has none next
        // to it), so the revealed count tracks safe cells exactly.
        let safe_cells = Self::ROWS * Self::COLS - self.dino_count();
        if self.revealed_count() == safe_cells {
            self.status = Status::Won;
        }
    }

    /// Toggles the marker on an unrevealed cell.
    ///
    /// No-op if the round has ended or the cell is revealed.
    pub fn toggle_flag(&mut self, row: usize, col: usize) {
        if self.status != Status::InProgress {
            return;
        }
        let cell = &mut self.cells[row][col];
        if !cell.revealed {
            cell.flagged = !cell.flagged;
        }
    }

    fn revealed_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.revealed)
            .count()
    }

    fn dino_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.has_dino)
            .count()
    }

    /// A field with hazards exactly at the given coordinates, for tests that
    /// need a known layout.
    #[cfg(test)]
    fn with_dino_layout(dinos: &[(usize, usize)]) -> Self {
        let mut cells = [[Cell::default(); Self::COLS]; Self::ROWS];
        for &(r, c) in dinos {
            cells[r][c].has_dino = true;
        }
        compute_adjacency(&mut cells);
        Self {
            seed: 0,
            cells,
            status: Status::InProgress,
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterates over the in-bounds coordinates of the up to eight cells
/// surrounding `(row, col)`.
fn neighbors(row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
        let nr = row as i32 + dr;
        let nc = col as i32 + dc;
        (0 <= nr && nr < Field::ROWS as i32 && 0 <= nc && nc < Field::COLS as i32)
            .then_some((nr as usize, nc as usize))
    })
}

/// Recomputes every cell's adjacent hazard count from scratch.
fn compute_adjacency(cells: &mut Grid) {
    for r in 0..Field::ROWS {
        for c in 0..Field::COLS {
            cells[r][c].adjacent_dinos = neighbors(r, c)
                .filter(|&(nr, nc)| cells[nr][nc].has_dino)
                .count() as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten hazards filling the left wall: column 1 is the numbered rim, and
    /// columns 2 through 9 form one big zero region.
    fn left_wall_field() -> Field {
        let dinos: Vec<_> = (0..Field::ROWS).map(|r| (r, 0)).collect();
        Field::with_dino_layout(&dinos)
    }

    #[test]
    fn adjacency_counts_cover_the_eight_neighborhood() {
        let field = Field::with_dino_layout(&[(0, 0), (1, 1)]);
        assert_eq!(field.cells()[0][1].adjacent_dinos, 2);
        assert_eq!(field.cells()[1][0].adjacent_dinos, 2);
        assert_eq!(field.cells()[2][2].adjacent_dinos, 1);
        assert_eq!(field.cells()[3][3].adjacent_dinos, 0);
        // A hazard cell carries the count of its own neighborhood too.
        assert_eq!(field.cells()[0][0].adjacent_dinos, 1);
    }

    #[test]
    fn revealing_a_numbered_cell_opens_only_that_cell() {
        let mut field = left_wall_field();
        field.reveal(5, 1);
        let revealed = field
            .cells()
            .iter()
            .flatten()
            .filter(|cell| cell.revealed)
            .count();
        assert_eq!(revealed, 1);
        assert!(field.cells()[5][1].revealed);
        assert_eq!(field.status(), Status::InProgress);
    }

    #[test]
    fn flood_fill_opens_the_zero_region_and_its_rim() {
        let mut field = left_wall_field();
        field.reveal(5, 5);
        for (r, row) in field.cells().iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                assert_eq!(cell.revealed, c != 0, "({r}, {c})");
            }
        }
        // All 90 safe cells revealed at once: that is the win.
        assert_eq!(field.status(), Status::Won);
    }

    #[test]
    fn flags_block_flood_expansion() {
        let mut field = left_wall_field();
        field.toggle_flag(4, 4);
        field.reveal(9, 9);
        assert!(!field.cells()[4][4].revealed);
        assert!(field.cells()[4][4].flagged);
        // Its whole neighborhood opened around it.
        assert!(field.cells()[4][5].revealed);
        assert!(field.cells()[3][4].revealed);
        assert_eq!(field.status(), Status::InProgress);

        field.toggle_flag(4, 4);
        field.reveal(4, 4);
        assert_eq!(field.status(), Status::Won);
    }

    #[test]
    fn revealing_a_hazard_loses_and_freezes_the_field() {
        let mut field = left_wall_field();
        field.reveal(3, 0);
        assert_eq!(field.status(), Status::Lost);
        assert!(field.cells()[3][0].revealed);

        // Frozen: reveals and flags are ignored from here on.
        let before = field.clone();
        field.reveal(5, 5);
        field.toggle_flag(7, 7);
        assert_eq!(field, before);
    }

    #[test]
    fn flagged_cells_cannot_be_revealed_directly() {
        let mut field = left_wall_field();
        field.toggle_flag(2, 0);
        field.reveal(2, 0);
        assert!(!field.cells()[2][0].revealed);
        assert_eq!(field.status(), Status::InProgress);
    }

    #[test]
    fn flag_toggles_do_not_touch_revealed_cells() {
        let mut field = left_wall_field();
        field.reveal(5, 1);
        field.toggle_flag(5, 1);
        assert!(!field.cells()[5][1].flagged);
    }
}
