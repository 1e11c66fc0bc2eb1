/*!
This crate implements the engine of a falling-block puzzle game: a
self-contained bundle of grid, piece and scoring logic with no opinions about
input devices or rendering.

The [`Game`] struct is the entry point. Feature highlights:
- the seven classic shapes, drawn uniformly with a one-piece preview,
- caller-scheduled gravity ticks at an engine-owned drop interval,
- soft drops, hard drops and in-place clockwise rotation,
- line clear scoring with levels that speed the game up,
- deterministic replays from a single `u64` seed.

## Example

```rust
use blockfall_engine::{Command, Game};

let mut game = Game::with_seed(42);

// Ticks advance gravity; schedule them at the snapshot's `drop_interval`.
game.tick();

// Player commands apply immediately; invalid ones are silent no-ops.
game.handle_command(Command::MoveLeft);

let state = game.state();
assert_eq!(state.level, 1);
assert!(state.active_piece.is_some());
```

Optional features:
- `serde`: derives `serde::{Serialize, Deserialize}` for the engine's types.
*/

#![warn(missing_docs)]

pub mod board;
mod game_update;
pub mod scoring;
pub mod shape;

use std::{num::NonZeroU8, time::Duration};

use rand::Rng;
use rand_chacha::ChaCha12Rng;

pub use board::{Board, Line};
pub use shape::ShapeMatrix;

/// Abstract identifier for which shape a locked tile came from.
///
/// It lets tiles keep their color after their piece is long gone. The engine
/// only ever produces the ids `1` through `7`, in [`Tetromino::VARIANTS`]
/// order.
pub type TileTypeID = NonZeroU8;

/// A coordinate pair `(x, y)` on the board: `x` is the column (growing
/// rightward), `y` the row (growing downward).
///
/// Signed because a piece's bounding matrix corner may lie outside the grid,
/// and its occupied cells may lie above the grid's top edge.
pub type Coord = (i32, i32);

/// A coordinate displacement `(dx, dy)`.
pub type Offset = (i32, i32);

/// The pseudorandom number generator driving a game's shape draws.
///
/// Portable and stable across platforms so that a `u64` seed reproduces the
/// same shape sequence everywhere.
pub type GameRng = ChaCha12Rng;

/// The seven playable shapes.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tetromino {
    /// The O-tetromino: a 2×2 square.
    O = 0,
    /// The I-tetromino: four cells in a straight line.
    I,
    /// The S-tetromino.
    S,
    /// The Z-tetromino.
    Z,
    /// The T-tetromino.
    T,
    /// The L-tetromino.
    L,
    /// The J-tetromino.
    J,
}

/// The fixed display color identity of a shape's tiles.
///
/// Kept abstract here; frontends decide how to realize each name on their
/// output device.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileColor {
    /// Color of the straight piece.
    Cyan,
    /// Color of the square piece.
    Yellow,
    /// Color of the T piece.
    Purple,
    /// Color of the S piece.
    Lime,
    /// Color of the Z piece.
    Red,
    /// Color of the J piece.
    Blue,
    /// Color of the L piece.
    Orange,
}

impl Tetromino {
    /// All tetromino variants, in the order they are encoded:
    /// `Tetromino::VARIANTS[t as usize] == t`.
    pub const VARIANTS: [Self; 7] = {
        use Tetromino::*;
        [O, I, S, Z, T, L, J]
    };

    /// Returns the unique tile id of the tetromino.
    pub const fn tiletypeid(&self) -> TileTypeID {
        use Tetromino::*;
        let u8 = match self {
            O => 1,
            I => 2,
            S => 3,
            Z => 4,
            T => 5,
            L => 6,
            J => 7,
        };
        // SAFETY: Ints are clearly nonzero.
        unsafe { NonZeroU8::new_unchecked(u8) }
    }

    /// Looks up the tetromino a [`Self::tiletypeid`] value came from.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an id the engine produces (`1` through `7`).
    pub const fn from_tiletypeid(id: TileTypeID) -> Self {
        Self::VARIANTS[id.get() as usize - 1]
    }

    /// Returns the occupancy matrix of the tetromino in spawn orientation.
    pub const fn matrix(&self) -> ShapeMatrix {
        match self {
            Tetromino::O => ShapeMatrix::from_rows([
                [1, 1],
                [1, 1],
            ]),
            Tetromino::I => ShapeMatrix::from_rows([
                [0, 0, 0, 0],
                [1, 1, 1, 1],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            Tetromino::S => ShapeMatrix::from_rows([
                [0, 1, 1],
                [1, 1, 0],
                [0, 0, 0],
            ]),
            Tetromino::Z => ShapeMatrix::from_rows([
                [1, 1, 0],
                [0, 1, 1],
                [0, 0, 0],
            ]),
            Tetromino::T => ShapeMatrix::from_rows([
                [0, 1, 0],
                [1, 1, 1],
                [0, 0, 0],
            ]),
            Tetromino::L => ShapeMatrix::from_rows([
                [0, 0, 1],
                [1, 1, 1],
                [0, 0, 0],
            ]),
            Tetromino::J => ShapeMatrix::from_rows([
                [1, 0, 0],
                [1, 1, 1],
                [0, 0, 0],
            ]),
        }
    }

    /// Returns the fixed color identity of the tetromino.
    pub const fn color(&self) -> TileColor {
        match self {
            Tetromino::O => TileColor::Yellow,
            Tetromino::I => TileColor::Cyan,
            Tetromino::S => TileColor::Lime,
            Tetromino::Z => TileColor::Red,
            Tetromino::T => TileColor::Purple,
            Tetromino::L => TileColor::Orange,
            Tetromino::J => TileColor::Blue,
        }
    }

    /// Draws a tetromino uniformly at random.
    ///
    /// Draws are independent of each other; there is no bag to even out
    /// streaks, so repeats and droughts are possible.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::VARIANTS[rng.random_range(0..=6)]
    }
}

/// A shape in play, with a concrete orientation and board position.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Piece {
    /// The shape this piece is an instance of.
    pub tetromino: Tetromino,
    /// The current orientation of the shape's occupancy matrix.
    pub matrix: ShapeMatrix,
    /// The board coordinates of the matrix's top-left corner.
    ///
    /// Only occupied cells are bounded by the grid, so the corner itself may
    /// lie outside it.
    pub position: Coord,
}

impl Piece {
    /// Creates a piece of the given shape at the standard spawn position,
    /// horizontally centered at the top of the grid.
    pub fn spawn(tetromino: Tetromino) -> Self {
        let matrix = tetromino.matrix();
        let x = Game::WIDTH as i32 / 2 - matrix.size() as i32 / 2;
        Self {
            tetromino,
            matrix,
            position: (x, 0),
        }
    }

    /// Returns the board coordinates of the piece's occupied cells.
    pub fn tiles(&self) -> impl Iterator<Item = Coord> + '_ {
        let (x, y) = self.position;
        self.matrix
            .filled_cells()
            .map(move |(r, c)| (x + c as i32, y + r as i32))
    }

    /// Checks whether all occupied cells of the piece are within the grid's
    /// walls and floor and do not overlap any locked tile.
    ///
    /// Cells above the grid's top edge are unrestricted.
    pub fn fits(&self, board: &Board) -> bool {
        self.tiles().all(|(x, y)| {
            0 <= x
                && x < Game::WIDTH as i32
                && y < Game::HEIGHT as i32
                && !board::cell_occupied(board, x, y)
        })
    }

    /// Checks whether the piece, displaced by the given offset, fits onto the
    /// board, and if so returns the displaced piece.
    pub fn fits_at(&self, board: &Board, (dx, dy): Offset) -> Option<Piece> {
        let mut new_piece = *self;
        new_piece.position = (self.position.0 + dx, self.position.1 + dy);
        new_piece.fits(board).then_some(new_piece)
    }

    /// Checks whether the piece rotated 90° clockwise at its unchanged
    /// position fits onto the board, and if so returns the rotated piece.
    ///
    /// There are no alternate positions to nudge a blocked rotation into; the
    /// caller keeps the original piece in that case.
    pub fn fits_rotated(&self, board: &Board) -> Option<Piece> {
        let mut new_piece = *self;
        new_piece.matrix = self.matrix.rotated_clockwise();
        new_piece.fits(board).then_some(new_piece)
    }
}

/// Player inputs a frontend can pass to [`Game::handle_command`].
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// Move the active piece one column to the left.
    MoveLeft,
    /// Move the active piece one column to the right.
    MoveRight,
    /// Rotate the active piece 90° clockwise in place.
    Rotate,
    /// Move the active piece down one row, awarding drop points; locking is
    /// left to gravity.
    SoftDrop,
    /// Send the active piece straight down as far as it goes and lock it
    /// immediately.
    HardDrop,
}

/// Events that occurred during a [`Game::tick`] or [`Game::handle_command`],
/// for frontends to hook effects onto.
///
/// Feedback is purely informational; ignoring it loses nothing but polish.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Feedback {
    /// The active piece moved left, right or down on player input.
    PieceMoved,
    /// The active piece rotated on player input.
    PieceRotated,
    /// A piece became part of the board.
    PieceLocked {
        /// The piece, at its final position.
        piece: Piece,
    },
    /// The active piece was hard-dropped.
    HardDrop {
        /// The piece before the drop.
        old_piece: Piece,
        /// The piece at its landing position.
        new_piece: Piece,
    },
    /// Completed lines were removed from the board.
    LinesCleared {
        /// Row indices of the cleared lines at their pre-compaction
        /// positions, topmost first.
        y_coords: Vec<usize>,
    },
    /// The total score crossed a level boundary.
    LevelUp {
        /// The level now in effect.
        new_level: u32,
    },
    /// The game reached its end.
    GameEnded {
        /// Why the game ended.
        result: GameOver,
    },
}

/// The reasons a game can end.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameOver {
    /// A freshly spawned piece overlapped the existing stack.
    BlockOut,
    /// The game was abandoned from outside.
    Forfeit,
}

/// A full snapshot of a game.
///
/// Everything a frontend needs to render a frame is in here, and everything
/// the engine needs to continue the run is in here too, which is what makes
/// same-seed games reproducible.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    /// The game's own pseudorandom number generator, used for shape draws.
    pub rng: GameRng,
    /// The grid of locked tiles.
    pub board: Board,
    /// The piece currently falling, if any.
    ///
    /// `None` only coincides with a game over; during play a new piece
    /// spawns in the same update that locks the previous one.
    pub active_piece: Option<Piece>,
    /// The shape that will spawn once the active piece locks.
    pub next_tetromino: Tetromino,
    /// Total number of lines cleared so far.
    pub lines_cleared: u32,
    /// Total points accumulated so far.
    pub score: u32,
    /// The current level.
    ///
    /// Derived from the score as `score / 1000 + 1`, but only re-derived when
    /// lines clear; drop points alone never raise it.
    pub level: u32,
    /// How long the tick scheduler should currently wait between gravity
    /// steps.
    pub drop_interval: Duration,
    /// Why the game ended, if it has.
    pub result: Option<GameOver>,
}

/// The state and surrounding context of one falling-block game.
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    seed: u64,
    state: State,
}

impl Game {
    /// Number of rows of the playing grid.
    pub const HEIGHT: usize = 20;
    /// Number of columns of the playing grid.
    pub const WIDTH: usize = 10;

    /// Read access to the game's current snapshot.
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// The seed this game's shape sequence is derived from.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// How the game ended, if it has.
    pub const fn result(&self) -> Option<GameOver> {
        self.state.result
    }

    /// Whether the game has ended and ignores all further ticks and commands.
    pub const fn ended(&self) -> bool {
        self.state.result.is_some()
    }
}
