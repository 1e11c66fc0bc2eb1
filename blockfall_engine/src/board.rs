/*!
This module provides the playing grid type and its row-level operations.

Cells are addressed as `board[y][x]` with `y` the row (`0` at the top, growing
downward) and `x` the column (`0` at the left edge).
*/

use crate::{Game, TileTypeID};

/// The type of horizontal lines of the playing grid.
pub type Line = [Option<TileTypeID>; Game::WIDTH];

/// The type of the entire playing grid.
pub type Board = [Line; Game::HEIGHT];

/// Whether the cell at the given coordinates holds a locked tile.
///
/// Rows above the visible grid (`y < 0`) are always vacant; a falling piece
/// may extend there before first contact. Coordinates outside the grid in any
/// other direction violate the caller contract and panic.
pub fn cell_occupied(board: &Board, x: i32, y: i32) -> bool {
    if y < 0 {
        return false;
    }
    board[y as usize][x as usize].is_some()
}

/// Whether every cell of the given row holds a locked tile.
pub fn row_is_full(board: &Board, y: usize) -> bool {
    board[y].iter().all(|tile| tile.is_some())
}

/// Removes the given row and inserts a fresh empty row at the top, shifting
/// all rows above the removed one down by one.
pub fn clear_row(board: &mut Board, y: usize) {
    board[..=y].rotate_right(1);
    board[0] = Line::default();
}
