/*!
This module implements how a [`Game`] advances: gravity ticks, player
commands, locking, line clearing and respawning.
*/

use std::mem;

use rand_chacha::rand_core::SeedableRng;

use crate::{
    board, scoring, Command, Feedback, Game, GameOver, GameRng, Line, Piece, State, Tetromino,
};

impl Game {
    /// Creates a new game with a seed drawn from operating system entropy.
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Creates a new game whose whole run is reproducible from `seed`: the
    /// same seed and the same tick and command sequence yield the same
    /// snapshots.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = GameRng::seed_from_u64(seed);
        let next_tetromino = Tetromino::random(&mut rng);
        let mut game = Self {
            seed,
            state: State {
                rng,
                board: [Line::default(); Self::HEIGHT],
                active_piece: None,
                next_tetromino,
                lines_cleared: 0,
                score: 0,
                level: 1,
                drop_interval: scoring::INITIAL_DROP_INTERVAL,
                result: None,
            },
        };
        // The first spawn on an empty board always succeeds.
        let _ = game.spawn_piece();
        game
    }

    /// Resets the session to a fresh game with a newly drawn seed: empty
    /// board, zeroed counters, level 1, initial gravity interval.
    ///
    /// Returns the fresh snapshot. Any tick schedule derived from the old
    /// session must be replaced along with it.
    pub fn restart(&mut self) -> &State {
        *self = Self::new();
        &self.state
    }

    /// Advances gravity by one step: the active piece falls one row, or
    /// locks in place if the row below is blocked.
    ///
    /// Ticks are scheduled by the caller at the snapshot's current
    /// `drop_interval`. No-op once the game has ended.
    pub fn tick(&mut self) -> Vec<Feedback> {
        let mut feedback = Vec::new();
        if self.state.result.is_some() {
            return feedback;
        }
        let Some(piece) = self.state.active_piece else {
            return feedback;
        };
        match piece.fits_at(&self.state.board, (0, 1)) {
            Some(fallen) => self.state.active_piece = Some(fallen),
            None => self.lock_piece(piece, &mut feedback),
        }
        feedback
    }

    /// Applies one player command to the active piece.
    ///
    /// Moves and rotations that do not fit are silent no-ops, as is any
    /// command once the game has ended.
    pub fn handle_command(&mut self, command: Command) -> Vec<Feedback> {
        let mut feedback = Vec::new();
        if self.state.result.is_some() {
            return feedback;
        }
        let Some(piece) = self.state.active_piece else {
            return feedback;
        };
        match command {
            Command::MoveLeft => {
                if let Some(moved) = piece.fits_at(&self.state.board, (-1, 0)) {
                    self.state.active_piece = Some(moved);
                    feedback.push(Feedback::PieceMoved);
                }
            }
            Command::MoveRight => {
                if let Some(moved) = piece.fits_at(&self.state.board, (1, 0)) {
                    self.state.active_piece = Some(moved);
                    feedback.push(Feedback::PieceMoved);
                }
            }
            Command::Rotate => {
                if let Some(rotated) = piece.fits_rotated(&self.state.board) {
                    self.state.active_piece = Some(rotated);
                    feedback.push(Feedback::PieceRotated);
                }
            }
            Command::SoftDrop => {
                // Points only for descents that actually happen; a blocked
                // soft drop neither scores nor locks.
                if let Some(fallen) = piece.fits_at(&self.state.board, (0, 1)) {
                    self.state.active_piece = Some(fallen);
                    self.state.score = self.state.score.saturating_add(scoring::SOFT_DROP_POINTS);
                    feedback.push(Feedback::PieceMoved);
                }
            }
            Command::HardDrop => {
                let mut new_piece = piece;
                while let Some(fallen) = new_piece.fits_at(&self.state.board, (0, 1)) {
                    new_piece = fallen;
                    self.state.score = self.state.score.saturating_add(scoring::HARD_DROP_POINTS);
                }
                feedback.push(Feedback::HardDrop {
                    old_piece: piece,
                    new_piece,
                });
                self.lock_piece(new_piece, &mut feedback);
            }
        }
        feedback
    }

    /// Immediately ends the game as an external abort.
    ///
    /// No-op if the game already ended, preserving the original result.
    pub fn forfeit(&mut self) -> Vec<Feedback> {
        if self.state.result.is_some() {
            return Vec::new();
        }
        self.state.result = Some(GameOver::Forfeit);
        vec![Feedback::GameEnded {
            result: GameOver::Forfeit,
        }]
    }

    /// Locks `piece` into the board, clears completed lines, applies the
    /// scoring policy and spawns the next piece.
    fn lock_piece(&mut self, piece: Piece, feedback: &mut Vec<Feedback>) {
        let tile = Some(piece.tetromino.tiletypeid());
        for (x, y) in piece.tiles() {
            // Cells above the top edge are dropped rather than written.
            if y >= 0 {
                self.state.board[y as usize][x as usize] = tile;
            }
        }
        self.state.active_piece = None;
        feedback.push(Feedback::PieceLocked { piece });

        // Clearing a row only shifts rows above it, which this scan has
        // already passed, so each full row is seen exactly once, at its
        // original index.
        let mut y_coords = Vec::new();
        for y in 0..Self::HEIGHT {
            if board::row_is_full(&self.state.board, y) {
                board::clear_row(&mut self.state.board, y);
                y_coords.push(y);
            }
        }

        if !y_coords.is_empty() {
            let lines_cleared = y_coords.len() as u32;
            feedback.push(Feedback::LinesCleared { y_coords });
            self.state.lines_cleared += lines_cleared;
            let outcome = scoring::apply_clear(
                lines_cleared,
                self.state.level,
                self.state.score,
                self.state.drop_interval,
            );
            self.state.score = self.state.score.saturating_add(outcome.score_delta);
            if outcome.new_level > self.state.level {
                self.state.level = outcome.new_level;
                self.state.drop_interval = outcome.new_drop_interval;
                feedback.push(Feedback::LevelUp {
                    new_level: outcome.new_level,
                });
            }
        }

        feedback.extend(self.spawn_piece());
    }

    /// Promotes the previewed shape to a fresh active piece and draws a new
    /// preview, ending the game if the spawn position is blocked.
    fn spawn_piece(&mut self) -> Option<Feedback> {
        let tetromino = mem::replace(
            &mut self.state.next_tetromino,
            Tetromino::random(&mut self.state.rng),
        );
        let piece = Piece::spawn(tetromino);
        if piece.fits(&self.state.board) {
            self.state.active_piece = Some(piece);
            None
        } else {
            self.state.result = Some(GameOver::BlockOut);
            Some(Feedback::GameEnded {
                result: GameOver::BlockOut,
            })
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{ops::Range, time::Duration};

    use super::*;
    use crate::Board;

    fn fill_row_except(board: &mut Board, y: usize, gap: Range<usize>) {
        for x in 0..Game::WIDTH {
            if !gap.contains(&x) {
                board[y][x] = Some(Tetromino::J.tiletypeid());
            }
        }
    }

    /// An I-piece rotated upright, occupying board column `x + 2`.
    fn vertical_i_at(x: i32, y: i32) -> Piece {
        let mut piece = Piece::spawn(Tetromino::I);
        piece.matrix = piece.matrix.rotated_clockwise();
        piece.position = (x, y);
        piece
    }

    #[test]
    fn completing_a_row_scores_and_compacts() {
        let mut game = Game::with_seed(7);
        fill_row_except(&mut game.state.board, 19, 6..10);
        let mut piece = Piece::spawn(Tetromino::I);
        piece.position = (6, 18);
        game.state.active_piece = Some(piece);

        let feedback = game.tick();

        assert_eq!(game.state.score, 100);
        assert_eq!(game.state.level, 1);
        assert_eq!(game.state.lines_cleared, 1);
        assert!(game.state.board.iter().flatten().all(|tile| tile.is_none()));
        assert!(feedback
            .iter()
            .any(|f| matches!(f, Feedback::PieceLocked { .. })));
        assert!(feedback.contains(&Feedback::LinesCleared {
            y_coords: vec![19]
        }));
        assert!(game.state.active_piece.is_some());
        assert_eq!(game.state.result, None);
    }

    #[test]
    fn four_simultaneous_clears_score_eightfold() {
        let mut game = Game::with_seed(7);
        for y in 16..20 {
            fill_row_except(&mut game.state.board, y, 9..10);
        }
        game.state.active_piece = Some(vertical_i_at(7, 16));

        let feedback = game.tick();

        assert_eq!(game.state.score, 800);
        assert_eq!(game.state.lines_cleared, 4);
        assert!(game.state.board.iter().flatten().all(|tile| tile.is_none()));
        assert!(feedback.contains(&Feedback::LinesCleared {
            y_coords: vec![16, 17, 18, 19]
        }));
    }

    #[test]
    fn disjoint_full_rows_clear_together() {
        let mut game = Game::with_seed(7);
        fill_row_except(&mut game.state.board, 17, 9..10);
        for x in 1..9 {
            game.state.board[18][x] = Some(Tetromino::J.tiletypeid());
        }
        fill_row_except(&mut game.state.board, 19, 9..10);
        game.state.active_piece = Some(vertical_i_at(7, 16));

        let feedback = game.tick();

        assert!(feedback.contains(&Feedback::LinesCleared {
            y_coords: vec![17, 19]
        }));
        assert_eq!(game.state.lines_cleared, 2);
        assert_eq!(game.state.score, 300);
        // The unfinished middle row slid to the bottom, keeping its gap.
        assert_eq!(game.state.board[19][0], None);
        assert_eq!(game.state.board[19][5], Some(Tetromino::J.tiletypeid()));
        assert_eq!(game.state.board[18][9], Some(Tetromino::I.tiletypeid()));
    }

    #[test]
    fn level_up_shrinks_the_drop_interval_once() {
        let mut game = Game::with_seed(7);
        game.state.score = 900;
        fill_row_except(&mut game.state.board, 19, 6..10);
        let mut piece = Piece::spawn(Tetromino::I);
        piece.position = (6, 18);
        game.state.active_piece = Some(piece);

        let feedback = game.tick();

        assert_eq!(game.state.score, 1000);
        assert_eq!(game.state.level, 2);
        assert_eq!(game.state.drop_interval, Duration::from_millis(900));
        assert!(feedback.contains(&Feedback::LevelUp { new_level: 2 }));
    }

    #[test]
    fn blocked_spawn_ends_the_game() {
        let mut game = Game::with_seed(7);
        // Occupy the whole spawn band except one column so no line is full
        // and no spawn position is free.
        for y in 0..2 {
            fill_row_except(&mut game.state.board, y, 0..1);
        }
        let mut piece = Piece::spawn(Tetromino::O);
        piece.position = (0, 18);
        game.state.active_piece = Some(piece);

        let feedback = game.tick();

        assert_eq!(game.result(), Some(GameOver::BlockOut));
        assert!(feedback.contains(&Feedback::GameEnded {
            result: GameOver::BlockOut
        }));
        assert!(game.state.active_piece.is_none());

        // Terminal: every further call is a silent no-op.
        let before = game.state.clone();
        assert!(game.tick().is_empty());
        assert!(game.handle_command(Command::HardDrop).is_empty());
        assert!(game.forfeit().is_empty());
        assert_eq!(game.state, before);
    }

    #[test]
    fn blocked_soft_drop_neither_scores_nor_locks() {
        let mut game = Game::with_seed(7);
        let mut piece = Piece::spawn(Tetromino::O);
        piece.position = (4, 18);
        game.state.active_piece = Some(piece);

        let feedback = game.handle_command(Command::SoftDrop);

        assert!(feedback.is_empty());
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.active_piece, Some(piece));
    }

    #[test]
    fn soft_drop_scores_per_successful_descent() {
        let mut game = Game::with_seed(7);

        let feedback = game.handle_command(Command::SoftDrop);

        assert_eq!(game.state.score, 1);
        assert_eq!(feedback, vec![Feedback::PieceMoved]);
    }

    #[test]
    fn rotation_blocked_by_the_wall_is_discarded() {
        let mut game = Game::with_seed(7);
        // Fits with its filled column hugging the left wall, but rotating
        // back to flat would poke out of it.
        let piece = vertical_i_at(-2, 5);
        game.state.active_piece = Some(piece);

        let feedback = game.handle_command(Command::Rotate);

        assert!(feedback.is_empty());
        assert_eq!(game.state.active_piece, Some(piece));
    }

    #[test]
    fn locking_drops_cells_above_the_top_edge() {
        let mut game = Game::with_seed(7);
        game.state.board[2][3] = Some(Tetromino::J.tiletypeid());
        // Tiles at column 3, rows -2 through 1; the tile below blocks the
        // fall so the piece locks while partially above the grid.
        game.state.active_piece = Some(vertical_i_at(1, -2));

        let feedback = game.tick();

        assert!(feedback
            .iter()
            .any(|f| matches!(f, Feedback::PieceLocked { .. })));
        assert_eq!(game.state.board[0][3], Some(Tetromino::I.tiletypeid()));
        assert_eq!(game.state.board[1][3], Some(Tetromino::I.tiletypeid()));
        let occupied = game
            .state
            .board
            .iter()
            .flatten()
            .filter(|tile| tile.is_some())
            .count();
        assert_eq!(occupied, 3);
    }

    #[test]
    fn restart_returns_a_fresh_session() {
        let mut game = Game::with_seed(7);
        game.state.score = 2500;
        game.state.level = 3;
        game.state.drop_interval = Duration::from_millis(800);
        game.state.board[19][0] = Some(Tetromino::Z.tiletypeid());
        game.state.result = Some(GameOver::Forfeit);

        let state = game.restart();

        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lines_cleared, 0);
        assert_eq!(state.drop_interval, scoring::INITIAL_DROP_INTERVAL);
        assert!(state.board.iter().flatten().all(|tile| tile.is_none()));
        assert!(state.active_piece.is_some());
        assert_eq!(state.result, None);
    }
}
