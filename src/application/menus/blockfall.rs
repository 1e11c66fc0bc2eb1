use std::{
    io::{self, Write},
    sync::mpsc,
    time::Instant,
};

use blockfall_engine::{Command, Feedback, Game, GameOver, Tetromino};
use crossterm::{
    cursor::MoveTo,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use crate::{
    application::{term_color, Application, Menu, MenuUpdate},
    timer::TickTimer,
};

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_blockfall(&mut self) -> io::Result<MenuUpdate> {
        let mut game = match self.start_seed {
            Some(seed) => Game::with_seed(seed),
            None => Game::new(),
        };
        let mut timer = TickTimer::start(game.state().drop_interval, Instant::now());

        loop {
            self.draw_blockfall(&game)?;

            // Wait for input, or for the gravity deadline. Once the game is
            // over there is no deadline left to honor.
            let event = if game.ended() {
                match self.input.recv() {
                    Ok(event) => Some(event),
                    Err(mpsc::RecvError) => break Ok(MenuUpdate::Push(Menu::Quit)),
                }
            } else {
                match self.input.recv_timeout(timer.remaining(Instant::now())) {
                    Ok(event) => Some(event),
                    // The deadline fired: this wakeup is the gravity tick.
                    Err(mpsc::RecvTimeoutError::Timeout) => None,
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        break Ok(MenuUpdate::Push(Menu::Quit))
                    }
                }
            };

            let feedback = match event {
                None => {
                    let feedback = game.tick();
                    timer.advance(Instant::now());
                    feedback
                }
                Some(Event::Key(key_event)) => match key_event {
                    KeyEvent {
                        code: KeyCode::Esc,
                        kind: KeyEventKind::Press,
                        ..
                    } => break Ok(MenuUpdate::Pop),
                    KeyEvent {
                        code: KeyCode::Char('c' | 'C'),
                        modifiers: KeyModifiers::CONTROL,
                        kind: KeyEventKind::Press | KeyEventKind::Repeat,
                        state: _,
                    } => break Ok(MenuUpdate::Push(Menu::Quit)),
                    KeyEvent {
                        code: KeyCode::Char('d' | 'D'),
                        modifiers: KeyModifiers::CONTROL,
                        kind: KeyEventKind::Press,
                        ..
                    } => game.forfeit(),
                    KeyEvent {
                        code: KeyCode::Char('r' | 'R'),
                        kind: KeyEventKind::Press,
                        ..
                    } => {
                        // A fresh session also gets a fresh tick schedule.
                        game.restart();
                        timer = TickTimer::start(game.state().drop_interval, Instant::now());
                        Vec::new()
                    }
                    KeyEvent {
                        code,
                        kind: KeyEventKind::Press | KeyEventKind::Repeat,
                        ..
                    } => match code {
                        KeyCode::Left | KeyCode::Char('h' | 'H') => {
                            game.handle_command(Command::MoveLeft)
                        }
                        KeyCode::Right | KeyCode::Char('l' | 'L') => {
                            game.handle_command(Command::MoveRight)
                        }
                        KeyCode::Up | KeyCode::Char('k' | 'K') => {
                            game.handle_command(Command::Rotate)
                        }
                        KeyCode::Down | KeyCode::Char('j' | 'J') => {
                            game.handle_command(Command::SoftDrop)
                        }
                        KeyCode::Char(' ') => game.handle_command(Command::HardDrop),
                        _ => Vec::new(),
                    },
                    _ => Vec::new(),
                },
                // Resizes and other events just trigger the redraw.
                Some(_) => Vec::new(),
            };

            // A level-up shrinks the gravity interval; replace the pending
            // deadline instead of letting the old one fire.
            if feedback
                .iter()
                .any(|event| matches!(event, Feedback::LevelUp { .. }))
            {
                timer.reschedule(game.state().drop_interval, Instant::now());
            }
        }
    }

    fn draw_blockfall(&mut self, game: &Game) -> io::Result<()> {
        let state = game.state();
        let (x_main, y_main) = Self::fetch_main_xy();
        let (x_board, y_board) = (x_main, y_main);
        let w_board = 2 * Game::WIDTH;

        // Stamp the falling piece onto a copy of the locked board.
        let mut cells = state.board;
        if let Some(piece) = state.active_piece {
            let tile = Some(piece.tetromino.tiletypeid());
            for (x, y) in piece.tiles() {
                if y >= 0 {
                    cells[y as usize][x as usize] = tile;
                }
            }
        }

        self.term.queue(Clear(ClearType::All))?;
        self.term
            .queue(MoveTo(x_board, y_board))?
            .queue(Print(format!("╭{}╮", "─".repeat(w_board))))?;
        for (y, line) in cells.iter().enumerate() {
            self.term
                .queue(MoveTo(x_board, y_board + 1 + u16::try_from(y).unwrap()))?
                .queue(Print("│"))?;
            for tile in line {
                match tile {
                    Some(tile_type_id) => {
                        let color = Tetromino::from_tiletypeid(*tile_type_id).color();
                        self.term
                            .queue(PrintStyledContent("██".with(term_color(color))))?;
                    }
                    None => {
                        self.term.queue(Print("  "))?;
                    }
                }
            }
            self.term.queue(Print("│"))?;
        }
        self.term
            .queue(MoveTo(
                x_board,
                y_board + 1 + u16::try_from(Game::HEIGHT).unwrap(),
            ))?
            .queue(Print(format!("╰{}╯", "─".repeat(w_board))))?;

        // Sidebar: session stats, piece preview, key legend.
        let x_side = x_board + u16::try_from(w_board).unwrap() + 4;
        for (dy, text) in [
            format!("Score: {}", state.score),
            format!("Level: {}", state.level),
            format!("Lines: {}", state.lines_cleared),
            format!("Seed:  {}", game.seed()),
        ]
        .into_iter()
        .enumerate()
        {
            self.term
                .queue(MoveTo(x_side, y_board + 1 + u16::try_from(dy).unwrap()))?
                .queue(Print(text))?;
        }

        self.term
            .queue(MoveTo(x_side, y_board + 6))?
            .queue(Print("Next:"))?;
        let matrix = state.next_tetromino.matrix();
        let color = term_color(state.next_tetromino.color());
        for row in 0..matrix.size() {
            self.term
                .queue(MoveTo(x_side + 2, y_board + 7 + u16::try_from(row).unwrap()))?;
            for col in 0..matrix.size() {
                if matrix.is_filled(row, col) {
                    self.term.queue(PrintStyledContent("██".with(color)))?;
                } else {
                    self.term.queue(Print("  "))?;
                }
            }
        }

        for (dy, text) in [
            "[←|→] move  [↑] rotate",
            "[↓] soft drop  [Space] hard drop",
            "[R] restart  [Ctrl+D] forfeit",
            "[Esc] back  [Ctrl+C] quit",
        ]
        .into_iter()
        .enumerate()
        {
            self.term
                .queue(MoveTo(x_side, y_board + 12 + u16::try_from(dy).unwrap()))?
                .queue(PrintStyledContent(text.italic()))?;
        }

        // Game-over overlay on top of the board.
        if let Some(result) = game.result() {
            let message = match result {
                GameOver::BlockOut => " THE STACK REACHED THE TOP ",
                GameOver::Forfeit => " ROUND FORFEITED ",
            };
            for (dy, text) in [message, " [R] restart   [Esc] back "]
                .into_iter()
                .enumerate()
            {
                let dx_text = (w_board.saturating_sub(text.chars().count())) / 2;
                self.term
                    .queue(MoveTo(
                        x_board + 1 + u16::try_from(dx_text).unwrap(),
                        y_board + 9 + u16::try_from(dy).unwrap(),
                    ))?
                    .queue(PrintStyledContent(text.negative()))?;
            }
        }

        self.term.flush()
    }
}
