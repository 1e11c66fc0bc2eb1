use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use dinosweep_engine::{Field, Status};

use crate::application::{Application, Menu, MenuUpdate};

/// Classic per-count coloring for the adjacency digits.
fn count_color(count: u8) -> Color {
    match count {
        1 => Color::Blue,
        2 => Color::Green,
        3 => Color::Red,
        4 => Color::Magenta,
        _ => Color::DarkRed,
    }
}

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_dinosweep(&mut self) -> io::Result<MenuUpdate> {
        let mut field = match self.start_seed {
            Some(seed) => Field::with_seed(seed),
            None => Field::new(),
        };
        let mut cursor = (0usize, 0usize);

        loop {
            self.draw_dinosweep(&field, cursor)?;

            // Purely input-driven: nothing moves between keypresses.
            let Ok(event) = self.input.recv() else {
                break Ok(MenuUpdate::Push(Menu::Quit));
            };
            match event {
                Event::Key(KeyEvent {
                    code: KeyCode::Esc,
                    kind: KeyEventKind::Press,
                    ..
                }) => break Ok(MenuUpdate::Pop),
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c' | 'C'),
                    modifiers: KeyModifiers::CONTROL,
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    state: _,
                }) => break Ok(MenuUpdate::Push(Menu::Quit)),
                Event::Key(KeyEvent {
                    code: KeyCode::Char('r' | 'R'),
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    field.restart();
                    cursor = (0, 0);
                }
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => match code {
                    KeyCode::Up | KeyCode::Char('k' | 'K') => {
                        cursor.0 = cursor.0.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j' | 'J') => {
                        cursor.0 = (cursor.0 + 1).min(Field::ROWS - 1);
                    }
                    KeyCode::Left | KeyCode::Char('h' | 'H') => {
                        cursor.1 = cursor.1.saturating_sub(1);
                    }
                    KeyCode::Right | KeyCode::Char('l' | 'L') => {
                        cursor.1 = (cursor.1 + 1).min(Field::COLS - 1);
                    }
                    KeyCode::Enter | KeyCode::Char(' ') => field.reveal(cursor.0, cursor.1),
                    KeyCode::Char('f' | 'F') => field.toggle_flag(cursor.0, cursor.1),
                    _ => {}
                },
                _ => {}
            }
        }
    }

    fn draw_dinosweep(&mut self, field: &Field, cursor: (usize, usize)) -> io::Result<()> {
        let ended = field.status() != Status::InProgress;
        let w_main: usize = Self::W_MAIN.into();
        let (x_main, y_main) = Self::fetch_main_xy();
        let (x_grid, y_grid) = (x_main, y_main + 1);
        let w_grid = 2 * Field::COLS;

        self.term.queue(Clear(ClearType::All))?;
        self.term
            .queue(MoveTo(x_grid, y_grid))?
            .queue(Print(format!("╭{}╮", "─".repeat(w_grid))))?;
        for (row, cells) in field.cells().iter().enumerate() {
            self.term
                .queue(MoveTo(x_grid, y_grid + 1 + u16::try_from(row).unwrap()))?
                .queue(Print("│"))?;
            for (col, cell) in cells.iter().enumerate() {
                // Hazards stay hidden until the round is over.
                let text = if cell.revealed || (ended && cell.has_dino) {
                    if cell.has_dino {
                        "◣◢".to_string().with(Color::Red)
                    } else if cell.adjacent_dinos > 0 {
                        format!("{} ", cell.adjacent_dinos)
                            .with(count_color(cell.adjacent_dinos))
                    } else {
                        "  ".to_string().with(Color::Reset)
                    }
                } else if cell.flagged {
                    "▶◀".to_string().with(Color::Yellow)
                } else {
                    "░░".to_string().with(Color::DarkGrey)
                };
                let text = if (row, col) == cursor && !ended {
                    text.negative()
                } else {
                    text
                };
                self.term.queue(PrintStyledContent(text))?;
            }
            self.term.queue(Print("│"))?;
        }
        self.term
            .queue(MoveTo(
                x_grid,
                y_grid + 1 + u16::try_from(Field::ROWS).unwrap(),
            ))?
            .queue(Print(format!("╰{}╯", "─".repeat(w_grid))))?;

        // Sidebar: round stats.
        let x_side = x_grid + u16::try_from(w_grid).unwrap() + 4;
        let flags = field
            .cells()
            .iter()
            .flatten()
            .filter(|cell| cell.flagged)
            .count();
        for (dy, stat) in [
            format!("Dinos: {}", Field::DINO_COUNT),
            format!("Flags: {flags}"),
            format!("Seed:  {}", field.seed()),
        ]
        .into_iter()
        .enumerate()
        {
            self.term
                .queue(MoveTo(x_side, y_grid + 1 + u16::try_from(dy).unwrap()))?
                .queue(Print(stat))?;
        }

        let status_line = match field.status() {
            Status::InProgress => format!(
                "{:^w_main$}",
                format!("{} dinos hide in the field.", Field::DINO_COUNT)
            )
            .stylize(),
            Status::Won => format!("{:^w_main$}", "All clear! Every safe cell revealed.")
                .green()
                .bold(),
            Status::Lost => format!("{:^w_main$}", "CHOMP! A dino got you.").red().bold(),
        };
        self.term
            .queue(MoveTo(x_main, y_grid + 14))?
            .queue(PrintStyledContent(status_line))?;

        for (dy, text) in [
            "[←|↓|↑|→] move  [Enter] reveal  [F] flag",
            "[R] restart  [Esc] back  [Ctrl+C] quit",
        ]
        .into_iter()
        .enumerate()
        {
            self.term
                .queue(MoveTo(x_main, y_grid + 16 + u16::try_from(dy).unwrap()))?
                .queue(PrintStyledContent(format!("{:^w_main$}", text).italic()))?;
        }

        self.term.flush()
    }
}
