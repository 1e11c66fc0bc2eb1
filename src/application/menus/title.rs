use std::io::{self, Write};

use blockfall_engine::Tetromino;
use crossterm::{
    cursor::MoveTo,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
    QueueableCommand,
};

use crate::application::{term_color, Application, Menu, MenuUpdate};

impl<T: Write> Application<T> {
    pub(in crate::application) fn run_menu_title(&mut self) -> io::Result<MenuUpdate> {
        let selection = vec![Menu::Blockfall, Menu::DinoSweep, Menu::Quit];
        let mut selected = 0usize;
        loop {
            let w_main: usize = Self::W_MAIN.into();
            let (x_main, y_main) = Self::fetch_main_xy();
            let y_selection = Self::H_MAIN / 5;

            let title = [
                "█▀▄▀█ █ █▄ █ █ █▀▀ ▄▀█ █▀▄▀█ █▀▀ █▀",
                "█ ▀ █ █ █ ▀█ █ █▄█ █▀█ █ ▀ █ ██▄ ▄█",
            ];
            let title_colors = [
                "11111 0 4444 2 333 555 66666 222 44",
                "11111 0 4444 2 333 555 66666 222 44",
            ];

            self.term.queue(Clear(ClearType::All))?;

            let dx_title = w_main.saturating_sub(35) / 2;

            for (dy, (bline, cline)) in title.iter().zip(title_colors).enumerate() {
                for (dx, (bchar, cchar)) in bline.chars().zip(cline.chars()).enumerate() {
                    self.term.queue(MoveTo(
                        x_main + u16::try_from(dx_title + dx).unwrap(),
                        y_main + y_selection + u16::try_from(dy).unwrap(),
                    ))?;

                    self.term.queue(PrintStyledContent(bchar.to_string().with(
                        if cchar == ' ' {
                            Color::Reset
                        } else {
                            term_color(
                                Tetromino::VARIANTS[cchar.to_string().parse::<usize>().unwrap()]
                                    .color(),
                            )
                        },
                    )))?;
                }
            }

            let names = selection
                .iter()
                .map(|menu| menu.to_string())
                .collect::<Vec<_>>();
            let n_names = names.len();
            for (i, name) in names.into_iter().enumerate() {
                self.term
                    .queue(MoveTo(
                        x_main,
                        y_main + y_selection + 4 + u16::try_from(i).unwrap(),
                    ))?
                    .queue(Print(format!(
                        "{:^w_main$}",
                        if i == selected {
                            format!(">> {name} <<")
                        } else {
                            name
                        }
                    )))?;
            }
            self.term
                .queue(MoveTo(
                    x_main,
                    y_main + y_selection + 4 + u16::try_from(n_names).unwrap() + 2,
                ))?
                .queue(PrintStyledContent(
                    format!(
                        "{:^w_main$}",
                        "(Controls: [←|↓|↑|→] [Esc|Enter] / hjklqe)",
                    )
                    .italic(),
                ))?;
            self.term
                .queue(MoveTo(x_main, y_main + Self::H_MAIN - 1))?
                .queue(PrintStyledContent(
                    format!("{:>w_main$}", format!("v{}", clap::crate_version!())).dim(),
                ))?;

            self.term.flush()?;

            // Wait for new input.
            let Ok(event) = self.input.recv() else {
                break Ok(MenuUpdate::Push(Menu::Quit));
            };
            match event {
                // Quit menu.
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c' | 'C'),
                    modifiers: KeyModifiers::CONTROL,
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    state: _,
                }) => break Ok(MenuUpdate::Push(Menu::Quit)),
                Event::Key(KeyEvent {
                    code: KeyCode::Esc | KeyCode::Char('q' | 'Q') | KeyCode::Backspace,
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    selected = 2;
                }
                // Select next menu.
                Event::Key(KeyEvent {
                    code: KeyCode::Enter | KeyCode::Char('e' | 'E'),
                    kind: KeyEventKind::Press,
                    ..
                }) => {
                    if !selection.is_empty() {
                        let menu = selection.into_iter().nth(selected).unwrap();
                        break Ok(MenuUpdate::Push(menu));
                    }
                }
                // Move selector up.
                Event::Key(KeyEvent {
                    code: KeyCode::Up | KeyCode::Char('k' | 'K'),
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => {
                    if !selection.is_empty() {
                        selected += selection.len() - 1;
                    }
                }
                // Move selector down.
                Event::Key(KeyEvent {
                    code: KeyCode::Down | KeyCode::Char('j' | 'J'),
                    kind: KeyEventKind::Press | KeyEventKind::Repeat,
                    ..
                }) => {
                    if !selection.is_empty() {
                        selected += 1;
                    }
                }
                // Other event: don't care.
                _ => {}
            }
            if !selection.is_empty() {
                selected = selected.rem_euclid(selection.len());
            }
        }
    }
}
