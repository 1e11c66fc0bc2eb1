/*! The terminal application: screen stack, terminal setup and teardown. */

mod menus;

use std::{
    io::{self, Write},
    sync::mpsc,
};

use blockfall_engine::TileColor;
use crossterm::{cursor, event::Event, style, terminal, ExecutableCommand};

use crate::input;

/// Game screen to open directly at startup, skipping the title menu.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug, clap::ValueEnum)]
pub enum StartGame {
    /// The falling-block game.
    Blockfall,
    /// The hazard-sweeping puzzle.
    Dinosweep,
}

#[derive(Debug)]
enum Menu {
    Title,
    Blockfall,
    DinoSweep,
    Quit,
}

impl std::fmt::Display for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Menu::Title => "Title Screen",
            Menu::Blockfall => "Blockfall",
            Menu::DinoSweep => "Dino Sweeper",
            Menu::Quit => "Quit",
        };
        write!(f, "{name}")
    }
}

/// What a menu screen hands back to the main loop once it closes.
#[derive(Debug)]
enum MenuUpdate {
    Pop,
    Push(Menu),
}

/// Terminal colors for the falling-block tiles.
fn term_color(color: TileColor) -> style::Color {
    match color {
        TileColor::Cyan => style::Color::Cyan,
        TileColor::Yellow => style::Color::Yellow,
        TileColor::Purple => style::Color::Magenta,
        TileColor::Lime => style::Color::Green,
        TileColor::Red => style::Color::Red,
        TileColor::Blue => style::Color::Blue,
        TileColor::Orange => style::Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
    }
}

/// Stores the terminal handle, the input channel and the startup options.
#[derive(Debug)]
pub struct Application<T: Write> {
    /// Main terminal to draw to.
    term: T,
    /// Receiving end of the input relay.
    input: mpsc::Receiver<Event>,
    /// Engine seed requested on the commandline, if any.
    start_seed: Option<u64>,
    /// Game screen requested on the commandline, if any.
    start_game: Option<StartGame>,
}

impl<T: Write> Drop for Application<T> {
    fn drop(&mut self) {
        // (Try to) undo terminal setup.
        let _ = terminal::disable_raw_mode();
        let _ = self.term.execute(style::ResetColor);
        let _ = self.term.execute(cursor::Show);
        let _ = self.term.execute(terminal::LeaveAlternateScreen);
    }
}

impl<T: Write> Application<T> {
    /// Width of the main screen area.
    const W_MAIN: u16 = 62;
    /// Height of the main screen area.
    const H_MAIN: u16 = 23;

    /// Initializes the terminal and the input relay.
    pub fn new(mut term: T, start_seed: Option<u64>, start_game: Option<StartGame>) -> Self {
        // Console prologue: Initialization.
        let _v = term.execute(terminal::EnterAlternateScreen);
        let _v = term.execute(terminal::SetTitle("Terminal Minigames"));
        let _v = term.execute(cursor::Hide);
        let _v = terminal::enable_raw_mode();

        // One relay serves every screen, so no screen change can leave a
        // stale reader behind to swallow events.
        let (input_sender, input_receiver) = mpsc::channel();
        let _join_handle = input::spawn(input_sender);

        Self {
            term,
            input: input_receiver,
            start_seed,
            start_game,
        }
    }

    /// Top-left corner of the main screen area, centered in the console.
    fn fetch_main_xy() -> (u16, u16) {
        let (w_console, h_console) = terminal::size().unwrap_or((0, 0));
        (
            w_console.saturating_sub(Self::W_MAIN) / 2,
            h_console.saturating_sub(Self::H_MAIN) / 2,
        )
    }

    /// Runs the screen stack until the last screen closes.
    pub fn run(&mut self) -> io::Result<()> {
        let mut menu_stack = vec![Menu::Title];
        match self.start_game {
            Some(StartGame::Blockfall) => menu_stack.push(Menu::Blockfall),
            Some(StartGame::Dinosweep) => menu_stack.push(Menu::DinoSweep),
            None => {}
        }
        loop {
            // Retrieve active menu, stop application if stack is empty.
            let Some(menu) = menu_stack.last_mut() else {
                break;
            };
            // Open menu screen, then store what it returns.
            let menu_update = match menu {
                Menu::Title => self.run_menu_title(),
                Menu::Blockfall => self.run_menu_blockfall(),
                Menu::DinoSweep => self.run_menu_dinosweep(),
                Menu::Quit => break,
            }?;

            // Change screen session depending on what response screen gave.
            match menu_update {
                MenuUpdate::Pop => {
                    if menu_stack.len() > 1 {
                        menu_stack.pop();
                    } else {
                        break;
                    }
                }
                MenuUpdate::Push(menu) => menu_stack.push(menu),
            }
        }

        Ok(())
    }
}
