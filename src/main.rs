mod application;
mod input;
mod timer;

use std::io::{self, Write};

use clap::Parser;

use crate::application::StartGame;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Custom starting seed for a game, given as a 64-bit integer.
    /// The same seed makes a run replayable: the same piece sequence in
    /// Blockfall, the same dino layout in Dino Sweeper.
    /// Example: `./minigames-tui --seed=42` or `./minigames-tui -s 42`.
    #[arg(short, long)]
    seed: Option<u64>,
    /// Game screen to open directly, skipping the title menu.
    /// Example: `./minigames-tui --game=blockfall` or `./minigames-tui -g dinosweep`.
    #[arg(short, long, value_enum)]
    game: Option<StartGame>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read commandline arguments.
    let args = Args::parse();

    // Initialize application.
    let stdout = io::BufWriter::new(io::stdout());
    let mut app = application::Application::new(stdout, args.seed, args.game);

    // Catch panics and write error to separate file, so it isn't lost due to app's terminal shenanigans.
    std::panic::set_hook(Box::new(|panic_info| {
        // Forcefully reset terminal state.
        // Although `Application` restores it, it appears to sometimes not do so before we can meaningfully print
        // an error visible to the user.
        let _ = crossterm::terminal::disable_raw_mode();
        let _ =
            crossterm::ExecutableCommand::execute(&mut io::stderr(), crossterm::style::ResetColor);
        let _ = crossterm::ExecutableCommand::execute(&mut io::stderr(), crossterm::cursor::Show);
        let _ = crossterm::ExecutableCommand::execute(
            &mut io::stderr(),
            crossterm::terminal::LeaveAlternateScreen,
        );

        // Keep a copy of the report on disk.
        if let Ok(mut file) = std::fs::File::create(format!(
            "minigames-tui_crash-msg_{}.txt",
            chrono::Utc::now().format("%Y-%m-%d_%Hh%Mm%Ss")
        )) {
            let _ = file.write(panic_info.to_string().as_bytes());
        }

        // Print the actual panic info.
        eprint!("{panic_info}\n\n");
    }));

    // Run main application.
    app.run()?;

    Ok(())
}
