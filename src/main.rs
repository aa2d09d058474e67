use crossterm::cursor::{Hide, Show};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;

mod game;
mod grid;
mod render;
mod search;
mod settings;

use game::Game;
use grid::Grid;
use render::TerminalFrontend;
use settings::Settings;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::from_env();
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(rand::thread_rng()).map_err(io::Error::other)?,
    };
    let grid = Grid::build(&mut rng, settings.width, settings.height, settings.obstacles());
    let mut game = Game::new(grid, settings.strategy);
    info!("starting with {:?}", settings);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut game, &settings);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result?;

    if game.reached_goal() {
        println!("Rescue complete in {} moves.", game.moves());
    } else {
        println!("Mission aborted after {} moves.", game.moves());
    }
    Ok(())
}

fn run(game: &mut Game, settings: &Settings) -> io::Result<()> {
    let mut frontend = TerminalFrontend::new(
        io::stdout(),
        settings.width,
        settings.height,
        settings.frame_time(),
    );
    game.run(&mut frontend)
}
