mod app;
mod config;
mod game;

use aster_core::GameLoop;

use crate::app::DesktopWindow;
use crate::game::DemoGame;

const WINDOW_TITLE: &str = "aster";
const WINDOW_WIDTH: u32 = 1024;
const WINDOW_HEIGHT: u32 = 768;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = config::load("aster.toml")?;
    let window = DesktopWindow::new(WINDOW_TITLE, WINDOW_WIDTH, WINDOW_HEIGHT, &config)?;
    let logic = DemoGame::new(config.clone());

    // The winit window is tied to this thread, so the loop runs here.
    let game_loop = GameLoop::new(window, logic, &config)?;
    game_loop.run()?;
    Ok(())
}
