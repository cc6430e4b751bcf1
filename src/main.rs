mod commands;
mod config;
mod db;
mod due;
mod error;
mod types;
mod views;
use crate::error::Result;
use crate::views::{create::render_create, list::render_tasks, AppState};
use crate::{config::Config, db::Db};
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::{debug, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::stdout;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::load()?;
    debug!("Initializing db...");
    let db = Db::open(&config.database)?;
    info!("{} stored tasks", db.count_tasks()?);
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let result = run(&mut terminal, &db, &config);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, db: &Db, config: &Config) -> Result<()> {
    let mut next = AppState::Tasks;
    loop {
        debug!("Switching to {next:?}");
        match next {
            AppState::Tasks => next = render_tasks(terminal, db, config)?,
            AppState::Create => next = render_create(terminal, db, config)?,
            AppState::Exit => break,
        }
    }
    Ok(())
}
