const APP_PREFIX: &str = "todo";
const DATABASE: &str = "tasks.db";
/// How often the task list redraws so countdowns stay current.
const DEFAULT_TICK_RATE: Duration = Duration::from_secs(1);

use crate::error::Result;
use log::debug;
use std::{path::PathBuf, time::Duration};

pub(crate) struct Config {
    pub(crate) database: PathBuf,
    pub(crate) tick_rate: Duration,
}

impl Config {
    /// Resolves the database location under the XDG state directory,
    /// creating the parent directory when needed.
    pub(crate) fn load() -> Result<Config> {
        let database = get_database_file()?;
        debug!("Using database file {database:?}");
        Ok(Config::with_database(database))
    }

    pub(crate) fn with_database(database: PathBuf) -> Config {
        Config {
            database,
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

fn get_database_file() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix(APP_PREFIX)?;
    Ok(dirs.place_state_file(DATABASE)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_database_keeps_path_and_default_tick() {
        let config = Config::with_database(PathBuf::from("/tmp/tasks.db"));
        assert_eq!(config.database, PathBuf::from("/tmp/tasks.db"));
        assert_eq!(config.tick_rate, Duration::from_secs(1));
    }
}
