use std::fmt::Display;
use std::io::Error as IOError;

#[derive(Debug)]
pub(crate) enum Error {
    Config(IOError),
    Database(String),
    Time(String),
    Command(String),
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "configuration error: {e}"),
            Error::Database(msg) => write!(f, "{msg}"),
            Error::Time(msg) => write!(f, "invalid due date: {msg}"),
            Error::Command(msg) => write!(f, "invalid command: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<IOError> for Error {
    fn from(value: IOError) -> Self {
        Error::Config(value)
    }
}

impl From<xdg::BaseDirectoriesError> for Error {
    fn from(value: xdg::BaseDirectoriesError) -> Self {
        Error::Config(IOError::new(std::io::ErrorKind::NotFound, value))
    }
}
