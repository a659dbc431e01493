use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    DatasetLoad { rejected: usize, message: String },
    InvalidGeometry(String),
    MissingSource(String),
    IO(std::io::Error),
    SerdeJson(serde_json::Error),
    InvalidInput(String),
    Generic(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DatasetLoad { rejected, message } => {
                write!(f, "{message} ({rejected} feature(s) rejected)")
            }
            Error::InvalidGeometry(err) => write!(f, "{}", err),
            Error::MissingSource(err) => write!(f, "{}", err),
            Error::IO(err) => err.fmt(f),
            Error::SerdeJson(err) => err.fmt(f),
            Error::InvalidInput(err) => write!(f, "{}", err),
            Error::Generic(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(err) => Some(err),
            Error::SerdeJson(err) => Some(err),
            _ => None,
        }
    }
}

impl From<&str> for Error {
    fn from(str: &str) -> Self {
        Error::Generic(str.to_owned())
    }
}

impl From<String> for Error {
    fn from(str: String) -> Self {
        Error::Generic(str)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerdeJson(error)
    }
}
