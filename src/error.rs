use std::fmt::{self, Display, Formatter};
use std::io;

/// Which end of the pipeline an I/O failure belongs to.
#[derive(Debug)]
pub enum Endpoint {
    Input,
    Output,
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        use Endpoint::*;
        match self {
            Input => write!(f, "input"),
            Output => write!(f, "output"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    InvalidArgument(String),
    Io(Endpoint, io::Error),
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;
        match self {
            InvalidArgument(message) => write!(f, "Invalid argument: {}.", message),
            Io(endpoint, cause) => write!(f, "Failed to access {} file: {}.", endpoint, cause),
        }
    }
}
