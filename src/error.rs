use std::error;
use std::fmt;
use std::io;
use std::result;

/// Errors reported by `RedBlackSet<T>` operations.
#[derive(Debug)]
pub enum Error {
    /// A node could not be allocated. The set is left exactly as it was before the call.
    AllocationFailure,
    /// Writing a graph dump failed.
    IOError(io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IOError(err)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::AllocationFailure => None,
            Error::IOError(error) => Some(error),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::AllocationFailure => write!(f, "failed to allocate a tree node"),
            Error::IOError(error) => write!(f, "{}", error),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
