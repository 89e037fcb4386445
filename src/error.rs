//! Error types for cachestats.

use std::error::Error as StdError;
use std::fmt;
use std::result;
use tonic::Status;

/// A specialized Result type for cachestats operations.
pub type Result<T> = result::Result<T, Error>;

/// The error type for cachestats operations.
#[derive(Debug)]
pub enum Error {
    /// Store backend errors
    Storage(String),
    /// Configuration errors
    Config(String),
    /// I/O errors
    Io(std::io::Error),
    /// Serialization/deserialization errors
    Serialization(String),
    /// A store round-trip exceeded its deadline
    Timeout(u64),
    /// Internal errors
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Timeout(ms) => write!(f, "Store call timed out after {}ms", ms),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::Storage(msg) => Status::internal(format!("Storage error: {}", msg)),
            Error::Config(msg) => Status::failed_precondition(format!("Config error: {}", msg)),
            Error::Io(err) => Status::internal(format!("I/O error: {}", err)),
            Error::Serialization(msg) => Status::internal(format!("Serialization error: {}", msg)),
            Error::Timeout(ms) => Status::deadline_exceeded(format!("Store call timed out after {}ms", ms)),
            Error::Internal(msg) => Status::internal(format!("Internal error: {}", msg)),
        }
    }
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        match status.code() {
            tonic::Code::FailedPrecondition => Error::Config(status.message().to_string()),
            _ => Error::Storage(status.message().to_string()),
        }
    }
}
