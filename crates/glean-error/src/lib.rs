//! Diagnostics produced while a definition body is abstractly executed. They are values collected
//! by the defining context, never propagated as failures.

use core::fmt;
use std::fmt::Display;

use glean_location::ByteRange;

/// A diagnostic: what went wrong and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    message: String,
    location: ByteRange,
}

impl Error {
    pub fn new(message: impl Into<String>, location: ByteRange) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> ByteRange {
        self.location
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[error]: {} at {}", self.message, self.location)
    }
}
