use std::fmt;

/// Request-scoped failures. Every variant maps to an HTTP 500 for the
/// single request it belongs to; none is fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// Unparsable or out-of-domain numeric parameter.
    InvalidInput(String),
    /// I/O failure while reading the request body.
    BodyRead(String),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::BodyRead(msg) => write!(f, "body read failed: {msg}"),
        }
    }
}

impl std::error::Error for HandlerError {}
