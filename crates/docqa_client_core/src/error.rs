//! crates/docqa_client_core/src/error.rs
//!
//! Errors raised before any backend call is made, and the taxonomy used to
//! classify every failure in logs and tests.

use std::fmt;

/// Input rejected locally. No state transition and no network call follow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("question is empty")]
    EmptyQuestion,
    #[error("no file selected")]
    MissingFile,
    #[error("'{0}' is not a .pdf file")]
    InvalidType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Server,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Server => "ServerError",
        };
        f.write_str(name)
    }
}
