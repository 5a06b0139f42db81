//! Error types for the fact store.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldError {
    /// A variable or class union referenced a class that was never defined.
    #[error("unknown class: {0}")]
    UnknownClass(String),

    #[error("malformed initial condition on line {line} ({reason}): {content}")]
    MalformedCondition {
        line: usize,
        content: String,
        reason: &'static str,
    },

    #[error("invalid clock time {0}: expected HHMM with minutes below 60")]
    InvalidClock(u32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WorldError>;

impl WorldError {
    pub fn malformed(line: usize, content: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedCondition {
            line,
            content: content.into(),
            reason,
        }
    }
}
