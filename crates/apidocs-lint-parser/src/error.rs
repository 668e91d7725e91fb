//! Error types for the section parser.
//!
//! Segmentation itself is total: any text yields a [`Document`](crate::ast::Document).
//! Errors only arise before segmentation, when input cannot be read or is not
//! valid UTF-8.

use thiserror::Error;

/// An error that prevents a page from being segmented.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// The input bytes are not valid UTF-8.
    #[error("Input is not valid UTF-8 (first invalid byte at offset {offset}, line {line})")]
    InvalidUtf8 { offset: usize, line: usize },

    /// A file could not be read from disk.
    #[error("Failed to read file: {0}")]
    IoError(String),
}

impl ParseError {
    /// Returns the line where decoding failed, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::InvalidUtf8 { line, .. } => Some(*line),
            ParseError::IoError(_) => None,
        }
    }
}

/// Result type alias for parser operations
pub type ParseResult<T> = Result<T, ParseError>;
