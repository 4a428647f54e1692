//! Error types for extraction and exclusion parsing.

use std::fmt;

/// Error returned by a [`ColorExtractor`](crate::ColorExtractor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The pixel sequence was empty
    EmptyImage,
    /// Cluster count of zero was requested
    InvalidClusterCount(usize),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::EmptyImage => write!(f, "image contains no pixels"),
            ExtractError::InvalidClusterCount(k) => {
                write!(f, "invalid cluster count {} (must be at least 1)", k)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

/// Error returned when exclusion input cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionError {
    /// A token that is not a positive integer cluster id
    InvalidToken(String),
}

impl fmt::Display for ExclusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionError::InvalidToken(token) => {
                write!(f, "invalid color number '{}' (expected e.g. 1,3,7)", token)
            }
        }
    }
}

impl std::error::Error for ExclusionError {}
