//! Error types for the pager crates

use std::fmt;

/// Result type alias for pager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds for pager operations
///
/// Every variant describes caller input. A failed operation leaves the
/// store, cache, surface and indicator untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or duplicate input to a mutating call
    InvalidArgument(String),

    /// Index outside the valid bounds for the current page count
    IndexOutOfRange {
        /// Requested index, as received from the caller
        index: i64,
        /// Page count the index was checked against
        len: usize,
    },

    /// Removal target absent
    NotFound(String),

    /// An animated page transition is still in flight
    Busy {
        /// Page the pending transition is heading to
        target: usize,
    },
}

impl Error {
    /// Build an `IndexOutOfRange` from an unsigned index
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Error::IndexOutOfRange {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: {} (page count {})", index, len)
            }
            Error::NotFound(what) => write!(f, "Page not found: {}", what),
            Error::Busy { target } => {
                write!(f, "Transition to page {} still in progress", target)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::IndexOutOfRange { index: -1, len: 3 };
        assert_eq!(err.to_string(), "Index out of range: -1 (page count 3)");

        let err = Error::Busy { target: 2 };
        assert_eq!(err.to_string(), "Transition to page 2 still in progress");
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(
            Error::out_of_range(usize::MAX, 0),
            Error::IndexOutOfRange { index: i64::MAX, len: 0 }
        );
    }
}
