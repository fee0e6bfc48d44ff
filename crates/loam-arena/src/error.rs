//! Setup validation errors.

use std::error::Error;
use std::fmt;

use loam_core::Category;

/// Errors rejected by `Memory::new`.
///
/// These are configuration errors: callers are expected to treat them as
/// fatal. Runtime allocation failures are not errors — they are signalled
/// as `None` plus a diagnostic log line, with no retry path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupError {
    /// Alignment was zero or not a power of two.
    InvalidAlignment {
        /// The rejected alignment value.
        alignment: usize,
    },
    /// A category was configured with a capacity below 1 byte.
    InvalidCapacity {
        /// The category with the rejected capacity.
        category: Category,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAlignment { alignment } => {
                write!(
                    f,
                    "memory alignment must be a nonzero power of two (got {alignment})"
                )
            }
            Self::InvalidCapacity { category } => {
                write!(f, "\"{category}\" has less than 1 byte of capacity")
            }
        }
    }
}

impl Error for SetupError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_category() {
        let err = SetupError::InvalidCapacity {
            category: Category::Math,
        };
        assert!(err.to_string().contains("Math Arena"));
    }
}
