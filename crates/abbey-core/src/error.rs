//! Error types for the abbey scheduler
//!
//! Only recoverable conditions are errors. Contract violations (double
//! release, executing a slot twice, resuming an unknown worker) are logic
//! defects and panic at the call site.

use core::fmt;

/// Result type for abbey operations
pub type AbbeyResult<T> = Result<T, AbbeyError>;

/// Errors that can occur in abbey operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbbeyError {
    /// Every task slot is Ready; retry after a drain or drop the work
    Full,

    /// Pool or table sizing rejected at initialization
    InvalidConfig(&'static str),

    /// The scheduler already spent its cycle budget
    Terminated,
}

impl fmt::Display for AbbeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbbeyError::Full => write!(f, "task table full"),
            AbbeyError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            AbbeyError::Terminated => write!(f, "scheduler terminated"),
        }
    }
}

impl std::error::Error for AbbeyError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", AbbeyError::Full), "task table full");
        assert_eq!(
            format!("{}", AbbeyError::InvalidConfig("num_workers must be > 0")),
            "invalid config: num_workers must be > 0"
        );
        assert_eq!(AbbeyError::Terminated.to_string(), "scheduler terminated");
    }

    #[test]
    fn test_error_is_std_error() {
        let e: Box<dyn std::error::Error> = Box::new(AbbeyError::Full);
        assert_eq!(e.to_string(), "task table full");
    }
}
