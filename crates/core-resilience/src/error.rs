//! Error types for the resilience module

use std::error::Error;
use std::fmt;

/// Failure returned by a breaker-guarded call
///
/// `Operation` carries the guarded operation's own error untouched, so callers
/// can still match on it after the breaker has counted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResilienceError<E> {
    /// Circuit breaker is open, the operation was not invoked
    CircuitOpen,

    /// The guarded operation failed
    Operation(E),
}

impl<E> ResilienceError<E> {
    /// True when the breaker rejected the call without running it
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, ResilienceError::CircuitOpen)
    }

    /// Unwrap the operation's error, if there is one
    pub fn into_operation(self) -> Option<E> {
        match self {
            ResilienceError::CircuitOpen => None,
            ResilienceError::Operation(e) => Some(e),
        }
    }
}

impl<E: fmt::Display> fmt::Display for ResilienceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResilienceError::CircuitOpen => {
                write!(f, "Circuit breaker is open. Too many failures.")
            }
            ResilienceError::Operation(e) => write!(f, "{}", e),
        }
    }
}

impl<E> Error for ResilienceError<E>
where
    E: Error + 'static,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ResilienceError::CircuitOpen => None,
            ResilienceError::Operation(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }

    impl Error for Boom {}

    #[test]
    fn test_error_classification() {
        let open: ResilienceError<Boom> = ResilienceError::CircuitOpen;
        assert!(open.is_circuit_open());
        assert!(open.source().is_none());
        assert_eq!(open.to_string(), "Circuit breaker is open. Too many failures.");

        let failed = ResilienceError::Operation(Boom);
        assert!(!failed.is_circuit_open());
        assert_eq!(failed.to_string(), "boom");
        assert!(failed.source().is_some());
        assert_eq!(failed.into_operation(), Some(Boom));
    }
}
