//! Data results and failure records.
//!
//! Upstream market data providers resolve identifiers into values or into
//! explicit failures. A failed resolution is not an error of the
//! aggregation layer: it is a first-class [`Failure`] value recorded in the
//! environment so that downstream calculations can proceed with whatever
//! data did resolve.
//!
//! # Examples
//!
//! ```
//! use scenario_core::result::{DataResult, Failure, FailureReason};
//!
//! let ok: DataResult<f64> = Ok(1.25);
//! let bad: DataResult<f64> = Err(Failure::new(
//!     FailureReason::Missing,
//!     "no quote published for 2024-06-15",
//! ));
//! assert!(ok.is_ok());
//! assert_eq!(bad.unwrap_err().reason(), FailureReason::Missing);
//! ```

use std::fmt;

/// The class of reason why market data could not be produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailureReason {
    /// The data was not found in any provider.
    Missing,
    /// The data was found but failed validation.
    Invalid,
    /// The provider reported an error while producing the data.
    Error,
    /// No provider supports the identifier.
    Unsupported,
    /// A calculation deriving the data failed.
    Calculation,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::Missing => "Missing",
            FailureReason::Invalid => "Invalid",
            FailureReason::Error => "Error",
            FailureReason::Unsupported => "Unsupported",
            FailureReason::Calculation => "Calculation",
        };
        f.write_str(s)
    }
}

/// A record of why an identifier's market data could not be produced.
///
/// At most one failure is recorded per identifier per registry, and a
/// failure never coexists with successfully stored data for the same
/// identifier in the same registry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Failure {
    reason: FailureReason,
    message: String,
}

impl Failure {
    /// Creates a failure record.
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    /// The reason class.
    #[inline]
    pub fn reason(&self) -> FailureReason {
        self.reason
    }

    /// The human-readable detail.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.message)
    }
}

/// The outcome of resolving one piece of market data upstream.
pub type DataResult<T> = Result<T, Failure>;
