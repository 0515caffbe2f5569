//! Environment mutation errors.
//!
//! Only two things can go wrong when mutating an environment builder: a
//! supplied collection has the wrong length for the scenario count, or a
//! type-erased value does not match the declared type of its identifier.
//! Upstream data failures are not errors here; they are recorded as
//! [`scenario_core::result::Failure`] values instead.

use scenario_core::id::StandardId;
use thiserror::Error;

/// Environment builder errors.
///
/// Every variant is raised synchronously and leaves the builder state
/// exactly as it was before the failing call.
///
/// # Examples
///
/// ```
/// use scenario_env::EnvironmentError;
///
/// let err = EnvironmentError::Cardinality {
///     item: "values",
///     got: 2,
///     expected: 3,
/// };
/// assert_eq!(err.to_string(), "Wrong number of values: got 2, expected 3");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    /// A supplied sequence's length does not equal the scenario count.
    #[error("Wrong number of {item}: got {got}, expected {expected}")]
    Cardinality {
        /// The kind of item being supplied (e.g. `"valuation dates"`)
        item: &'static str,
        /// The supplied length
        got: usize,
        /// The scenario count
        expected: usize,
    },

    /// A type-erased value is incompatible with its identifier's declared type.
    #[error("Type mismatch for {id}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The identifier being written
        id: StandardId,
        /// The identifier's declared value type
        expected: &'static str,
        /// The concrete type of the rejected value
        actual: &'static str,
    },
}
