//! # scenario_core: Foundation Types for Scenario Market Data
//!
//! ## Role
//!
//! scenario_core is the bottom layer of the workspace, providing:
//! - Typed market data identifiers (`id`)
//! - Type-erased market data values (`value`)
//! - Data results and failure records (`result`)
//! - Date-keyed time series (`timeseries`)
//!
//! ## Zero Dependency Principle
//!
//! scenario_core has no dependencies on other scenario_* crates, with minimal
//! external dependencies:
//! - chrono: Date arithmetic
//! - thiserror: Error derives
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use scenario_core::id::{MarketDataId, ObservableId, StandardId};
//! use scenario_core::result::{Failure, FailureReason};
//!
//! // A typed identifier for an f64 quote
//! let id: MarketDataId<f64> = MarketDataId::of("OG-Ticker", "GBP-LIBOR-3M");
//! assert_eq!(id.standard_id().to_string(), "OG-Ticker~GBP-LIBOR-3M");
//!
//! // An observable identifier supports time-series storage
//! let obs = ObservableId::new(StandardId::new("OG-Ticker", "USD-FED-FUND"));
//! assert_eq!(obs.to_market_data_id().standard_id(), obs.standard_id());
//!
//! // Upstream failures are values, not panics
//! let failure = Failure::new(FailureReason::Missing, "no quote published");
//! assert_eq!(failure.to_string(), "Missing: no quote published");
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for identifiers, failures and
//!   time series (type-erased values are never serialisable)

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod id;
pub mod result;
pub mod timeseries;
pub mod value;

// Re-export commonly used types
pub use id::{MarketDataId, MarketDataKey, ObservableId, StandardId};
pub use result::{DataResult, Failure, FailureReason};
pub use timeseries::{LocalDateDoubleTimeSeries, TimeSeriesError};
pub use value::{AnyValue, MarketDataValue};
