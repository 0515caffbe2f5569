//! # scenario_env: Base and Scenario Market Data Environments
//!
//! ## Role
//!
//! scenario_env aggregates market data observations gathered for a batch of
//! parallel what-if scenarios into one consistent, immutable snapshot that a
//! downstream calculation stage consumes. It provides:
//! - [`base`]: the single-scenario environment shared by all scenarios
//! - [`builder`]: the mutable scenario aggregator
//! - [`environment`]: the immutable snapshot produced by `build()`
//! - [`error`]: builder errors (cardinality and type mismatches)
//!
//! ## Aggregation discipline
//!
//! - Scenario-varying inputs hold exactly one value per scenario; bulk
//!   replaces are validated eagerly and reject mismatched lengths without
//!   touching state.
//! - Per identifier and per registry, stored data and a recorded upstream
//!   failure are mutually exclusive by construction.
//! - `build()` copies, never aliases: snapshots are unaffected by later
//!   mutation and safe to share across threads.
//!
//! ## Usage Examples
//!
//! ```rust
//! use chrono::NaiveDate;
//! use scenario_core::id::MarketDataId;
//! use scenario_core::result::{Failure, FailureReason};
//! use scenario_env::builder::ScenarioEnvironmentBuilder;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let fx: MarketDataId<f64> = MarketDataId::of("BBG", "EURUSD");
//! let vol: MarketDataId<f64> = MarketDataId::of("BBG", "EURUSD-VOL-1Y");
//!
//! let mut builder = ScenarioEnvironmentBuilder::new(3, date);
//! builder.add_values(&fx, vec![1.08, 1.09, 1.10])?;
//! builder.add_result(&vol, Err(Failure::new(FailureReason::Missing, "no vol quote")));
//!
//! let env = builder.build();
//! assert_eq!(env.value(2, &fx), Some(&1.10));
//! assert!(env.single_value_failure(&vol).is_some());
//! # Ok::<(), scenario_env::EnvironmentError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod base;
pub mod builder;
mod entry;
pub mod environment;
pub mod error;

// Re-export commonly used types
pub use base::{BaseEnvironment, BaseEnvironmentBuilder};
pub use builder::ScenarioEnvironmentBuilder;
pub use environment::ScenarioEnvironment;
pub use error::EnvironmentError;
