//! Per-identifier registry entries.
//!
//! Each registry maps an identifier to a single tagged entry, so "has data"
//! and "has failure" can never be populated at the same time; the absent key
//! is the empty state.

use scenario_core::id::MarketDataKey;
use scenario_core::result::Failure;
use scenario_core::timeseries::LocalDateDoubleTimeSeries;
use scenario_core::value::{erased_type_name, AnyValue};

use crate::error::EnvironmentError;

/// Checks a type-erased value against the declared type of its key.
pub(crate) fn check_value_type(
    key: &MarketDataKey,
    value: &AnyValue,
) -> Result<(), EnvironmentError> {
    if value.as_ref().as_any().type_id() == key.value_type() {
        Ok(())
    } else {
        Err(EnvironmentError::TypeMismatch {
            id: key.standard_id().clone(),
            expected: key.type_name(),
            actual: erased_type_name(value),
        })
    }
}

/// One value or one failure, per identifier, in a single-value registry.
#[derive(Clone, Debug)]
pub(crate) enum SingleEntry {
    Value(AnyValue),
    Failed(Failure),
}

/// A per-scenario value list or one failure, in the scenario-value registry.
#[derive(Clone, Debug)]
pub(crate) enum MultiEntry {
    Values(Vec<AnyValue>),
    Failed(Failure),
}

/// One time series or one failure, in a time-series registry.
#[derive(Clone, Debug)]
pub(crate) enum SeriesEntry {
    Series(LocalDateDoubleTimeSeries),
    Failed(Failure),
}
