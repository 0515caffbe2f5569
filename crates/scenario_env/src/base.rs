//! The base (single-scenario) market data environment.
//!
//! Base data is identical across all scenarios: one value per identifier,
//! one time series per observable identifier, and one recorded failure per
//! identifier in each registry. The [`BaseEnvironmentBuilder`] accumulates
//! data mutably; [`BaseEnvironmentBuilder::build`] freezes it into an
//! immutable [`BaseEnvironment`].
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use scenario_core::id::MarketDataId;
//! use scenario_env::base::BaseEnvironmentBuilder;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let id: MarketDataId<f64> = MarketDataId::of("BBG", "EURUSD");
//!
//! let mut builder = BaseEnvironmentBuilder::new(date);
//! builder.add_value(&id, 1.0852);
//!
//! let env = builder.build();
//! assert_eq!(env.value(&id), Some(&1.0852));
//! assert_eq!(env.valuation_date(), date);
//! ```

use std::collections::HashMap;

use chrono::NaiveDate;

use scenario_core::id::{MarketDataId, MarketDataKey, ObservableId};
use scenario_core::result::{DataResult, Failure};
use scenario_core::timeseries::LocalDateDoubleTimeSeries;
use scenario_core::value::{downcast_ref, erase, AnyValue, MarketDataValue};

use crate::entry::{check_value_type, SeriesEntry, SingleEntry};
use crate::error::EnvironmentError;

/// A mutable accumulator for base market data.
///
/// Registering a value for an identifier clears any recorded failure for it
/// and vice versa; an identifier can never hold both at once.
#[derive(Clone, Debug)]
pub struct BaseEnvironmentBuilder {
    valuation_date: NaiveDate,
    values: HashMap<MarketDataKey, SingleEntry>,
    time_series: HashMap<ObservableId, SeriesEntry>,
}

impl BaseEnvironmentBuilder {
    /// Creates an empty builder with the given valuation date.
    pub fn new(valuation_date: NaiveDate) -> Self {
        Self {
            valuation_date,
            values: HashMap::new(),
            time_series: HashMap::new(),
        }
    }

    /// Replaces the valuation date.
    pub fn set_valuation_date(&mut self, valuation_date: NaiveDate) -> &mut Self {
        self.valuation_date = valuation_date;
        self
    }

    /// Adds a single value, replacing any existing value for the identifier
    /// and clearing any recorded failure for it.
    pub fn add_value<T: MarketDataValue>(
        &mut self,
        id: &MarketDataId<T>,
        value: T,
    ) -> &mut Self {
        self.values.insert(id.key(), SingleEntry::Value(erase(value)));
        self
    }

    /// Adds a type-erased value after checking it against the identifier's
    /// declared type.
    ///
    /// On mismatch the builder is left unchanged.
    pub fn add_value_unsafe(
        &mut self,
        key: &MarketDataKey,
        value: AnyValue,
    ) -> Result<&mut Self, EnvironmentError> {
        check_value_type(key, &value)?;
        self.values.insert(key.clone(), SingleEntry::Value(value));
        Ok(self)
    }

    /// Adds the outcome of resolving one identifier upstream.
    ///
    /// A success stores the value and clears any failure; a failure records
    /// it and removes any stored value.
    pub fn add_result<T: MarketDataValue>(
        &mut self,
        id: &MarketDataId<T>,
        result: DataResult<T>,
    ) -> &mut Self {
        let entry = match result {
            Ok(value) => SingleEntry::Value(erase(value)),
            Err(failure) => SingleEntry::Failed(failure),
        };
        self.values.insert(id.key(), entry);
        self
    }

    /// Adds a time series, replacing any existing series for the identifier
    /// and clearing any recorded time-series failure for it.
    pub fn add_time_series(
        &mut self,
        id: &ObservableId,
        series: LocalDateDoubleTimeSeries,
    ) -> &mut Self {
        self.time_series.insert(id.clone(), SeriesEntry::Series(series));
        self
    }

    /// Adds the outcome of resolving one time series upstream.
    pub fn add_time_series_result(
        &mut self,
        id: &ObservableId,
        result: DataResult<LocalDateDoubleTimeSeries>,
    ) -> &mut Self {
        let entry = match result {
            Ok(series) => SeriesEntry::Series(series),
            Err(failure) => SeriesEntry::Failed(failure),
        };
        self.time_series.insert(id.clone(), entry);
        self
    }

    /// Freezes the current state into an immutable [`BaseEnvironment`].
    ///
    /// The builder remains usable; later mutations do not affect the
    /// returned environment.
    pub fn build(&self) -> BaseEnvironment {
        let mut values = HashMap::new();
        let mut failures = HashMap::new();
        for (key, entry) in &self.values {
            match entry {
                SingleEntry::Value(v) => {
                    values.insert(key.clone(), v.clone());
                }
                SingleEntry::Failed(f) => {
                    failures.insert(key.clone(), f.clone());
                }
            }
        }
        let mut time_series = HashMap::new();
        let mut time_series_failures = HashMap::new();
        for (id, entry) in &self.time_series {
            match entry {
                SeriesEntry::Series(s) => {
                    time_series.insert(id.clone(), s.clone());
                }
                SeriesEntry::Failed(f) => {
                    time_series_failures.insert(id.clone(), f.clone());
                }
            }
        }
        BaseEnvironment {
            valuation_date: self.valuation_date,
            values,
            failures,
            time_series,
            time_series_failures,
        }
    }
}

/// An immutable store of market data shared identically by all scenarios.
///
/// Safe to share read-only across threads; it holds no interior mutability.
#[derive(Clone, Debug)]
pub struct BaseEnvironment {
    valuation_date: NaiveDate,
    values: HashMap<MarketDataKey, AnyValue>,
    failures: HashMap<MarketDataKey, Failure>,
    time_series: HashMap<ObservableId, LocalDateDoubleTimeSeries>,
    time_series_failures: HashMap<ObservableId, Failure>,
}

impl BaseEnvironment {
    /// The valuation date.
    #[inline]
    pub fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }

    /// The stored value for an identifier, if any.
    pub fn value<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> Option<&T> {
        self.values.get(&id.key()).and_then(downcast_ref::<T>)
    }

    /// Whether a value is stored for an identifier.
    pub fn contains_value<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> bool {
        self.values.contains_key(&id.key())
    }

    /// The stored time series for an observable identifier, if any.
    pub fn time_series(&self, id: &ObservableId) -> Option<&LocalDateDoubleTimeSeries> {
        self.time_series.get(id)
    }

    /// The recorded point-value failure for an identifier, if any.
    pub fn failure<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> Option<&Failure> {
        self.failures.get(&id.key())
    }

    /// The recorded time-series failure for an identifier, if any.
    pub fn time_series_failure(&self, id: &ObservableId) -> Option<&Failure> {
        self.time_series_failures.get(id)
    }

    /// The number of stored values.
    #[inline]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Re-opens this environment as a builder seeded with its contents.
    pub fn to_builder(&self) -> BaseEnvironmentBuilder {
        let mut values: HashMap<MarketDataKey, SingleEntry> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), SingleEntry::Value(v.clone())))
            .collect();
        for (k, f) in &self.failures {
            values.insert(k.clone(), SingleEntry::Failed(f.clone()));
        }
        let mut time_series: HashMap<ObservableId, SeriesEntry> = self
            .time_series
            .iter()
            .map(|(k, s)| (k.clone(), SeriesEntry::Series(s.clone())))
            .collect();
        for (k, f) in &self.time_series_failures {
            time_series.insert(k.clone(), SeriesEntry::Failed(f.clone()));
        }
        BaseEnvironmentBuilder {
            valuation_date: self.valuation_date,
            values,
            time_series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::result::FailureReason;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn eurusd() -> MarketDataId<f64> {
        MarketDataId::of("BBG", "EURUSD")
    }

    #[test]
    fn test_add_value_and_query() {
        let mut builder = BaseEnvironmentBuilder::new(date());
        builder.add_value(&eurusd(), 1.0852);

        let env = builder.build();
        assert_eq!(env.value(&eurusd()), Some(&1.0852));
        assert!(env.contains_value(&eurusd()));
        assert_eq!(env.failure(&eurusd()), None);
    }

    #[test]
    fn test_add_value_replaces() {
        let mut builder = BaseEnvironmentBuilder::new(date());
        builder.add_value(&eurusd(), 1.08).add_value(&eurusd(), 1.09);
        assert_eq!(builder.build().value(&eurusd()), Some(&1.09));
    }

    #[test]
    fn test_add_value_unsafe_accepts_matching_type() {
        let mut builder = BaseEnvironmentBuilder::new(date());
        builder
            .add_value_unsafe(&eurusd().key(), erase(1.0852_f64))
            .unwrap();
        assert_eq!(builder.build().value(&eurusd()), Some(&1.0852));
    }

    #[test]
    fn test_add_value_unsafe_rejects_wrong_type() {
        let mut builder = BaseEnvironmentBuilder::new(date());
        let err = builder
            .add_value_unsafe(&eurusd().key(), erase("1.0852".to_string()))
            .unwrap_err();
        assert!(matches!(err, EnvironmentError::TypeMismatch { .. }));
        assert!(!builder.build().contains_value(&eurusd()));
    }

    #[test]
    fn test_failed_result_replaces_value() {
        let mut builder = BaseEnvironmentBuilder::new(date());
        builder.add_value(&eurusd(), 1.08);
        builder.add_result(&eurusd(), Err(Failure::new(FailureReason::Missing, "gone")));

        let env = builder.build();
        assert_eq!(env.value(&eurusd()), None);
        assert_eq!(env.failure(&eurusd()).unwrap().reason(), FailureReason::Missing);
    }

    #[test]
    fn test_successful_result_clears_failure() {
        let mut builder = BaseEnvironmentBuilder::new(date());
        builder.add_result(&eurusd(), Err(Failure::new(FailureReason::Missing, "gone")));
        builder.add_result(&eurusd(), Ok(1.0852));

        let env = builder.build();
        assert_eq!(env.value(&eurusd()), Some(&1.0852));
        assert_eq!(env.failure(&eurusd()), None);
    }

    #[test]
    fn test_time_series_result_transitions() {
        let obs = ObservableId::of("BBG", "USD-FED-FUND");
        let series =
            LocalDateDoubleTimeSeries::new(vec![(date(), 0.053)]).unwrap();

        let mut builder = BaseEnvironmentBuilder::new(date());
        builder.add_time_series_result(&obs, Err(Failure::new(FailureReason::Error, "feed down")));
        assert!(builder.build().time_series_failure(&obs).is_some());

        builder.add_time_series(&obs, series.clone());
        let env = builder.build();
        assert_eq!(env.time_series(&obs), Some(&series));
        assert_eq!(env.time_series_failure(&obs), None);
    }

    #[test]
    fn test_build_is_copy_on_build() {
        let mut builder = BaseEnvironmentBuilder::new(date());
        builder.add_value(&eurusd(), 1.08);
        let first = builder.build();

        builder.add_value(&eurusd(), 9.99);
        assert_eq!(first.value(&eurusd()), Some(&1.08));
    }

    #[test]
    fn test_to_builder_roundtrip() {
        let mut builder = BaseEnvironmentBuilder::new(date());
        builder.add_value(&eurusd(), 1.08);
        builder.add_result(
            &MarketDataId::<f64>::of("BBG", "GBPUSD"),
            Err(Failure::new(FailureReason::Missing, "gone")),
        );
        let env = builder.build();

        let reopened = env.to_builder().build();
        assert_eq!(reopened.value(&eurusd()), Some(&1.08));
        assert!(reopened
            .failure(&MarketDataId::<f64>::of("BBG", "GBPUSD"))
            .is_some());
        assert_eq!(reopened.valuation_date(), date());
    }
}
