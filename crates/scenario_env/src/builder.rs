//! The scenario environment aggregator.
//!
//! [`ScenarioEnvironmentBuilder`] accumulates market data for a fixed-size
//! batch of scenarios and freezes it into an immutable
//! [`ScenarioEnvironment`](crate::environment::ScenarioEnvironment) on
//! [`build`](ScenarioEnvironmentBuilder::build).
//!
//! The aggregation discipline it enforces:
//! - every scenario-varying input holds exactly one value per scenario
//!   (whole-list replaces are validated eagerly against the scenario count)
//! - per identifier and per registry, stored data and a recorded failure are
//!   mutually exclusive; registering one clears the other
//! - snapshots are copies, so later mutation never leaks into consumers
//!
//! The builder is single-threaded; callers serialize mutations. Every
//! operation is synchronous and either completes fully or leaves the state
//! untouched.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use scenario_core::id::MarketDataId;
//! use scenario_env::builder::ScenarioEnvironmentBuilder;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let id: MarketDataId<f64> = MarketDataId::of("BBG", "EURUSD");
//!
//! let mut builder = ScenarioEnvironmentBuilder::new(3, date);
//! builder.add_values(&id, vec![1.08, 1.09, 1.10])?;
//!
//! let env = builder.build();
//! assert_eq!(env.values(&id), Some(vec![&1.08, &1.09, &1.10]));
//! # Ok::<(), scenario_env::EnvironmentError>(())
//! ```

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, trace};

use scenario_core::id::{MarketDataId, MarketDataKey, ObservableId};
use scenario_core::result::{DataResult, Failure};
use scenario_core::timeseries::LocalDateDoubleTimeSeries;
use scenario_core::value::{erase, AnyValue, MarketDataValue};

use crate::base::{BaseEnvironment, BaseEnvironmentBuilder};
use crate::entry::{check_value_type, MultiEntry, SeriesEntry};
use crate::environment::ScenarioEnvironment;
use crate::error::EnvironmentError;

/// A mutable accumulator for scenario market data.
///
/// Constructed either fresh ([`new`](Self::new)) or seeded from an existing
/// environment ([`from_parts`](Self::from_parts), usually via
/// [`ScenarioEnvironment::to_builder`]). Consumed by calling
/// [`build`](Self::build), which may be invoked repeatedly to take
/// successive snapshots of evolving state.
#[derive(Clone, Debug)]
pub struct ScenarioEnvironmentBuilder {
    base: BaseEnvironmentBuilder,
    scenario_count: usize,
    valuation_dates: Vec<NaiveDate>,
    values: HashMap<MarketDataKey, MultiEntry>,
    time_series: HashMap<ObservableId, SeriesEntry>,
    global_values: HashMap<MarketDataKey, AnyValue>,
}

impl ScenarioEnvironmentBuilder {
    /// Creates a builder where every scenario has the same valuation date.
    pub fn new(scenario_count: usize, valuation_date: NaiveDate) -> Self {
        Self {
            base: BaseEnvironmentBuilder::new(valuation_date),
            scenario_count,
            valuation_dates: vec![valuation_date; scenario_count],
            values: HashMap::new(),
            time_series: HashMap::new(),
            global_values: HashMap::new(),
        }
    }

    /// Creates a builder seeded from existing collections.
    ///
    /// All collections are copied into fresh internal storage; the builder
    /// never aliases caller-owned structures. Where a key appears in both a
    /// data collection and the matching failure collection, the data entry
    /// wins (the two are disjoint for any environment this crate produced).
    ///
    /// # Errors
    ///
    /// [`EnvironmentError::Cardinality`] if `valuation_dates` does not hold
    /// exactly `scenario_count` dates.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        base: BaseEnvironment,
        scenario_count: usize,
        valuation_dates: Vec<NaiveDate>,
        values: HashMap<MarketDataKey, Vec<AnyValue>>,
        time_series: HashMap<ObservableId, LocalDateDoubleTimeSeries>,
        global_values: HashMap<MarketDataKey, AnyValue>,
        single_value_failures: HashMap<MarketDataKey, Failure>,
        time_series_failures: HashMap<ObservableId, Failure>,
    ) -> Result<Self, EnvironmentError> {
        if valuation_dates.len() != scenario_count {
            return Err(EnvironmentError::Cardinality {
                item: "valuation dates",
                got: valuation_dates.len(),
                expected: scenario_count,
            });
        }

        let mut value_entries: HashMap<MarketDataKey, MultiEntry> = single_value_failures
            .into_iter()
            .map(|(k, f)| (k, MultiEntry::Failed(f)))
            .collect();
        for (k, v) in values {
            value_entries.insert(k, MultiEntry::Values(v));
        }

        let mut series_entries: HashMap<ObservableId, SeriesEntry> = time_series_failures
            .into_iter()
            .map(|(k, f)| (k, SeriesEntry::Failed(f)))
            .collect();
        for (k, s) in time_series {
            series_entries.insert(k, SeriesEntry::Series(s));
        }

        Ok(Self {
            base: base.to_builder(),
            scenario_count,
            valuation_dates,
            values: value_entries,
            time_series: series_entries,
            global_values,
        })
    }

    /// The fixed number of scenarios.
    #[inline]
    pub fn scenario_count(&self) -> usize {
        self.scenario_count
    }

    /// Sets the same valuation date for every scenario.
    pub fn set_valuation_date(&mut self, valuation_date: NaiveDate) -> &mut Self {
        self.valuation_dates = vec![valuation_date; self.scenario_count];
        self.base.set_valuation_date(valuation_date);
        self
    }

    /// Replaces the valuation dates, one per scenario.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError::Cardinality`] if the number of dates differs from
    /// the scenario count; the previous dates are left untouched.
    pub fn set_valuation_dates(
        &mut self,
        valuation_dates: Vec<NaiveDate>,
    ) -> Result<&mut Self, EnvironmentError> {
        self.check_length(valuation_dates.len(), "valuation dates")?;
        self.valuation_dates = valuation_dates;
        Ok(self)
    }

    /// Adds per-scenario values for an identifier, one per scenario.
    ///
    /// Replaces all existing values for the identifier and clears any
    /// recorded point-value failure for it.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError::Cardinality`] if the number of values differs
    /// from the scenario count; no state changes on failure.
    pub fn add_values<T: MarketDataValue>(
        &mut self,
        id: &MarketDataId<T>,
        values: Vec<T>,
    ) -> Result<&mut Self, EnvironmentError> {
        self.check_length(values.len(), "values")?;
        let erased = values.into_iter().map(erase).collect();
        self.values.insert(id.key(), MultiEntry::Values(erased));
        Ok(self)
    }

    /// Adds per-scenario values that arrive type-erased.
    ///
    /// Each element is checked against the identifier's declared value type
    /// before anything is stored; on the first incompatible element the
    /// whole call is rejected and no state changes.
    ///
    /// # Errors
    ///
    /// [`EnvironmentError::Cardinality`] on a length mismatch,
    /// [`EnvironmentError::TypeMismatch`] on an incompatible element.
    pub fn add_values_unsafe(
        &mut self,
        key: &MarketDataKey,
        values: Vec<AnyValue>,
    ) -> Result<&mut Self, EnvironmentError> {
        self.check_length(values.len(), "values")?;
        for value in &values {
            check_value_type(key, value)?;
        }
        self.values.insert(key.clone(), MultiEntry::Values(values));
        Ok(self)
    }

    /// Adds the outcome of resolving an identifier's per-scenario values.
    ///
    /// A success installs the values exactly as
    /// [`add_values`](Self::add_values) would and clears any recorded
    /// failure; a failure records it and removes any stored values. The
    /// success path performs no cardinality check: upstream resolution is
    /// trusted to supply one value per scenario.
    pub fn add_result<T: MarketDataValue>(
        &mut self,
        id: &MarketDataId<T>,
        result: DataResult<Vec<T>>,
    ) -> &mut Self {
        let entry = match result {
            Ok(values) => MultiEntry::Values(values.into_iter().map(erase).collect()),
            Err(failure) => {
                trace!(id = %id, %failure, "recording point-value failure");
                MultiEntry::Failed(failure)
            }
        };
        self.values.insert(id.key(), entry);
        self
    }

    /// Adds a value to the base data shared between all scenarios.
    pub fn add_base_value<T: MarketDataValue>(
        &mut self,
        id: &MarketDataId<T>,
        value: T,
    ) -> &mut Self {
        self.base.add_value(id, value);
        self
    }

    /// Adds a type-erased value to the base data shared between all
    /// scenarios, checking it against the identifier's declared type.
    pub fn add_base_value_unsafe(
        &mut self,
        key: &MarketDataKey,
        value: AnyValue,
    ) -> Result<&mut Self, EnvironmentError> {
        self.base.add_value_unsafe(key, value)?;
        Ok(self)
    }

    /// Adds the outcome of resolving a single shared value.
    ///
    /// A success stores the one resolved value in the per-scenario registry
    /// (a one-element list, broadcast to every scenario on lookup, not
    /// `scenario_count` copies) and clears any point-value failure; a
    /// failure records it and removes any stored values.
    pub fn add_base_result<T: MarketDataValue>(
        &mut self,
        id: &MarketDataId<T>,
        result: DataResult<T>,
    ) -> &mut Self {
        let entry = match result {
            Ok(value) => MultiEntry::Values(vec![erase(value)]),
            Err(failure) => {
                trace!(id = %id, %failure, "recording point-value failure");
                MultiEntry::Failed(failure)
            }
        };
        self.values.insert(id.key(), entry);
        self
    }

    /// Type-erased variant of [`add_base_result`](Self::add_base_result).
    ///
    /// The resolved value is checked against the identifier's declared type
    /// at the point of insertion.
    pub fn add_base_result_unsafe(
        &mut self,
        key: &MarketDataKey,
        result: DataResult<AnyValue>,
    ) -> Result<&mut Self, EnvironmentError> {
        let entry = match result {
            Ok(value) => {
                check_value_type(key, &value)?;
                MultiEntry::Values(vec![value])
            }
            Err(failure) => MultiEntry::Failed(failure),
        };
        self.values.insert(key.clone(), entry);
        Ok(self)
    }

    /// Adds a value applicable to all scenarios, unconditionally
    /// overwriting any prior global entry for the identifier.
    ///
    /// The global registry is a disjoint concern from the per-scenario
    /// registry and no failure tracking participates in it.
    pub fn add_global_value<T: MarketDataValue>(
        &mut self,
        id: &MarketDataId<T>,
        value: T,
    ) -> &mut Self {
        self.global_values.insert(id.key(), erase(value));
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

    /// Adds multiple time series, applying the single-entry rule to every
    /// key in the map.
    pub fn add_time_series_map(
        &mut self,
        series: HashMap<ObservableId, LocalDateDoubleTimeSeries>,
    ) -> &mut Self {
        for (id, s) in series {
            self.time_series.insert(id, SeriesEntry::Series(s));
        }
        self
    }

    /// Adds the outcome of resolving one time series upstream.
    ///
    /// A success stores the series and clears any recorded failure; a
    /// failure records it and removes any stored series.
    pub fn add_time_series_result(
        &mut self,
        id: &ObservableId,
        result: DataResult<LocalDateDoubleTimeSeries>,
    ) -> &mut Self {
        let entry = match result {
            Ok(series) => SeriesEntry::Series(series),
            Err(failure) => {
                trace!(id = %id, %failure, "recording time-series failure");
                SeriesEntry::Failed(failure)
            }
        };
        self.time_series.insert(id.clone(), entry);
        self
    }

    /// Freezes the current state into an immutable [`ScenarioEnvironment`].
    ///
    /// This is a pure read: every collection (and the base environment) is
    /// copied, the builder stays usable, and later mutations never affect
    /// snapshots already returned.
    pub fn build(&self) -> ScenarioEnvironment {
        let mut values = HashMap::new();
        let mut single_value_failures = HashMap::new();
        for (key, entry) in &self.values {
            match entry {
                MultiEntry::Values(v) => {
                    values.insert(key.clone(), v.clone());
                }
                MultiEntry::Failed(f) => {
                    single_value_failures.insert(key.clone(), f.clone());
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

        debug!(
            scenarios = self.scenario_count,
            values = values.len(),
            time_series = time_series.len(),
            globals = self.global_values.len(),
            value_failures = single_value_failures.len(),
            time_series_failures = time_series_failures.len(),
            "building scenario environment snapshot"
        );

        ScenarioEnvironment::from_frozen(
            self.base.build(),
            self.scenario_count,
            self.valuation_dates.clone(),
            values,
            time_series,
            self.global_values.clone(),
            single_value_failures,
            time_series_failures,
        )
    }

    fn check_length(&self, got: usize, item: &'static str) -> Result<(), EnvironmentError> {
        if got != self.scenario_count {
            return Err(EnvironmentError::Cardinality {
                item,
                got,
                expected: self.scenario_count,
            });
        }
        Ok(())
    }
}
