//! The immutable scenario environment snapshot.
//!
//! A [`ScenarioEnvironment`] is the build product of a
//! [`ScenarioEnvironmentBuilder`](crate::builder::ScenarioEnvironmentBuilder):
//! a deeply immutable aggregate of the base environment plus frozen copies
//! of the valuation dates, per-scenario values, time series, global values
//! and failure registries. It is safe to share read-only across concurrent
//! consumers without synchronization.

use std::collections::HashMap;

use chrono::NaiveDate;

use scenario_core::id::{MarketDataId, MarketDataKey, ObservableId};
use scenario_core::result::Failure;
use scenario_core::timeseries::LocalDateDoubleTimeSeries;
use scenario_core::value::{downcast_ref, AnyValue, MarketDataValue};

use crate::base::BaseEnvironment;
use crate::builder::ScenarioEnvironmentBuilder;

/// An immutable snapshot of market data for a batch of scenarios.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use scenario_core::id::MarketDataId;
/// use scenario_env::builder::ScenarioEnvironmentBuilder;
///
/// let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// let id: MarketDataId<f64> = MarketDataId::of("BBG", "EURUSD");
///
/// let mut builder = ScenarioEnvironmentBuilder::new(2, date);
/// builder.add_values(&id, vec![1.08, 1.09])?;
/// let env = builder.build();
///
/// assert_eq!(env.scenario_count(), 2);
/// assert_eq!(env.value(0, &id), Some(&1.08));
/// assert_eq!(env.value(1, &id), Some(&1.09));
/// # Ok::<(), scenario_env::EnvironmentError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ScenarioEnvironment {
    base: BaseEnvironment,
    scenario_count: usize,
    valuation_dates: Vec<NaiveDate>,
    values: HashMap<MarketDataKey, Vec<AnyValue>>,
    time_series: HashMap<ObservableId, LocalDateDoubleTimeSeries>,
    global_values: HashMap<MarketDataKey, AnyValue>,
    single_value_failures: HashMap<MarketDataKey, Failure>,
    time_series_failures: HashMap<ObservableId, Failure>,
}

impl ScenarioEnvironment {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_frozen(
        base: BaseEnvironment,
        scenario_count: usize,
        valuation_dates: Vec<NaiveDate>,
        values: HashMap<MarketDataKey, Vec<AnyValue>>,
        time_series: HashMap<ObservableId, LocalDateDoubleTimeSeries>,
        global_values: HashMap<MarketDataKey, AnyValue>,
        single_value_failures: HashMap<MarketDataKey, Failure>,
        time_series_failures: HashMap<ObservableId, Failure>,
    ) -> Self {
        Self {
            base,
            scenario_count,
            valuation_dates,
            values,
            time_series,
            global_values,
            single_value_failures,
            time_series_failures,
        }
    }

    /// The fixed number of scenarios.
    #[inline]
    pub fn scenario_count(&self) -> usize {
        self.scenario_count
    }

    /// The valuation dates, one per scenario.
    #[inline]
    pub fn valuation_dates(&self) -> &[NaiveDate] {
        &self.valuation_dates
    }

    /// The valuation date of one scenario.
    pub fn valuation_date(&self, scenario: usize) -> Option<NaiveDate> {
        self.valuation_dates.get(scenario).copied()
    }

    /// The per-scenario values stored for an identifier.
    ///
    /// A one-element list stored by a shared-value resolution is returned
    /// as-is; use [`value`](Self::value) for per-scenario lookups that
    /// broadcast it.
    pub fn values<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> Option<Vec<&T>> {
        self.values
            .get(&id.key())
            .map(|list| list.iter().filter_map(downcast_ref::<T>).collect())
    }

    /// The value for one scenario.
    ///
    /// A stored one-element list is shared by every scenario; a list with
    /// one value per scenario is indexed. Falls back to the base
    /// environment when the per-scenario registry has no entry.
    pub fn value<T: MarketDataValue>(
        &self,
        scenario: usize,
        id: &MarketDataId<T>,
    ) -> Option<&T> {
        if scenario >= self.scenario_count {
            return None;
        }
        match self.values.get(&id.key()) {
            Some(list) if list.len() == 1 => downcast_ref::<T>(&list[0]),
            Some(list) => list.get(scenario).and_then(downcast_ref::<T>),
            None => self.base.value(id),
        }
    }

    /// The global value for an identifier, shared by all scenarios.
    pub fn global_value<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> Option<&T> {
        self.global_values.get(&id.key()).and_then(downcast_ref::<T>)
    }

    /// The time series for an observable identifier.
    ///
    /// Falls back to the base environment when the scenario registry has no
    /// entry.
    pub fn time_series(&self, id: &ObservableId) -> Option<&LocalDateDoubleTimeSeries> {
        self.time_series.get(id).or_else(|| self.base.time_series(id))
    }

    /// Whether per-scenario or base values exist for an identifier.
    pub fn contains_values<T: MarketDataValue>(&self, id: &MarketDataId<T>) -> bool {
        self.values.contains_key(&id.key()) || self.base.contains_value(id)
    }

    /// Whether a time series exists for an identifier.
    pub fn contains_time_series(&self, id: &ObservableId) -> bool {
        self.time_series.contains_key(id) || self.base.time_series(id).is_some()
    }

    /// The recorded point-value failure for an identifier, if any.
    pub fn single_value_failure<T: MarketDataValue>(
        &self,
        id: &MarketDataId<T>,
    ) -> Option<&Failure> {
        self.single_value_failures.get(&id.key())
    }

    /// The recorded time-series failure for an identifier, if any.
    pub fn time_series_failure(&self, id: &ObservableId) -> Option<&Failure> {
        self.time_series_failures.get(id)
    }

    /// All recorded point-value failures.
    #[inline]
    pub fn single_value_failures(&self) -> &HashMap<MarketDataKey, Failure> {
        &self.single_value_failures
    }

    /// All recorded time-series failures.
    #[inline]
    pub fn time_series_failures(&self) -> &HashMap<ObservableId, Failure> {
        &self.time_series_failures
    }

    /// The frozen base environment.
    #[inline]
    pub fn base(&self) -> &BaseEnvironment {
        &self.base
    }

    /// Re-opens this snapshot as a builder seeded with its contents.
    ///
    /// Used when deriving one scenario set from another; the snapshot
    /// itself is unaffected by anything done to the returned builder.
    pub fn to_builder(&self) -> ScenarioEnvironmentBuilder {
        // Collections are valid by construction, so this cannot fail the
        // cardinality re-validation that from_parts performs.
        match ScenarioEnvironmentBuilder::from_parts(
            self.base.clone(),
            self.scenario_count,
            self.valuation_dates.clone(),
            self.values.clone(),
            self.time_series.clone(),
            self.global_values.clone(),
            self.single_value_failures.clone(),
            self.time_series_failures.clone(),
        ) {
            Ok(builder) => builder,
            Err(_) => unreachable!("snapshot collections satisfy the builder invariants"),
        }
    }
}
