//! Integration tests for the scenario aggregation pipeline.
//!
//! Exercises the builder, the snapshot and the base environment together,
//! the way a market data collection stage would drive them.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use scenario_core::id::{MarketDataId, ObservableId};
use scenario_core::result::{Failure, FailureReason};
use scenario_core::timeseries::LocalDateDoubleTimeSeries;
use scenario_env::builder::ScenarioEnvironmentBuilder;
use scenario_env::environment::ScenarioEnvironment;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

/// A full collection cycle: per-scenario quotes, a global parameter, a
/// shared time series and one unresolvable identifier.
#[test]
fn test_collection_cycle_end_to_end() {
    let fx: MarketDataId<f64> = MarketDataId::of("BBG", "EURUSD");
    let shift: MarketDataId<f64> = MarketDataId::of("OG", "CURVE-SHIFT");
    let fixings = ObservableId::of("BBG", "USD-FED-FUND");
    let dead: MarketDataId<f64> = MarketDataId::of("BBG", "DELISTED");

    let series = LocalDateDoubleTimeSeries::new(vec![(d(1), 0.053), (d(2), 0.054)]).unwrap();

    let mut builder = ScenarioEnvironmentBuilder::new(3, d(15));
    builder.add_values(&fx, vec![1.08, 1.09, 1.10]).unwrap();
    builder.add_global_value(&shift, 0.0001);
    builder.add_time_series(&fixings, series.clone());
    builder.add_result(
        &dead,
        Err(Failure::new(FailureReason::Missing, "instrument delisted")),
    );

    let env = builder.build();
    assert_eq!(env.scenario_count(), 3);
    assert_eq!(env.valuation_dates(), &[d(15), d(15), d(15)]);
    assert_eq!(env.values(&fx), Some(vec![&1.08, &1.09, &1.10]));
    assert_eq!(env.global_value(&shift), Some(&0.0001));
    assert_eq!(env.time_series(&fixings), Some(&series));
    assert!(env.contains_time_series(&fixings));
    assert_eq!(env.values(&dead), None);
    assert_eq!(
        env.single_value_failure(&dead).map(|f| f.reason()),
        Some(FailureReason::Missing)
    );
    assert_eq!(env.single_value_failures().len(), 1);
    assert!(env.time_series_failures().is_empty());
}

/// N=3 with per-scenario values and a global value, no failures anywhere.
#[test]
fn test_clean_snapshot_has_no_failures() {
    let x: MarketDataId<f64> = MarketDataId::of("T", "X");
    let g: MarketDataId<f64> = MarketDataId::of("T", "G");

    let mut builder = ScenarioEnvironmentBuilder::new(3, d(15));
    builder.add_values(&x, vec![1.0, 2.0, 3.0]).unwrap();
    builder.add_global_value(&g, 7.0);

    let env = builder.build();
    assert_eq!(env.values(&x), Some(vec![&1.0, &2.0, &3.0]));
    assert_eq!(env.global_value(&g), Some(&7.0));
    assert_eq!(env.valuation_dates(), &[d(15), d(15), d(15)]);
    assert!(env.single_value_failures().is_empty());
    assert!(env.time_series_failures().is_empty());
}

/// Recovery is caller-driven: re-adding corrected data over a failure.
#[test]
fn test_failure_then_success_recovers() {
    let x: MarketDataId<f64> = MarketDataId::of("T", "X");

    let mut builder = ScenarioEnvironmentBuilder::new(2, d(15));
    builder.add_result(&x, Err(Failure::new(FailureReason::Error, "feed down")));
    builder.add_result(&x, Ok(vec![1.0, 2.0]));

    let env = builder.build();
    assert_eq!(env.values(&x), Some(vec![&1.0, &2.0]));
    assert_eq!(env.single_value_failure(&x), None);
}

/// Deriving one scenario set from another via to_builder.
#[test]
fn test_to_builder_derives_equal_then_diverges() {
    let fx: MarketDataId<f64> = MarketDataId::of("BBG", "EURUSD");
    let fixings = ObservableId::of("BBG", "USD-FED-FUND");
    let series = LocalDateDoubleTimeSeries::new(vec![(d(1), 0.053)]).unwrap();

    let mut builder = ScenarioEnvironmentBuilder::new(2, d(15));
    builder.add_values(&fx, vec![1.08, 1.09]).unwrap();
    builder.add_time_series(&fixings, series.clone());
    builder.add_base_value(&MarketDataId::<f64>::of("OG", "SPOT-LAG"), 2.0);
    let original = builder.build();

    let mut derived = original.to_builder();
    let rederived = derived.build();
    assert_eq!(rederived.values(&fx), original.values(&fx));
    assert_eq!(rederived.time_series(&fixings), original.time_series(&fixings));
    assert_eq!(rederived.valuation_dates(), original.valuation_dates());
    assert_eq!(
        rederived.base().value(&MarketDataId::<f64>::of("OG", "SPOT-LAG")),
        Some(&2.0)
    );

    // Divergence in the derived set leaves the original untouched.
    derived.add_values(&fx, vec![1.20, 1.21]).unwrap();
    assert_eq!(derived.build().values(&fx), Some(vec![&1.20, &1.21]));
    assert_eq!(original.values(&fx), Some(vec![&1.08, &1.09]));
}

/// A snapshot is handed to concurrent consumers; it must be Send + Sync.
#[test]
fn test_snapshot_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ScenarioEnvironment>();
}

/// Heterogeneous value types under one external id stay separate.
#[test]
fn test_same_external_id_different_types() {
    let as_f64: MarketDataId<f64> = MarketDataId::of("T", "X");
    let as_string: MarketDataId<String> = MarketDataId::of("T", "X");

    let mut builder = ScenarioEnvironmentBuilder::new(1, d(15));
    builder.add_values(&as_f64, vec![1.0]).unwrap();
    builder.add_values(&as_string, vec!["one".to_string()]).unwrap();

    let env = builder.build();
    assert_eq!(env.values(&as_f64), Some(vec![&1.0]));
    assert_eq!(env.values(&as_string), Some(vec![&"one".to_string()]));
}

proptest! {
    /// add_values accepts exactly the length-N lists and the snapshot
    /// returns accepted lists elementwise.
    #[test]
    fn prop_add_values_cardinality(
        n in 0usize..32,
        values in prop::collection::vec(any::<f64>(), 0..64),
    ) {
        let id: MarketDataId<f64> = MarketDataId::of("T", "X");
        let mut builder = ScenarioEnvironmentBuilder::new(n, d(15));

        let outcome = builder.add_values(&id, values.clone());
        if values.len() == n {
            prop_assert!(outcome.is_ok());
            let env = builder.build();
            let got = env.values(&id).expect("values were accepted");
            prop_assert_eq!(got.len(), n);
            for (g, v) in got.iter().zip(&values) {
                // Bitwise comparison so NaN inputs round-trip too.
                prop_assert_eq!(g.to_bits(), v.to_bits());
            }
        } else {
            prop_assert!(outcome.is_err());
            let env = builder.build();
            prop_assert_eq!(env.values(&id), None);
        }
    }

    /// Rejected whole-list replaces never disturb previously accepted data.
    #[test]
    fn prop_rejected_replace_preserves_state(
        n in 1usize..16,
        wrong_len in 0usize..40,
    ) {
        prop_assume!(wrong_len != n);
        let id: MarketDataId<f64> = MarketDataId::of("T", "X");
        let first: Vec<f64> = (0..n).map(|i| i as f64).collect();

        let mut builder = ScenarioEnvironmentBuilder::new(n, d(15));
        builder.add_values(&id, first.clone()).unwrap();
        prop_assert!(builder.add_values(&id, vec![9.9; wrong_len]).is_err());

        let env = builder.build();
        let got = env.values(&id).expect("prior values survive");
        let expected: Vec<&f64> = first.iter().collect();
        prop_assert_eq!(got, expected);
    }
}

#[test]
fn test_time_series_bulk_add() {
    let a = ObservableId::of("BBG", "A");
    let b = ObservableId::of("BBG", "B");
    let sa = LocalDateDoubleTimeSeries::new(vec![(d(1), 1.0)]).unwrap();
    let sb = LocalDateDoubleTimeSeries::new(vec![(d(1), 2.0)]).unwrap();

    let mut map = HashMap::new();
    map.insert(a.clone(), sa.clone());
    map.insert(b.clone(), sb.clone());

    let mut builder = ScenarioEnvironmentBuilder::new(1, d(15));
    builder.add_time_series_map(map);

    let env = builder.build();
    assert_eq!(env.time_series(&a), Some(&sa));
    assert_eq!(env.time_series(&b), Some(&sb));
}
