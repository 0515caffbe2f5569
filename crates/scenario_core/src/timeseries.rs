//! Date-keyed time series of observable values.
//!
//! This module provides:
//! - [`LocalDateDoubleTimeSeries`]: an immutable series of `(date, f64)`
//!   points with strictly ascending dates
//! - [`TimeSeriesError`]: construction errors
//!
//! A time series is scenario-invariant: one series per observable
//! identifier, shared by every scenario.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use scenario_core::timeseries::LocalDateDoubleTimeSeries;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
//! let ts = LocalDateDoubleTimeSeries::new(vec![(d(1), 1.10), (d(2), 1.12)]).unwrap();
//! assert_eq!(ts.len(), 2);
//! assert_eq!(ts.get(d(2)), Some(1.12));
//! assert_eq!(ts.latest(), Some((d(2), 1.12)));
//! ```

use chrono::NaiveDate;
use thiserror::Error;

/// Time series construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeSeriesError {
    /// Dates were not strictly ascending at the given position.
    #[error("Unordered dates at index {index}: {prev} followed by {next}")]
    UnorderedDates {
        /// Position of the offending point
        index: usize,
        /// The preceding date
        prev: NaiveDate,
        /// The out-of-order (or duplicate) date
        next: NaiveDate,
    },

    /// A value was not finite.
    #[error("Non-finite value {value} at {date}")]
    NonFiniteValue {
        /// The date of the offending point
        date: NaiveDate,
        /// The rejected value
        value: f64,
    },
}

/// An immutable time series of `f64` observations keyed by date.
///
/// Dates are strictly ascending; duplicates are rejected at construction.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalDateDoubleTimeSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl LocalDateDoubleTimeSeries {
    /// Creates a series from `(date, value)` points.
    ///
    /// The points must be in strictly ascending date order and every value
    /// must be finite.
    pub fn new(points: Vec<(NaiveDate, f64)>) -> Result<Self, TimeSeriesError> {
        for (i, window) in points.windows(2).enumerate() {
            if window[1].0 <= window[0].0 {
                return Err(TimeSeriesError::UnorderedDates {
                    index: i + 1,
                    prev: window[0].0,
                    next: window[1].0,
                });
            }
        }
        if let Some(&(date, value)) = points.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TimeSeriesError::NonFiniteValue { date, value });
        }
        Ok(Self { points })
    }

    /// Creates an empty series.
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// The number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The value observed on the given date, if any.
    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |&(d, _)| d)
            .ok()
            .map(|i| self.points[i].1)
    }

    /// The earliest point, if any.
    pub fn earliest(&self) -> Option<(NaiveDate, f64)> {
        self.points.first().copied()
    }

    /// The latest point, if any.
    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.points.last().copied()
    }

    /// Iterates over the points in date order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points.iter().copied()
    }

    /// Iterates over the dates in ascending order.
    #[inline]
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|&(d, _)| d)
    }

    /// Iterates over the values in date order.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(_, v)| v)
    }
}
