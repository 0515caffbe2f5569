//! Market data identifiers.
//!
//! This module provides:
//! - [`StandardId`]: scheme/value identifier rendered as `"scheme~value"`
//! - [`MarketDataId`]: a typed key declaring the value type stored under it
//! - [`MarketDataKey`]: the type-erased form used as a map key
//! - [`ObservableId`]: identifier sub-kind that also supports time series
//!
//! # Examples
//!
//! ```
//! use scenario_core::id::{MarketDataId, StandardId};
//!
//! let id: StandardId = "BBG~EURUSD".parse().unwrap();
//! assert_eq!(id.scheme(), "BBG");
//! assert_eq!(id.value(), "EURUSD");
//!
//! // The same external id under two value types yields two distinct keys
//! let as_f64: MarketDataId<f64> = MarketDataId::new(id.clone());
//! let as_string: MarketDataId<String> = MarketDataId::new(id);
//! assert_ne!(as_f64.key(), as_string.key());
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use thiserror::Error;

use crate::value::MarketDataValue;

/// Error parsing a [`StandardId`] from its `"scheme~value"` form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdParseError {
    /// The input did not contain exactly one `~` separator.
    #[error("Invalid identifier format: {input:?} (expected \"scheme~value\")")]
    InvalidFormat {
        /// The rejected input
        input: String,
    },

    /// The scheme or value part was empty.
    #[error("Empty {part} in identifier {input:?}")]
    EmptyPart {
        /// Which part was empty (`"scheme"` or `"value"`)
        part: &'static str,
        /// The rejected input
        input: String,
    },
}

/// An external identifier of a piece of market data.
///
/// An identifier is made of a scheme naming the issuing system and a value
/// that is unique within the scheme, rendered as `"scheme~value"`.
///
/// # Examples
///
/// ```
/// use scenario_core::id::StandardId;
///
/// let id = StandardId::new("OG-Ticker", "GBP-LIBOR-3M");
/// assert_eq!(id.to_string(), "OG-Ticker~GBP-LIBOR-3M");
///
/// let parsed: StandardId = "OG-Ticker~GBP-LIBOR-3M".parse().unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardId {
    scheme: String,
    value: String,
}

impl StandardId {
    /// Creates an identifier from a scheme and a value.
    pub fn new(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            value: value.into(),
        }
    }

    /// The scheme that issued the identifier.
    #[inline]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The value, unique within the scheme.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for StandardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.scheme, self.value)
    }
}

impl FromStr for StandardId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, value) = s.split_once('~').ok_or_else(|| IdParseError::InvalidFormat {
            input: s.to_string(),
        })?;
        if scheme.is_empty() {
            return Err(IdParseError::EmptyPart {
                part: "scheme",
                input: s.to_string(),
            });
        }
        if value.contains('~') {
            return Err(IdParseError::InvalidFormat {
                input: s.to_string(),
            });
        }
        if value.is_empty() {
            return Err(IdParseError::EmptyPart {
                part: "value",
                input: s.to_string(),
            });
        }
        Ok(StandardId::new(scheme, value))
    }
}

/// A typed key naming one piece of market data.
///
/// The type parameter declares the value type that may be stored under the
/// identifier; environments enforce it at insertion time. Two identifiers
/// with the same [`StandardId`] but different declared types are distinct
/// keys and never collide in storage.
///
/// # Examples
///
/// ```
/// use scenario_core::id::MarketDataId;
///
/// let id: MarketDataId<f64> = MarketDataId::of("OG-Ticker", "USD-FED-FUND");
/// assert_eq!(id.standard_id().scheme(), "OG-Ticker");
/// ```
pub struct MarketDataId<T> {
    id: StandardId,
    value_type: PhantomData<fn() -> T>,
}

impl<T: MarketDataValue> MarketDataId<T> {
    /// Creates a typed identifier from a [`StandardId`].
    pub fn new(id: StandardId) -> Self {
        Self {
            id,
            value_type: PhantomData,
        }
    }

    /// Creates a typed identifier from a scheme and a value.
    pub fn of(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(StandardId::new(scheme, value))
    }

    /// The external identifier.
    #[inline]
    pub fn standard_id(&self) -> &StandardId {
        &self.id
    }

    /// The type-erased key under which data for this identifier is stored.
    pub fn key(&self) -> MarketDataKey {
        MarketDataKey {
            id: self.id.clone(),
            value_type: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

// Manual impls: derives would demand `T: Clone` etc. even though the type
// parameter is phantom.
impl<T> Clone for MarketDataId<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            value_type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for MarketDataId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarketDataId<{}>({})", std::any::type_name::<T>(), self.id)
    }
}

impl<T> fmt::Display for MarketDataId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

impl<T> PartialEq for MarketDataId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for MarketDataId<T> {}

impl<T> Hash for MarketDataId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// The type-erased form of a [`MarketDataId`], used as a map key.
///
/// Equality and hashing cover both the external identifier and the declared
/// value type, so heterogeneously-typed identifiers can share one map.
#[derive(Clone, Debug)]
pub struct MarketDataKey {
    id: StandardId,
    value_type: TypeId,
    type_name: &'static str,
}

impl MarketDataKey {
    /// The external identifier.
    #[inline]
    pub fn standard_id(&self) -> &StandardId {
        &self.id
    }

    /// The `TypeId` of the declared value type.
    #[inline]
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    /// The name of the declared value type, for diagnostics.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for MarketDataKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.value_type == other.value_type
    }
}

impl Eq for MarketDataKey {}

impl Hash for MarketDataKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.value_type.hash(state);
    }
}

impl fmt::Display for MarketDataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.type_name)
    }
}

/// An identifier for observable market data.
///
/// Observable data is quoted directly by a market data provider, is always
/// an `f64` point value, and additionally supports time-series storage.
///
/// # Examples
///
/// ```
/// use scenario_core::id::{ObservableId, StandardId};
///
/// let obs = ObservableId::of("BBG", "USD-FED-FUND");
/// let point_id = obs.to_market_data_id();
/// assert_eq!(point_id.standard_id(), obs.standard_id());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservableId {
    id: StandardId,
}

impl ObservableId {
    /// Creates an observable identifier from a [`StandardId`].
    pub fn new(id: StandardId) -> Self {
        Self { id }
    }

    /// Creates an observable identifier from a scheme and a value.
    pub fn of(scheme: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(StandardId::new(scheme, value))
    }

    /// The external identifier.
    #[inline]
    pub fn standard_id(&self) -> &StandardId {
        &self.id
    }

    /// The typed point-value identifier for this observable.
    pub fn to_market_data_id(&self) -> MarketDataId<f64> {
        MarketDataId::new(self.id.clone())
    }
}

impl fmt::Display for ObservableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}
