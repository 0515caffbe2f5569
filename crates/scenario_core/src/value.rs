//! Type-erased market data values.
//!
//! Environments store heterogeneously-typed data (quotes, curves, fixings)
//! under typed identifiers. Storage is type-erased behind [`AnyValue`] and
//! the declared type of each identifier is enforced at the insertion and
//! retrieval boundaries.
//!
//! # Examples
//!
//! ```
//! use scenario_core::value::{downcast_ref, erase, AnyValue};
//!
//! let v: AnyValue = erase(1.25_f64);
//! assert_eq!(downcast_ref::<f64>(&v), Some(&1.25));
//! assert_eq!(downcast_ref::<String>(&v), None);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A value that can be stored in a market data environment.
///
/// Blanket-implemented for every `'static` type that is `Debug + Send +
/// Sync`, so user-defined curve and surface types qualify without any
/// opt-in. The trait exists to recover [`Any`] from behind an `Arc` and to
/// name the concrete type in mismatch diagnostics.
///
/// Note: `Arc<dyn MarketDataValue>` satisfies the blanket impl itself, so
/// call these methods through `as_ref()` (or the [`downcast_ref`] and
/// [`erased_type_name`] helpers) to reach the erased value rather than the
/// `Arc` wrapper.
pub trait MarketDataValue: Any + fmt::Debug + Send + Sync {
    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// The name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + fmt::Debug + Send + Sync> MarketDataValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A shared, immutable, type-erased market data value.
///
/// Cloning is a reference-count bump, which is what makes copy-on-build
/// snapshots cheap.
pub type AnyValue = Arc<dyn MarketDataValue>;

/// Erases a concrete value into an [`AnyValue`].
pub fn erase<T: MarketDataValue>(value: T) -> AnyValue {
    Arc::new(value)
}

/// Downcasts an [`AnyValue`] to a concrete type.
#[inline]
pub fn downcast_ref<T: MarketDataValue>(value: &AnyValue) -> Option<&T> {
    value.as_ref().as_any().downcast_ref::<T>()
}

/// The concrete type name of the value inside an [`AnyValue`].
#[inline]
pub fn erased_type_name(value: &AnyValue) -> &'static str {
    value.as_ref().type_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_erase_and_downcast() {
        let v = erase(42.0_f64);
        assert_eq!(downcast_ref::<f64>(&v), Some(&42.0));
    }

    #[test]
    fn test_downcast_wrong_type() {
        let v = erase("EURUSD".to_string());
        assert_eq!(downcast_ref::<f64>(&v), None);
        assert_eq!(downcast_ref::<String>(&v).map(String::as_str), Some("EURUSD"));
    }

    #[test]
    fn test_erased_type_name() {
        let v = erase(1_u32);
        assert_eq!(erased_type_name(&v), "u32");
    }

    #[test]
    fn test_clone_shares_value() {
        let v = erase(vec![1.0_f64, 2.0]);
        let w = v.clone();
        assert!(Arc::ptr_eq(&v, &w));
    }

    #[test]
    fn test_custom_struct_qualifies() {
        #[derive(Debug, PartialEq)]
        struct FlatCurve {
            rate: f64,
        }

        let v = erase(FlatCurve { rate: 0.05 });
        assert_eq!(downcast_ref::<FlatCurve>(&v), Some(&FlatCurve { rate: 0.05 }));
    }
}
