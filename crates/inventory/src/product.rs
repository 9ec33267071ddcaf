//! Product record.

use serde::{Deserialize, Serialize};

use mizan_core::ProductId;

/// Stock at or below this (and above zero) counts as running low.
pub const LOW_STOCK_THRESHOLD: i64 = 3;

/// A catalog product.
///
/// `price` is in the smallest currency unit. `stock` starts non-negative but
/// the raw decrement path does not re-validate, so it can drift below zero if
/// a caller skips the sufficiency check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock <= LOW_STOCK_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        Product {
            id: ProductId::new(),
            name: "Widget".to_string(),
            price: 1000,
            stock,
        }
    }

    #[test]
    fn low_stock_band_is_exclusive_of_zero() {
        assert!(!product(0).is_low_stock());
        assert!(product(1).is_low_stock());
        assert!(product(LOW_STOCK_THRESHOLD).is_low_stock());
        assert!(!product(LOW_STOCK_THRESHOLD + 1).is_low_stock());
        assert!(!product(-1).is_low_stock());
    }
}
