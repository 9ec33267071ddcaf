//! Catalog: the ledger owning products and stock adjustments.

use serde::{Deserialize, Serialize};

use mizan_core::{DomainError, DomainResult, ProductId};

use crate::product::Product;

/// Product count ceiling for free-tier accounts.
///
/// Enforced at the action boundary, not here: the catalog itself imposes no
/// cap.
pub const FREE_TIER_PRODUCT_LIMIT: usize = 7;

/// Owns the product list. Serialized transparently as a plain array so state
/// written by earlier versions of the console loads unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Append a new product after validation. Returns its assigned id.
    pub fn add(&mut self, name: &str, price: i64, stock: i64) -> DomainResult<ProductId> {
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if price <= 0 {
            return Err(DomainError::validation("price must be positive"));
        }
        if stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }

        let id = ProductId::new();
        self.products.push(Product {
            id,
            name: name.trim().to_string(),
            price,
            stock,
        });
        tracing::info!(product_id = %id, "product added");
        Ok(id)
    }

    /// Raw stock decrement used as a side effect of invoice creation.
    ///
    /// Does not re-check sufficiency; callers verify `has_stock` before
    /// accepting an invoice item.
    pub fn decrement_stock(&mut self, id: ProductId, quantity: i64) -> DomainResult<()> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;
        product.stock -= quantity;
        tracing::debug!(product_id = %id, quantity, stock = product.stock, "stock decremented");
        Ok(())
    }

    pub fn has_stock(&self, id: ProductId, quantity: i64) -> bool {
        self.get(id).is_some_and(|p| p.stock >= quantity)
    }

    /// Products in the low-stock band (`0 < stock <= LOW_STOCK_THRESHOLD`).
    pub fn low_stock(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_low_stock())
    }

    pub fn free_limit_reached(&self) -> bool {
        self.products.len() >= FREE_TIER_PRODUCT_LIMIT
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_assigns_unique_ids() {
        let mut catalog = Catalog::new();
        let a = catalog.add("Widget", 1000, 5).unwrap();
        let b = catalog.add("Gadget", 2500, 2).unwrap();
        assert_ne!(a, b);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn add_rejects_bad_input_without_mutating() {
        let mut catalog = Catalog::new();
        assert!(matches!(
            catalog.add("", 1000, 5),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            catalog.add("Widget", 0, 5),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            catalog.add("Widget", 1000, -1),
            Err(DomainError::Validation(_))
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn decrement_is_raw_and_can_go_negative() {
        let mut catalog = Catalog::new();
        let id = catalog.add("Widget", 1000, 1).unwrap();
        catalog.decrement_stock(id, 3).unwrap();
        assert_eq!(catalog.get(id).unwrap().stock, -2);
    }

    #[test]
    fn decrement_missing_product_is_not_found() {
        let mut catalog = Catalog::new();
        assert_eq!(
            catalog.decrement_stock(ProductId::new(), 1),
            Err(DomainError::NotFound)
        );
    }

    #[test]
    fn has_stock_checks_sufficiency() {
        let mut catalog = Catalog::new();
        let id = catalog.add("Widget", 1000, 2).unwrap();
        assert!(catalog.has_stock(id, 2));
        assert!(!catalog.has_stock(id, 3));
        assert!(!catalog.has_stock(ProductId::new(), 1));
    }

    #[test]
    fn low_stock_lists_only_the_band() {
        let mut catalog = Catalog::new();
        catalog.add("Out", 1000, 0).unwrap();
        let low = catalog.add("Low", 1000, 3).unwrap();
        catalog.add("Fine", 1000, 10).unwrap();
        let lows: Vec<_> = catalog.low_stock().map(|p| p.id).collect();
        assert_eq!(lows, vec![low]);
    }

    #[test]
    fn free_limit_trips_at_seven() {
        let mut catalog = Catalog::new();
        for i in 0..FREE_TIER_PRODUCT_LIMIT {
            catalog.add(&format!("P{i}"), 100, 1).unwrap();
            let expected = i + 1 >= FREE_TIER_PRODUCT_LIMIT;
            assert_eq!(catalog.free_limit_reached(), expected);
        }
    }

    proptest! {
        /// Decrementing by q drops stock by exactly q, once.
        #[test]
        fn decrement_arithmetic(initial in 0i64..10_000, quantity in 1i64..100) {
            let mut catalog = Catalog::new();
            let id = catalog.add("Widget", 500, initial).unwrap();
            catalog.decrement_stock(id, quantity).unwrap();
            prop_assert_eq!(catalog.get(id).unwrap().stock, initial - quantity);
        }
    }
}
