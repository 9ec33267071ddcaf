//! `mizan-inventory` — product catalog and stock-adjustment rules.

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, FREE_TIER_PRODUCT_LIMIT};
pub use product::{Product, LOW_STOCK_THRESHOLD};
