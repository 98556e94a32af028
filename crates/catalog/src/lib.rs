//! `surtido-catalog` — article (SKU) records and the catalog store.
//!
//! Read-mostly: the replenishment subsystem only reads articles. Stock
//! fields change through the explicit receiving/sales hooks on
//! [`CatalogStore`], never through ambient shared state.

pub mod article;
pub mod store;

pub use article::{Article, SupplierOffer};
pub use store::{ArticleFilter, CatalogStore};
