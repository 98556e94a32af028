//! `surtido-purchasing` — order lines, draft aggregation and the
//! purchase-order lifecycle.
//!
//! An [`OrderLine`] is the mutable working item a user edits; lines group
//! into per-supplier [`DraftOrder`]s; submission freezes a draft into an
//! immutable [`PurchaseOrder`] that only ever changes through the
//! [`OrderStatus`] state machine.

pub mod draft;
pub mod line;
pub mod number;
pub mod order;
pub mod status;

pub use draft::{DraftOrder, aggregate};
pub use line::OrderLine;
pub use number::OrderNumber;
pub use order::{ContactChannel, PurchaseOrder};
pub use status::OrderStatus;
