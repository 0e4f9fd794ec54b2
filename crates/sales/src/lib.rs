//! Sales order drafting.
//!
//! Deterministic business rules for building one sales document: line items
//! and totals, pre-submit validation, and the wire payload (no IO, no HTTP).

pub mod draft;
pub mod line;
pub mod payload;

pub use draft::{DraftError, OrderDraft};
pub use line::{LineDefaults, LineError, LineField, LineItems, OrderLine};
pub use payload::{GoodsLine, PayloadSettings, SALE_OPERATION, SalePayload};
