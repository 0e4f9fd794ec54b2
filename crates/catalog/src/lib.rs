//! Reference data records (catalog, counterparties, cash accounts).
//!
//! Typed views of the lookup lists the remote API serves. Records are read-only
//! on the client: they are loaded once per session and only referenced by id.

pub mod customer;
pub mod names;
pub mod product;
pub mod reference;

pub use customer::{Customer, CustomerQuery, LoyaltyCard};
pub use names::{NameField, NameFields};
pub use product::{CatalogProduct, PriceEntry, PriceSource};
pub use reference::{Organization, Paybox, PriceType, ReferenceKind, ReferenceRecord, Warehouse};
