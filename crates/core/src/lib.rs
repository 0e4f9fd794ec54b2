//! `crmdesk-core`: shared domain building blocks.
//!
//! Pure domain primitives only (no IO, no HTTP).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DraftId, RemoteId};
pub use money::{Money, Quantity};
