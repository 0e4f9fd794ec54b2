//! `crmdesk-desktop`
//!
//! **Responsibility:** the cashier's order form over the remote CRM.
//!
//! This crate provides:
//! - [`OrderForm`]: selectors, reference data, draft and submission for one session
//! - [`FormSettings`]: environment-driven defaults
//! - [`terminal`]: the line-command front end behind the `crmdesk` binary

pub mod notice;
pub mod reference;
pub mod session;
pub mod settings;
pub mod terminal;

pub use notice::{Notice, NoticeLevel};
pub use reference::{LoadReport, ReferenceData};
pub use session::{AuthFailure, NotAuthenticated, OrderForm, Picker, SubmitError, UnknownPicker};
pub use settings::FormSettings;
