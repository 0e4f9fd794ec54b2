//! Client for the remote CRM API.
//!
//! [`CrmApi`] is the seam the order form talks to; [`HttpCrmClient`] is the
//! production implementation over `reqwest`.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod token;

pub use api::{CrmApi, SubmissionReceipt};
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::HttpCrmClient;
pub use normalize::{Listing, ListingShape};
pub use token::{AuthError, AuthToken};
