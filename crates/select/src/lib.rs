//! `crmdesk-select`: searchable select (autocomplete) control.
//!
//! Headless: the control owns text, open/closed state and the candidate list,
//! and produces a render model ([`ResultsView`]). Drawing is up to the caller.
//!
//! - [`Autocomplete`]: typing, local filtering, selection
//! - [`SearchSequencer`]: tags server searches so stale responses are dropped
//! - [`PointerHub`]: document-level pointer-down fan-out used for outside-click dismissal

pub mod autocomplete;
pub mod dismiss;
pub mod filter;
pub mod label;
pub mod sequence;

pub use autocomplete::{Autocomplete, AutocompleteConfig, ResultRow, ResultsView, SearchRequest};
pub use dismiss::{Point, PointerHub, Region, Subscription};
pub use filter::filter_candidates;
pub use label::{KeyFn, Labeler, entity_key, safe_label};
pub use sequence::{SearchSequencer, SearchTicket};
