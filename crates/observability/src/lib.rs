//! Process-wide tracing setup shared by the binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::{DEFAULT_FILTER, init_with_filter};

/// Initialize process-wide tracing with the default filter.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init();
}
