//! Label and render-key projections.

use crmdesk_core::Entity;

/// Projects a candidate to its display label.
///
/// Returning `None` means "no usable label"; the control shows an empty string.
pub trait Labeler<T> {
    fn label(&self, item: &T) -> Option<String>;
}

impl<T, F> Labeler<T> for F
where
    F: Fn(&T) -> Option<String>,
{
    fn label(&self, item: &T) -> Option<String> {
        self(item)
    }
}

/// Projects a candidate to a stable render key (`None` falls back to the label).
pub type KeyFn<T> = Box<dyn Fn(&T) -> Option<String>>;

/// Label with failures folded into the empty string.
pub fn safe_label<T>(labeler: &dyn Labeler<T>, item: &T) -> String {
    labeler.label(item).unwrap_or_default()
}

/// Render key for records carrying a remote id.
pub fn entity_key<T: Entity>(item: &T) -> Option<String> {
    Some(item.id().to_string())
}
