//! Entity trait: records that carry a remote identity.

use crate::id::RemoteId;

/// A record identified by the remote API.
///
/// Reference data (organizations, warehouses, products, ...) is owned by the
/// server; the client only ever refers to it by [`RemoteId`].
pub trait Entity {
    fn id(&self) -> RemoteId;
}
