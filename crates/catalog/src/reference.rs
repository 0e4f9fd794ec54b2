//! Lookup lists: organizations, warehouses, cash accounts, price types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crmdesk_core::{Entity, RemoteId};

use crate::names::NameFields;

/// Kind of reference list, one per remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Organizations,
    Warehouses,
    Payboxes,
    PriceTypes,
    Nomenclature,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 5] = [
        ReferenceKind::Organizations,
        ReferenceKind::Warehouses,
        ReferenceKind::Payboxes,
        ReferenceKind::PriceTypes,
        ReferenceKind::Nomenclature,
    ];

    /// Path segment under the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            ReferenceKind::Organizations => "organizations",
            ReferenceKind::Warehouses => "warehouses",
            ReferenceKind::Payboxes => "payboxes",
            ReferenceKind::PriceTypes => "price_types",
            ReferenceKind::Nomenclature => "nomenclature",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Organizations => "organizations",
            ReferenceKind::Warehouses => "warehouses",
            ReferenceKind::Payboxes => "cash accounts",
            ReferenceKind::PriceTypes => "price types",
            ReferenceKind::Nomenclature => "product catalog",
        }
    }
}

impl core::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record type served by one reference endpoint.
pub trait ReferenceRecord: DeserializeOwned + Entity + Clone + Send + 'static {
    const KIND: ReferenceKind;

    fn names(&self) -> &NameFields;
}

macro_rules! reference_record {
    ($(#[$meta:meta])* $t:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $t {
            pub id: RemoteId,
            #[serde(flatten)]
            pub names: NameFields,
        }

        impl $t {
            pub fn new(id: i64, name: impl Into<String>) -> Self {
                Self {
                    id: RemoteId::new(id),
                    names: NameFields::named(name),
                }
            }
        }

        impl Entity for $t {
            fn id(&self) -> RemoteId {
                self.id
            }
        }

        impl ReferenceRecord for $t {
            const KIND: ReferenceKind = $kind;

            fn names(&self) -> &NameFields {
                &self.names
            }
        }
    };
}

reference_record!(
    /// Selling organization (legal entity the document is issued by).
    Organization,
    ReferenceKind::Organizations
);
reference_record!(
    /// Warehouse goods are shipped from.
    Warehouse,
    ReferenceKind::Warehouses
);
reference_record!(
    /// Cash account ("paybox") the payment is booked to.
    Paybox,
    ReferenceKind::Payboxes
);
reference_record!(
    /// Named price list (retail, wholesale, ...).
    PriceType,
    ReferenceKind::PriceTypes
);
