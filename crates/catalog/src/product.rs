//! Catalog products ("nomenclature") and their price entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crmdesk_core::{Entity, Money, RemoteId};

use crate::names::NameFields;
use crate::reference::{ReferenceKind, ReferenceRecord};

/// One price of a product under a named price type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    #[serde(default)]
    pub price_type: Option<String>,
    pub price: Decimal,
}

/// Which price entry seeds the unit price of a new order line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PriceSource {
    /// First entry of the product's price list.
    #[default]
    FirstAvailable,
    /// Entry of the named price type, falling back to the first entry.
    PriceType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: RemoteId,
    #[serde(flatten)]
    pub names: NameFields,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prices: Vec<PriceEntry>,
}

impl CatalogProduct {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: RemoteId::new(id),
            names: NameFields::named(name),
            prices: Vec::new(),
        }
    }

    pub fn with_price(mut self, price_type: Option<&str>, price: Decimal) -> Self {
        self.prices.push(PriceEntry {
            price_type: price_type.map(str::to_string),
            price,
        });
        self
    }

    pub fn price_entry(&self, source: &PriceSource) -> Option<&PriceEntry> {
        match source {
            PriceSource::FirstAvailable => self.prices.first(),
            PriceSource::PriceType(wanted) => self
                .prices
                .iter()
                .find(|p| p.price_type.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(wanted)))
                .or_else(|| self.prices.first()),
        }
    }

    /// Unit price for a new line; zero when the product has no usable price.
    pub fn unit_price(&self, source: &PriceSource) -> Money {
        self.price_entry(source)
            .and_then(|entry| Money::new(entry.price).ok())
            .unwrap_or(Money::ZERO)
    }
}

impl Entity for CatalogProduct {
    fn id(&self) -> RemoteId {
        self.id
    }
}

impl ReferenceRecord for CatalogProduct {
    const KIND: ReferenceKind = ReferenceKind::Nomenclature;

    fn names(&self) -> &NameFields {
        &self.names
    }
}

pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
