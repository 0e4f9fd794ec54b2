//! Customers ("contragents") and the search query shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crmdesk_core::{Entity, RemoteId};

use crate::names::NameFields;
use crate::product::null_as_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyCard {
    pub id: RemoteId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RemoteId,
    #[serde(flatten)]
    pub names: NameFields,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub loyalty_cards: Vec<LoyaltyCard>,
}

impl Customer {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: RemoteId::new(id),
            names: NameFields::named(name),
            phone: None,
            balance: None,
            loyalty_cards: Vec::new(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn primary_loyalty_card(&self) -> Option<RemoteId> {
        self.loyalty_cards.first().map(|c| c.id)
    }

    pub fn balance_or_zero(&self) -> Decimal {
        self.balance.unwrap_or(Decimal::ZERO)
    }
}

impl Entity for Customer {
    fn id(&self) -> RemoteId {
        self.id
    }
}

/// How free-form operator text is sent to the customer search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerQuery {
    /// Empty text lists every customer.
    All,
    /// All-digit text is a phone number.
    Phone(String),
    Name(String),
}

impl CustomerQuery {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            CustomerQuery::All
        } else if text.chars().all(|c| c.is_ascii_digit()) {
            CustomerQuery::Phone(text.to_string())
        } else {
            CustomerQuery::Name(text.to_string())
        }
    }

    /// Query-string parameters (without the token).
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            CustomerQuery::All => Vec::new(),
            CustomerQuery::Phone(phone) => vec![("phone", phone.clone())],
            CustomerQuery::Name(name) => vec![("name", name.clone())],
        }
    }
}
