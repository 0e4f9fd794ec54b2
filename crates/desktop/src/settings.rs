//! Form-level settings read from the environment.

use std::str::FromStr;

use rust_decimal::Decimal;

use crmdesk_catalog::NameField;
use crmdesk_core::Quantity;
use crmdesk_sales::{LineDefaults, PayloadSettings};

pub const DEFAULT_QUANTITY_VAR: &str = "CRMDESK_DEFAULT_QUANTITY";
pub const UNIT_ID_VAR: &str = "CRMDESK_UNIT_ID";
pub const MAX_ITEMS_VAR: &str = "CRMDESK_MAX_ITEMS";
pub const TOKEN_VAR: &str = "CRMDESK_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
    pub lines: LineDefaults,
    pub payload: PayloadSettings,
    /// Result cap of every selector.
    pub max_items: usize,
    /// Label order for organizations, which usually carry a short name.
    pub organization_names: Vec<NameField>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            lines: LineDefaults::default(),
            payload: PayloadSettings::default(),
            max_items: 50,
            organization_names: vec![
                NameField::ShortName,
                NameField::Name,
                NameField::FullName,
                NameField::WorkName,
            ],
        }
    }
}

impl FormSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset values keep their defaults; unparsable ones are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();

        if let Some(qty) = parsed::<Decimal>(&lookup, DEFAULT_QUANTITY_VAR) {
            match Quantity::new(qty) {
                Ok(qty) if !qty.is_zero() => settings.lines.quantity = qty,
                _ => tracing::warn!(var = DEFAULT_QUANTITY_VAR, %qty, "default quantity must be positive"),
            }
        }
        if let Some(unit) = parsed::<i64>(&lookup, UNIT_ID_VAR) {
            settings.payload.unit_id = unit;
        }
        if let Some(max) = parsed::<usize>(&lookup, MAX_ITEMS_VAR) {
            if max > 0 {
                settings.max_items = max;
            } else {
                tracing::warn!(var = MAX_ITEMS_VAR, "result cap must be positive");
            }
        }

        settings
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &str) -> Option<T> {
    let raw = lookup(var)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
