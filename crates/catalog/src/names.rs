//! Display-name fields shared by reference records.
//!
//! The API is inconsistent about which field carries a human-readable name
//! (`name`, `short_name`, `full_name`, `work_name`). Records keep all of them
//! and callers pick one with an explicit, ordered list of [`NameField`]s.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameField {
    Name,
    ShortName,
    FullName,
    WorkName,
}

impl NameField {
    /// `name`, then `short_name`, `full_name`, `work_name`.
    pub const DEFAULT_ORDER: [NameField; 4] = [
        NameField::Name,
        NameField::ShortName,
        NameField::FullName,
        NameField::WorkName,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub work_name: Option<String>,
}

impl NameFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, field: NameField) -> Option<&str> {
        let value = match field {
            NameField::Name => self.name.as_deref(),
            NameField::ShortName => self.short_name.as_deref(),
            NameField::FullName => self.full_name.as_deref(),
            NameField::WorkName => self.work_name.as_deref(),
        };
        value.map(str::trim).filter(|s| !s.is_empty())
    }

    /// First non-blank field in `order`.
    pub fn first_of(&self, order: &[NameField]) -> Option<&str> {
        order.iter().find_map(|field| self.get(*field))
    }
}
