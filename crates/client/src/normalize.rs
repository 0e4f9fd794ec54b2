//! List responses come in three shapes; callers only ever see a `Vec`.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Which envelope a list response arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingShape {
    /// `[...]`
    Bare,
    /// `{"results": [...]}`
    Results,
    /// `{"result": [...]}`
    Result,
    /// Anything else; treated as an empty list.
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub shape: ListingShape,
    pub items: Vec<T>,
}

impl<T: DeserializeOwned> Listing<T> {
    /// Unwrap the envelope, then decode the items.
    ///
    /// An unrecognized envelope is an empty list; a recognized one with
    /// malformed items is an error.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let (shape, raw) = split(value);
        let items = serde_json::from_value(Value::Array(raw))?;
        Ok(Self { shape, items })
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Item values of a list response, undecoded.
pub fn raw_items(value: Value) -> Vec<Value> {
    split(value).1
}

fn split(value: Value) -> (ListingShape, Vec<Value>) {
    match value {
        Value::Array(items) => (ListingShape::Bare, items),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("results") {
                (ListingShape::Results, items)
            } else if let Some(Value::Array(items)) = map.remove("result") {
                (ListingShape::Result, items)
            } else {
                (ListingShape::Unrecognized, Vec::new())
            }
        }
        _ => (ListingShape::Unrecognized, Vec::new()),
    }
}
