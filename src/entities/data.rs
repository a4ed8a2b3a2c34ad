//! Opaque payloads attached to cards, locations, and players.
//!
//! The engine only cares about identity and placement. Games hang whatever
//! they need (levels, scores, colours) off a [`Data`] map and read it back
//! through the typed getters.
//!
//! ## DataValue Types
//!
//! - `Int`: Numbers (level, score, cost)
//! - `Bool`: Flags (face up, passed)
//! - `Text`: Strings (colour, region)
//! - `TextList`: String lists (adjacent cities, tags)

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A single payload value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataValue {
    Int(i64),
    Bool(bool),
    Text(String),
    TextList(Vec<String>),
}

impl DataValue {
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            DataValue::TextList(v) => Some(v),
            _ => None,
        }
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        DataValue::Int(v)
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        DataValue::Int(v as i64)
    }
}

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        DataValue::Bool(v)
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        DataValue::Text(v)
    }
}

impl From<&str> for DataValue {
    fn from(v: &str) -> Self {
        DataValue::Text(v.to_string())
    }
}

impl From<Vec<String>> for DataValue {
    fn from(v: Vec<String>) -> Self {
        DataValue::TextList(v)
    }
}

impl From<Vec<&str>> for DataValue {
    fn from(v: Vec<&str>) -> Self {
        DataValue::TextList(v.into_iter().map(str::to_string).collect())
    }
}

/// String-keyed payload map.
///
/// ```
/// use tabletop_engine::entities::Data;
///
/// let data = Data::new().with("level", 3).with("colour", "red");
/// assert_eq!(data.int("level"), Some(3));
/// assert_eq!(data.text("colour"), Some("red"));
/// assert_eq!(data.flag("missing"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    values: FxHashMap<String, DataValue>,
}

impl Data {
    /// An empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Option<DataValue> {
        self.values.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.values.get(key)
    }

    #[must_use]
    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(DataValue::as_int)
    }

    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(DataValue::as_bool)
    }

    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(DataValue::as_text)
    }

    #[must_use]
    pub fn text_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(DataValue::as_text_list)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let data = Data::new()
            .with("level", 4)
            .with("face_up", true)
            .with("region", "Baiern")
            .with("adjacent", vec!["Ulm", "Passau"]);

        assert_eq!(data.int("level"), Some(4));
        assert_eq!(data.flag("face_up"), Some(true));
        assert_eq!(data.text("region"), Some("Baiern"));
        assert_eq!(
            data.text_list("adjacent"),
            Some(&["Ulm".to_string(), "Passau".to_string()][..])
        );
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_getter_type_mismatch() {
        let data = Data::new().with("level", 4);
        assert_eq!(data.text("level"), None);
        assert_eq!(data.flag("level"), None);
    }

    #[test]
    fn test_set_replaces() {
        let mut data = Data::new().with("score", 1);
        let old = data.set("score", 5);
        assert_eq!(old, Some(DataValue::Int(1)));
        assert_eq!(data.int("score"), Some(5));
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Data::default().is_empty());
    }
}
