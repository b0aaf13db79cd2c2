//! Desired-attribute bags and the resource data the orchestrator hands in.
//!
//! A bag is an insertion-ordered map from attribute name to a typed value.
//! Reconcilers read desired values from it and write observed values back
//! after every mutating call.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(v: Vec<String>) -> Self {
        AttrValue::List(v)
    }
}

impl AttrValue {
    /// Lists hold memberships, so element order and repeats are ignored.
    fn same_as(&self, other: &AttrValue) -> bool {
        match (self, other) {
            (AttrValue::List(a), AttrValue::List(b)) => {
                a.iter().collect::<BTreeSet<_>>() == b.iter().collect::<BTreeSet<_>>()
            }
            _ => self == other,
        }
    }
}

/// Ordered attribute map for one resource instance.
///
/// JSON `null` values read as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AttributeBag {
    values: IndexMap<String, AttrValue>,
}

impl<'de> Deserialize<'de> for AttributeBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Option<AttrValue>>::deserialize(deserializer)?;
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect();
        Ok(Self { values })
    }
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when seeding bags.
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or overwrite a value. Existing keys keep their position.
    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(AttrValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(AttrValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(AttrValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(AttrValue::List(l)) => Some(l),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Compute which attributes differ between this bag and the last-applied one.
    ///
    /// A key counts as changed if it is present in only one of the bags or its
    /// values differ. Lists compare as sets.
    pub fn diff(&self, prior: &AttributeBag) -> ChangedFields {
        let mut changed = BTreeSet::new();
        for (key, value) in &self.values {
            match prior.values.get(key) {
                Some(old) if old.same_as(value) => {}
                _ => {
                    changed.insert(key.clone());
                }
            }
        }
        for key in prior.values.keys() {
            if !self.values.contains_key(key) {
                changed.insert(key.clone());
            }
        }
        ChangedFields { fields: changed }
    }
}

/// Set of attribute names whose desired value changed since the last apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFields {
    fields: BTreeSet<String>,
}

impl ChangedFields {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for ChangedFields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Identifier plus attribute bag for one resource instance.
///
/// An empty `id` means the resource is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: AttributeBag,
}

impl ResourceData {
    pub fn new(attributes: AttributeBag) -> Self {
        Self {
            id: String::new(),
            attributes,
        }
    }

    pub fn with_id(id: impl Into<String>, attributes: AttributeBag) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn is_absent(&self) -> bool {
        self.id.is_empty()
    }
}
