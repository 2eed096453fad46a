//! Programmatic label model: named keyword groups.
//!
//! The projection subsystem is configured from a label's "Mapping" group.
//! Text parsing of labels lives outside this crate; here a [`Label`] is
//! assembled keyword by keyword and handed to a projection constructor.
//! Keyword order inside a group is preserved so emitted groups match what
//! downstream label writers expect.

use serde::{Deserialize, Serialize};

use crate::error::{ProjError, ProjResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeywordValue {
    Text(String),
    Real(f64),
    Integer(i64),
}

/// Read access to keyword values by name.
pub trait KeywordProvider {
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_float(&self, key: &str) -> Option<f64>;
    fn get_int(&self, key: &str) -> Option<i64>;

    fn require_float(&self, key: &str) -> ProjResult<f64> {
        self.get_float(key)
            .ok_or_else(|| ProjError::missing_keyword(key))
    }

    fn require_string(&self, key: &str) -> ProjResult<String> {
        self.get_string(key)
            .ok_or_else(|| ProjError::missing_keyword(key))
    }
}

/// An ordered, named group of keywords (e.g. the "Mapping" group).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    name: String,
    keywords: Vec<(String, KeywordValue)>,
}

impl KeywordGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keywords: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_keyword(&self, key: &str) -> bool {
        self.keywords.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&KeywordValue> {
        self.keywords
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Inserts or replaces a keyword, keeping its original position on
    /// replacement.
    pub fn set(&mut self, key: impl Into<String>, value: KeywordValue) -> &mut Self {
        let key = key.into();
        if let Some(slot) = self.keywords.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.keywords.push((key, value));
        }
        self
    }

    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.set(key, KeywordValue::Text(value.into()))
    }

    pub fn set_real(&mut self, key: impl Into<String>, value: f64) -> &mut Self {
        self.set(key, KeywordValue::Real(value))
    }

    pub fn set_integer(&mut self, key: impl Into<String>, value: i64) -> &mut Self {
        self.set(key, KeywordValue::Integer(value))
    }

    /// Copies `key` from `source` into this group when present.
    pub fn copy_if_present(&mut self, source: &KeywordGroup, key: &str) -> &mut Self {
        if let Some(value) = source.get(key) {
            self.set(key, value.clone());
        }
        self
    }

    pub fn keywords(&self) -> impl Iterator<Item = (&str, &KeywordValue)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl KeywordProvider for KeywordGroup {
    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(KeywordValue::Text(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        match self.get(key) {
            Some(KeywordValue::Real(v)) => Some(*v),
            Some(KeywordValue::Integer(v)) => Some(*v as f64),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(KeywordValue::Integer(v)) => Some(*v),
            Some(KeywordValue::Text(s)) => s.parse().ok(),
            _ => None,
        }
    }
}

/// A label: a set of named keyword groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    groups: Vec<KeywordGroup>,
}

impl Label {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, group: KeywordGroup) -> &mut Self {
        self.groups.push(group);
        self
    }

    pub fn find_group(&self, name: &str) -> Option<&KeywordGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn find_group_mut(&mut self, name: &str) -> Option<&mut KeywordGroup> {
        self.groups.iter_mut().find(|g| g.name() == name)
    }
}
