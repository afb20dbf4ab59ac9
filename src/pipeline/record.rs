use serde::Serialize;
use std::collections::BTreeMap;

/// Record key holding the internal locations discovered in a page
pub const INTERNAL_URLS: &str = "internal_urls";

/// A value written into a record by a filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Text(String),
    List(Vec<String>),
}

/// The output of one pipeline run over one page
///
/// Keys are defined by the filters that ran. [`INTERNAL_URLS`], when present, is the
/// ordered list of locations that page links to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultRecord(BTreeMap<String, RecordValue>);

impl ResultRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: RecordValue) -> Option<RecordValue> {
        self.0.insert(key.into(), value)
    }

    pub fn insert_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.insert(key, RecordValue::Text(text.into()));
    }

    pub fn insert_list(&mut self, key: impl Into<String>, items: Vec<String>) {
        self.insert(key, RecordValue::List(items));
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.0.get(key)
    }

    /// Returns the value under `key` if it is text
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            RecordValue::Text(text) => Some(text),
            RecordValue::List(_) => None,
        }
    }

    /// Returns the value under `key` if it is a list
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.0.get(key)? {
            RecordValue::List(items) => Some(items),
            RecordValue::Text(_) => None,
        }
    }

    pub fn internal_urls(&self) -> Option<&[String]> {
        self.list(INTERNAL_URLS)
    }

    pub fn set_internal_urls(&mut self, urls: Vec<String>) {
        self.insert_list(INTERNAL_URLS, urls);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
