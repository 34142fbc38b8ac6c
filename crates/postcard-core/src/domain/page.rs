use chrono::{DateTime, Utc};

/// Typed value of a single column in a remote database page.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// The page's title column. A database has exactly one.
    Title(String),
    RichText(String),
    Date(DateTime<Utc>),
}

/// Column name to value mapping sent when creating a page.
///
/// Insertion order is preserved so the outgoing payload is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageProperties {
    entries: Vec<(String, PropertyValue)>,
}

impl PageProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
