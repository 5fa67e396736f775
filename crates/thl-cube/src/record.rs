//! Narrow records produced by the decoder

use indexmap::IndexMap;

/// Reserved field holding the raw, unconverted cell value
pub const VALUE_FIELD: &str = "value";

/// One fully labeled cell of the cube
///
/// Fields keep the declared dimension order, followed by [`VALUE_FIELD`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NarrowRecord {
    index: u64,
    fields: IndexMap<String, String>,
}

impl NarrowRecord {
    /// Create empty record for a cell index
    #[inline]
    #[must_use]
    pub fn new(index: u64) -> Self {
        Self {
            index,
            fields: IndexMap::new(),
        }
    }

    /// Build a record from field pairs
    #[must_use]
    pub fn from_pairs<K, V>(index: u64, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            index,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Flattened cell index this record was decoded from
    #[inline]
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Get field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Raw cell value (empty if the record carries none)
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        self.get(VALUE_FIELD).unwrap_or_default()
    }

    /// Set field value, replacing any previous one
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for NarrowRecord {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
