//! Wide records built by the compactor

use crate::value::FieldValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// Field carrying the record type discriminator in the output
pub const TYPE_FIELD: &str = "type";

/// Field carrying the as-of date in the output
pub const DATADATE_FIELD: &str = "datadate";

/// One merged output record
///
/// Field names are data (synthesized per dataset), so the record is a map.
/// Keys iterate and serialize in sorted order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct WideRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl WideRecord {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set field, replacing any earlier value
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Get field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Check if field has been set
    #[inline]
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field has been set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Field names in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for WideRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut record = WideRecord::new();
        record.set("cases", 1i64);
        record.set("cases", 2i64);
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("cases"), Some(&FieldValue::Int(2)));
    }

    #[test]
    fn serializes_with_sorted_keys() {
        let record: WideRecord = [("population", FieldValue::Int(5)), ("area", "Ä".into())]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"area":"Ä","population":5}"#
        );
    }
}
