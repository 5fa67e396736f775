//! Dataset descriptors
//!
//! A descriptor is the whole per-dataset configuration: where the payload
//! lives, how raw dimension names and labels are renamed, which fields form
//! the group key and how records merge. It is built once and only read
//! afterwards.

use crate::coerce::Coercion;
use crate::error::{CompactError, CompactResult};
use crate::policy::{CopyFields, MergePolicy, Merged};
use crate::record::WideRecord;
use std::collections::HashMap;
use thl_cube::{NarrowRecord, VALUE_FIELD};

/// Rename lookup with identity fallback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable(HashMap<String, String>);

impl RenameTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rename
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.0.insert(from.into(), to.into());
    }

    /// Renamed form of `name`, or `name` itself when unmapped
    #[inline]
    #[must_use]
    pub fn apply<'a>(&'a self, name: &'a str) -> &'a str {
        self.0.get(name).map_or(name, String::as_str)
    }

    /// Number of renames
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if table is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenameTable {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One group-key field and how it is written onto the wide record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyField {
    name: String,
    format: Coercion,
}

impl KeyField {
    /// Key field stamped verbatim
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: Coercion::Text,
        }
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Format applied when stamping
    #[inline]
    #[must_use]
    pub fn format(&self) -> &Coercion {
        &self.format
    }
}

/// Per-dataset configuration for decode and compaction
#[derive(Debug)]
pub struct Descriptor {
    name: String,
    record_type: String,
    url: String,
    fields: RenameTable,
    values: RenameTable,
    group_key: Vec<KeyField>,
    anchor: Option<String>,
    policy: Box<dyn MergePolicy>,
}

impl Descriptor {
    /// Start building a descriptor
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder {
        DescriptorBuilder::new(name)
    }

    /// Dataset name (command name and output file prefix)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the `type` field on every output record
    #[inline]
    #[must_use]
    pub fn record_type(&self) -> &str {
        &self.record_type
    }

    /// Payload location
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Dimension name renames
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &RenameTable {
        &self.fields
    }

    /// Category label renames
    #[inline]
    #[must_use]
    pub fn values(&self) -> &RenameTable {
        &self.values
    }

    /// Group-key fields, in comparison order
    #[inline]
    #[must_use]
    pub fn group_key(&self) -> &[KeyField] {
        &self.group_key
    }

    /// Field a group must have received to be emitted
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Merge policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &dyn MergePolicy {
        self.policy.as_ref()
    }

    /// Rename field names and category labels of a decoded record
    ///
    /// The raw cell value is never renamed.
    #[must_use]
    pub fn rename(&self, record: &NarrowRecord) -> NarrowRecord {
        let mut renamed = NarrowRecord::new(record.index());
        for (name, label) in record.iter() {
            let label = if name == VALUE_FIELD {
                label
            } else {
                self.values.apply(label)
            };
            renamed.insert(self.fields.apply(name), label);
        }
        renamed
    }

    /// Joint group-key value of a renamed record
    ///
    /// # Errors
    /// [`CompactError::MissingField`] if a key field is absent
    pub fn key_of(&self, record: &NarrowRecord) -> CompactResult<Vec<String>> {
        self.group_key
            .iter()
            .map(|key| {
                record
                    .get(&key.name)
                    .map(str::to_string)
                    .ok_or_else(|| CompactError::missing_field(&key.name, record.index()))
            })
            .collect()
    }

    /// Merge a renamed record, then stamp the key fields if it applied
    ///
    /// # Errors
    /// Propagates merge and key formatting errors
    pub fn merge(
        &self,
        accumulator: &mut WideRecord,
        record: &NarrowRecord,
    ) -> CompactResult<Merged> {
        let merged = self.policy.merge(accumulator, record)?;
        if merged == Merged::Applied {
            for key in &self.group_key {
                let raw = record
                    .get(&key.name)
                    .ok_or_else(|| CompactError::missing_field(&key.name, record.index()))?;
                let value = key.format.apply(raw).map_err(|source| CompactError::Coercion {
                    field: key.name.clone(),
                    index: record.index(),
                    source,
                })?;
                accumulator.set(key.name.as_str(), value);
            }
        }
        Ok(merged)
    }

    /// Check the anchor guard for a finished group
    #[must_use]
    pub fn admits(&self, group: &WideRecord) -> bool {
        self.anchor.as_deref().map_or(true, |anchor| group.contains(anchor))
    }
}

/// Builder for [`Descriptor`]
#[derive(Debug)]
pub struct DescriptorBuilder {
    name: String,
    record_type: Option<String>,
    url: String,
    fields: RenameTable,
    values: RenameTable,
    group_key: Vec<KeyField>,
    anchor: Option<String>,
    policy: Option<Box<dyn MergePolicy>>,
}

impl DescriptorBuilder {
    /// Create builder for dataset `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: None,
            url: String::new(),
            fields: RenameTable::new(),
            values: RenameTable::new(),
            group_key: Vec::new(),
            anchor: None,
            policy: None,
        }
    }

    /// Output `type` value (defaults to the dataset name)
    #[must_use]
    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Payload URL
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Rename a dimension
    #[must_use]
    pub fn field(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.fields.insert(from, to);
        self
    }

    /// Rename several dimensions
    #[must_use]
    pub fn fields<K, V>(mut self, renames: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (from, to) in renames {
            self.fields.insert(from, to);
        }
        self
    }

    /// Rename a category label
    #[must_use]
    pub fn value(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.values.insert(from, to);
        self
    }

    /// Rename several category labels
    #[must_use]
    pub fn values<K, V>(mut self, renames: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (from, to) in renames {
            self.values.insert(from, to);
        }
        self
    }

    /// Set group-key fields (renamed names)
    #[must_use]
    pub fn group_by<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.group_key = fields.into_iter().map(KeyField::new).collect();
        self
    }

    /// Format a group-key field when stamping it
    ///
    /// Adds the field to the key if it is not already part of it.
    #[must_use]
    pub fn key_format(mut self, field: impl Into<String>, format: Coercion) -> Self {
        let field = field.into();
        match self.group_key.iter_mut().find(|k| k.name == field) {
            Some(key) => key.format = format,
            None => self.group_key.push(KeyField { name: field, format }),
        }
        self
    }

    /// Only emit groups that received `field`
    #[must_use]
    pub fn anchor(mut self, field: impl Into<String>) -> Self {
        self.anchor = Some(field.into());
        self
    }

    /// Merge policy (defaults to [`CopyFields`])
    #[must_use]
    pub fn merge(mut self, policy: impl MergePolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    /// Finish the descriptor
    #[must_use]
    pub fn build(self) -> Descriptor {
        Descriptor {
            record_type: self.record_type.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            url: self.url,
            fields: self.fields,
            values: self.values,
            group_key: self.group_key,
            anchor: self.anchor,
            policy: self.policy.unwrap_or_else(|| Box::new(CopyFields)),
        }
    }
}
