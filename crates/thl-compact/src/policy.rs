//! Merge policies
//!
//! A merge policy folds one (renamed) narrow record into the wide record
//! under construction. Policies that dispatch on a discriminator field must
//! reject values outside their documented set.

use crate::coerce::Coercion;
use crate::error::{CompactError, CompactResult};
use crate::record::WideRecord;
use crate::template::FieldTemplate;
use crate::value::FieldValue;
use indexmap::IndexMap;
use thl_cube::NarrowRecord;

/// Outcome of merging one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merged {
    /// The record contributed to the accumulator
    Applied,
    /// The record was deliberately ignored
    Skipped,
}

/// Folds narrow records into a wide record
///
/// Implementations are pure configuration: the same policy is shared by
/// every record of every run.
pub trait MergePolicy: Send + Sync + std::fmt::Debug {
    /// Merge one record into the accumulator
    ///
    /// # Errors
    /// - [`CompactError::UnknownDiscriminator`] for an undocumented label
    /// - [`CompactError::Coercion`] if the value does not fit its type
    /// - [`CompactError::MissingField`] if a referenced field is absent
    fn merge(&self, accumulator: &mut WideRecord, record: &NarrowRecord) -> CompactResult<Merged>;

    /// Policy name (for debugging)
    fn name(&self) -> &'static str;
}

fn field<'r>(record: &'r NarrowRecord, name: &str) -> CompactResult<&'r str> {
    record
        .get(name)
        .ok_or_else(|| CompactError::missing_field(name, record.index()))
}

fn coerce(coercion: &Coercion, target: &str, record: &NarrowRecord) -> CompactResult<FieldValue> {
    coercion
        .apply(record.value())
        .map_err(|source| CompactError::Coercion {
            field: target.to_string(),
            index: record.index(),
            source,
        })
}

/// Dispatch on a discriminator field through a fixed table
///
/// Each documented label maps to a target field template and a coercion.
/// Labels registered with [`ignore`](Self::ignore) are skipped; any other
/// label is fatal.
#[derive(Debug, Clone)]
pub struct MeasureTable {
    discriminator: String,
    entries: IndexMap<String, (FieldTemplate, Coercion)>,
    ignored: Vec<String>,
}

impl MeasureTable {
    /// Create empty table dispatching on `discriminator`
    #[must_use]
    pub fn new(discriminator: impl Into<String>) -> Self {
        Self {
            discriminator: discriminator.into(),
            entries: IndexMap::new(),
            ignored: Vec::new(),
        }
    }

    /// Map a discriminator label to a target field
    #[must_use]
    pub fn measure(
        mut self,
        label: impl Into<String>,
        target: impl Into<FieldTemplate>,
        coercion: Coercion,
    ) -> Self {
        self.entries.insert(label.into(), (target.into(), coercion));
        self
    }

    /// Accept a discriminator label without merging it
    #[must_use]
    pub fn ignore(mut self, label: impl Into<String>) -> Self {
        self.ignored.push(label.into());
        self
    }

    /// Discriminator field name
    #[inline]
    #[must_use]
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Documented labels, in declaration order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl MergePolicy for MeasureTable {
    fn merge(&self, accumulator: &mut WideRecord, record: &NarrowRecord) -> CompactResult<Merged> {
        let label = field(record, &self.discriminator)?;
        if self.ignored.iter().any(|l| l == label) {
            return Ok(Merged::Skipped);
        }
        let (template, coercion) = self.entries.get(label).ok_or_else(|| {
            CompactError::unknown_discriminator(&self.discriminator, label, record.index())
        })?;

        let target = template.render(record)?;
        let value = coerce(coercion, &target, record)?;
        accumulator.set(target, value);
        Ok(Merged::Applied)
    }

    fn name(&self) -> &'static str {
        "measure_table"
    }
}

/// Every record sets one field whose name comes from the record itself
///
/// Used where a category axis is spread into columns, e.g. one field per
/// age group.
#[derive(Debug, Clone)]
pub struct Pivot {
    template: FieldTemplate,
    coercion: Coercion,
}

impl Pivot {
    /// Create pivot with target template and value coercion
    #[must_use]
    pub fn new(template: impl Into<FieldTemplate>, coercion: Coercion) -> Self {
        Self {
            template: template.into(),
            coercion,
        }
    }
}

impl MergePolicy for Pivot {
    fn merge(&self, accumulator: &mut WideRecord, record: &NarrowRecord) -> CompactResult<Merged> {
        let target = self.template.render(record)?;
        let value = coerce(&self.coercion, &target, record)?;
        accumulator.set(target, value);
        Ok(Merged::Applied)
    }

    fn name(&self) -> &'static str {
        "pivot"
    }
}

#[derive(Debug, Clone)]
struct Margin {
    total_field: String,
    total_label: String,
    name_from: String,
}

/// Keep only the marginal totals of a cross table
///
/// A record whose `total_field` holds `total_label` sets a field named by its
/// `name_from` value. The first matching margin wins; interior cells of the
/// table are skipped.
#[derive(Debug, Clone)]
pub struct Marginals {
    margins: Vec<Margin>,
    coercion: Coercion,
}

impl Marginals {
    /// Create empty marginal policy
    #[must_use]
    pub fn new(coercion: Coercion) -> Self {
        Self {
            margins: Vec::new(),
            coercion,
        }
    }

    /// Add a margin: when `total_field == total_label`, name the field by `name_from`
    #[must_use]
    pub fn margin(
        mut self,
        total_field: impl Into<String>,
        total_label: impl Into<String>,
        name_from: impl Into<String>,
    ) -> Self {
        self.margins.push(Margin {
            total_field: total_field.into(),
            total_label: total_label.into(),
            name_from: name_from.into(),
        });
        self
    }
}

impl MergePolicy for Marginals {
    fn merge(&self, accumulator: &mut WideRecord, record: &NarrowRecord) -> CompactResult<Merged> {
        for margin in &self.margins {
            if field(record, &margin.total_field)? == margin.total_label {
                let target = field(record, &margin.name_from)?;
                let value = coerce(&self.coercion, target, record)?;
                accumulator.set(target, value);
                return Ok(Merged::Applied);
            }
        }
        Ok(Merged::Skipped)
    }

    fn name(&self) -> &'static str {
        "marginals"
    }
}

/// Copy every narrow field verbatim as text
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFields;

impl MergePolicy for CopyFields {
    fn merge(&self, accumulator: &mut WideRecord, record: &NarrowRecord) -> CompactResult<Merged> {
        for (name, value) in record.iter() {
            accumulator.set(name, value);
        }
        Ok(Merged::Applied)
    }

    fn name(&self) -> &'static str {
        "copy_fields"
    }
}

/// Ignore records whose field holds one of the listed labels
///
/// Aggregate placeholder categories (a "whole time axis" row, say) sit in the
/// same dimension as real categories and have to be dropped before merging.
#[derive(Debug)]
pub struct SkipWhen {
    field: String,
    labels: Vec<String>,
    inner: Box<dyn MergePolicy>,
}

impl SkipWhen {
    /// Wrap `inner`, skipping records where `field` is one of `labels`
    pub fn new<I, S>(field: impl Into<String>, labels: I, inner: impl MergePolicy + 'static) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            inner: Box::new(inner),
        }
    }
}

impl MergePolicy for SkipWhen {
    fn merge(&self, accumulator: &mut WideRecord, record: &NarrowRecord) -> CompactResult<Merged> {
        let value = field(record, &self.field)?;
        if self.labels.iter().any(|l| l == value) {
            return Ok(Merged::Skipped);
        }
        self.inner.merge(accumulator, record)
    }

    fn name(&self) -> &'static str {
        "skip_when"
    }
}
