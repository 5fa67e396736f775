//! Field name templates
//!
//! Wide-record field names are often built from narrow-record values, e.g.
//! `doses-{age}` or `{vaxstatus}-{agegroup}`. A `{name}` placeholder is
//! replaced by the value of field `name`; a `{` without a closing `}` is kept
//! literally.

use crate::error::{CompactError, CompactResult};
use std::fmt;
use thl_cube::NarrowRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// Pattern for synthesizing a field name from a narrow record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    segments: Vec<Segment>,
}

impl FieldTemplate {
    /// Parse a template pattern
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find(['{', '}']) {
                Some(close) if after[close..].starts_with('}') && close > 0 => {
                    literal.push_str(&rest[..open]);
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(after[..close].to_string()));
                    rest = &after[close + 1..];
                }
                _ => {
                    literal.push_str(&rest[..=open]);
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Template that always renders `name`
    #[must_use]
    pub fn fixed(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Literal(name.into())],
        }
    }

    /// Fields referenced by placeholders
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Render the field name for a record
    ///
    /// # Errors
    /// [`CompactError::MissingField`] if a placeholder names an absent field
    pub fn render(&self, record: &NarrowRecord) -> CompactResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(
                    record
                        .get(name)
                        .ok_or_else(|| CompactError::missing_field(name, record.index()))?,
                ),
            }
        }
        Ok(out)
    }
}

impl From<&str> for FieldTemplate {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl fmt::Display for FieldTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Field(name) => write!(f, "{{{name}}}")?,
            }
        }
        Ok(())
    }
}
