//! Testing utilities for the thldata workspace
//!
//! Builders for pivot payload documents, so tests can describe a cube by its
//! dimensions and cells instead of hand-writing the wire format.

#![allow(missing_docs)]

use serde_json::{json, Map, Value};

/// Builder for a pivot payload document
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    dimensions: Vec<(String, Vec<String>)>,
    values: Vec<(u64, Value)>,
    reverse_ids: bool,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension with ordered labels
    pub fn dimension(mut self, name: &str, labels: &[&str]) -> Self {
        self.dimensions.push((
            name.to_string(),
            labels.iter().map(|s| (*s).to_string()).collect(),
        ));
        self
    }

    /// Add a string cell value
    pub fn value(mut self, index: u64, raw: &str) -> Self {
        self.values.push((index, Value::String(raw.to_string())));
        self
    }

    /// Add a numeric cell value
    pub fn number(mut self, index: u64, raw: i64) -> Self {
        self.values.push((index, json!(raw)));
        self
    }

    /// Fill cells `0..n` from a list of raw strings
    pub fn values(mut self, raws: &[&str]) -> Self {
        for (index, raw) in (0u64..).zip(raws) {
            self.values.push((index, Value::String((*raw).to_string())));
        }
        self
    }

    /// Emit category ids in reverse so their map order disagrees with positions
    pub fn scrambled_ids(mut self) -> Self {
        self.reverse_ids = true;
        self
    }

    /// Build the wire document
    pub fn build(&self) -> Value {
        let mut dimension = Map::new();
        dimension.insert(
            "id".to_string(),
            json!(self.dimensions.iter().map(|(n, _)| n).collect::<Vec<_>>()),
        );
        dimension.insert(
            "size".to_string(),
            json!(self.dimensions.iter().map(|(_, l)| l.len()).collect::<Vec<_>>()),
        );

        for (name, labels) in &self.dimensions {
            let mut index = Map::new();
            let mut label = Map::new();
            for position in 0..labels.len() {
                let rank = if self.reverse_ids {
                    labels.len() - 1 - position
                } else {
                    position
                };
                let id = format!("{name}-{rank:04}");
                index.insert(id.clone(), json!(position));
                label.insert(id, json!(labels[position]));
            }
            dimension.insert(
                name.clone(),
                json!({"category": {"index": index, "label": label}}),
            );
        }

        let mut value = Map::new();
        for (index, raw) in self.values.iter().rev() {
            value.insert(index.to_string(), raw.clone());
        }

        json!({"dataset": {"dimension": dimension, "value": value}})
    }

    /// Build the wire document as bytes
    pub fn build_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(&self.build()).unwrap()
    }
}

/// The date × area × measure cube used across tests
///
/// Cells: A/cases=10, A/population=1000, B/cases=20, B/population=2000.
pub fn worked_scenario() -> PayloadBuilder {
    PayloadBuilder::new()
        .dimension("date", &["2024-01-01"])
        .dimension("area", &["A", "B"])
        .dimension("measure", &["cases", "population"])
        .values(&["10", "1000", "20", "2000"])
}

/// Parse NDJSON output into one JSON value per line
pub fn parse_lines(output: &[u8]) -> Vec<Value> {
    std::str::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
