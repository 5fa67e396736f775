//! Payload model
//!
//! Wire format (JSON-stat style):
//!
//! ```json
//! {"dataset": {
//!     "dimension": {
//!         "id": ["date", "area"],
//!         "size": [1, 2],
//!         "area": {"category": {
//!             "index": {"a1": 0, "a2": 1},
//!             "label": {"a1": "A", "a2": "B"}}},
//!         ...
//!     },
//!     "value": {"0": "10", "1": ".."}
//! }}
//! ```

use crate::error::{CubeError, CubeResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct WireDocument {
    dataset: WireDataset,
}

#[derive(Debug, Deserialize)]
struct WireDataset {
    dimension: WireDimensions,
    value: WireValues,
}

#[derive(Debug, Deserialize)]
struct WireDimensions {
    id: Vec<String>,
    size: Vec<usize>,
    #[serde(flatten)]
    blocks: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct WireDimension {
    category: WireCategory,
}

#[derive(Debug, Deserialize)]
struct WireCategory {
    index: WireIndex,
    #[serde(default)]
    label: HashMap<String, String>,
}

/// Category positions: either `{id: position}` or an ordered id list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireIndex {
    Positions(HashMap<String, usize>),
    Ordered(Vec<String>),
}

/// Cell values: sparse `{index: value}` map or a dense array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireValues {
    Sparse(HashMap<String, Value>),
    Dense(Vec<Value>),
}

/// One axis of the cube
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    name: String,
    categories: Vec<String>,
}

impl Dimension {
    /// Create dimension from ordered category labels
    ///
    /// # Errors
    /// [`CubeError::EmptyDimension`] if `categories` is empty
    pub fn new(name: impl Into<String>, categories: Vec<String>) -> CubeResult<Self> {
        let name = name.into();
        if categories.is_empty() {
            return Err(CubeError::EmptyDimension(name));
        }
        Ok(Self { name, categories })
    }

    /// Dimension name as declared in the payload
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of categories
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.categories.len()
    }

    /// Ordered category labels
    #[inline]
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Label at a category position
    #[inline]
    #[must_use]
    pub fn label(&self, position: usize) -> Option<&str> {
        self.categories.get(position).map(String::as_str)
    }

    fn from_wire(name: &str, size: usize, category: WireCategory) -> CubeResult<Self> {
        if size == 0 {
            return Err(CubeError::EmptyDimension(name.to_string()));
        }

        let ids: Vec<String> = match category.index {
            WireIndex::Ordered(ids) => ids,
            WireIndex::Positions(positions) => {
                let mut ordered: Vec<(usize, String)> =
                    positions.into_iter().map(|(id, pos)| (pos, id)).collect();
                ordered.sort_unstable();
                for (expected, (position, _)) in ordered.iter().enumerate() {
                    if *position != expected {
                        return Err(CubeError::CategoryPosition {
                            name: name.to_string(),
                            position: *position,
                        });
                    }
                }
                ordered.into_iter().map(|(_, id)| id).collect()
            }
        };

        if ids.len() != size {
            return Err(CubeError::CategoryCount {
                name: name.to_string(),
                size,
                found: ids.len(),
            });
        }

        let mut labels = category.label;
        let categories = ids
            .into_iter()
            .map(|id| labels.remove(&id).unwrap_or(id))
            .collect();

        Self::new(name, categories)
    }
}

/// Validated pivot payload
///
/// Holds the dimensions in declared order and the present cells keyed by
/// flattened index. Index range is checked by [`decode`](crate::decode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    dimensions: Vec<Dimension>,
    values: BTreeMap<u64, String>,
}

impl Payload {
    /// Create payload from parts
    #[must_use]
    pub fn new(dimensions: Vec<Dimension>, values: BTreeMap<u64, String>) -> Self {
        Self { dimensions, values }
    }

    /// Parse payload from raw bytes
    ///
    /// # Errors
    /// Returns [`CubeError`] if the bytes are not a well-formed payload
    pub fn from_slice(bytes: &[u8]) -> CubeResult<Self> {
        let document: WireDocument = serde_json::from_slice(bytes)?;
        Self::from_wire(document.dataset)
    }

    /// Parse payload from a JSON value
    ///
    /// # Errors
    /// Returns [`CubeError`] if the value is not a well-formed payload
    pub fn from_value(value: Value) -> CubeResult<Self> {
        let document: WireDocument = serde_json::from_value(value)?;
        Self::from_wire(document.dataset)
    }

    /// Read and parse a payload file
    ///
    /// # Errors
    /// Returns [`CubeError::Io`] if the file cannot be read
    pub fn from_path(path: impl AsRef<Path>) -> CubeResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CubeError::io_error(path, e))?;
        Self::from_slice(&bytes)
    }

    /// Dimensions in declared order
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Present cells in ascending index order
    #[inline]
    #[must_use]
    pub fn values(&self) -> &BTreeMap<u64, String> {
        &self.values
    }

    /// Look up dimension by name
    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.name == name)
    }

    /// Number of present cells
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if payload has no present cells
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn from_wire(dataset: WireDataset) -> CubeResult<Self> {
        let WireDimensions {
            id,
            size,
            mut blocks,
        } = dataset.dimension;

        if id.len() != size.len() {
            return Err(CubeError::DimensionMismatch {
                ids: id.len(),
                sizes: size.len(),
            });
        }

        let mut dimensions = Vec::with_capacity(id.len());
        for (name, size) in id.iter().zip(size) {
            let block = blocks
                .remove(name)
                .ok_or_else(|| CubeError::MissingDimension(name.clone()))?;
            let wire: WireDimension = serde_json::from_value(block)?;
            dimensions.push(Dimension::from_wire(name, size, wire.category)?);
        }

        let values = match dataset.value {
            WireValues::Sparse(map) => {
                let mut values = BTreeMap::new();
                for (key, raw) in map {
                    let index: u64 = key
                        .parse()
                        .map_err(|_| CubeError::InvalidIndex(key.clone()))?;
                    values.insert(index, raw_value(index, raw)?);
                }
                values
            }
            WireValues::Dense(list) => {
                let mut values = BTreeMap::new();
                for (index, raw) in (0u64..).zip(list) {
                    if !raw.is_null() {
                        values.insert(index, raw_value(index, raw)?);
                    }
                }
                values
            }
        };

        Ok(Self { dimensions, values })
    }
}

fn raw_value(index: u64, raw: Value) -> CubeResult<String> {
    match raw {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(CubeError::InvalidValue(index)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({"dataset": {
            "dimension": {
                "id": ["area", "measure"],
                "size": [2, 2],
                "area": {"category": {
                    "index": {"k2": 1, "k1": 0},
                    "label": {"k1": "A", "k2": "B"}
                }},
                "measure": {"category": {
                    "index": {"m1": 0, "m2": 1},
                    "label": {"m1": "cases", "m2": "population"}
                }}
            },
            "value": {"3": "2000", "0": 10}
        }})
    }

    #[test]
    fn categories_sorted_by_position() {
        let payload = Payload::from_value(sample()).unwrap();
        let area = payload.dimension("area").unwrap();
        assert_eq!(area.categories(), ["A", "B"]);
        assert_eq!(area.size(), 2);
    }

    #[test]
    fn numeric_values_rendered_as_text() {
        let payload = Payload::from_value(sample()).unwrap();
        assert_eq!(payload.values().get(&0).map(String::as_str), Some("10"));
        assert_eq!(payload.values().get(&3).map(String::as_str), Some("2000"));
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn ordered_index_and_missing_label() {
        let payload = Payload::from_value(json!({"dataset": {
            "dimension": {
                "id": ["x"],
                "size": [2],
                "x": {"category": {"index": ["a", "b"], "label": {"a": "Alpha"}}}
            },
            "value": ["1", null]
        }}))
        .unwrap();
        assert_eq!(payload.dimensions()[0].categories(), ["Alpha", "b"]);
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn missing_dataset_block() {
        assert!(matches!(
            Payload::from_value(json!({"value": {}})),
            Err(CubeError::Json(_))
        ));
    }

    #[test]
    fn missing_dimension_block() {
        let result = Payload::from_value(json!({"dataset": {
            "dimension": {"id": ["x"], "size": [1]},
            "value": {}
        }}));
        assert!(matches!(result, Err(CubeError::MissingDimension(name)) if name == "x"));
    }

    #[test]
    fn size_disagrees_with_categories() {
        let result = Payload::from_value(json!({"dataset": {
            "dimension": {
                "id": ["x"],
                "size": [3],
                "x": {"category": {"index": {"a": 0, "b": 1}}}
            },
            "value": {}
        }}));
        assert!(matches!(result, Err(CubeError::CategoryCount { size: 3, found: 2, .. })));
    }

    #[test]
    fn gap_in_positions() {
        let result = Payload::from_value(json!({"dataset": {
            "dimension": {
                "id": ["x"],
                "size": [2],
                "x": {"category": {"index": {"a": 0, "b": 2}}}
            },
            "value": {}
        }}));
        assert!(matches!(result, Err(CubeError::CategoryPosition { position: 2, .. })));
    }

    #[test]
    fn id_and_size_lengths_differ() {
        let result = Payload::from_value(json!({"dataset": {
            "dimension": {"id": ["x", "y"], "size": [1]},
            "value": {}
        }}));
        assert!(matches!(result, Err(CubeError::DimensionMismatch { ids: 2, sizes: 1 })));
    }

    #[test]
    fn non_numeric_key() {
        let result = Payload::from_value(json!({"dataset": {
            "dimension": {
                "id": ["x"],
                "size": [1],
                "x": {"category": {"index": {"a": 0}}}
            },
            "value": {"first": "1"}
        }}));
        assert!(matches!(result, Err(CubeError::InvalidIndex(key)) if key == "first"));
    }

    #[test]
    fn boolean_value_rejected() {
        let result = Payload::from_value(json!({"dataset": {
            "dimension": {
                "id": ["x"],
                "size": [1],
                "x": {"category": {"index": {"a": 0}}}
            },
            "value": {"0": true}
        }}));
        assert!(matches!(result, Err(CubeError::InvalidValue(0))));
    }

    #[test]
    fn from_path_missing_file() {
        let result = Payload::from_path("/nonexistent/payload.json");
        assert!(matches!(result, Err(CubeError::Io { .. })));
    }
}
