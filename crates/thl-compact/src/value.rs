//! Typed values carried by wide records

use serde::Serialize;

/// Value of one wide-record field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Missing data
    Null,
    /// Integer count
    Int(i64),
    /// Decimal measure
    Float(f64),
    /// Label or date text
    Text(String),
}

impl FieldValue {
    /// Text content, if this is a text value
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, if this is an integer value
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Float content, if this is a float value
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Check for null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_untagged() {
        let values = vec![
            FieldValue::Null,
            FieldValue::Int(10),
            FieldValue::Float(81.5),
            FieldValue::from("Koko maa"),
        ];
        assert_eq!(
            serde_json::to_string(&values).unwrap(),
            r#"[null,10,81.5,"Koko maa"]"#
        );
    }

    #[test]
    fn option_conversion() {
        assert!(FieldValue::from(None::<i64>).is_null());
        assert_eq!(FieldValue::from(Some(3i64)).as_i64(), Some(3));
    }
}
