//! Raw value coercions
//!
//! Sentinels are matched by exact string comparison before any parsing.

use crate::error::CoercionFailure;
use crate::value::FieldValue;
use chrono::{NaiveDate, Weekday};

/// Placeholder the pivot service uses for suppressed or missing data
pub const MISSING: &str = "..";

const MONTHS: [&str; 12] = [
    "tammikuu",
    "helmikuu",
    "maaliskuu",
    "huhtikuu",
    "toukokuu",
    "kesäkuu",
    "heinäkuu",
    "elokuu",
    "syyskuu",
    "lokakuu",
    "marraskuu",
    "joulukuu",
];

/// How a raw cell string becomes a typed field value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Keep the raw string
    #[default]
    Text,
    /// Integer parse
    Int,
    /// Integer parse, with the given sentinel mapped to null
    IntOr(String),
    /// Decimal with `,` as separator, parsed to float
    DecimalComma,
    /// Decimal comma float, with the given sentinel mapped to null
    DecimalCommaOr(String),
    /// Keep the text, with `,` replaced by `.`
    DecimalCommaText,
    /// `"Vuosi 2021 Viikko 5"` to the ISO date of that week's Monday
    IsoWeekStart,
    /// `"tammikuu 2022"` to `"2022-01"`
    MonthYear,
}

impl Coercion {
    /// Integer with [`MISSING`] mapped to null
    #[inline]
    #[must_use]
    pub fn int_or_missing() -> Self {
        Self::IntOr(MISSING.to_string())
    }

    /// Decimal comma float with [`MISSING`] mapped to null
    #[inline]
    #[must_use]
    pub fn decimal_or_missing() -> Self {
        Self::DecimalCommaOr(MISSING.to_string())
    }

    /// Name of the produced type
    #[must_use]
    pub fn target(&self) -> &'static str {
        match self {
            Self::Text | Self::DecimalCommaText => "text",
            Self::Int | Self::IntOr(_) => "integer",
            Self::DecimalComma | Self::DecimalCommaOr(_) => "decimal",
            Self::IsoWeekStart => "iso week",
            Self::MonthYear => "month and year",
        }
    }

    /// Convert a raw cell string
    ///
    /// # Errors
    /// Returns [`CoercionFailure`] if `raw` does not parse as the target type
    pub fn apply(&self, raw: &str) -> Result<FieldValue, CoercionFailure> {
        let fail = || CoercionFailure::new(raw, self.target());
        match self {
            Self::Text => Ok(FieldValue::Text(raw.to_string())),
            Self::DecimalCommaText => Ok(FieldValue::Text(raw.replace(',', "."))),
            Self::IntOr(sentinel) if raw == sentinel.as_str() => Ok(FieldValue::Null),
            Self::Int | Self::IntOr(_) => {
                raw.trim().parse().map(FieldValue::Int).map_err(|_| fail())
            }
            Self::DecimalCommaOr(sentinel) if raw == sentinel.as_str() => Ok(FieldValue::Null),
            Self::DecimalComma | Self::DecimalCommaOr(_) => {
                decimal_comma(raw).map(FieldValue::Float).ok_or_else(fail)
            }
            Self::IsoWeekStart => iso_week_start(raw).map(FieldValue::Text).ok_or_else(fail),
            Self::MonthYear => month_year(raw).map(FieldValue::Text).ok_or_else(fail),
        }
    }
}

fn decimal_comma(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

fn iso_week_start(raw: &str) -> Option<String> {
    let mut parts = raw.split_whitespace();
    let (_, year, _, week) = (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let date = NaiveDate::from_isoywd_opt(year.parse().ok()?, week.parse().ok()?, Weekday::Mon)?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn month_year(raw: &str) -> Option<String> {
    let mut parts = raw.split_whitespace();
    let (month, year) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let month = MONTHS.iter().position(|m| m.eq_ignore_ascii_case(month))? + 1;
    let year: i32 = year.parse().ok()?;
    Some(format!("{year}-{month:02}"))
}
