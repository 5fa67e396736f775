//! Monthly incidence datasets by vaccination status

use thl_compact::{Coercion, Descriptor, Pivot};

const URL: &str = "https://sampo.thl.fi/pivot/prod/fi/epirapo/covid19inci/fact_epirapo_covid19inci.json?row=quadrimestermonth-642743L&column=inciagegroup-639348&row=incivacstatus-639350";

/// Monthly values per vaccination status and age group
///
/// `measure` is the pivot's measure id; every dataset filters on one.
fn incidence(name: &str, measure: u32, coercion: Coercion) -> Descriptor {
    Descriptor::builder(name)
        .url(format!("{URL}&filter=measure-{measure}"))
        .fields([
            ("inciagegroup", "agegroup"),
            ("incivacstatus", "vaxstatus"),
            ("quadrimestermonth", "month"),
        ])
        .values([
            ("Ei rokotussuojaa", "none"),
            ("Osittainen rokotussuoja", "partial"),
            ("Täysi rokotussuoja", "full"),
            ("Täysi rokotussuoja ilman tehostetta", "full"),
            ("Täysi rokotussuoja ja tehoste", "booster"),
            ("Koko väestö", "all"),
            ("12-29 vuotiaat", "12-29"),
            ("30-49 vuotiaat", "30-49"),
            ("50-69 vuotiaat", "50-69"),
            ("70+ vuotiaat", "70+"),
            ("Ikäryhmät yhdessä", "all"),
        ])
        .key_format("month", Coercion::MonthYear)
        .merge(Pivot::new("{vaxstatus}-{agegroup}", coercion))
        .build()
}

/// Hospital patients
#[must_use]
pub fn vaxstatpatients() -> Descriptor {
    incidence("vaxstatpatients", 639_169, Coercion::Int)
}

/// Intensive care patients
#[must_use]
pub fn vaxstaticu() -> Descriptor {
    incidence("vaxstaticu", 639_171, Coercion::Int)
}

/// Deaths
#[must_use]
pub fn vaxstatdeaths() -> Descriptor {
    incidence("vaxstatdeaths", 639_168, Coercion::Int)
}

/// Cases
#[must_use]
pub fn vaxstatcases() -> Descriptor {
    incidence("vaxstatcases", 639_170, Coercion::Int)
}

/// Person-months of follow-up
#[must_use]
pub fn vaxstatpersonmonths() -> Descriptor {
    incidence("vaxstatpersonmonths", 650_912, Coercion::DecimalComma)
}

/// Hospital patients per 100 000 person-months
#[must_use]
pub fn vaxincpatients() -> Descriptor {
    incidence("vaxincpatients", 642_065, Coercion::DecimalComma)
}

/// Intensive care patients per 100 000 person-months
#[must_use]
pub fn vaxincicu() -> Descriptor {
    incidence("vaxincicu", 642_062, Coercion::DecimalComma)
}

/// Deaths per 100 000 person-months
#[must_use]
pub fn vaxincdeaths() -> Descriptor {
    incidence("vaxincdeaths", 642_064, Coercion::DecimalComma)
}

/// Cases per 100 000 person-months
#[must_use]
pub fn vaxinccases() -> Descriptor {
    incidence("vaxinccases", 642_063, Coercion::DecimalComma)
}
