//! Vaccination register datasets

use thl_compact::{Coercion, Descriptor, DescriptorBuilder, MeasureTable, Pivot};

const URL: &str = "https://sampo.thl.fi/pivot/prod/fi/vaccreg/cov19cov/fact_cov19cov.json";

const PERSONS: &str = "Rokotettuja henkilöitä";
const COVERAGE: &str = "Rokotuskattavuus";
const DOSES: &str = "Annettuja annoksia";
const RESIDENTS: &str = "Asukkaita";

fn register(name: &str, query: &str) -> DescriptorBuilder {
    Descriptor::builder(name)
        .url(format!("{URL}?{query}"))
        .fields([
            ("dateweek20201226", "week"),
            ("hcdmunicipality2020", "area"),
            ("cov_vac_age", "age"),
            ("cov_vac_dose", "dose"),
        ])
        .values([
            ("Kaikki alueet", "Koko maa"),
            ("Kaikki iät", "all"),
            ("Ensimmäinen annos", "first"),
            ("Toinen annos", "second"),
            ("Kaikki annokset", "all"),
        ])
}

/// Weekly doses per area, dose and age group
#[must_use]
pub fn vaxweeks() -> Descriptor {
    register(
        "vaxweeks",
        "row=area-518362&column=dateweek20201226-525425&column=cov_vac_dose-533174.533170.533164.&column=measure-533175&column=cov_vac_age-518413",
    )
    .record_type("vaxweek")
    .value("Kaikki ajat", "Yhteensä")
    .group_by(["week", "area", "dose"])
    .merge(Pivot::new("{age}", Coercion::Int))
    .build()
}

/// Vaccinated persons and coverage per area and dose
#[must_use]
pub fn vaxcoverage() -> Descriptor {
    register(
        "vaxcoverage",
        "row=area-518362&column=cov_vac_dose-533170.533164.&column=measure-533172.533185.&column=cov_vac_age-518413",
    )
    .value("Aika", "Yhteensä")
    .group_by(["area", "dose"])
    .merge(
        MeasureTable::new("measure")
            .measure(PERSONS, "doses-{age}", Coercion::Int)
            .measure(COVERAGE, "coverage-{age}", Coercion::DecimalCommaText),
    )
    .build()
}

/// Population per area and age group
#[must_use]
pub fn vaxpopulation() -> Descriptor {
    register(
        "vaxpopulation",
        "row=area-518362&column=measure-433796&column=cov_vac_age-518413",
    )
    .value("Aika", "Yhteensä")
    .group_by(["area"])
    .merge(Pivot::new("{age}", Coercion::Int))
    .build()
}

/// Weekly doses per area and vaccine product
#[must_use]
pub fn vaxproduct() -> Descriptor {
    register(
        "vaxproduct",
        "row=area-518362&column=dateweek20201226-525425&column=vacprod-533729.533761.547315.533741.&column=measure-533175&column=cov_vac_age-518413",
    )
    .field("vacprod", "product")
    .values([
        ("Kaikki ajat", "Yhteensä"),
        ("Comirnaty (BioNTech)", "Pfizer"),
        ("COVID-19 Vaccine Moderna (MODERNA)", "Moderna"),
        ("Vaxzevria (AstraZeneca)", "AstraZeneca"),
        ("COVID-19 Vaccine Janssen (JANSSEN-CILAG)", "Janssen"),
    ])
    .group_by(["week", "area", "product"])
    .merge(Pivot::new("{age}", Coercion::Int))
    .build()
}

/// Persons, doses, coverage and population per municipality and dose
///
/// Field prefixes follow the published files: persons land in `doses-*`
/// and administered doses in `persons-*`.
#[must_use]
pub fn vaxmunicipalities() -> Descriptor {
    register(
        "vaxmunicipalities",
        "row=area-518376L&column=cov_vac_dose-533174.533170.533164.&column=measure-533175.533172.533185.433796.&column=cov_vac_age-518413",
    )
    .value("Aika", "Yhteensä")
    .group_by(["area", "dose"])
    .merge(
        MeasureTable::new("measure")
            .measure(PERSONS, "doses-{age}", Coercion::Int)
            .measure(COVERAGE, "coverage-{age}", Coercion::DecimalCommaText)
            .measure(DOSES, "persons-{age}", Coercion::Int)
            .measure(RESIDENTS, "population-{age}", Coercion::Int),
    )
    .build()
}
