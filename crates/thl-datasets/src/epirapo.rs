//! Case, test, death and hospital care datasets

use thl_compact::{Coercion, Descriptor, Marginals, MeasureTable, Pivot, SkipWhen};

const CASE_URL: &str =
    "https://sampo.thl.fi/pivot/prod/fi/epirapo/covid19case/fact_epirapo_covid19case.json";
const CARE_URL: &str =
    "https://sampo.thl.fi/pivot/prod/fi/epirapo/covid19care/fact_epirapo_covid19care.json";

const CASES: &str = "Tapausten lukumäärä";
const POPULATION: &str = "Asukaslukumäärä";
const TESTS: &str = "Testausmäärä";
const DEATHS: &str = "Kuolemantapausten lukumäärä";

const ALL_SEXES: &str = "Kaikki sukupuolet";
const ALL_AGES: &str = "Kaikki ikäryhmät";

fn case_url(query: &str) -> String {
    format!("{CASE_URL}?{query}")
}

fn demography(coercion: Coercion) -> Marginals {
    Marginals::new(coercion)
        .margin("sex", ALL_SEXES, "ttr10yage")
        .margin("ttr10yage", ALL_AGES, "sex")
}

/// Cases and population per municipality
#[must_use]
pub fn kunnat() -> Descriptor {
    Descriptor::builder("kunnat")
        .record_type("municipality")
        .url(case_url("column=hcdmunicipality2020-445268L&column=measure-141082"))
        .fields([("dateweek20200101", "date"), ("hcdmunicipality2020", "area")])
        .group_by(["area"])
        .merge(
            MeasureTable::new("measure")
                .measure(CASES, "cases", Coercion::int_or_missing())
                .measure(POPULATION, "population", Coercion::Int)
                .ignore(TESTS)
                .ignore(DEATHS),
        )
        .build()
}

/// Weekly cases, population, tests and deaths per hospital district
#[must_use]
pub fn alueet() -> Descriptor {
    Descriptor::builder("alueet")
        .record_type("area")
        .url(case_url(
            "row=dateweek20200101-509030&row=hcdmunicipality2020-445222&column=measure-141082",
        ))
        .fields([("dateweek20200101", "week"), ("hcdmunicipality2020", "area")])
        .values([
            ("Kaikki Alueet", "Koko maa"),
            ("Aika", "Yhteensä"),
            ("Kaikki ajat", "Yhteensä"),
        ])
        .group_by(["week", "area"])
        .merge(
            MeasureTable::new("measure")
                .measure(CASES, "cases", Coercion::Int)
                .measure(POPULATION, "population", Coercion::Int)
                .measure(TESTS, "tests", Coercion::Int)
                .measure(DEATHS, "deaths", Coercion::Int),
        )
        .build()
}

/// Daily cases and tests for the whole country
#[must_use]
pub fn testit() -> Descriptor {
    Descriptor::builder("testit")
        .record_type("tests")
        .url(case_url("row=dateweek20200101-509093L&column=measure-141082"))
        .fields([("dateweek20200101", "date"), ("hcdmunicipality2020", "area")])
        .value("Kaikki Alueet", "Koko maa")
        .group_by(["date"])
        .merge(
            MeasureTable::new("measure")
                .measure(CASES, "cases", Coercion::Int)
                .measure(TESTS, "tests", Coercion::Int)
                .ignore(POPULATION)
                .ignore(DEATHS),
        )
        .build()
}

/// Daily cases per hospital district, one record per cell
///
/// Anchored on `date` so that an empty payload writes nothing.
#[must_use]
pub fn tartunnat() -> Descriptor {
    Descriptor::builder("tartunnat")
        .record_type("infection")
        .url(case_url("row=dateweek20200101-509093L&column=hcdmunicipality2020-445222L"))
        .fields([("dateweek20200101", "date"), ("hcdmunicipality2020", "area")])
        .value("Kaikki Alueet", "Koko maa")
        .group_by(["date", "area"])
        .anchor("date")
        .build()
}

/// Cases by age group and by sex
#[must_use]
pub fn iat() -> Descriptor {
    Descriptor::builder("iat")
        .record_type("demography")
        .url(case_url("column=ttr10yage-444309,sex-444328"))
        .merge(demography(Coercion::Int))
        .build()
}

/// Weekly cases per age group
///
/// The time axis carries an aggregate category ahead of the first week; its
/// group never receives `total` and is dropped.
#[must_use]
pub fn ageweeks() -> Descriptor {
    Descriptor::builder("ageweeks")
        .url(case_url(
            "row=dateweek20200101-509030&row=ttr10yage-444309&column=measure-444833",
        ))
        .field("dateweek20200101", "week")
        .value(ALL_AGES, "total")
        .key_format("week", Coercion::IsoWeekStart)
        .anchor("total")
        .merge(SkipWhen::new(
            "week",
            ["Aika", "Kaikki ajat"],
            Pivot::new("{ttr10yage}", Coercion::int_or_missing()),
        ))
        .build()
}

/// Daily cases and deaths for the whole country
#[must_use]
pub fn kuolemat() -> Descriptor {
    Descriptor::builder("kuolemat")
        .record_type("deaths")
        .url(case_url("row=dateweek20200101-509093L&column=measure-492118"))
        .fields([("dateweek20200101", "date"), ("hcdmunicipality2020", "area")])
        .value("Kaikki Alueet", "Koko maa")
        .group_by(["date"])
        .merge(
            MeasureTable::new("measure")
                .measure(CASES, "cases", Coercion::Int)
                .measure(DEATHS, "deaths", Coercion::Int),
        )
        .build()
}

/// Deaths by age group and by sex
#[must_use]
pub fn kuolemaiat() -> Descriptor {
    Descriptor::builder("kuolemaiat")
        .record_type("deathdemography")
        .url(case_url("column=ttr10yage-444309,sex-444328&row=measure-492118"))
        .merge(demography(Coercion::int_or_missing()))
        .build()
}

/// Ongoing hospital care periods per special responsibility area
#[must_use]
pub fn sairaalat() -> Descriptor {
    Descriptor::builder("sairaalat")
        .record_type("hospital")
        .url(format!(
            "{CARE_URL}?row=dateweek20200101-509093L&row=erva-456367L&column=measure-547523.547516.456732.547531"
        ))
        .fields([("dateweek20200101", "date"), ("erva", "area")])
        .values([
            ("Kaikki erityisvastuualueet", "Koko maa"),
            ("Helsingin yliopistollisen keskussairaalan erityisvastuualue", "HYKS"),
            ("Kuopion yliopistollisen sairaalan erityisvastuualue", "KYS"),
            ("Oulun yliopistollisen sairaalan erityisvastuualue", "OYS"),
            ("Tampereen yliopistollisen sairaalan erityisvastuualue", "TAYS"),
            ("Turun yliopistollisen sairaalan erityisvastuualue", "TYKS"),
            ("Käynnissä olevat osastojaksot perusterveydenhuollon osastolla", "perus"),
            ("Käynnissä olevat osastojaksot erikoissairaanhoidon osastoilla", "erikois"),
            ("Käynnissä olevat tehohoitojaksot", "teho"),
            ("Käynnissä olevat vuodeosastojaksot (ennen 7.12.2020)", "vuode"),
        ])
        .group_by(["date", "area"])
        .merge(
            MeasureTable::new("measure")
                .measure("perus", "basic", Coercion::Int)
                .measure("erikois", "special", Coercion::Int)
                .measure("teho", "intensive", Coercion::Int)
                .measure("vuode", "normal", Coercion::Int),
        )
        .build()
}
