use pretty_assertions::assert_eq;
use serde_json::json;
use thl_compact::{run, RecordSink};
use thl_cube::Payload;
use thl_datasets::{find, names};
use thl_test_utils::{parse_lines, PayloadBuilder};

const CASE_MEASURES: [&str; 4] = [
    "Tapausten lukumäärä",
    "Asukaslukumäärä",
    "Testausmäärä",
    "Kuolemantapausten lukumäärä",
];

fn run_dataset(name: &str, payload: &PayloadBuilder) -> Vec<serde_json::Value> {
    let descriptor = find(name).unwrap();
    let payload = Payload::from_value(payload.build()).unwrap();
    let mut sink = RecordSink::for_descriptor(Vec::new(), &descriptor, "2021-02-10");
    run(&descriptor, &payload, &mut sink).unwrap();
    parse_lines(&sink.finish().unwrap())
}

#[test]
fn test_kunnat_one_record_per_municipality() {
    let payload = PayloadBuilder::new()
        .dimension("hcdmunicipality2020", &["Akaa", "Alajärvi"])
        .dimension("measure", &["Tapausten lukumäärä", "Asukaslukumäärä"])
        .values(&["12", "16570", "..", "9767"]);

    assert_eq!(
        run_dataset("kunnat", &payload),
        vec![
            json!({"area": "Akaa", "cases": 12, "datadate": "2021-02-10", "population": 16570, "type": "municipality"}),
            json!({"area": "Alajärvi", "cases": null, "datadate": "2021-02-10", "population": 9767, "type": "municipality"}),
        ]
    );
}

#[test]
fn test_ageweeks_drops_time_total_and_formats_week() {
    let payload = PayloadBuilder::new()
        .dimension("dateweek20200101", &["Aika", "Vuosi 2021 Viikko 5"])
        .dimension("ttr10yage", &["00-09", "Kaikki ikäryhmät"])
        .dimension("measure", &["Tapausten lukumäärä"])
        .values(&["1500", "40000", "25", ".."]);

    assert_eq!(
        run_dataset("ageweeks", &payload),
        vec![json!({
            "00-09": 25,
            "datadate": "2021-02-10",
            "total": null,
            "type": "ageweeks",
            "week": "2021-02-01"
        })]
    );
}

#[test]
fn test_sairaalat_renames_areas_and_measures() {
    let payload = PayloadBuilder::new()
        .dimension("dateweek20200101", &["2021-02-01"])
        .dimension("erva", &["Kaikki erityisvastuualueet"])
        .dimension(
            "measure",
            &[
                "Käynnissä olevat osastojaksot perusterveydenhuollon osastolla",
                "Käynnissä olevat osastojaksot erikoissairaanhoidon osastoilla",
                "Käynnissä olevat tehohoitojaksot",
                "Käynnissä olevat vuodeosastojaksot (ennen 7.12.2020)",
            ],
        )
        .values(&["40", "60", "20", "0"]);

    assert_eq!(
        run_dataset("sairaalat", &payload),
        vec![json!({
            "area": "Koko maa",
            "basic": 40,
            "datadate": "2021-02-10",
            "date": "2021-02-01",
            "intensive": 20,
            "normal": 0,
            "special": 60,
            "type": "hospital"
        })]
    );
}

#[test]
fn test_iat_keeps_marginal_totals() {
    let payload = PayloadBuilder::new()
        .dimension("ttr10yage", &["00-09", "10-19", "Kaikki ikäryhmät"])
        .dimension("sex", &["Mies", "Nainen", "Kaikki sukupuolet"])
        .values(&["1", "2", "3", "4", "5", "9", "5", "7", "12"]);

    assert_eq!(
        run_dataset("iat", &payload),
        vec![json!({
            "00-09": 3,
            "10-19": 9,
            "Kaikki ikäryhmät": 12,
            "Mies": 5,
            "Nainen": 7,
            "datadate": "2021-02-10",
            "type": "demography"
        })]
    );
}

#[test]
fn test_vaxstat_groups_by_month() {
    let payload = PayloadBuilder::new()
        .dimension("quadrimestermonth", &["lokakuu 2021", "marraskuu 2021"])
        .dimension("incivacstatus", &["Ei rokotussuojaa", "Täysi rokotussuoja"])
        .dimension("inciagegroup", &["Ikäryhmät yhdessä"])
        .values(&["30", "10", "35", "12"]);

    assert_eq!(
        run_dataset("vaxstatpatients", &payload),
        vec![
            json!({"datadate": "2021-02-10", "full-all": 10, "month": "2021-10", "none-all": 30, "type": "vaxstatpatients"}),
            json!({"datadate": "2021-02-10", "full-all": 12, "month": "2021-11", "none-all": 35, "type": "vaxstatpatients"}),
        ]
    );
}

#[test]
fn test_tartunnat_passes_cells_through() {
    let payload = PayloadBuilder::new()
        .dimension("dateweek20200101", &["2020-03-01"])
        .dimension("hcdmunicipality2020", &["Kaikki Alueet", "Lapin SHP"])
        .values(&["6", ".."]);

    assert_eq!(
        run_dataset("tartunnat", &payload),
        vec![
            json!({"area": "Koko maa", "datadate": "2021-02-10", "date": "2020-03-01", "type": "infection", "value": "6"}),
            json!({"area": "Lapin SHP", "datadate": "2021-02-10", "date": "2020-03-01", "type": "infection", "value": ".."}),
        ]
    );
}

#[test]
fn test_unknown_vaccination_measure_is_fatal() {
    let descriptor = find("vaxcoverage").unwrap();
    let payload = Payload::from_value(
        PayloadBuilder::new()
            .dimension("area", &["Kaikki alueet"])
            .dimension("cov_vac_dose", &["Ensimmäinen annos"])
            .dimension("measure", &["Rokotettuja henkilöitä", "Annettuja annoksia"])
            .dimension("cov_vac_age", &["Kaikki iät"])
            .values(&["100", "200"])
            .build(),
    )
    .unwrap();
    let mut sink = RecordSink::for_descriptor(Vec::new(), &descriptor, "2021-02-10");

    let err = run(&descriptor, &payload, &mut sink).unwrap_err();
    assert!(err.to_string().contains("Annettuja annoksia"));
    assert_eq!(sink.written(), 0);
}

#[test]
fn test_every_dataset_has_url() {
    for name in names() {
        let descriptor = find(&name).unwrap();
        assert!(descriptor.url().starts_with("https://sampo.thl.fi/pivot/prod/fi/"), "{name}");
    }
}

#[test]
fn test_kunnat_ignores_tests_and_deaths() {
    let payload = PayloadBuilder::new()
        .dimension("hcdmunicipality2020", &["Akaa"])
        .dimension("measure", &CASE_MEASURES)
        .values(&["12", "16570", "..", ".."]);

    assert_eq!(
        run_dataset("kunnat", &payload),
        vec![json!({"area": "Akaa", "cases": 12, "datadate": "2021-02-10", "population": 16570, "type": "municipality"})]
    );
}

#[test]
fn test_testit_ignores_population_and_deaths() {
    let payload = PayloadBuilder::new()
        .dimension("dateweek20200101", &["2021-02-01"])
        .dimension("measure", &CASE_MEASURES)
        .values(&["30", "5500000", "12000", ".."]);

    assert_eq!(
        run_dataset("testit", &payload),
        vec![json!({"cases": 30, "datadate": "2021-02-10", "date": "2021-02-01", "tests": 12000, "type": "tests"})]
    );
}

#[test]
fn test_empty_payload_writes_one_stamped_record() {
    let payload = PayloadBuilder::new()
        .dimension("ttr10yage", &["00-09", "Kaikki ikäryhmät"])
        .dimension("sex", &["Nainen", "Kaikki sukupuolet"]);

    assert_eq!(
        run_dataset("iat", &payload),
        vec![json!({"datadate": "2021-02-10", "type": "demography"})]
    );
}

#[test]
fn test_empty_payload_pass_through_writes_nothing() {
    let payload = PayloadBuilder::new()
        .dimension("dateweek20200101", &["2020-03-01"])
        .dimension("hcdmunicipality2020", &["Kaikki Alueet"]);

    assert!(run_dataset("tartunnat", &payload).is_empty());
}

#[test]
fn test_vaxcoverage_keeps_coverage_as_text() {
    let payload = PayloadBuilder::new()
        .dimension("area", &["Kaikki alueet"])
        .dimension("cov_vac_dose", &["Toinen annos"])
        .dimension("measure", &["Rokotettuja henkilöitä", "Rokotuskattavuus"])
        .dimension("cov_vac_age", &["Kaikki iät", "80+"])
        .values(&["100", "20", "61,2", ".."]);

    assert_eq!(
        run_dataset("vaxcoverage", &payload),
        vec![json!({
            "area": "Koko maa",
            "coverage-80+": "..",
            "coverage-all": "61.2",
            "datadate": "2021-02-10",
            "dose": "second",
            "doses-80+": 20,
            "doses-all": 100,
            "type": "vaxcoverage"
        })]
    );
}
