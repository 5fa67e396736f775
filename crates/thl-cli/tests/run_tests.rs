use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use thl_cli::{execute, Outcome, OutputTarget, RunOptions, Settings};
use thl_test_utils::{parse_lines, PayloadBuilder};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 5, 2).unwrap()
}

fn write_payload(dir: &Path, payload: &PayloadBuilder) -> std::path::PathBuf {
    let path = dir.join("payload.json");
    std::fs::write(&path, payload.build_bytes()).unwrap();
    path
}

fn municipalities(cases: &str) -> PayloadBuilder {
    PayloadBuilder::new()
        .dimension("hcdmunicipality2020", &["Akaa"])
        .dimension("measure", &["Tapausten lukumäärä", "Asukaslukumäärä"])
        .values(&[cases, "16570"])
}

#[tokio::test]
async fn test_writes_default_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_payload(dir.path(), &municipalities("12"));
    let settings = Settings::new().with_output_dir(dir.path());
    let options = RunOptions {
        dataset: "kunnat".to_string(),
        date_offset: 1,
        input: Some(input),
        ..RunOptions::default()
    };

    let outcome = execute(&options, &settings, today()).await.unwrap();
    let expected = dir.path().join("kunnat-20200501.json");
    match outcome {
        Outcome::Written { target, summary } => {
            assert_eq!(target, OutputTarget::File(expected.clone()));
            assert_eq!(summary.records, 1);
        }
        Outcome::Kept(_) => panic!("nothing to keep"),
    }

    let lines = parse_lines(&std::fs::read(&expected).unwrap());
    assert_eq!(
        lines,
        vec![json!({
            "area": "Akaa",
            "cases": 12,
            "datadate": "2020-05-01",
            "population": 16570,
            "type": "municipality"
        })]
    );
}

#[tokio::test]
async fn test_existing_file_kept_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_payload(dir.path(), &municipalities("12"));
    let output = dir.path().join("out.json");
    std::fs::write(&output, "previous\n").unwrap();

    let mut options = RunOptions {
        dataset: "kunnat".to_string(),
        output_file: Some(output.clone()),
        input: Some(input),
        ..RunOptions::default()
    };
    let outcome = execute(&options, &Settings::new(), today()).await.unwrap();
    assert_eq!(outcome, Outcome::Kept(output.clone()));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous\n");

    options.overwrite = true;
    execute(&options, &Settings::new(), today()).await.unwrap();
    assert_eq!(parse_lines(&std::fs::read(&output).unwrap()).len(), 1);
}

#[tokio::test]
async fn test_failed_run_removes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_payload(dir.path(), &municipalities("many"));
    let output = dir.path().join("out.json");
    let options = RunOptions {
        dataset: "kunnat".to_string(),
        output_file: Some(output.clone()),
        input: Some(input),
        ..RunOptions::default()
    };

    let err = execute(&options, &Settings::new(), today()).await.unwrap_err();
    assert!(format!("{err:#}").contains("cases"));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_unknown_dataset_is_an_error() {
    let options = RunOptions {
        dataset: "koronakartta".to_string(),
        stdout: true,
        ..RunOptions::default()
    };
    let err = execute(&options, &Settings::new(), today()).await.unwrap_err();
    assert!(err.to_string().contains("koronakartta"));
}

#[tokio::test]
async fn test_malformed_local_payload() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("payload.json");
    std::fs::write(&input, b"{\"dataset\": ").unwrap();
    let options = RunOptions {
        dataset: "iat".to_string(),
        output_file: Some(dir.path().join("out.json")),
        input: Some(input),
        ..RunOptions::default()
    };

    assert!(execute(&options, &Settings::new(), today()).await.is_err());
    assert!(!dir.path().join("out.json").exists());
}
