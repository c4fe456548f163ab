use nfpa_core::dataset::{BUNDLED_DATASET_1, BUNDLED_DATASET_2};
use nfpa_core::{
    ConfigError, HazardProfile, JsonFileLoader, LookupConfig, SingleSourceIndex, SourceLoader,
    SpecialSymbol, StaticTransport, Transport,
};
use std::fs;
use std::sync::Arc;

const SET_ONE: &str = r#"[
    {"NAME":"Acetone","HEALTH":1,"FLAMMABILITY":3,"REACTIVITY":0,"SPECIAL":""},
    {"NAME":"Sodium","HEALTH":3,"FLAMMABILITY":1,"REACTIVITY":2,"SPECIAL":"W"},
    {"NAME":"Broken","HEALTH":"n/a","FLAMMABILITY":1,"REACTIVITY":2,"SPECIAL":""}
]"#;

const SET_TWO: &str = r#"[
    {"NAME":"Liquid oxygen","HEALTH":3,"FLAMMABILITY":0,"REACTIVITY":0,"SPECIAL":"OX"},
    {"NAME":"Nitrogen","HEALTH":3,"FLAMMABILITY":0,"REACTIVITY":0,"SPECIAL":"SA"}
]"#;

#[test]
fn file_loader_reads_records_and_reports_skips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(BUNDLED_DATASET_1);
    fs::write(&path, SET_ONE).unwrap();

    let loader = JsonFileLoader::new(&path);
    assert_eq!(loader.source_name(), BUNDLED_DATASET_1);
    let report = loader.load().unwrap();
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].position, 2);

    let index = SingleSourceIndex::load(&loader);
    let names: Vec<&str> = index
        .records()
        .iter()
        .filter_map(|record| record.display_name())
        .collect();
    assert_eq!(names, vec!["Acetone", "Sodium"]);
}

#[test]
fn missing_file_yields_empty_index() {
    let dir = tempfile::tempdir().unwrap();
    let loader = JsonFileLoader::new(dir.path().join("absent.json"));
    assert!(loader.load().is_err());

    let index = SingleSourceIndex::load(&loader);
    assert!(index.is_empty());
    assert!(index.records().is_empty());
    assert!(index
        .query(&HazardProfile::new(1, 3, 0).unwrap(), false)
        .is_empty());
}

#[test]
fn config_file_resolves_relative_sources_and_builds_index() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(BUNDLED_DATASET_1), SET_ONE).unwrap();
    fs::write(dir.path().join(BUNDLED_DATASET_2), SET_TWO).unwrap();
    let config_path = dir.path().join("lookup.json");
    let document = format!(
        r#"{{"sources":["{BUNDLED_DATASET_1}","{BUNDLED_DATASET_2}"],"providers":[{{"kind":"opsin"}}],"request_timeout_ms":250}}"#
    );
    fs::write(&config_path, document).unwrap();

    let config = LookupConfig::from_path(&config_path).unwrap();
    assert_eq!(config.sources[0], dir.path().join(BUNDLED_DATASET_1));
    assert_eq!(config.request_timeout().as_millis(), 250);

    let transport: Arc<dyn Transport> = Arc::new(StaticTransport::new());
    let index = config.build_index(Some(transport)).unwrap();
    assert_eq!(index.record_count(), 4);
    assert_eq!(index.sources()[1].source_name(), BUNDLED_DATASET_2);

    let oxidizer = HazardProfile::new(3, 0, 0)
        .unwrap()
        .with_special(SpecialSymbol::Oxidizer, true);
    let names: Vec<String> = index
        .query(&oxidizer, true)
        .into_iter()
        .filter_map(|record| record.name)
        .collect();
    assert_eq!(names, vec!["Liquid oxygen".to_string()]);
    assert_eq!(index.query(&oxidizer, false).len(), 2);
}

#[test]
fn unreadable_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = LookupConfig::from_path(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn bundled_sample_config_loads_cleanly() {
    let config_path =
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/lookup.json");
    let config = LookupConfig::from_path(&config_path).unwrap();
    assert_eq!(config.providers.len(), 2);

    for loader in config.loaders() {
        let report = loader.load().unwrap();
        assert!(
            report.skipped.is_empty(),
            "{} has skipped records",
            loader.source_name()
        );
        assert!(!report.records.is_empty());
    }

    let index = config.build_index(None).unwrap();
    let names: Vec<String> = index
        .query(&HazardProfile::new(1, 3, 0).unwrap(), false)
        .into_iter()
        .filter_map(|record| record.name)
        .collect();
    assert_eq!(names, vec!["Acetone".to_string(), "Propanone".to_string()]);
}
