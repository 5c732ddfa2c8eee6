//! Loader config YAML parsing and validation tests

use mimic_notes_core::config::{LoaderConfig, DEFAULT_BUFFER_CAPACITY};
use mimic_notes_core::dataset::DatasetConfig;
use mimic_notes_io::{emit, ErrorKind};
use std::path::PathBuf;

#[test]
fn test_parse_full_config() {
    let yaml = r#"
data_dir: /data/mimic-iv-note/2.2/note
config: radiology
buffer_capacity: 8192
"#;

    let cfg = LoaderConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(
        cfg.data_dir,
        Some(PathBuf::from("/data/mimic-iv-note/2.2/note"))
    );
    assert_eq!(cfg.dataset_config, DatasetConfig::Radiology);
    assert_eq!(cfg.buffer_capacity, 8192);
}

#[test]
fn test_empty_document_keeps_defaults() {
    let cfg = LoaderConfig::from_yaml_str("{}").unwrap();
    assert_eq!(cfg.data_dir, None);
    assert_eq!(cfg.dataset_config, DatasetConfig::All);
    assert_eq!(cfg.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
}

#[test]
fn test_unknown_config_name_is_rejected() {
    let result = LoaderConfig::from_yaml_str("config: echo\n");
    assert!(result.is_err());
}

#[test]
fn test_unknown_key_is_rejected() {
    let result = LoaderConfig::from_yaml_str("data_dir: /tmp\nsplit: validation\n");
    assert!(result.is_err());
}

#[test]
fn test_zero_buffer_capacity_is_ignored() {
    let cfg = LoaderConfig::from_yaml_str("buffer_capacity: 0\n").unwrap();
    assert_eq!(cfg.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
}

#[test]
fn test_yaml_without_data_dir_cannot_emit() {
    let cfg = LoaderConfig::from_yaml_str("config: noteevents\n").unwrap();
    let err = emit(&cfg).err().expect("should fail");
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_yaml_with_missing_directory_cannot_emit() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("not-there");
    let cfg = LoaderConfig::new(&gone, DatasetConfig::Discharge);
    let err = emit(&cfg).err().expect("should fail");
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("not-there"));
}
