//! Tests for the JSON file convenience layer.

use std::fs;

use settrix::{SettingsExt, file, serde_json};

use crate::helpers::Profile;

#[test]
fn reading_a_missing_file_leaves_the_instance_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut profile = Profile::construct().unwrap();

    file::read_json_file(&mut profile, dir.path().join("absent.json")).unwrap();

    assert_eq!(profile.name, "Joe");
    assert_eq!(profile.level, 5);
}

#[test]
fn writing_a_new_file_emits_sorted_pretty_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut profile = Profile::construct().unwrap();
    profile.level = 7;

    file::write_json_file(&profile, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&str> = doc
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["Level", "Name"]);
    assert_eq!(doc["Level"], serde_json::json!(7));
}

#[test]
fn writing_over_a_hand_edited_file_preserves_its_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ \"Comment\": \"mine\", \"Level\": 1 }\n").unwrap();

    let profile = Profile::construct().unwrap();
    file::write_json_file(&profile, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&str> = doc
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["Comment", "Level", "Name"]);
    assert_eq!(doc["Comment"], serde_json::json!("mine"));
    assert_eq!(doc["Level"], serde_json::json!(5));
}

#[test]
fn reading_applies_the_file_as_a_partial_merge() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ \"Level\": 42 }").unwrap();

    let mut profile = Profile::construct().unwrap();
    file::read_json_file(&mut profile, &path).unwrap();

    assert_eq!(profile.name, "Joe");
    assert_eq!(profile.level, 42);
}

#[test]
fn non_object_documents_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let mut profile = Profile::construct().unwrap();
    let err = file::read_json_file(&mut profile, &path).unwrap_err();
    assert!(err.is_conversion());
    assert!(err.to_string().contains("object"));
}

#[test]
fn unwritable_paths_surface_as_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("settings.json");

    let profile = Profile::construct().unwrap();
    let err = file::write_json_file(&profile, &path).unwrap_err();
    assert!(err.is_io_error());
    assert_eq!(err.module(), "io");
}

#[test]
fn malformed_documents_surface_as_json_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();

    let mut profile = Profile::construct().unwrap();
    let err = file::read_json_file(&mut profile, &path).unwrap_err();
    assert_eq!(err.module(), "json");
}

#[test]
fn file_round_trip_preserves_equivalence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let mut saved = Profile::construct().unwrap();
    saved.name = "Ann".to_string();
    file::write_json_file(&saved, &path).unwrap();

    let mut loaded = Profile::construct().unwrap();
    file::read_json_file(&mut loaded, &path).unwrap();
    assert!(loaded.is_equivalent_to(&saved).unwrap());
}
