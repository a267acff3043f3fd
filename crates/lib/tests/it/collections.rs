//! Tests for collection fields: scalar lists and lists of settings records.

use settrix::{SettingsExt, serde_json};

use crate::helpers::{Exotic, Workspace, object};

#[test]
fn scalar_list_rebinds_from_the_array() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Tags": ["a", "b", "c"] }"#))
        .unwrap();
    assert_eq!(workspace.tags, ["a", "b", "c"]);

    workspace.apply_json(&object(r#"{ "Tags": ["z"] }"#)).unwrap();
    assert_eq!(workspace.tags, ["z"]);
}

#[test]
fn scalar_list_supports_deques() {
    let mut exotic = Exotic::construct().unwrap();
    exotic
        .apply_json(&object(r#"{ "Aliases": ["one", "two"] }"#))
        .unwrap();
    assert_eq!(exotic.aliases, ["one", "two"]);
}

#[test]
fn scalar_list_rejects_mismatched_elements() {
    let mut workspace = Workspace::construct().unwrap();
    let err = workspace
        .apply_json(&object(r#"{ "Tags": ["ok", 5] }"#))
        .unwrap_err();
    assert!(err.is_conversion());
    assert!(err.to_string().contains("tags"));
}

#[test]
fn record_list_constructs_elements_with_defaults() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Endpoints": [{ "Port": 8080 }, {}] }"#))
        .unwrap();

    assert_eq!(workspace.endpoints.len(), 2);
    assert_eq!(workspace.endpoints[0].host, "localhost");
    assert_eq!(workspace.endpoints[0].port, 8080);
    assert_eq!(workspace.endpoints[1].port, 80);
}

#[test]
fn record_list_recycles_existing_elements() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Endpoints": [{ "Host": "a" }, { "Host": "b" }] }"#))
        .unwrap();

    // State touched outside the binder survives a re-read of the array
    // because elements are reused by position, not rebuilt.
    workspace.endpoints[0].secure = true;

    workspace
        .apply_json(&object(r#"{ "Endpoints": [{ "Port": 9 }, { "Port": 10 }] }"#))
        .unwrap();

    assert_eq!(workspace.endpoints[0].host, "a");
    assert!(workspace.endpoints[0].secure);
    assert_eq!(workspace.endpoints[0].port, 9);
    assert_eq!(workspace.endpoints[1].host, "b");
    assert_eq!(workspace.endpoints[1].port, 10);
}

#[test]
fn record_list_shrinks_to_the_array_length() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Endpoints": [{}, {}, {}] }"#))
        .unwrap();
    assert_eq!(workspace.endpoints.len(), 3);

    workspace
        .apply_json(&object(r#"{ "Endpoints": [{ "Host": "only" }] }"#))
        .unwrap();
    assert_eq!(workspace.endpoints.len(), 1);
    assert_eq!(workspace.endpoints[0].host, "only");
}

#[test]
fn record_list_rejects_non_object_elements() {
    let mut workspace = Workspace::construct().unwrap();
    let err = workspace
        .apply_json(&object(r#"{ "Endpoints": [5] }"#))
        .unwrap_err();
    assert!(err.is_conversion());
    assert!(err.to_string().contains("endpoints"));
    assert!(err.to_string().contains("object"));
}

#[test]
fn update_json_reuses_array_slots_and_their_layout() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Endpoints": [{ "Host": "new" }] }"#))
        .unwrap();

    let mut doc = object(r#"{ "Endpoints": [{ "Note": "mine", "Host": "old" }] }"#);
    workspace.update_json(&mut doc).unwrap();

    let element = doc["Endpoints"][0].as_object().unwrap();
    let keys: Vec<&str> = element.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Note", "Host", "Port", "Secure"]);
    assert_eq!(element["Note"], serde_json::json!("mine"));
    assert_eq!(element["Host"], serde_json::json!("new"));
}

#[test]
fn update_json_truncates_extra_array_entries() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Endpoints": [{}] }"#))
        .unwrap();

    let mut doc = object(r#"{ "Endpoints": [{}, {}, {}] }"#);
    workspace.update_json(&mut doc).unwrap();
    assert_eq!(doc["Endpoints"].as_array().unwrap().len(), 1);
}

#[test]
fn update_json_extends_short_arrays() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Endpoints": [{}, { "Host": "second" }] }"#))
        .unwrap();

    let mut doc = object(r#"{ "Endpoints": [{}] }"#);
    workspace.update_json(&mut doc).unwrap();

    let items = doc["Endpoints"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["Host"], serde_json::json!("second"));
}
