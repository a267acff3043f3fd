//! Tests for the JSON binding contract: partial-merge reads, name-sorted
//! writes, and order-preserving updates.

use settrix::{SettingsExt, serde_json};

use crate::helpers::{Channel, Exotic, Profile, Workspace, object};

#[test]
fn apply_json_merges_only_the_given_keys() {
    let mut profile = Profile::construct().unwrap();
    profile.apply_json(&object(r#"{ "Level": 9 }"#)).unwrap();
    assert_eq!(profile.name, "Joe");
    assert_eq!(profile.level, 9);
}

#[test]
fn apply_json_ignores_unknown_keys() {
    let mut profile = Profile::construct().unwrap();
    profile
        .apply_json(&object(r#"{ "Unknown": true, "Name": "Ann" }"#))
        .unwrap();
    assert_eq!(profile.name, "Ann");
    assert_eq!(profile.level, 5);
}

#[test]
fn apply_json_merges_nested_objects() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Profile": { "Level": 9 } }"#))
        .unwrap();
    assert_eq!(workspace.profile.name, "Joe");
    assert_eq!(workspace.profile.level, 9);
}

#[test]
fn apply_json_reads_enums_and_nullables() {
    let mut workspace = Workspace::construct().unwrap();
    workspace
        .apply_json(&object(r#"{ "Channel": "NIGHTLY", "Quota": 3 }"#))
        .unwrap();
    assert_eq!(workspace.channel, Channel::Nightly);
    assert_eq!(workspace.quota, Some(3));

    workspace
        .apply_json(&object(r#"{ "Quota": null }"#))
        .unwrap();
    assert_eq!(workspace.quota, None);
}

#[test]
fn apply_json_accepts_duration_strings_and_seconds() {
    let mut exotic = Exotic::construct().unwrap();
    exotic
        .apply_json(&object(r#"{ "Window": "2m 5s" }"#))
        .unwrap();
    assert_eq!(exotic.window, std::time::Duration::from_secs(125));

    exotic.apply_json(&object(r#"{ "Window": 45 }"#)).unwrap();
    assert_eq!(exotic.window, std::time::Duration::from_secs(45));
}

#[test]
fn apply_json_rejects_mismatched_scalar_tokens() {
    let mut profile = Profile::construct().unwrap();
    let err = profile
        .apply_json(&object(r#"{ "Level": "high" }"#))
        .unwrap_err();
    assert!(err.is_conversion());
    assert!(err.to_string().contains("level"));
}

#[test]
fn apply_json_rejects_mismatched_shapes() {
    let mut workspace = Workspace::construct().unwrap();
    let err = workspace
        .apply_json(&object(r#"{ "Profile": [1, 2] }"#))
        .unwrap_err();
    assert!(err.is_conversion());
    assert!(err.to_string().contains("object"));
}

#[test]
fn to_json_writes_every_field_name_sorted() {
    let profile = Profile::construct().unwrap();
    let doc = profile.to_json().unwrap();
    assert_eq!(
        serde_json::to_string(&doc).unwrap(),
        r#"{"Level":5,"Name":"Joe"}"#
    );
}

#[test]
fn to_json_sorts_across_every_shape() {
    let workspace = Workspace::construct().unwrap();
    let doc = workspace.to_json().unwrap();
    let keys: Vec<&str> = doc
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["Channel", "Endpoints", "Profile", "Quota", "Tags"]);
    assert_eq!(doc["Quota"], serde_json::Value::Null);
    assert_eq!(doc["Channel"], serde_json::json!("Beta"));
}

#[test]
fn update_json_refreshes_in_place_and_keeps_foreign_keys() {
    let profile = Profile::construct().unwrap();
    let mut doc = object(r#"{ "Comment": "keep me", "Level": 2 }"#);

    profile.update_json(&mut doc).unwrap();

    let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Comment", "Level", "Name"]);
    assert_eq!(doc["Comment"], serde_json::json!("keep me"));
    assert_eq!(doc["Level"], serde_json::json!(5));
    assert_eq!(doc["Name"], serde_json::json!("Joe"));
}

#[test]
fn update_json_preserves_layout_inside_nested_objects() {
    let mut workspace = Workspace::construct().unwrap();
    workspace.profile.level = 8;
    let mut doc = object(r#"{ "Profile": { "Note": 1, "Level": 0 } }"#);

    workspace.update_json(&mut doc).unwrap();

    let profile = doc["Profile"].as_object().unwrap();
    let keys: Vec<&str> = profile.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Note", "Level", "Name"]);
    assert_eq!(profile["Note"], serde_json::json!(1));
    assert_eq!(profile["Level"], serde_json::json!(8));
}

#[test]
fn update_json_replaces_values_of_the_wrong_shape() {
    let workspace = Workspace::construct().unwrap();
    let mut doc = object(r#"{ "Profile": "not an object" }"#);

    workspace.update_json(&mut doc).unwrap();

    assert!(doc["Profile"].is_object());
    assert_eq!(doc["Profile"]["Name"], serde_json::json!("Joe"));
}

#[test]
fn json_round_trip_preserves_equivalence() {
    let mut source = Workspace::construct().unwrap();
    source.profile.name = "Ann".to_string();
    source.tags = vec!["x".to_string()];
    source.quota = Some(12);
    source.channel = Channel::Stable;

    let doc = source.to_json().unwrap();
    let mut restored = Workspace::construct().unwrap();
    restored.apply_json(doc.as_object().unwrap()).unwrap();

    assert!(restored.is_equivalent_to(&source).unwrap());
}
