//! Tests for metadata publication and registration-time validation.

use settrix::{FieldKind, Literal, Schema, Settings, SettingsExt, metadata_for};
use url::Url;

use crate::helpers::Profile;

#[test]
fn metadata_is_published_once() {
    let first = metadata_for::<Profile>() as *const _;
    let second = metadata_for::<Profile>() as *const _;
    assert!(std::ptr::eq(first, second));
}

#[test]
fn metadata_lists_fields_in_declaration_order() {
    let metadata = metadata_for::<Profile>();
    let names: Vec<&str> = metadata.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["name", "level"]);
    assert_eq!(metadata.fields()[0].json_name(), "Name");
    assert_eq!(metadata.fields()[0].kind(), FieldKind::Scalar);
}

#[test]
fn metadata_resolves_fields_by_json_name() {
    let metadata = metadata_for::<Profile>();
    let (index, field) = metadata.field_by_json_name("Level").unwrap();
    assert_eq!(index, 1);
    assert_eq!(field.name(), "level");
    assert!(metadata.field_by_json_name("level").is_none());
    assert!(metadata.field_by_json_name("Nope").is_none());
}

#[derive(Debug, Default)]
struct Raced {
    value: i64,
}

settrix::settings_schema!(Raced {
    scalar value = 1,
});

#[test]
fn concurrent_first_access_observes_one_record() {
    let addresses: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| metadata_for::<Raced>() as *const _ as usize))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
}

#[derive(Debug, Default)]
struct Clashing {
    first: i64,
    second: i64,
}

settrix::settings_schema!(Clashing {
    scalar first as "Same",
    scalar second as "Same",
});

#[test]
fn duplicate_json_names_make_the_type_unusable() {
    let problems = metadata_for::<Clashing>().error().unwrap().problems();
    assert!(problems.iter().any(|p| p.contains("duplicate JSON name `Same`")));

    let err = Clashing::construct().unwrap_err();
    assert!(err.is_configuration());
}

#[derive(Debug, Default)]
struct BadDefault {
    port: u32,
}

settrix::settings_schema!(BadDefault {
    scalar port = "eighty",
});

#[test]
fn uncoercible_default_literals_are_aggregated() {
    let problems = metadata_for::<BadDefault>().error().unwrap().problems();
    assert!(problems.iter().any(|p| p.contains("port")));
    assert!(problems.iter().any(|p| p.contains("eighty")));
}

#[derive(Debug)]
struct BareUri {
    site: Url,
}

impl Default for BareUri {
    fn default() -> Self {
        Self {
            site: Url::parse("http://localhost/").unwrap(),
        }
    }
}

settrix::settings_schema!(BareUri {
    scalar site,
});

#[test]
fn uri_fields_must_declare_a_default() {
    let problems = metadata_for::<BareUri>().error().unwrap().problems();
    assert!(problems.iter().any(|p| p.contains("declare a default")));
}

#[derive(Debug, Default)]
struct Misdeclared {
    inner: Profile,
}

impl Settings for Misdeclared {
    fn schema() -> Schema<Self> {
        Schema::new()
            .nested("inner", |s: &Self| &s.inner, |s: &mut Self| &mut s.inner)
            .default_literal(Literal::Int(1))
    }
}

#[test]
fn defaults_on_non_scalar_fields_are_rejected() {
    let problems = metadata_for::<Misdeclared>().error().unwrap().problems();
    assert!(
        problems
            .iter()
            .any(|p| p.contains("only scalar fields may declare a default"))
    );
}

#[derive(Debug, Default)]
struct CarriesClashing {
    child: Clashing,
}

settrix::settings_schema!(CarriesClashing {
    nested child,
});

#[test]
fn nested_problems_propagate_to_the_parent() {
    let problems = metadata_for::<CarriesClashing>().error().unwrap().problems();
    assert!(problems.iter().any(|p| p.contains("child")));
    assert!(problems.iter().any(|p| p.contains("not usable")));
}

#[test]
fn operations_on_unusable_types_fail_with_configuration_errors() {
    let err = Clashing::default().to_json().unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(err.module(), "schema");

    let mut instance = Clashing::default();
    let err = instance
        .apply_json(&crate::helpers::object(r#"{ "Same": 1 }"#))
        .unwrap_err();
    assert!(err.is_configuration());
}
