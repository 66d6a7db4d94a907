use super::*;
use crate::{
    error::SchemaError,
    property::PropertyDescriptor,
    test_fixtures::{catalog, paths},
    value::Resource,
};
use classprop_schema::types::{Permission, parse_type_list};
use proptest::prelude::*;

fn prop(types: &str, body: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        "demo::Probe",
        "Probe",
        parse_type_list(types).unwrap(),
        Permission::ReadWrite,
        body,
    )
    .unwrap()
}

fn verify(body: &str, value: impl Into<Value>) -> Result<(), Error> {
    verify_property(&prop("mixed", body), &value.into())
}

fn class_of(body: &str, value: impl Into<Value>) -> Option<ErrorClass> {
    verify(body, value).err().map(|err| err.class())
}

fn message_of(body: &str, value: impl Into<Value>) -> String {
    verify(body, value).unwrap_err().to_string()
}

#[test]
fn chain_follows_tag_order_and_skips_unknown_tags() {
    let p = prop("int", "@default 3 @max 10 @identifier @min 1 @database-column id");
    let kinds: Vec<_> = Condition::build(&p)
        .unwrap()
        .iter()
        .map(|c| match c.rule() {
            Rule::UpperBound(_) => "max",
            Rule::LowerBound(_) => "min",
            _ => "other",
        })
        .collect();

    assert_eq!(kinds, vec!["max", "min"]);
}

#[test]
fn chain_stops_at_first_failure() {
    let err = verify("@max 5 @min 10", 3).unwrap_err();

    assert_eq!(err.to_string(), "3 is less than 10 for Probe");
    assert_eq!(message_of("@max 5 @min 10", 20), "20 is larger than 5 for Probe");
}

#[test]
fn numeric_rules_accept_numeric_text() {
    assert!(verify("@between 1 3", "2").is_ok());
    assert!(verify("@min 0", 0.5).is_ok());
    assert_eq!(message_of("@min 0", "-4"), "-4 is less than 0 for Probe");
}

#[test]
fn numeric_rules_flag_wrong_kinds_as_internal() {
    assert_eq!(class_of("@min 0", "abc"), Some(ErrorClass::InternalValidation));
    assert_eq!(class_of("@max 0", true), Some(ErrorClass::InternalValidation));
    assert_eq!(class_of("@between 0 1", Value::Null), Some(ErrorClass::InternalValidation));
    assert_eq!(
        message_of("@min 0", vec![1]),
        "Non-numeric value [1] was passed for Probe"
    );
    assert_eq!(message_of("@max 0", "x"), "Non-numeric value was passed for Probe");
}

#[test]
fn length_rules_count_chars_and_elements() {
    assert!(verify("@max-length 3", "äöü").is_ok());
    assert_eq!(
        message_of("@max-length 3", "abcd"),
        "abcd is longer than 3 characters for Probe"
    );
    assert_eq!(
        message_of("@max-length 1", vec![1, 2]),
        "Probe has more than 1 elements"
    );
    assert_eq!(
        message_of("@min-length 2", "a"),
        r#""a" is shorter than 2 characters for Probe"#
    );
    assert_eq!(
        message_of("@min-length 1", Value::from_map(Vec::<(&str, i32)>::new())),
        "Probe has fewer than 1 elements"
    );
}

#[test]
fn length_rules_skip_resources_and_reject_other_kinds() {
    assert!(verify("@max-length 0 @min-length 5 @not-empty", Resource::new(4)).is_ok());
    assert_eq!(class_of("@max-length 3", 12), Some(ErrorClass::InternalValidation));
    assert_eq!(
        message_of("@min-length 3", Value::empty_stream()),
        "Non-array, non-string value was passed for Probe"
    );
}

#[test]
fn not_empty_has_its_own_message() {
    assert_eq!(message_of("@not-empty", ""), "Probe was empty");
    assert_eq!(message_of("@not-empty", Vec::<i32>::new()), "Probe was empty");
    assert!(verify("@not-empty", "x").is_ok());
    assert_eq!(class_of("@not-empty", 0), Some(ErrorClass::InternalValidation));
}

#[test]
fn matches_decodes_a_json_pattern() {
    let body = r#"@matches "^[a-z]+\\d$""#;

    assert!(verify(body, "abc1").is_ok());
    assert_eq!(
        message_of(body, "ABC"),
        r#""ABC" did not match the required pattern /^[a-z]+\d$/ for Probe"#
    );
    assert_eq!(class_of(body, 5), Some(ErrorClass::InternalValidation));
}

#[test]
fn one_of_reads_the_whole_tag_value() {
    let body = r#"@one-of ["a", "b", "c"]"#;

    assert!(verify(body, "b").is_ok());
    assert_eq!(message_of(body, "d"), r#""d" was not one of a, b, c for Probe"#);
    assert_eq!(class_of(body, "d"), Some(ErrorClass::UserValidation));
}

#[test]
fn one_of_compares_loosely() {
    let body = "@one-of [1, 2.5, \"3\"]";

    assert!(verify(body, "1").is_ok());
    assert!(verify(body, 2.5).is_ok());
    assert!(verify(body, 3).is_ok());
    assert!(verify(body, 4).is_err());
}

#[test]
fn malformed_arguments_are_configuration_errors() {
    for body in [
        "@min",
        "@min abc",
        "@between 1",
        "@max-length -1",
        "@max-length 2.5",
        "@matches ^abc$",
        r#"@matches "(""#,
        "@one-of",
        "@one-of {\"a\": 1}",
    ] {
        let err = verify(body, 1).unwrap_err();
        assert!(
            matches!(err, Error::Schema(SchemaError::InvalidTagValue { .. })),
            "{body}: {err}"
        );
        assert_eq!(err.class(), ErrorClass::Configuration);
    }
}

#[test]
fn unsigned_is_min_zero() {
    assert!(verify("@unsigned", 0).is_ok());
    assert_eq!(message_of("@unsigned", -1), "-1 is less than 0 for Probe");
}

#[test]
fn tinyint_unsigned_boundaries() {
    let body = "@tinyint @unsigned";

    assert!(verify(body, 255).is_ok());
    assert!(verify(body, 256).is_err());
    assert!(verify(body, -1).is_err());
}

#[test]
fn int_width_bounds_match_the_presets() {
    assert_eq!(IntWidth::Tiny.bounds(false), (-128, 127));
    assert_eq!(IntWidth::Small.bounds(false), (-32_768, 32_767));
    assert_eq!(IntWidth::Medium.bounds(false), (-8_388_608, 8_388_607));
    assert_eq!(IntWidth::Int.bounds(false), (-2_147_483_647, 2_147_483_648));
    assert_eq!(IntWidth::Medium.bounds(true), (0, 16_777_215));
    assert_eq!(IntWidth::Int.bounds(true), (0, 4_294_967_295));
}

#[test]
fn mediumint_honours_unsigned_tag() {
    assert!(verify("@mediumint @unsigned", 16_777_215).is_ok());
    assert!(verify("@mediumint", 16_777_215).is_err());
    assert!(verify("@mediumint", -8_388_608).is_ok());
}

#[test]
fn condition_kinds_round_trip_their_tags() {
    for tag in [
        "max", "min", "between", "max-length", "min-length", "matches", "not-empty",
        "unsigned", "tinyint", "smallint", "mediumint", "int", "one-of",
    ] {
        let kind = ConditionKind::from_tag(tag).unwrap();
        assert_eq!(kind.to_string(), tag);
    }
    assert_eq!(ConditionKind::from_tag("default"), None);
}

#[test]
fn validate_uses_supplied_then_default_values() {
    let catalog = catalog();
    let mut values = BTreeMap::new();
    values.insert("Id".to_string(), Value::Int(1));
    values.insert("Name".to_string(), Value::from("Ann"));
    values.insert("Nickname".to_string(), Value::Null);
    values.insert("Email".to_string(), Value::from("ann@example.com"));
    values.insert("Age".to_string(), Value::Int(30));
    values.insert("Tags".to_string(), Value::from(vec!["a"]));
    values.insert("Joined".to_string(), Value::epoch());
    values.insert("Score".to_string(), Value::Int(5));
    values.insert("Password".to_string(), Value::from("long enough"));
    values.insert("Label".to_string(), Value::from("x"));

    catalog.validate(paths::USER, &values).unwrap();

    values.insert("Age".to_string(), Value::Int(-5));
    assert!(catalog.validate(paths::USER, &values).unwrap_err().is_user_facing());
}

#[test]
fn validate_reports_missing_values() {
    let catalog = catalog();
    let values = BTreeMap::from([("Id".to_string(), Value::Int(1))]);

    let err = catalog.validate(paths::USER, &values).unwrap_err();
    assert_eq!(err.to_string(), "Nickname was not set");
    assert!(err.is_user_facing());
}

#[test]
fn validate_one_checks_every_descriptor_with_the_name() {
    let catalog = catalog();

    assert!(catalog.validate_one(paths::USER, "Age", &Value::Int(10)).is_ok());
    assert!(catalog.validate_one(paths::USER, "Age", &Value::Int(200)).is_err());
    assert!(catalog.validate_one(paths::USER, "Ghost", &Value::Int(200)).is_ok());
    assert!(catalog.validate_one(paths::USER, "Age", &Value::Null).is_ok());

    // Admin's own Role is checked first, then the inherited one.
    assert!(catalog.validate_one(paths::ADMIN, "Role", &Value::from("admin")).is_ok());
    assert!(catalog.validate_one(paths::ADMIN, "Role", &Value::from("viewer")).is_err());
}

#[test]
fn validate_on_unknown_type_is_a_configuration_error() {
    let err = catalog()
        .validate("demo::Ghost", &BTreeMap::new())
        .unwrap_err();

    assert_eq!(err.class(), ErrorClass::Configuration);
}

proptest! {
    #[test]
    fn between_accepts_the_closed_range(
        (min, max) in (-1_000i64..1_000).prop_flat_map(|lo| (Just(lo), lo..lo + 1_000)),
        offset in 0i64..1_000,
    ) {
        let body = format!("@between {min} {max}");
        let inside = min + offset % (max - min + 1);

        prop_assert!(verify(&body, min).is_ok());
        prop_assert!(verify(&body, max).is_ok());
        prop_assert!(verify(&body, inside).is_ok());
        prop_assert!(verify(&body, min - 1).is_err());
        prop_assert!(verify(&body, max + 1).is_err());
    }

    #[test]
    fn min_and_max_are_inclusive(bound in -10_000i64..10_000, delta in 1i64..1_000) {
        let min = format!("@min {bound}");
        let max = format!("@max {bound}");

        prop_assert!(verify(&min, bound).is_ok());
        prop_assert!(verify(&min, bound + delta).is_ok());
        prop_assert_eq!(class_of(&min, bound - delta), Some(ErrorClass::UserValidation));
        prop_assert!(verify(&max, bound).is_ok());
        prop_assert!(verify(&max, bound - delta).is_ok());
        prop_assert_eq!(class_of(&max, bound + delta), Some(ErrorClass::UserValidation));
    }

    #[test]
    fn unsigned_presets_cover_full_byte_width(
        width in prop::sample::select(vec![
            ("tinyint", IntWidth::Tiny),
            ("smallint", IntWidth::Small),
            ("mediumint", IntWidth::Medium),
            ("int", IntWidth::Int),
        ]),
    ) {
        let (tag, width) = width;
        let top = (1i64 << (8 * width.bytes())) - 1;
        let body = format!("@{tag} @unsigned");

        prop_assert_eq!(width.bounds(true), (0, top));
        prop_assert!(verify(&body, 0).is_ok());
        prop_assert!(verify(&body, top).is_ok());
        prop_assert!(verify(&body, top + 1).is_err());
        prop_assert!(verify(&body, -1).is_err());

        let (lo, hi) = width.bounds(false);
        let signed = format!("@{tag}");
        prop_assert!(verify(&signed, lo).is_ok());
        prop_assert!(verify(&signed, hi).is_ok());
        prop_assert!(verify(&signed, lo - 1).is_err());
        prop_assert!(verify(&signed, hi + 1).is_err());
    }

    #[test]
    fn max_length_accepts_up_to_the_limit(limit in 0usize..20, len in 0usize..40) {
        let text = "x".repeat(len);
        let result = verify(&format!("@max-length {limit}"), text);

        prop_assert_eq!(result.is_ok(), len <= limit);
    }
}
