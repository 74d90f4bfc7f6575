//! End-to-End Coercion Tests
//!
//! Scenario tests for the public surface: whole-document repair, nested
//! schemas, composed pipes, custom pipes, and the strict/repair split.

use refix::{
    array, boolean, fix, join, lower, number, parse, pipe, repair, schema, string, trim, upper,
    Pipe, PipeError, PipeOptions, Schema,
};
use serde_json::{json, Value};

// =============================================================================
// Whole-Document Repair
// =============================================================================

/// A representative untrusted payload comes back fully shaped: absent
/// fields defaulted, loose types coerced, undeclared fields dropped.
#[test]
fn test_general_document_repair() {
    let data = json!({
        "name": "Stephen",
        "lastName": "King",
        "age": "75",
        "isMarried": 1,
        "children": ["Joe Hill", "Owen King", "Naomi King"],
        "address": {
            "street": "107-211 Parkview Ave, Bangor, ME 04401, USA",
            "city": "Portland",
            "state": "Oregon"
        },
        "books": [
            { "title": "The Stand", "year": 1978, "id": "isbn-9781444720730" },
            { "title": "Salem's lot", "year": "1975", "id": "isbn-0385007515" }
        ],
        "metadata": "please ignore me"
    });

    let book = Schema::record([
        ("title", Schema::from(string())),
        ("year", Schema::from(number())),
        ("id", Schema::from(join([string(), upper()]))),
    ]);
    let shape = Schema::record([
        ("name", Schema::from(string())),
        ("middleName", Schema::from(string())),
        ("lastName", Schema::from(string())),
        ("age", Schema::from(number())),
        ("isMarried", Schema::from(boolean())),
        ("children", Schema::from(array().of(string()))),
        (
            "address",
            Schema::from(schema(Schema::record([
                ("street", string()),
                ("city", string()),
                ("state", string()),
            ]))),
        ),
        ("books", Schema::from(array().of(&book))),
    ]);

    let fixed = repair(&data, &shape);
    assert_eq!(
        fixed,
        json!({
            "name": "Stephen",
            "middleName": "",
            "lastName": "King",
            "age": 75,
            "isMarried": true,
            "children": ["Joe Hill", "Owen King", "Naomi King"],
            "address": {
                "street": "107-211 Parkview Ave, Bangor, ME 04401, USA",
                "city": "Portland",
                "state": "Oregon"
            },
            "books": [
                { "title": "The Stand", "year": 1978, "id": "ISBN-9781444720730" },
                { "title": "Salem's lot", "year": 1975, "id": "ISBN-0385007515" }
            ]
        })
    );
}

/// Every leaf of a hopeless document resolves to its default.
#[test]
fn test_hopeless_document_repair() {
    let data = json!({
        "name": 125.48,
        "pseudonym": 78945,
        "age": "old",
        "single": 1,
        "location": 102,
        "novels": [
            { "title": "Book 1", "year": 2011 },
            { "title": "Book 2", "year": 2012 }
        ]
    });

    let shape = Schema::record([
        ("name", Schema::from(string().coerce(false))),
        ("pseudonym", Schema::from(join([lower(), trim()]))),
        ("age", Schema::from(number())),
        ("single", Schema::from(boolean().coerce(false))),
        (
            "location",
            Schema::from(schema(Schema::record([
                ("latitude", number()),
                ("longitude", number()),
            ]))),
        ),
        ("novels", Schema::from(array().of(string()))),
    ]);

    assert_eq!(
        repair(&data, &shape),
        json!({
            "name": "",
            "pseudonym": "",
            "age": 0,
            "single": false,
            "location": { "latitude": 0, "longitude": 0 },
            "novels": ["", ""]
        })
    );
}

/// Non-record input against a record schema still yields a shaped result.
#[test]
fn test_scalar_against_record() {
    let shape = Schema::record([("id", string())]);
    for value in [json!(100), json!(true), json!("lorem ipsum")] {
        assert_eq!(repair(&value, &shape), json!({ "id": "" }));
    }

    let defaulted = Schema::record([
        ("name", string().default_value("John")),
        ("age", number().default_value(35)),
    ]);
    assert_eq!(
        repair(&json!(100), &defaulted),
        json!({ "name": "John", "age": 35 })
    );
}

// =============================================================================
// Nested Schemas
// =============================================================================

/// Nested schema pipes fill defaults below missing branches.
#[test]
fn test_nested_schema_defaults() {
    let data = json!({
        "name": "John Smith",
        "address": {
            "street": "Clover alley, 123",
            "postalCode": 35000
        }
    });

    let shape = Schema::record([
        ("name", Schema::from(string())),
        (
            "address",
            Schema::from(schema(Schema::record([
                ("street", string()),
                ("postalCode", string()),
                ("city", string().default_value("Portland")),
            ]))),
        ),
    ]);

    assert_eq!(
        repair(&data, &shape),
        json!({
            "name": "John Smith",
            "address": {
                "street": "Clover alley, 123",
                "postalCode": "35000",
                "city": "Portland"
            }
        })
    );
}

/// schema() wraps scalars and composed pipes alike.
#[test]
fn test_schema_wrapper_scalars() {
    assert_eq!(fix(&json!(100), schema(string())).unwrap(), json!("100"));
    assert_eq!(fix(&Value::Null, schema(string())).unwrap(), json!(""));
    assert_eq!(
        fix(&json!("hello there!"), schema(string())).unwrap(),
        json!("hello there!")
    );
    assert_eq!(
        fix(
            &json!("   Hello there!   "),
            schema(join([string(), trim(), lower()]))
        )
        .unwrap(),
        json!("hello there!")
    );
    assert_eq!(fix(&json!("100"), schema(number())).unwrap(), json!(100));
    assert_eq!(fix(&Value::Null, schema(number())).unwrap(), json!(0));
}

// =============================================================================
// Strict Mode
// =============================================================================

/// Strict fixing surfaces the diagnostics repair would hide.
#[test]
fn test_strict_fix_reports_paths() {
    let shape = Schema::record([
        ("name", Schema::from(string().coerce(false))),
        ("age", Schema::from(number())),
    ]);
    let err = fix(&json!({ "name": 125.48, "age": "old" }), &shape).unwrap_err();

    let report = serde_json::to_value(err.errors()).unwrap();
    assert_eq!(
        report,
        json!([
            { "path": "name", "error": "not a string" },
            { "path": "age", "error": "not a number" }
        ])
    );
}

/// Scenario triple: strict error, repair default, parse diagnostics.
#[test]
fn test_strict_and_repair_faces_agree_on_shape() {
    let p = string().coerce(false);
    assert!(fix(&json!(true), p.clone()).is_err());
    assert_eq!(repair(&json!(true), p.clone()), json!(""));

    let (fixed, errors) = parse(&json!(true), p);
    assert_eq!(fixed, json!(true));
    assert_eq!(errors[0].error, PipeError::reason("not a string"));
}

// =============================================================================
// Defaults and Required
// =============================================================================

#[test]
fn test_default_substitution() {
    assert_eq!(fix(&Value::Null, string()).unwrap(), json!(""));
    assert_eq!(
        fix(&Value::Null, string().default_value("John Smith")).unwrap(),
        json!("John Smith")
    );
    assert_eq!(
        fix(&json!(""), number().default_value(100)).unwrap(),
        json!(100)
    );
    assert_eq!(fix(&Value::Null, boolean().default_value(true)).unwrap(), json!(true));
}

#[test]
fn test_required_rejects_absent() {
    for value in [Value::Null, json!("")] {
        let err = fix(&value, string().required(true).default_value("x")).unwrap_err();
        assert_eq!(err.errors()[0].error, PipeError::reason("required"));
    }
}

// =============================================================================
// Custom Pipes
// =============================================================================

fn floor() -> Pipe {
    pipe(
        |value: &Value, _config, _ctx| match value.as_f64() {
            Some(float) => Ok(json!(float.floor() as i64)),
            None => Err(PipeError::reason("not a number")),
        },
        PipeOptions::new().default_value(0),
    )
    .named("floor")
}

#[test]
fn test_custom_pipe_in_a_join() {
    assert_eq!(fix(&json!("105.48"), join([number(), floor()])).unwrap(), json!(105));
    // Without the number() step the string never becomes a number.
    assert_eq!(repair(&json!("105.48"), floor()), json!(0));
}

#[test]
fn test_custom_pipe_with_validation() {
    let color = pipe(
        |value: &Value, _config, _ctx| match value.as_str() {
            Some(text)
                if text.len() == 7
                    && text.starts_with('#')
                    && text[1..].chars().all(|c| c.is_ascii_hexdigit()) =>
            {
                Ok(Value::String(text.to_string()))
            }
            _ => Err(PipeError::reason("not a color")),
        },
        PipeOptions::new(),
    )
    .named("color");

    assert_eq!(
        fix(&json!("#ab783F"), join([upper(), trim(), color.clone()])).unwrap(),
        json!("#AB783F")
    );
    assert!(fix(&json!("red"), color).is_err());
}

// =============================================================================
// Alias Shorthand
// =============================================================================

#[test]
fn test_alias_shorthand_in_records() {
    let shape = Schema::record([
        ("name", Schema::alias("string")),
        ("age", Schema::alias("number")),
        ("tags", Schema::alias("string[]")),
    ]);
    assert_eq!(
        repair(&json!({ "name": 1, "age": "36", "tags": [1, true] }), &shape),
        json!({ "name": "1", "age": 36, "tags": ["1", "true"] })
    );
}

#[test]
fn test_unrecognized_alias_reported() {
    let (_, errors) = parse(&json!({ "id": "x" }), Schema::record([("id", "uuid")]));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, "id");
    assert_eq!(errors[0].error, PipeError::reason("unrecognized uuid pipe"));
}
