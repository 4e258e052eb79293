use apiware::ids::ReferenceId;
use apiware::reply::reply;
use apiware::{ErrorDetail, ErrorFormat, ResponsePolicy};
use serde_json::json;

mod common;
use common::init_tracing;

#[test]
fn text_error_carries_status_and_message() {
    let policy = ResponsePolicy::text();
    let res = policy.error((404, "no such pet"));
    assert_eq!(res.status, 404);
    assert_eq!(res.body.as_text(), Some("no such pet"));
    assert_eq!(res.reason_phrase(), "no such pet");
    assert_eq!(res.get_header("content-type"), Some("text/plain; charset=utf-8"));
}

#[test]
fn json_error_renders_envelope() {
    let policy = ResponsePolicy::json();
    let res = policy.error((404, "no such pet"));
    assert_eq!(res.status, 404);
    assert_eq!(
        res.body.as_json(),
        Some(&json!({ "status": 404, "message": "no such pet" }))
    );
    assert_eq!(res.get_header("content-type"), Some("application/json"));
}

#[test]
fn caught_error_defaults_to_400_with_its_message() {
    let policy = ResponsePolicy::text();
    let res = policy.error(ErrorDetail::caught(anyhow::anyhow!("boom")));
    assert_eq!(res.status, 400);
    assert_eq!(res.body.as_text(), Some("boom"));
    assert_eq!(res.reason_phrase(), "boom");
}

#[test]
fn caught_error_with_explicit_status() {
    let policy = ResponsePolicy::json();
    let res = policy.error(ErrorDetail::caught_with_status(503, anyhow::anyhow!("db down")));
    assert_eq!(res.status, 503);
    assert_eq!(
        res.body.as_json().unwrap()["message"],
        json!("db down")
    );
}

#[test]
fn masked_error_hides_message_behind_reference() {
    init_tracing();
    let policy = ResponsePolicy::text();
    let res = policy.masked_error((500, "db down"));

    assert_eq!(res.status, 500);
    let body = res.body.as_text().unwrap();
    assert!(!body.contains("db down"));

    let reference = body
        .strip_prefix("An error occurred. Reference: ")
        .expect("masked body shape");
    assert_eq!(reference.len(), 36);
    assert!(reference
        .chars()
        .all(|c| c == '-' || c.is_ascii_hexdigit()));
    reference
        .parse::<ReferenceId>()
        .expect("reference should be a well-formed id");
}

#[test]
fn masked_error_passes_status_through_below_500() {
    let policy = ResponsePolicy::json();
    let res = policy.masked_error((422, "field 'name' failed validation"));
    assert_eq!(res.status, 422);
    let message = res.body.as_json().unwrap()["message"].as_str().unwrap();
    assert!(!message.contains("validation"));
    assert!(message.starts_with("An error occurred. Reference: "));
}

#[test]
fn masked_references_are_fresh_per_call() {
    let policy = ResponsePolicy::text();
    let a = policy.masked_error((500, "x"));
    let b = policy.masked_error((500, "x"));
    assert_ne!(a.body.as_text(), b.body.as_text());
}

#[test]
fn error_format_parse_is_lenient() {
    assert_eq!(" JSON ".parse::<ErrorFormat>().unwrap(), ErrorFormat::Json);
    assert_eq!("json".parse::<ErrorFormat>().unwrap(), ErrorFormat::Json);
    assert_eq!("xml".parse::<ErrorFormat>().unwrap(), ErrorFormat::Text);
    assert_eq!("".parse::<ErrorFormat>().unwrap(), ErrorFormat::Text);
}

#[test]
fn reply_promotes_json_strings_and_keeps_text() {
    let res = reply(json!({ "a": 1 }));
    assert_eq!(res.body.as_json(), Some(&json!({ "a": 1 })));

    let res = reply("{\"a\": 1}");
    assert_eq!(res.body.as_json(), Some(&json!({ "a": 1 })));

    let res = reply("hello there");
    assert_eq!(res.body.as_text(), Some("hello there"));
    assert_eq!(res.status, 200);
}
