use std::sync::Arc;

use apiware::middleware::{
    normalize_headers, normalize_methods, CorsConfigError, CorsMiddleware, CorsMiddlewareBuilder,
    Middleware, OriginSpec, HTTP_METHODS,
};
use apiware::{Pipeline, Response};
use http::Method;

mod common;
use common::{init_tracing, request, request_with_headers};

#[test]
fn wildcard_prefers_localhost_origin() {
    let spec = OriginSpec::Any;
    let req = request_with_headers(Method::GET, "/", &[("Origin", "http://localhost:3000")]);
    assert_eq!(spec.resolve(&req).as_deref(), Some("http://localhost:3000"));
}

#[test]
fn wildcard_falls_back_to_referer_for_localhost() {
    let spec = OriginSpec::Any;
    let req = request_with_headers(
        Method::GET,
        "/",
        &[("Referer", "http://localhost:8080/app")],
    );
    assert_eq!(
        spec.resolve(&req).as_deref(),
        Some("http://localhost:8080/app")
    );
}

#[test]
fn wildcard_resolves_to_star_for_remote_origins() {
    let spec = OriginSpec::Any;
    let req = request_with_headers(Method::GET, "/", &[("Origin", "https://example.com")]);
    assert_eq!(spec.resolve(&req).as_deref(), Some("*"));

    // no declared origin at all
    let bare = request(Method::GET, "/");
    assert_eq!(spec.resolve(&bare).as_deref(), Some("*"));
}

#[test]
fn list_match_returns_configured_entry_case_preserved() {
    let spec = OriginSpec::List(vec![
        "Other.Example.Com".to_string(),
        "API.Example.Com".to_string(),
    ]);
    let req = request_with_headers(Method::GET, "/", &[("Host", "api.example.com")]);
    assert_eq!(spec.resolve(&req).as_deref(), Some("API.Example.Com"));
}

#[test]
fn list_without_match_returns_first_entry() {
    let spec = OriginSpec::List(vec![
        "  ".to_string(),
        "a.example.com".to_string(),
        "b.example.com".to_string(),
    ]);
    let req = request_with_headers(Method::GET, "/", &[("Host", "unknown.example.org")]);
    // blank entries are filtered before the first-entry fallback
    assert_eq!(spec.resolve(&req).as_deref(), Some("a.example.com"));
}

#[test]
fn empty_list_falls_back_to_request_host() {
    let spec = OriginSpec::List(vec![String::new()]);
    let req = request_with_headers(Method::GET, "/", &[("Host", "fallback.example.com")]);
    assert_eq!(spec.resolve(&req).as_deref(), Some("fallback.example.com"));

    let bare = request(Method::GET, "/");
    assert_eq!(spec.resolve(&bare), None);
}

#[test]
fn origin_list_containing_star_collapses_to_wildcard() {
    let spec = OriginSpec::from_origins(["https://example.com", "*"]);
    assert_eq!(spec, OriginSpec::Any);
}

#[test]
fn method_tokens_dedupe_case_insensitively_preserving_order() {
    let methods = normalize_methods(["get", "GET", "Post", "POST", "put", "get"]);
    assert_eq!(methods, vec!["GET", "POST", "PUT"]);
}

#[test]
fn header_tokens_dedupe_case_insensitively_preserving_order() {
    let headers = normalize_headers(["Content-Type", "content-type", "Accept", " ACCEPT "]);
    assert_eq!(headers, vec!["content-type", "accept"]);
}

#[test]
fn custom_method_tokens_are_accepted() {
    let methods = normalize_methods(["PURGE", "purge", "LINK"]);
    assert_eq!(methods, vec!["PURGE", "LINK"]);
}

#[test]
fn preflight_terminates_with_200_and_skips_handler() {
    init_tracing();
    let mut pipeline = Pipeline::new();
    pipeline.add_middleware(Arc::new(CorsMiddleware::simple("*")));

    let mut req = request_with_headers(
        Method::OPTIONS,
        "/pets",
        &[("Origin", "https://app.example.com")],
    );
    let mut handler_ran = false;
    let res = pipeline.handle(&mut req, |_req| {
        handler_ran = true;
        Response::status(204)
    });

    assert_eq!(res.status, 200);
    assert!(!handler_ran);
    assert_eq!(res.get_header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(
        res.get_header("Access-Control-Allow-Methods"),
        Some("GET, POST, PUT, PATCH, DELETE, OPTIONS")
    );
}

#[test]
fn preflight_method_check_is_case_insensitive() {
    let cors = CorsMiddleware::simple("*");
    let method = Method::from_bytes(b"options").unwrap();
    let mut req = request(method, "/pets");
    assert!(cors.before(&mut req).is_some());
}

#[test]
fn preflight_echoes_requested_headers() {
    let cors = CorsMiddleware::simple("*");
    let mut req = request_with_headers(
        Method::OPTIONS,
        "/pets",
        &[("Access-Control-Request-Headers", "X-One, x-two,X-One")],
    );
    let res = cors.before(&mut req).expect("preflight should terminate");
    assert_eq!(
        res.get_header("Access-Control-Allow-Headers"),
        Some("x-one, x-two")
    );
}

#[test]
fn simple_policy_decorates_ordinary_responses() {
    init_tracing();
    let mut pipeline = Pipeline::new();
    pipeline.add_middleware(Arc::new(CorsMiddleware::simple("*")));

    let mut req = request_with_headers(Method::GET, "/pets", &[("Origin", "https://example.com")]);
    let res = pipeline.handle(&mut req, |_req| {
        Response::json(200, serde_json::json!({ "pets": [] }))
    });

    assert_eq!(res.status, 200);
    assert_eq!(res.get_header("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(
        res.get_header("Access-Control-Allow-Headers"),
        Some("origin, x-requested-with, content-type, accept")
    );
}

#[test]
fn allow_all_echoes_request_header_names() {
    let cors = CorsMiddleware::allow_all("*");
    let mut req = request_with_headers(
        Method::GET,
        "/pets",
        &[
            ("Host", "api.example.com"),
            ("X-Custom-Thing", "1"),
            ("Accept", "application/json"),
        ],
    );
    let mut res = Response::status(200);
    cors.after(&req, &mut res, std::time::Duration::ZERO);

    let allowed = res.get_header("Access-Control-Allow-Headers").unwrap();
    assert!(allowed.contains("x-custom-thing"));
    assert!(allowed.contains("host"));
    assert!(allowed.contains("accept"));

    let methods = res.get_header("Access-Control-Allow-Methods").unwrap();
    for m in HTTP_METHODS {
        assert!(methods.contains(m), "missing method {m}");
    }
    // sanity-check that before() was not needed to decorate
    assert!(cors.before(&mut req).is_none());
}

#[test]
fn builder_defaults_build_cleanly() {
    let cors = CorsMiddlewareBuilder::new().build().unwrap();
    let mut req = request_with_headers(Method::OPTIONS, "/", &[]);
    let res = cors.before(&mut req).unwrap();
    assert_eq!(res.status, 200);
}

#[test]
fn builder_rejects_tokens_that_would_corrupt_headers() {
    let err = CorsMiddlewareBuilder::new()
        .allowed_origins(&["https://example.com, https://evil.com"])
        .build()
        .unwrap_err();
    assert!(matches!(err, CorsConfigError::InvalidOrigin { .. }));

    let err = CorsMiddlewareBuilder::new()
        .allowed_methods(&["GE T"])
        .build()
        .unwrap_err();
    assert!(matches!(err, CorsConfigError::InvalidMethodToken { .. }));

    let err = CorsMiddlewareBuilder::new()
        .allowed_headers(&["X Custom"])
        .build()
        .unwrap_err();
    assert!(matches!(err, CorsConfigError::InvalidHeaderToken { .. }));
}

#[test]
fn list_spec_flows_through_to_allow_origin_header() {
    let cors = CorsMiddleware::simple(vec![
        "api.example.com".to_string(),
        "other.example.com".to_string(),
    ]);
    let req = request_with_headers(
        Method::GET,
        "/",
        &[("Host", "OTHER.example.com"), ("Origin", "https://x.test")],
    );
    let mut res = Response::status(200);
    cors.after(&req, &mut res, std::time::Duration::ZERO);
    assert_eq!(
        res.get_header("Access-Control-Allow-Origin"),
        Some("other.example.com")
    );
}
