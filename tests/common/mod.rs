#![allow(dead_code)]

use apiware::RequestContext;
use http::Method;

/// Install a test subscriber so middleware log lines surface with --nocapture
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Build a bare request projection for the given method and path
pub fn request(method: Method, path: &str) -> RequestContext {
    RequestContext::new(method, path)
}

/// Build a request carrying the given headers
pub fn request_with_headers(method: Method, path: &str, headers: &[(&str, &str)]) -> RequestContext {
    let mut req = RequestContext::new(method, path);
    for (name, value) in headers {
        req.set_header(name, *value);
    }
    req
}
