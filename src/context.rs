//! Request/response projection shared with the host framework.
//!
//! The host framework owns request parsing and response transmission; this
//! module only defines the read/write views middleware operate on. An adapter
//! for a concrete framework fills a [`RequestContext`] from the incoming
//! request and writes a [`Response`] back out through the framework's own
//! status/header/body primitives.

use std::sync::Arc;

use http::{Method, StatusCode};
use serde_json::Value;
use smallvec::SmallVec;

/// Maximum inline headers before heap allocation.
/// Most requests carry well under 16 headers.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Maximum inline path parameters before heap allocation
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated header storage.
///
/// Header names use `Arc<str>` because names repeat heavily across requests
/// (Content-Type, Authorization, ...) and `Arc::clone` is O(1); values are
/// per-request data and stay `String`.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Stack-allocated path parameter storage
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Read-only projection of an incoming request.
///
/// Built once per request by the host framework adapter. The only fields
/// middleware write to are `identity` (attached by auth middleware on a
/// successful grant) and `resource_id` (attached by the ID guards after
/// validating a path parameter).
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method (GET, POST, ...)
    pub method: Method,
    /// Request path
    pub path: String,
    /// Request scheme as reported by the host framework ("http" or "https")
    pub protocol: String,
    /// Path parameters extracted by the host framework's router
    pub path_params: ParamVec,
    /// Request headers; lookups are case-insensitive
    pub headers: HeaderVec,
    /// Parsed JSON body, when the host framework parsed one
    pub body: Option<Value>,
    /// Authenticated principal attached by auth middleware
    pub identity: Option<Value>,
    /// Validated path identifier attached by the ID guards
    pub resource_id: Option<Value>,
}

impl RequestContext {
    /// Create an empty request projection for the given method and path.
    /// Protocol defaults to `http`; adapters overwrite it for TLS requests.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            protocol: "http".to_string(),
            path_params: ParamVec::new(),
            headers: HeaderVec::new(),
            body: None,
            identity: None,
            resource_id: None,
        }
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header (case-insensitive on the name)
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    /// Get a path parameter by name
    #[inline]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a path parameter
    pub fn set_param(&mut self, name: &str, value: impl Into<String>) {
        self.path_params.retain(|(k, _)| k.as_ref() != name);
        self.path_params.push((Arc::from(name), value.into()));
    }

    /// The declared `Origin` header, if any
    #[inline]
    pub fn origin(&self) -> Option<&str> {
        self.get_header("origin")
    }

    /// The declared `Referer` header, if any
    #[inline]
    pub fn referer(&self) -> Option<&str> {
        self.get_header("referer")
    }

    /// The declared `Host` header, if any
    #[inline]
    pub fn host(&self) -> Option<&str> {
        self.get_header("host")
    }

    /// Absolute URL for `route` rooted at this request's host.
    ///
    /// `force_tls` pins the scheme to `https` regardless of the request
    /// protocol, for deployments that terminate TLS upstream.
    pub fn base_url(&self, route: &str, force_tls: bool) -> String {
        let scheme = if force_tls { "https" } else { &self.protocol };
        let host = self.host().unwrap_or_default();
        if route.starts_with('/') {
            format!("{scheme}://{host}{route}")
        } else {
            format!("{scheme}://{host}/{route}")
        }
    }

    /// Absolute URL for `route` appended to this request's path
    pub fn relative_url(&self, route: &str, force_tls: bool) -> String {
        let scheme = if force_tls { "https" } else { &self.protocol };
        let host = self.host().unwrap_or_default();
        format!("{scheme}://{host}{}{route}", self.path)
    }
}

/// Response body payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    /// No body (status-only responses, redirects, preflight)
    #[default]
    Empty,
    /// Plain text body
    Text(String),
    /// JSON body
    Json(Value),
}

impl Body {
    /// Borrow the body as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Borrow the body as JSON, if it is JSON
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// Response under construction.
///
/// Middleware and handlers build these; the host framework adapter turns them
/// into a wire response. `reason` overrides the status-line message; when it is
/// `None` the canonical phrase for the status code applies.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Status-line reason override; canonical phrase when `None`
    pub reason: Option<String>,
    /// Response headers
    pub headers: HeaderVec,
    /// Response body
    pub body: Body,
}

impl Response {
    /// Create a response from parts
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Body) -> Self {
        Self {
            status,
            reason: None,
            headers,
            body,
        }
    }

    /// Create a status-only response with no body
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self::new(status, HeaderVec::new(), Body::Empty)
    }

    /// Create a plain text response
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "text/plain; charset=utf-8".to_string()));
        Self::new(status, headers, Body::Text(body.into()))
    }

    /// Create a JSON response
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self::new(status, headers, Body::Json(body))
    }

    /// Get a header by name (case-insensitive)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header (case-insensitive on the name)
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    /// The status-line message: the override if one was set, otherwise the
    /// canonical reason phrase for the status code, otherwise empty.
    #[must_use]
    pub fn reason_phrase(&self) -> &str {
        if let Some(reason) = &self.reason {
            return reason.as_str();
        }
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("")
    }
}
