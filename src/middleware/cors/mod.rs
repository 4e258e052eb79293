mod builder;
mod error;

pub use builder::CorsMiddlewareBuilder;
pub use error::CorsConfigError;

use std::time::Duration;

use tracing::debug;

use crate::context::{RequestContext, Response};
use crate::middleware::Middleware;

/// The nine standard HTTP methods, as a convenience reference set.
/// Nothing here validates against it; caller-supplied tokens are accepted.
pub const HTTP_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// Methods allowed by [`CorsMiddleware::simple`]
pub const SIMPLE_METHODS: [&str; 6] = ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"];

/// Header set allowed by [`CorsMiddleware::simple`]
pub const COMMON_HEADERS: [&str; 4] = ["Origin", "X-Requested-With", "Content-Type", "Accept"];

/// Deduplicate method tokens, upper-cased, preserving first-seen order.
/// Blank tokens are dropped.
pub fn normalize_methods<I, S>(methods: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for m in methods {
        let m = m.as_ref().trim().to_ascii_uppercase();
        if m.is_empty() || out.iter().any(|seen| *seen == m) {
            continue;
        }
        out.push(m);
    }
    out
}

/// Deduplicate header tokens, lower-cased, preserving first-seen order.
/// Blank tokens are dropped.
pub fn normalize_headers<I, S>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for h in headers {
        let h = h.as_ref().trim().to_ascii_lowercase();
        if h.is_empty() || out.iter().any(|seen| *seen == h) {
            continue;
        }
        out.push(h);
    }
    out
}

/// Configured origin allow-list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginSpec {
    /// Wildcard: any origin, with a localhost dev bypass at resolution time
    Any,
    /// Ordered origin list, matched against the request `Host` header
    List(Vec<String>),
}

impl OriginSpec {
    /// Build a spec from configured origin strings. A list containing `*`
    /// collapses to [`OriginSpec::Any`].
    pub fn from_origins<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let origins: Vec<String> = origins.into_iter().map(Into::into).collect();
        if origins.iter().any(|o| o == "*") {
            OriginSpec::Any
        } else {
            OriginSpec::List(origins)
        }
    }

    /// Resolve the `Access-Control-Allow-Origin` value for a request.
    ///
    /// Wildcard specs prefer the request's own declared origin (or referer)
    /// when it mentions `localhost`, so a dev web server and API on separate
    /// local ports can talk to each other; otherwise they resolve to `*`.
    ///
    /// List specs match the request `Host` header case-insensitively against
    /// the configured entries (blank entries ignored) and return the matching
    /// entry as configured; with no match the first entry wins, and an empty
    /// list falls back to the request `Host` itself.
    ///
    /// Returns `None` only when there is nothing to say (empty list and no
    /// `Host` header); a missing request header never fails resolution.
    pub fn resolve(&self, req: &RequestContext) -> Option<String> {
        match self {
            OriginSpec::Any => {
                let declared = req.origin().or_else(|| req.referer());
                match declared {
                    Some(o) if o.contains("localhost") => Some(o.to_string()),
                    _ => Some("*".to_string()),
                }
            }
            OriginSpec::List(entries) => {
                let entries: Vec<&str> = entries
                    .iter()
                    .map(|e| e.trim())
                    .filter(|e| !e.is_empty())
                    .collect();
                if let Some(host) = req.host() {
                    if let Some(hit) = entries.iter().find(|e| e.eq_ignore_ascii_case(host)) {
                        return Some((*hit).to_string());
                    }
                }
                entries
                    .first()
                    .map(|e| (*e).to_string())
                    .or_else(|| req.host().map(str::to_string))
            }
        }
    }
}

impl From<&str> for OriginSpec {
    fn from(origin: &str) -> Self {
        OriginSpec::from_origins([origin])
    }
}

impl From<String> for OriginSpec {
    fn from(origin: String) -> Self {
        OriginSpec::from_origins([origin])
    }
}

impl From<Vec<String>> for OriginSpec {
    fn from(origins: Vec<String>) -> Self {
        OriginSpec::from_origins(origins)
    }
}

/// CORS negotiation middleware.
///
/// Computes `Access-Control-Allow-Origin/Methods/Headers` from the configured
/// allow-lists and the incoming request, answers preflight `OPTIONS` requests
/// directly, and decorates every other response with the allow headers.
///
/// Construct through [`CorsMiddleware::simple`], [`CorsMiddleware::allow_all`]
/// or the [`CorsMiddlewareBuilder`].
#[derive(Debug)]
pub struct CorsMiddleware {
    origins: OriginSpec,
    allowed_methods: Vec<String>,
    allowed_headers: Vec<String>,
    /// Allow-all mode: echo every request header name instead of the
    /// configured header list
    echo_request_headers: bool,
}

impl CorsMiddleware {
    /// Create a CORS middleware from explicit allow-lists.
    ///
    /// Methods are upper-cased and headers lower-cased, both deduplicated
    /// preserving first-seen order. Tokens are not validated against any
    /// fixed vocabulary.
    pub fn new<M, H, S, T>(origins: impl Into<OriginSpec>, methods: M, headers: H) -> Self
    where
        M: IntoIterator<Item = S>,
        H: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            origins: origins.into(),
            allowed_methods: normalize_methods(methods),
            allowed_headers: normalize_headers(headers),
            echo_request_headers: false,
        }
    }

    /// Simple policy: the configured origin(s), the standard write methods
    /// (`GET, POST, PUT, PATCH, DELETE, OPTIONS`) and the common header set
    /// (`Origin, X-Requested-With, Content-Type, Accept`).
    pub fn simple(origins: impl Into<OriginSpec>) -> Self {
        Self::new(origins, SIMPLE_METHODS, COMMON_HEADERS)
    }

    /// Permissive policy: the configured origin(s) (`"*"` for everything),
    /// every known HTTP method, and an echo of whatever header names the
    /// request carries.
    ///
    /// Intended for development and permissive internal deployments. Do not
    /// put this in front of a production API that carries secrets.
    pub fn allow_all(origins: impl Into<OriginSpec>) -> Self {
        Self {
            origins: origins.into(),
            allowed_methods: normalize_methods(HTTP_METHODS),
            allowed_headers: Vec::new(),
            echo_request_headers: true,
        }
    }

    /// Start building a CORS middleware with the default simple allow-lists
    #[must_use]
    pub fn builder() -> CorsMiddlewareBuilder {
        CorsMiddlewareBuilder::new()
    }

    pub(crate) fn from_parts(
        origins: OriginSpec,
        allowed_methods: Vec<String>,
        allowed_headers: Vec<String>,
        echo_request_headers: bool,
    ) -> Self {
        Self {
            origins,
            allowed_methods,
            allowed_headers,
            echo_request_headers,
        }
    }

    /// Header allow-list for this request: the request's own header names in
    /// echo mode, the configured list otherwise.
    fn headers_for(&self, req: &RequestContext) -> Vec<String> {
        if self.echo_request_headers {
            normalize_headers(req.headers.iter().map(|(k, _)| k.as_ref()))
        } else {
            self.allowed_headers.clone()
        }
    }

    fn apply_allow_headers(&self, req: &RequestContext, res: &mut Response) {
        if let Some(origin) = self.origins.resolve(req) {
            res.set_header("Access-Control-Allow-Origin", origin);
        }
        res.set_header(
            "Access-Control-Allow-Methods",
            self.allowed_methods.join(", "),
        );
        res.set_header(
            "Access-Control-Allow-Headers",
            self.headers_for(req).join(", "),
        );
    }
}

impl Middleware for CorsMiddleware {
    /// Answer preflight requests directly.
    ///
    /// For `OPTIONS` (case-insensitive) the middleware responds 200 with the
    /// negotiated allow headers and terminates the chain; a declared
    /// `Access-Control-Request-Headers` list overrides the configured header
    /// allow-list for that response. Other methods proceed.
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        if !req.method.as_str().eq_ignore_ascii_case("OPTIONS") {
            return None;
        }

        let mut res = Response::status(200);
        if let Some(origin) = self.origins.resolve(req) {
            res.set_header("Access-Control-Allow-Origin", origin);
        }
        res.set_header(
            "Access-Control-Allow-Methods",
            self.allowed_methods.join(", "),
        );
        let allowed = match req.get_header("access-control-request-headers") {
            Some(requested) => normalize_headers(requested.split(',')),
            None => self.headers_for(req),
        };
        res.set_header("Access-Control-Allow-Headers", allowed.join(", "));

        debug!(path = %req.path, "CORS preflight answered");
        Some(res)
    }

    /// Decorate non-preflight responses with the allow headers
    fn after(&self, req: &RequestContext, res: &mut Response, _latency: Duration) {
        // Preflight responses were fully populated in before()
        if req.method.as_str().eq_ignore_ascii_case("OPTIONS") {
            return;
        }
        self.apply_allow_headers(req, res);
    }
}
