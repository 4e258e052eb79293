use std::time::Duration;

use tracing::{debug, info};

use super::Middleware;
use crate::context::{RequestContext, Response};

/// Emits one structured log line per request with method, path, status and
/// handler latency.
pub struct RequestLogMiddleware;

impl Middleware for RequestLogMiddleware {
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        debug!(method = %req.method, path = %req.path, "request received");
        None
    }

    fn after(&self, req: &RequestContext, res: &mut Response, latency: Duration) {
        info!(
            method = %req.method,
            path = %req.path,
            status = res.status,
            latency_ms = latency.as_millis() as u64,
            "request completed"
        );
    }
}

/// Logs every request header.
///
/// Useful for identifying headers injected by an API gateway or a downstream
/// proxy. Opt-in; not something to leave on in production.
pub struct HeaderDumpMiddleware;

impl Middleware for HeaderDumpMiddleware {
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        for (name, value) in &req.headers {
            info!(header = %name, value = %value, "request header");
        }
        None
    }
}
