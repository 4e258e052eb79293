use std::time::Duration;

use crate::context::{RequestContext, Response};

/// A stage in the request pipeline.
///
/// `before` runs ahead of the handler and may terminate the request by
/// returning a response; returning `None` passes control to the next stage.
/// The request is mutable so middleware can attach context (an authenticated
/// identity, a validated path ID) for downstream stages.
///
/// `after` runs once a response exists, in registration order, with the
/// measured handler latency (zero when a `before` hook terminated the
/// request).
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &mut RequestContext) -> Option<Response> {
        None
    }
    fn after(&self, _req: &RequestContext, _res: &mut Response, _latency: Duration) {}
}
