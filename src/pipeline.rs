//! Ordered middleware application around a terminal handler.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::context::{RequestContext, Response};
use crate::middleware::Middleware;

/// Applies an ordered middleware list around a terminal handler.
///
/// `before` hooks run in registration order; the first one that returns a
/// response terminates the request and the handler is never invoked. `after`
/// hooks run in registration order for every response, including terminated
/// ones, with the measured handler latency (zero for terminated requests).
#[derive(Clone, Default)]
pub struct Pipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Pipeline {
    /// Create an empty pipeline
    #[must_use]
    pub fn new() -> Self {
        Self {
            middlewares: Vec::new(),
        }
    }

    /// Add middleware to the pipeline. Middleware runs in the order it is added.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Number of registered middleware
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether the pipeline has no middleware
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run a request through the pipeline.
    ///
    /// The handler is the continuation: it runs exactly once unless a
    /// middleware terminated the request first.
    pub fn handle<F>(&self, req: &mut RequestContext, handler: F) -> Response
    where
        F: FnOnce(&RequestContext) -> Response,
    {
        let mut early: Option<Response> = None;
        for (idx, mw) in self.middlewares.iter().enumerate() {
            if let Some(resp) = mw.before(req) {
                debug!(
                    middleware_idx = idx,
                    middleware_name = std::any::type_name_of_val(mw.as_ref()),
                    status = resp.status,
                    "middleware terminated request"
                );
                early = Some(resp);
                break;
            }
        }

        let (mut resp, latency) = match early {
            Some(r) => (r, Duration::from_millis(0)),
            None => {
                debug!(method = %req.method, path = %req.path, "request dispatched to handler");
                let start = Instant::now();
                let r = handler(req);
                (r, start.elapsed())
            }
        };

        for mw in &self.middlewares {
            mw.after(req, &mut resp, latency);
        }

        resp
    }
}
