//! # apiware
//!
//! Reusable HTTP middleware helpers for request/response style web frameworks.
//!
//! apiware is not a server and not a router. It assumes a host framework that
//! already parses requests and dispatches routes, and plugs into that
//! framework's request lifecycle through a small projection layer:
//!
//! - **[`context`]** - [`RequestContext`] / [`Response`] projection types shared
//!   with the host framework adapter
//! - **[`pipeline`]** - ordered application of middleware around a terminal
//!   handler
//! - **[`middleware`]** - the middleware implementations: CORS negotiation,
//!   basic/bearer authentication, request logging, redirects and request guards
//! - **[`reply`]** - consistent error envelopes (text or JSON) with an optional
//!   masked mode that hides detail behind a reference ID
//! - **[`ids`]** - CSPRNG-backed UUIDv4 reference identifiers
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use apiware::middleware::CorsMiddleware;
//! use apiware::{Pipeline, RequestContext, Response};
//! use http::Method;
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.add_middleware(Arc::new(CorsMiddleware::simple("https://example.com")));
//!
//! let mut req = RequestContext::new(Method::GET, "/pets");
//! req.set_header("Origin", "https://example.com");
//! req.set_header("Host", "example.com");
//!
//! let res = pipeline.handle(&mut req, |_req| Response::json(200, serde_json::json!([])));
//! assert_eq!(res.status, 200);
//! assert!(res.get_header("Access-Control-Allow-Origin").is_some());
//! ```
//!
//! Each middleware either lets the request proceed to the next stage or
//! terminates it with a response of its own, never both. The only shared state
//! is the configuration captured at construction time; per-request decisions
//! are computed fresh and discarded with the response.

pub mod context;
pub mod ids;
pub mod middleware;
pub mod pipeline;
pub mod reply;

pub use context::{Body, HeaderVec, ParamVec, RequestContext, Response};
pub use middleware::Middleware;
pub use pipeline::Pipeline;
pub use reply::{ErrorDetail, ErrorFormat, ResponsePolicy};
