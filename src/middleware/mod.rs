//! Middleware implementations.
//!
//! Every middleware follows the same contract: `before` either lets the
//! request proceed (`None`) or terminates it with a response, and `after`
//! may decorate the outgoing response. See [`Middleware`].

mod auth;
mod core;
mod cors;
mod guard;
mod logging;
mod redirect;

pub use auth::{BasicAuthMiddleware, BasicVerifier, BearerAuthMiddleware, BearerVerifier};
pub use core::Middleware;
pub use cors::{
    normalize_headers, normalize_methods, CorsConfigError, CorsMiddleware, CorsMiddlewareBuilder,
    OriginSpec, COMMON_HEADERS, HTTP_METHODS, SIMPLE_METHODS,
};
pub use guard::{IdGuard, JsonBodyGuard, NumericIdGuard};
pub use logging::{HeaderDumpMiddleware, RequestLogMiddleware};
pub use redirect::RedirectMiddleware;
