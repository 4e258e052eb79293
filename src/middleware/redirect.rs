use tracing::info;

use super::Middleware;
use crate::context::{RequestContext, Response};

/// Terminating middleware that redirects every request it sees.
///
/// The status code follows the `permanent`/`moved` flags:
///
/// | permanent | moved | status |
/// |-----------|-------|--------|
/// | false     | false | 307    |
/// | false     | true  | 303    |
/// | true      | false | 308    |
/// | true      | true  | 301    |
///
/// Relative locations are absolutized from the request's protocol and host;
/// `./`-style locations are resolved under the request path.
pub struct RedirectMiddleware {
    location: String,
    permanent: bool,
    moved: bool,
    log_redirects: bool,
}

impl RedirectMiddleware {
    /// Redirect to `location` with a temporary (307) status
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            permanent: false,
            moved: false,
            log_redirects: false,
        }
    }

    /// Mark the redirect permanent: clients should use the new location for
    /// all future requests (308, or 301 when also moved)
    #[must_use]
    pub fn permanent(mut self, permanent: bool) -> Self {
        self.permanent = permanent;
        self
    }

    /// Mark the destination as moved: clients should issue a GET against the
    /// new location (303, or 301 when also permanent)
    #[must_use]
    pub fn moved(mut self, moved: bool) -> Self {
        self.moved = moved;
        self
    }

    /// Log each redirect as it is issued
    #[must_use]
    pub fn log_redirects(mut self, log: bool) -> Self {
        self.log_redirects = log;
        self
    }

    fn status_code(&self) -> u16 {
        match (self.permanent, self.moved) {
            (true, true) => 301,
            (true, false) => 308,
            (false, true) => 303,
            (false, false) => 307,
        }
    }

    /// `scheme://` prefix with an alphanumeric/underscore scheme
    fn is_absolute(url: &str) -> bool {
        match url.split_once("://") {
            Some((scheme, _)) => {
                !scheme.is_empty()
                    && scheme
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        }
    }

    /// One or more leading dots followed by a slash (`./x`, `../x`)
    fn is_dot_relative(url: &str) -> bool {
        let rest = url.trim_start_matches('.');
        rest.len() < url.len() && rest.starts_with('/')
    }

    fn absolute_location(&self, req: &RequestContext) -> String {
        if Self::is_absolute(&self.location) {
            return self.location.clone();
        }

        let mut uri = format!("{}://{}", req.protocol, req.host().unwrap_or_default());
        if Self::is_dot_relative(&self.location) {
            uri.push_str(&req.path);
            uri.push('/');
            uri.push_str(&self.location);
        } else {
            uri.push('/');
            uri.push_str(self.location.trim_start_matches('/'));
        }
        uri
    }
}

impl Middleware for RedirectMiddleware {
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        let status = self.status_code();
        let location = self.absolute_location(req);

        if self.log_redirects {
            info!(
                method = %req.method,
                path = %req.path,
                location = %location,
                status,
                "redirect"
            );
        }

        let mut res = Response::status(status);
        res.set_header("Location", location);
        Some(res)
    }
}
