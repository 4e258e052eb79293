use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;
use tracing::debug;

use super::Middleware;
use crate::context::{RequestContext, Response};

/// Decides whether a basic-auth credential pair is accepted
#[derive(Clone)]
pub enum BasicVerifier {
    /// Compare against static credentials
    Static {
        /// Expected username
        username: String,
        /// Expected password
        password: String,
    },
    /// Custom verification function over the decoded username and password
    Custom(Arc<dyn Fn(&str, &str) -> bool + Send + Sync>),
}

impl std::fmt::Debug for BasicVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasicVerifier::Static { username, .. } => f
                .debug_struct("Static")
                .field("username", username)
                .finish_non_exhaustive(),
            BasicVerifier::Custom(_) => write!(f, "Custom(<function>)"),
        }
    }
}

/// HTTP Basic authentication middleware.
///
/// Parses `Authorization: Basic <base64(user:pass)>`, verifies the decoded
/// pair and attaches the username as the request identity on a grant. Any
/// parse failure or mismatch terminates the request with 401 and a
/// `WWW-Authenticate: Basic realm=<host>` challenge.
///
/// # Example
///
/// ```rust
/// use apiware::middleware::BasicAuthMiddleware;
///
/// // Static credentials
/// let auth = BasicAuthMiddleware::new("svc", "hunter2");
///
/// // Custom verification
/// let auth = BasicAuthMiddleware::with_verifier(|user, pass| {
///     user == "svc" && pass.len() >= 8
/// });
/// ```
pub struct BasicAuthMiddleware {
    verifier: BasicVerifier,
}

impl BasicAuthMiddleware {
    /// Compare submitted credentials against a static username and password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            verifier: BasicVerifier::Static {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    /// Verify submitted credentials with a custom function.
    /// The function receives the decoded username and password in plain text.
    pub fn with_verifier<F>(verifier: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Self {
            verifier: BasicVerifier::Custom(Arc::new(verifier)),
        }
    }

    /// Decode the credential pair from the Authorization header value:
    /// last whitespace-separated token, base64, exactly one `:` separator.
    fn decode_credentials(header: &str) -> Option<(String, String)> {
        let encoded = header.split_whitespace().last()?;
        if encoded.is_empty() {
            return None;
        }
        let decoded = general_purpose::STANDARD.decode(encoded).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let parts: Vec<&str> = decoded.split(':').collect();
        if parts.len() != 2 {
            return None;
        }
        Some((parts[0].to_string(), parts[1].to_string()))
    }

    fn challenge(&self, req: &RequestContext) -> Response {
        let realm = req.host().unwrap_or("restricted");
        let mut res = Response::status(401);
        res.set_header("WWW-Authenticate", format!("Basic realm={realm}"));
        res
    }
}

impl Middleware for BasicAuthMiddleware {
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        let header = match req.get_header("authorization") {
            Some(h) => h,
            None => {
                debug!("basic auth denied: missing Authorization header");
                return Some(self.challenge(req));
            }
        };

        let (user, pass) = match Self::decode_credentials(header) {
            Some(parts) => parts,
            None => {
                debug!("basic auth denied: malformed credentials");
                return Some(self.challenge(req));
            }
        };

        let granted = match &self.verifier {
            BasicVerifier::Static { username, password } => user == *username && pass == *password,
            BasicVerifier::Custom(verify) => verify(&user, &pass),
        };

        if granted {
            req.identity = Some(Value::String(user));
            None
        } else {
            debug!("basic auth denied: credentials rejected");
            Some(self.challenge(req))
        }
    }
}

/// Decides whether a bearer token is accepted
#[derive(Clone)]
pub enum BearerVerifier {
    /// Compare against a static token
    Static {
        /// Expected token value
        token: String,
        /// Literal comparison when `true`, ASCII case-insensitive otherwise
        case_sensitive: bool,
    },
    /// Custom verification function; `Some` grants and the returned value
    /// becomes the authenticated identity
    Custom(Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>),
}

impl std::fmt::Debug for BearerVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BearerVerifier::Static { case_sensitive, .. } => f
                .debug_struct("Static")
                .field("case_sensitive", case_sensitive)
                .finish_non_exhaustive(),
            BearerVerifier::Custom(_) => write!(f, "Custom(<function>)"),
        }
    }
}

/// Bearer token authentication middleware.
///
/// Strips a case-insensitive `bearer` prefix from the `Authorization` header
/// and verifies the remaining token. A grant attaches the identity to the
/// request; a deny terminates with a plain 401.
///
/// # Example
///
/// ```rust
/// use apiware::middleware::BearerAuthMiddleware;
///
/// let auth = BearerAuthMiddleware::new("123myToken456");
///
/// // Token database lookup
/// let auth = BearerAuthMiddleware::with_verifier(|token| {
///     (token == "123myToken456").then(|| serde_json::json!({ "user": "svc" }))
/// });
/// ```
pub struct BearerAuthMiddleware {
    verifier: BearerVerifier,
}

impl BearerAuthMiddleware {
    /// Compare submitted tokens literally against a static token
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            verifier: BearerVerifier::Static {
                token: token.into(),
                case_sensitive: true,
            },
        }
    }

    /// Toggle case-sensitive comparison for a static token.
    /// Ignored for custom verifiers.
    #[must_use]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        if let BearerVerifier::Static {
            case_sensitive: ref mut flag,
            ..
        } = self.verifier
        {
            *flag = case_sensitive;
        }
        self
    }

    /// Verify submitted tokens with a custom function. The returned value
    /// becomes the authenticated identity on a grant.
    pub fn with_verifier<F>(verifier: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            verifier: BearerVerifier::Custom(Arc::new(verifier)),
        }
    }

    /// Strip an optional case-insensitive `bearer` prefix plus surrounding
    /// whitespace. Headers without the prefix are used as-is.
    fn strip_bearer_prefix(header: &str) -> &str {
        let trimmed = header.trim_start();
        match trimmed.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("bearer") => trimmed[6..].trim_start(),
            _ => trimmed,
        }
    }
}

impl Middleware for BearerAuthMiddleware {
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        let header = match req.get_header("authorization") {
            Some(h) => h,
            None => {
                debug!("bearer auth denied: missing Authorization header");
                return Some(Response::status(401));
            }
        };
        let input = Self::strip_bearer_prefix(header);

        match &self.verifier {
            BearerVerifier::Static {
                token,
                case_sensitive,
            } => {
                let matches = if *case_sensitive {
                    input == token
                } else {
                    input.eq_ignore_ascii_case(token)
                };
                if matches {
                    req.identity = Some(Value::String(token.clone()));
                    None
                } else {
                    debug!("bearer auth denied: token mismatch");
                    Some(Response::status(401))
                }
            }
            BearerVerifier::Custom(verify) => match verify(input) {
                Some(identity) => {
                    req.identity = Some(identity);
                    None
                }
                None => {
                    debug!("bearer auth denied: verifier rejected token");
                    Some(Response::status(401))
                }
            },
        }
    }
}
