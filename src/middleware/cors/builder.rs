use super::{
    normalize_headers, normalize_methods, CorsConfigError, CorsMiddleware, OriginSpec,
    COMMON_HEADERS, SIMPLE_METHODS,
};

/// Builder for [`CorsMiddleware`] with a fluent API.
///
/// Defaults match [`CorsMiddleware::simple`] with a wildcard origin: the
/// standard write methods and the common header set.
///
/// # Example
///
/// ```rust
/// use apiware::middleware::CorsMiddlewareBuilder;
///
/// let cors = CorsMiddlewareBuilder::new()
///     .allowed_origins(&["https://example.com", "https://api.example.com"])
///     .allowed_methods(&["GET", "POST", "PUT"])
///     .allowed_headers(&["Content-Type", "Authorization"])
///     .build()
///     .expect("invalid CORS configuration");
/// ```
pub struct CorsMiddlewareBuilder {
    origins: Vec<String>,
    methods: Vec<String>,
    headers: Vec<String>,
    echo_request_headers: bool,
}

impl CorsMiddlewareBuilder {
    /// Create a builder with the simple-policy defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            origins: vec!["*".to_string()],
            methods: SIMPLE_METHODS.iter().map(|m| (*m).to_string()).collect(),
            headers: COMMON_HEADERS.iter().map(|h| (*h).to_string()).collect(),
            echo_request_headers: false,
        }
    }

    /// Set the allowed origins. `"*"` anywhere in the list selects the
    /// wildcard spec (with its localhost dev bypass).
    pub fn allowed_origins(mut self, origins: &[&str]) -> Self {
        self.origins = origins.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Set the allowed method tokens. Any token is accepted; normalization
    /// upper-cases and deduplicates at build time.
    pub fn allowed_methods(mut self, methods: &[&str]) -> Self {
        self.methods = methods.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Set the allowed header names. Normalization lower-cases and
    /// deduplicates at build time.
    pub fn allowed_headers(mut self, headers: &[&str]) -> Self {
        self.headers = headers.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Echo every request header name instead of the configured header list
    /// (allow-all mode). Unsafe for production secrets-bearing APIs.
    pub fn echo_request_headers(mut self, echo: bool) -> Self {
        self.echo_request_headers = echo;
        self
    }

    /// Validate the configuration and build the middleware.
    ///
    /// Tokens are joined into comma-separated header values at request time,
    /// so a single configured token containing whitespace or a comma would
    /// corrupt the emitted header; those are rejected here.
    pub fn build(self) -> Result<CorsMiddleware, CorsConfigError> {
        for origin in &self.origins {
            let trimmed = origin.trim();
            if trimmed.contains(char::is_whitespace) || trimmed.contains(',') {
                return Err(CorsConfigError::InvalidOrigin {
                    origin: origin.clone(),
                });
            }
        }
        for method in &self.methods {
            let trimmed = method.trim();
            if trimmed.contains(char::is_whitespace) || trimmed.contains(',') {
                return Err(CorsConfigError::InvalidMethodToken {
                    token: method.clone(),
                });
            }
        }
        for header in &self.headers {
            let trimmed = header.trim();
            if trimmed.contains(char::is_whitespace) || trimmed.contains(',') {
                return Err(CorsConfigError::InvalidHeaderToken {
                    token: header.clone(),
                });
            }
        }

        Ok(CorsMiddleware::from_parts(
            OriginSpec::from_origins(self.origins),
            normalize_methods(self.methods),
            normalize_headers(self.headers),
            self.echo_request_headers,
        ))
    }
}

impl Default for CorsMiddlewareBuilder {
    fn default() -> Self {
        Self::new()
    }
}
