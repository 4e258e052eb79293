use std::fmt;

/// CORS configuration error
///
/// Returned by `CorsMiddlewareBuilder::build()` when a configured token could
/// not be emitted safely in a comma-separated allow header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfigError {
    /// An origin entry contains whitespace or a comma
    InvalidOrigin {
        /// The offending origin string
        origin: String,
    },
    /// A method token contains whitespace or a comma
    InvalidMethodToken {
        /// The offending method token
        token: String,
    },
    /// A header name contains whitespace or a comma
    InvalidHeaderToken {
        /// The offending header name
        token: String,
    },
}

impl fmt::Display for CorsConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorsConfigError::InvalidOrigin { origin } => {
                write!(
                    f,
                    "CORS configuration error: invalid origin '{origin}'. \
                    Origins must be single tokens without whitespace or commas."
                )
            }
            CorsConfigError::InvalidMethodToken { token } => {
                write!(
                    f,
                    "CORS configuration error: invalid method token '{token}'. \
                    Method tokens must not contain whitespace or commas."
                )
            }
            CorsConfigError::InvalidHeaderToken { token } => {
                write!(
                    f,
                    "CORS configuration error: invalid header name '{token}'. \
                    Header names must not contain whitespace or commas."
                )
            }
        }
    }
}

impl std::error::Error for CorsConfigError {}
