//! Consistent error replies, optionally masked behind a reference ID.
//!
//! A [`ResponsePolicy`] captures the rendering mode once at setup time and is
//! immutable afterwards; multiple independent policies can coexist. Each call
//! is stateless given that configuration.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde_json::{json, Value};
use tracing::{error, warn};

use crate::context::Response;
use crate::ids::ReferenceId;

/// Rendering mode for error envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorFormat {
    /// Plain text body carrying the message
    #[default]
    Text,
    /// JSON body `{"status": …, "message": …}`
    Json,
}

impl FromStr for ErrorFormat {
    type Err = std::convert::Infallible;

    /// Lenient parse: `json` (any case, surrounding whitespace ignored)
    /// selects JSON, everything else falls back to text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ErrorFormat::Json),
            _ => Ok(ErrorFormat::Text),
        }
    }
}

/// What went wrong, as an explicit tagged value.
///
/// Call sites either know the status and message outright, or they caught an
/// error value; there is no argument-shape sniffing to tell the two apart.
#[derive(Debug)]
pub enum ErrorDetail {
    /// Explicit status and message
    Status {
        /// HTTP status code
        status: u16,
        /// Client-facing message
        message: String,
    },
    /// A caught error; the status defaults to 400 when not supplied
    Caught {
        /// HTTP status code override
        status: Option<u16>,
        /// The underlying error; its message becomes the reply message
        source: anyhow::Error,
    },
}

impl ErrorDetail {
    /// Explicit status and message
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        ErrorDetail::Status {
            status,
            message: message.into(),
        }
    }

    /// A caught error with the default 400 status
    pub fn caught(source: impl Into<anyhow::Error>) -> Self {
        ErrorDetail::Caught {
            status: None,
            source: source.into(),
        }
    }

    /// A caught error with an explicit status
    pub fn caught_with_status(status: u16, source: impl Into<anyhow::Error>) -> Self {
        ErrorDetail::Caught {
            status: Some(status),
            source: source.into(),
        }
    }

    fn resolve(self) -> (u16, String) {
        match self {
            ErrorDetail::Status { status, message } => (status, message),
            ErrorDetail::Caught { status, source } => (status.unwrap_or(400), source.to_string()),
        }
    }
}

impl From<(u16, String)> for ErrorDetail {
    fn from((status, message): (u16, String)) -> Self {
        ErrorDetail::new(status, message)
    }
}

impl From<(u16, &str)> for ErrorDetail {
    fn from((status, message): (u16, &str)) -> Self {
        ErrorDetail::new(status, message)
    }
}

impl From<anyhow::Error> for ErrorDetail {
    fn from(source: anyhow::Error) -> Self {
        ErrorDetail::caught(source)
    }
}

/// Error reply engine.
///
/// The format is fixed at construction and applies to every error this policy
/// produces. Server-side incidents (status >= 500) are logged with full detail
/// regardless of what reaches the client.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponsePolicy {
    format: ErrorFormat,
}

impl ResponsePolicy {
    /// Create a policy with the given error format
    #[must_use]
    pub fn new(format: ErrorFormat) -> Self {
        Self { format }
    }

    /// Plain text error replies
    #[must_use]
    pub fn text() -> Self {
        Self::new(ErrorFormat::Text)
    }

    /// JSON error replies
    #[must_use]
    pub fn json() -> Self {
        Self::new(ErrorFormat::Json)
    }

    /// The configured format
    #[must_use]
    pub fn format(&self) -> ErrorFormat {
        self.format
    }

    /// Build an error response carrying the real status and message.
    ///
    /// The message doubles as the status-line reason. Status codes >= 500 emit
    /// a structured server-incident log entry.
    pub fn error(&self, detail: impl Into<ErrorDetail>) -> Response {
        let (status, message) = detail.into().resolve();
        if status >= 500 {
            error!(target: "server.incident", status, message = %message, "server error");
        }
        let mut res = match self.format {
            ErrorFormat::Json => {
                Response::json(status, json!({ "status": status, "message": message }))
            }
            ErrorFormat::Text => Response::text(status, message.clone()),
        };
        res.reason = Some(message);
        res
    }

    /// Build an error response that hides the real message behind a fresh
    /// [`ReferenceId`].
    ///
    /// The real status and message are logged server-side keyed by the
    /// reference; the client only sees `An error occurred. Reference: <id>`.
    /// The status code itself still passes through. If the random source
    /// fails, the reply degrades to the opaque message without a reference
    /// rather than failing the request.
    pub fn masked_error(&self, detail: impl Into<ErrorDetail>) -> Response {
        let (status, message) = detail.into().resolve();
        match ReferenceId::new() {
            Ok(reference) => {
                if status >= 500 {
                    error!(reference = %reference, status, message = %message, "masked server error");
                } else {
                    warn!(reference = %reference, status, message = %message, "masked error");
                }
                self.error((status, format!("An error occurred. Reference: {reference}")))
            }
            Err(e) => {
                error!(error = %e, "reference id generation failed, masking without reference");
                self.error((status, "An error occurred."))
            }
        }
    }
}

/// Dump arbitrary data into a 200 response.
///
/// Strings that parse as JSON are promoted to JSON bodies; other strings
/// become plain text; everything else is sent as JSON.
pub fn reply(data: impl Into<Value>) -> Response {
    match data.into() {
        Value::String(s) => match serde_json::from_str::<Value>(&s) {
            Ok(v) => Response::json(200, v),
            Err(_) => Response::text(200, s),
        },
        other => Response::json(200, other),
    }
}
