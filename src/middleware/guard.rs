use serde_json::Value;

use super::Middleware;
use crate::context::{RequestContext, Response};
use crate::reply::ResponsePolicy;

/// Rejects requests whose JSON body is missing or lacks required fields.
///
/// Error rendering (text or JSON) follows the supplied [`ResponsePolicy`].
pub struct JsonBodyGuard {
    required: Vec<String>,
    policy: ResponsePolicy,
}

impl JsonBodyGuard {
    /// Require only that a JSON object body is present
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            required: Vec::new(),
            policy,
        }
    }

    /// Additionally require the named top-level fields
    #[must_use]
    pub fn require<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(fields.into_iter().map(Into::into));
        self
    }
}

impl Middleware for JsonBodyGuard {
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        let body = match &req.body {
            Some(Value::Object(map)) => map,
            _ => return Some(self.policy.error((400, "No JSON body supplied."))),
        };

        let missing: Vec<&str> = self
            .required
            .iter()
            .filter(|field| !body.contains_key(field.as_str()))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            None
        } else {
            Some(
                self.policy
                    .error((400, format!("Missing parameters: {}", missing.join(", ")))),
            )
        }
    }
}

/// Validates a path parameter as a non-blank identifier and attaches it to
/// the request as `resource_id`.
pub struct IdGuard {
    parameter: String,
    policy: ResponsePolicy,
}

impl IdGuard {
    /// Guard the `id` path parameter
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            parameter: "id".to_string(),
            policy,
        }
    }

    /// Guard a differently named path parameter
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>) -> Self {
        self.parameter = name.into();
        self
    }
}

impl Middleware for IdGuard {
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        let raw = match req.get_param(&self.parameter) {
            Some(v) if !v.is_empty() => v,
            _ => return Some(self.policy.error((400, "No ID specified in URL."))),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            let message = format!("\"{raw}\" is an invalid ID.");
            return Some(self.policy.error((400, message)));
        }

        req.resource_id = Some(Value::String(trimmed.to_string()));
        None
    }
}

/// Validates a path parameter as a numeric identifier and attaches it to the
/// request as `resource_id`.
pub struct NumericIdGuard {
    parameter: String,
    policy: ResponsePolicy,
}

impl NumericIdGuard {
    /// Guard the `id` path parameter
    pub fn new(policy: ResponsePolicy) -> Self {
        Self {
            parameter: "id".to_string(),
            policy,
        }
    }

    /// Guard a differently named path parameter
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>) -> Self {
        self.parameter = name.into();
        self
    }
}

impl Middleware for NumericIdGuard {
    fn before(&self, req: &mut RequestContext) -> Option<Response> {
        let raw = match req.get_param(&self.parameter) {
            Some(v) if !v.is_empty() => v,
            _ => return Some(self.policy.error((400, "No ID specified in URL."))),
        };

        match raw.trim().parse::<i64>() {
            Ok(id) => {
                req.resource_id = Some(Value::from(id));
                None
            }
            Err(_) => {
                let message = format!("\"{raw}\" is an invalid numeric ID.");
                Some(self.policy.error((400, message)))
            }
        }
    }
}
