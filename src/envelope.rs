use crate::Result;
use serde::Serialize;

/// Serializable success/error envelope.
///
/// Renders as `{"isError": false, "value": ...}` or
/// `{"isError": true, "error": "..."}`. Fields are private so an envelope can
/// only be built through [`ResultEnvelope::ok`], [`ResultEnvelope::err`] or
/// from a [`Result`], which keeps `error` and `value` mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope<T> {
    is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<T>,
}

impl<T> ResultEnvelope<T> {
    pub fn ok(value: T) -> Self {
        Self {
            is_error: false,
            error: None,
            value: Some(value),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            error: Some(message.into()),
            value: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Split back into a plain `Result` carrying the user-facing message.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.value, self.error) {
            (Some(value), None) => Ok(value),
            (_, Some(error)) => Err(error),
            (None, None) => Err("empty result".to_string()),
        }
    }
}

impl<T> From<Result<T>> for ResultEnvelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => Self::err(e.to_string()),
        }
    }
}
