//! The single failure type surfaced by every operation, and the translation
//! from HTTP outcomes into it.

use std::fmt;

use serde::Deserialize;

use crate::models::MappingError;
use crate::scope::Scope;
use crate::transport::{ApiResponse, TransportError};

/// Why an operation attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The token lacks the scope; detected locally, nothing was sent.
    InsufficientScope,
    /// 401: credentials rejected.
    Unauthorized,
    /// 403, or a 401 blaming a scope: the server disagrees with the local grant.
    Forbidden,
    /// 404. Some flows use it to mean "not following" or "not subscribed".
    NotFound,
    /// 429.
    RateLimited,
    /// 5xx.
    ServerError,
    /// Any other 4xx, e.g. 422 for a commercial the channel cannot run, or an
    /// argument rejected before sending.
    BadRequest,
    /// The response arrived but did not have the documented shape.
    MalformedResponse,
    /// No response at all.
    Transport,
}

impl ErrorKind {
    /// Classify a non-success HTTP status. Returns `None` for 1xx-3xx.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(ErrorKind::Unauthorized),
            403 => Some(ErrorKind::Forbidden),
            404 => Some(ErrorKind::NotFound),
            429 => Some(ErrorKind::RateLimited),
            400..=499 => Some(ErrorKind::BadRequest),
            500..=599 => Some(ErrorKind::ServerError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InsufficientScope => "insufficient scope",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not found",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::ServerError => "server error",
            ErrorKind::BadRequest => "bad request",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::Transport => "transport failure",
        };
        f.write_str(name)
    }
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of one operation attempt.
///
/// Constructed where the failure is detected and never modified afterwards.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed ({kind}): {message}")]
pub struct KrakenError {
    kind: ErrorKind,
    status: Option<u16>,
    message: String,
    operation: &'static str,
    #[source]
    source: Option<BoxedSource>,
}

/// Error document the Kraken API returns alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl KrakenError {
    fn new(kind: ErrorKind, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            operation,
            source: None,
        }
    }

    pub fn insufficient_scope(operation: &'static str, required: Scope) -> Self {
        Self::new(
            ErrorKind::InsufficientScope,
            operation,
            format!("access token was not granted the `{required}` scope"),
        )
    }

    /// The server does not accept the token at all.
    pub fn unauthorized(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, operation, message)
    }

    /// A lookup found nothing without the server answering 404.
    pub fn not_found(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, operation, message)
    }

    /// A caller argument rejected locally; nothing was sent.
    pub fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, operation, message)
    }

    pub fn malformed(operation: &'static str, source: MappingError) -> Self {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
            ..Self::new(ErrorKind::MalformedResponse, operation, "")
        }
    }

    pub fn transport(operation: &'static str, source: TransportError) -> Self {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
            ..Self::new(ErrorKind::Transport, operation, "")
        }
    }

    /// Translate a non-success response into the matching kind.
    ///
    /// The message comes from the Kraken error document when the body holds
    /// one, otherwise from the raw body.
    pub fn from_response(operation: &'static str, status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(doc) => doc
                .message
                .filter(|m| !m.is_empty())
                .or(doc.error)
                .unwrap_or_default(),
            Err(_) => body.trim().to_string(),
        };
        let message = if message.is_empty() {
            format!("HTTP {status}")
        } else {
            message
        };

        let mut kind = ErrorKind::from_status(status).unwrap_or(ErrorKind::MalformedResponse);
        if kind == ErrorKind::Unauthorized && message.to_ascii_lowercase().contains("scope") {
            kind = ErrorKind::Forbidden;
        }

        Self {
            status: Some(status),
            ..Self::new(kind, operation, message)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// HTTP status, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// Pass a successful response body through, or translate the failure.
pub(crate) fn translate(
    operation: &'static str,
    response: ApiResponse,
) -> Result<String, KrakenError> {
    if response.is_success() {
        return Ok(response.body);
    }

    let err = KrakenError::from_response(operation, response.status, &response.body);
    if err.kind() == ErrorKind::NotFound {
        tracing::debug!(operation, "Kraken reported resource absent");
    } else {
        tracing::warn!(
            operation,
            status = response.status,
            kind = %err.kind(),
            message = err.message(),
            "Kraken request rejected"
        );
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn success_passes_body_through() {
        let body = translate("retrieve_user", response(200, "{}")).unwrap();
        assert_eq!(body, "{}");
    }

    #[test]
    fn status_codes_map_to_kinds() {
        let cases = [
            (401, ErrorKind::Unauthorized),
            (403, ErrorKind::Forbidden),
            (404, ErrorKind::NotFound),
            (422, ErrorKind::BadRequest),
            (429, ErrorKind::RateLimited),
            (500, ErrorKind::ServerError),
            (503, ErrorKind::ServerError),
        ];
        for (status, kind) in cases {
            let err = translate("op", response(status, "")).unwrap_err();
            assert_eq!(err.kind(), kind, "status {status}");
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn kraken_error_document_supplies_message() {
        let body = r#"{"error":"Not Found","status":404,"message":"user_id 1 is not following 2"}"#;
        let err = translate("retrieve_following_channel", response(404, body)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.message(), "user_id 1 is not following 2");
        assert_eq!(err.operation(), "retrieve_following_channel");
    }

    #[test]
    fn unauthorized_blaming_scope_becomes_forbidden() {
        let body = r#"{"error":"Unauthorized","status":401,
            "message":"Token invalid or missing required scope"}"#;
        let err = translate("update_channel", response(401, body)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn plain_text_body_is_kept_as_message() {
        let err = translate("retrieve_user", response(502, " Bad Gateway \n")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert_eq!(err.message(), "Bad Gateway");
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let err = translate("retrieve_user", response(500, "")).unwrap_err();
        assert_eq!(err.message(), "HTTP 500");
        assert_eq!(err.to_string(), "retrieve_user failed (server error): HTTP 500");
    }

    #[test]
    fn transport_failure_keeps_source() {
        let err = KrakenError::transport("retrieve_user", TransportError::Timeout);
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(std::error::Error::source(&err).is_some());
    }
}
