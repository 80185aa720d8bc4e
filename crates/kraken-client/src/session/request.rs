use super::*;
use crate::error;
use crate::models::MappingError;

/// Send a request and translate the outcome. Never retries.
pub(super) async fn dispatch<T: Transport>(
    transport: &T,
    operation: &'static str,
    request: ApiRequest,
) -> Result<String, KrakenError> {
    tracing::debug!(
        operation,
        method = request.method.as_str(),
        path = %request.path,
        "Dispatching"
    );
    let response = transport
        .send(request)
        .await
        .map_err(|e| KrakenError::transport(operation, e))?;
    error::translate(operation, response)
}

pub(super) async fn fetch_json<T: Transport>(
    transport: &T,
    operation: &'static str,
    request: ApiRequest,
) -> Result<Value, KrakenError> {
    let body = dispatch(transport, operation, request).await?;
    parse(operation, &body)
}

pub(super) fn parse(operation: &'static str, body: &str) -> Result<Value, KrakenError> {
    serde_json::from_str(body).map_err(|source| {
        KrakenError::malformed(
            operation,
            MappingError::Shape {
                field: "body",
                source,
            },
        )
    })
}

/// Check a caller-supplied login, id or video id before it becomes a path
/// segment. Nothing is sent when it would change the request path.
pub(super) fn target<'a>(operation: &'static str, value: &'a str) -> Result<&'a str, KrakenError> {
    if value.is_empty() || value.contains(['/', '?', '#']) {
        return Err(KrakenError::invalid_argument(
            operation,
            format!("{value:?} is not a usable identifier"),
        ));
    }
    Ok(value)
}

/// Attach the operation name to a mapping failure.
pub(super) fn map<V>(
    operation: &'static str,
    mapped: Result<V, MappingError>,
) -> Result<V, KrakenError> {
    mapped.map_err(|e| KrakenError::malformed(operation, e))
}

impl<T: Transport> Session<T> {
    /// A request carrying this session's token and version.
    pub(super) fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest {
        ApiRequest::new(method, path, self.version).bearer(self.token.access_token())
    }

    /// Check `required` (if any), then send. Nothing is sent when the check fails.
    pub(super) async fn send(
        &self,
        operation: &'static str,
        required: Option<Scope>,
        request: ApiRequest,
    ) -> Result<String, KrakenError> {
        if let Some(scope) = required {
            self.token.scopes().authorize(scope, operation)?;
        }
        dispatch(&*self.transport, operation, request).await
    }

    pub(super) async fn get_json(
        &self,
        operation: &'static str,
        required: Option<Scope>,
        request: ApiRequest,
    ) -> Result<Value, KrakenError> {
        let body = self.send(operation, required, request).await?;
        parse(operation, &body)
    }
}
