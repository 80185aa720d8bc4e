use serde::Deserialize;

use super::*;
use crate::models::MappingError;
use crate::models::mapping::de;

/// An access token and what the server says it may do.
///
/// Fixed at authentication. Re-authenticating produces a new value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    access_token: String,
    scopes: ScopeSet,
    user_name: String,
    user_id: Option<u64>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("scopes", &self.scopes)
            .field("user_name", &self.user_name)
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl AccessToken {
    pub fn new(
        access_token: impl Into<String>,
        scopes: ScopeSet,
        user_name: impl Into<String>,
        user_id: Option<u64>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            scopes,
            user_name: user_name.into(),
            user_id,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn scopes(&self) -> &ScopeSet {
        &self.scopes
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user_id
    }

    /// Identifier used in request paths for `version`.
    pub(super) fn subject(&self, version: ApiVersion) -> String {
        match (version.addresses_by_id(), self.user_id) {
            (true, Some(id)) => id.to_string(),
            _ => self.user_name.clone(),
        }
    }
}

/// Root document: `{"token": {...}}`.
#[derive(Debug, Deserialize)]
struct RootResponse {
    token: TokenStatus,
}

#[derive(Debug, Deserialize)]
struct TokenStatus {
    valid: bool,
    #[serde(default)]
    authorization: Option<Authorization>,
    #[serde(default, deserialize_with = "de::nullable")]
    user_name: String,
    #[serde(default, deserialize_with = "de::optional_numeric_id")]
    user_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Authorization {
    #[serde(default)]
    scopes: Vec<String>,
}

impl<T: Transport> Kraken<T> {
    /// Validate `access_token` and open a session with its scope grants.
    pub async fn authenticate(&self, access_token: &str) -> Result<Session<T>, KrakenError> {
        const OP: &str = "authenticate";
        let request = ApiRequest::new(Method::Get, "", self.version).bearer(access_token);
        let value = request::fetch_json(&*self.transport, OP, request).await?;
        let root: RootResponse = request::map(
            OP,
            serde_json::from_value(value).map_err(|source| MappingError::Shape {
                field: "token",
                source,
            }),
        )?;
        let status = root.token;

        if !status.valid {
            return Err(KrakenError::unauthorized(OP, "access token is not valid"));
        }
        if self.version.addresses_by_id() && status.user_id.is_none() {
            return Err(KrakenError::malformed(OP, MappingError::Missing("token.user_id")));
        }

        let scopes = ScopeSet::from_names(
            status
                .authorization
                .map(|auth| auth.scopes)
                .unwrap_or_default(),
        );
        tracing::info!(
            user = %status.user_name,
            version = %self.version,
            scopes = scopes.len(),
            "Kraken session authenticated"
        );

        let token = AccessToken::new(access_token, scopes, status.user_name, status.user_id);
        Ok(Session {
            transport: Arc::clone(&self.transport),
            version: self.version,
            token,
        })
    }
}
