//! Authenticated access to the Kraken API.
//!
//! [`Kraken`] is the unauthenticated entry point; [`Kraken::authenticate`]
//! validates an access token and returns a [`Session`] that carries the token
//! and its scope grants. Every session operation checks its scope locally
//! before the request is sent.

mod auth;
mod blocks;
mod channels;
mod follows;
mod request;
mod subscriptions;
mod videos;

use std::sync::Arc;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::{self, Block, Follow, Subscription, Total};
use crate::error::KrakenError;
use crate::models::{Channel, User, Versioned, Video};
use crate::scope::{Scope, ScopeSet};
use crate::transport::{ApiRequest, HttpTransport, Method, Transport};
use crate::version::ApiVersion;

pub use auth::AccessToken;
pub use channels::{ChannelUpdate, CommercialLength};
pub use videos::BroadcastType;

const DEFAULT_PAGE_SIZE: u32 = 25;
const MAX_PAGE_SIZE: u32 = 100;

/// Offset pagination shared by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Append `limit` (clamped to 1..=100) and `offset`.
    pub(crate) fn apply(self, request: ApiRequest) -> ApiRequest {
        request
            .query("limit", self.limit.clamp(1, MAX_PAGE_SIZE))
            .query("offset", self.offset)
    }
}

/// Unauthenticated client for one protocol version.
#[derive(Debug)]
pub struct Kraken<T = HttpTransport> {
    transport: Arc<T>,
    version: ApiVersion,
}

impl<T> Clone for Kraken<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            version: self.version,
        }
    }
}

impl Kraken<HttpTransport> {
    /// Build a client over the reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self, KrakenError> {
        let transport = HttpTransport::new(&config)
            .map_err(|e| KrakenError::transport("connect", e))?;
        Ok(Self::with_transport(transport, config.version))
    }
}

impl<T: Transport> Kraken<T> {
    pub fn with_transport(transport: T, version: ApiVersion) -> Self {
        Self {
            transport: Arc::new(transport),
            version,
        }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a single video by id. Needs no token.
    pub async fn retrieve_video(&self, video_id: &str) -> Result<Video, KrakenError> {
        const OP: &str = "retrieve_video";
        let video_id = request::target(OP, video_id)?;
        let request = ApiRequest::new(Method::Get, format!("videos/{video_id}"), self.version);
        let value = request::fetch_json(&*self.transport, OP, request).await?;
        request::map(OP, Video::decode(self.version, value))
    }

    /// Resolve a login name to the identifier request paths expect.
    ///
    /// v5 looks the user up and returns the numeric id as text. Older
    /// versions address users by login, so the name comes back unchanged.
    pub async fn retrieve_user_id(&self, login: &str) -> Result<String, KrakenError> {
        const OP: &str = "retrieve_user_id";
        let login = request::target(OP, login)?;
        if !self.version.addresses_by_id() {
            return Ok(login.to_string());
        }

        let request = ApiRequest::new(Method::Get, "users", self.version).query("login", login);
        let value = request::fetch_json(&*self.transport, OP, request).await?;
        let version = self.version;
        let users = request::map(
            OP,
            envelope::decode_list(value, "users", |item| User::decode(version, item)),
        )?;
        users
            .first()
            .map(|user| user.id.to_string())
            .ok_or_else(|| KrakenError::not_found(OP, format!("no user with login {login:?}")))
    }
}

/// An authenticated session.
///
/// The token and its grants never change; operations only read them, so a
/// session can be shared across tasks.
#[derive(Debug)]
pub struct Session<T = HttpTransport> {
    transport: Arc<T>,
    version: ApiVersion,
    token: AccessToken,
}

impl<T: Transport> Session<T> {
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn scopes(&self) -> &ScopeSet {
        self.token.scopes()
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Path segment naming the token owner: id under v5, login name before.
    fn me(&self) -> String {
        self.token.subject(self.version)
    }

    /// Retrieve the token owner.
    pub async fn retrieve_user(&self) -> Result<User, KrakenError> {
        const OP: &str = "retrieve_user";
        let value = self
            .get_json(OP, Some(Scope::UserRead), self.request(Method::Get, "user"))
            .await?;
        request::map(OP, User::decode(self.version, value))
    }

    fn decode_one<E: Versioned>(
        &self,
        operation: &'static str,
        value: Value,
    ) -> Result<E, KrakenError> {
        request::map(operation, E::decode(self.version, value))
    }

    fn decode_follows<E: Versioned>(
        &self,
        operation: &'static str,
        value: Value,
    ) -> Result<Total<Vec<Follow<E>>>, KrakenError> {
        let version = self.version;
        request::map(
            operation,
            envelope::decode_total(value, "follows", |item| envelope::decode_follow(version, item)),
        )
    }
}

/// Result aliases kept next to the operations that return them.
pub type Followers = Total<Vec<Follow<User>>>;
pub type Following = Total<Vec<Follow<Channel>>>;
pub type BlockedUsers = Vec<Block>;
pub type Subscribers = Total<Vec<Subscription<User>>>;
