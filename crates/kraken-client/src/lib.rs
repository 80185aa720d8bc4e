//! Typed client for the Twitch Kraken REST API.
//!
//! Kraken returned a different JSON shape for the same entity under each
//! protocol version (v2, v3, v5). This crate decodes all of them into one
//! canonical model per entity, wraps relations (follows, subscriptions,
//! blocks) and paged listings in generic envelopes, checks OAuth scopes
//! locally before sending, and turns every failure into a [`KrakenError`].
//!
//! ```no_run
//! # async fn demo() -> Result<(), kraken_client::KrakenError> {
//! use kraken_client::{ClientConfig, Kraken, Page};
//!
//! let kraken = Kraken::new(ClientConfig::new("client-id", Default::default()))?;
//! let session = kraken.authenticate("access-token").await?;
//! let followers = session.retrieve_followers(Page::default()).await?;
//! println!("{} followers", followers.total());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod scope;
pub mod session;
pub mod transport;
pub mod version;

pub use config::ClientConfig;
pub use envelope::{
    Block, BlockInfo, Follow, FollowInfo, Subscription, SubscriptionInfo, Total, Wrapped,
};
pub use error::{ErrorKind, KrakenError};
pub use models::{
    Channel, MappingError, Notifications, Quality, Resolution, Thumbnail, User, Versioned, Video,
};
pub use scope::{Scope, ScopeSet};
pub use session::{
    AccessToken, BlockedUsers, BroadcastType, ChannelUpdate, CommercialLength, Followers,
    Following, Kraken, Page, Session, Subscribers,
};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport, TransportError};
pub use version::ApiVersion;
