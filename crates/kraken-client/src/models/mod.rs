//! Canonical entities and the per-version mappers that build them.
//!
//! Each entity kind has one raw record per protocol version (`RawVideo::V2`,
//! `RawVideo::V3`, ...) and a single `from_raw` that dispatches on the tag.
//! Decoding the JSON into the raw record checks numeric fields; URLs, dates
//! and nested tables are validated while mapping.

mod channel;
pub(crate) mod mapping;
mod media;
mod user;
mod video;

use serde_json::Value;

use crate::version::ApiVersion;

pub use channel::{Channel, ChannelCommon, ChannelV5, LegacyChannel, RawChannel};
pub use mapping::MappingError;
pub use media::{Quality, Resolution, ResolutionParseError, Thumbnail, ThumbnailError};
pub use user::{LegacyUser, Notifications, RawUser, User, UserCommon};
pub use video::{RawVideo, Video, VideoCommon, VideoV2, VideoV3, VideoV5};

/// An entity that can be decoded from any supported protocol version.
///
/// Envelopes use this to wrap entities without knowing their kind.
pub trait Versioned: Sized {
    /// Entity name used in diagnostics.
    const KIND: &'static str;

    fn decode(version: ApiVersion, value: Value) -> Result<Self, MappingError>;
}
