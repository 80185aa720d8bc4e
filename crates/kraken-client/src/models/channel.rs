use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::mapping::{self, MappingError, de};
use super::Versioned;
use crate::version::ApiVersion;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub version: ApiVersion,
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub status: Option<String>,
    pub game: Option<String>,
    pub mature: bool,
    pub partner: bool,
    pub broadcaster_language: Option<String>,
    pub language: String,
    pub logo: Option<Url>,
    pub url: Url,
    pub video_banner: Option<Url>,
    pub profile_banner: Option<Url>,
    pub views: i64,
    pub followers: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Set only when the token owner reads their own channel.
    pub email: Option<String>,
    /// Set only when the token owner reads their own channel.
    pub stream_key: Option<String>,

    /// v2/v3, seconds.
    pub delay: Option<i64>,
    /// v2/v3
    pub banner: Option<Url>,
    /// v2/v3
    pub background: Option<Url>,
    /// v2/v3
    pub links: Option<BTreeMap<String, Url>>,

    /// v5
    pub broadcaster_type: Option<String>,
    /// v5
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelCommon {
    #[serde(rename = "_id", deserialize_with = "de::numeric_id")]
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub display_name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub mature: bool,
    #[serde(default, deserialize_with = "de::nullable")]
    pub partner: bool,
    #[serde(default)]
    pub broadcaster_language: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub language: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub url: String,
    #[serde(default)]
    pub video_banner: Option<String>,
    #[serde(default)]
    pub profile_banner: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub views: i64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub followers: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub stream_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyChannel {
    #[serde(flatten)]
    pub common: ChannelCommon,
    #[serde(default)]
    pub delay: Option<i64>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelV5 {
    #[serde(flatten)]
    pub common: ChannelCommon,
    #[serde(default)]
    pub broadcaster_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub enum RawChannel {
    V2(LegacyChannel),
    V3(LegacyChannel),
    V5(ChannelV5),
}

impl RawChannel {
    pub fn decode(version: ApiVersion, value: Value) -> Result<Self, MappingError> {
        let decoded = match version {
            ApiVersion::V2 => serde_json::from_value(value).map(RawChannel::V2),
            ApiVersion::V3 => serde_json::from_value(value).map(RawChannel::V3),
            ApiVersion::V5 => serde_json::from_value(value).map(RawChannel::V5),
        };
        decoded.map_err(|source| MappingError::Decode {
            entity: Channel::KIND,
            version,
            source,
        })
    }
}

impl Channel {
    pub fn from_raw(raw: RawChannel) -> Result<Self, MappingError> {
        match raw {
            RawChannel::V2(c) => Self::legacy(ApiVersion::V2, c),
            RawChannel::V3(c) => Self::legacy(ApiVersion::V3, c),
            RawChannel::V5(c) => Ok(Self {
                broadcaster_type: c.broadcaster_type,
                description: c.description,
                ..Self::common(ApiVersion::V5, c.common)?
            }),
        }
    }

    fn legacy(version: ApiVersion, c: LegacyChannel) -> Result<Self, MappingError> {
        Ok(Self {
            delay: c.delay,
            banner: mapping::optional_url("banner", c.banner)?,
            background: mapping::optional_url("background", c.background)?,
            links: mapping::links(c.links)?,
            ..Self::common(version, c.common)?
        })
    }

    fn common(version: ApiVersion, c: ChannelCommon) -> Result<Self, MappingError> {
        Ok(Self {
            version,
            id: c.id,
            name: c.name,
            display_name: c.display_name,
            status: c.status,
            game: c.game,
            mature: c.mature,
            partner: c.partner,
            broadcaster_language: c.broadcaster_language,
            language: c.language,
            logo: mapping::optional_url("logo", c.logo)?,
            url: mapping::url("url", &c.url)?,
            video_banner: mapping::optional_url("video_banner", c.video_banner)?,
            profile_banner: mapping::optional_url("profile_banner", c.profile_banner)?,
            views: c.views,
            followers: c.followers,
            created_at: mapping::date("created_at", &c.created_at)?,
            updated_at: mapping::date("updated_at", &c.updated_at)?,
            email: c.email,
            stream_key: c.stream_key,
            delay: None,
            banner: None,
            background: None,
            links: None,
            broadcaster_type: None,
            description: None,
        })
    }
}

impl Versioned for Channel {
    const KIND: &'static str = "channel";

    fn decode(version: ApiVersion, value: Value) -> Result<Self, MappingError> {
        Self::from_raw(RawChannel::decode(version, value)?)
    }
}
