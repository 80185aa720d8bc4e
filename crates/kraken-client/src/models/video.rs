use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::mapping::{self, MappingError, de};
use super::media::{self, Resolution, Thumbnail};
use super::Versioned;
use crate::version::ApiVersion;

/// A past broadcast, highlight or upload.
///
/// Fields marked with versions are only populated by those versions and are
/// `None` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub version: ApiVersion,
    pub id: String,
    pub title: String,
    pub description: String,
    pub broadcast_id: i64,
    pub status: String,
    pub game: Option<String>,
    /// Length in seconds.
    pub length: i64,
    pub url: Url,
    pub views: i64,
    pub broadcast_type: String,
    /// Mini channel document (`name`, `display_name`, and `_id` on v5).
    pub channel: Option<BTreeMap<String, String>>,

    /// v2/v3
    pub recorded_at: Option<DateTime<Utc>>,
    /// v2/v3
    pub preview: Option<Url>,
    /// v2/v3
    pub links: Option<BTreeMap<String, Url>>,
    /// v2
    pub embed: Option<String>,

    /// v3/v5, comma separated.
    pub tag_list: Option<String>,
    /// v3/v5, keyed by quality label.
    pub fps: Option<BTreeMap<String, f64>>,
    /// v3/v5, keyed by quality label.
    pub resolutions: Option<BTreeMap<String, Resolution>>,

    /// v5, keyed by image size.
    pub previews: Option<BTreeMap<String, Url>>,
    /// v5, keyed by image size.
    pub thumbnails: Option<BTreeMap<String, Thumbnail>>,
    /// v5
    pub language: Option<String>,
    /// v5
    pub viewable: Option<String>,
    /// v5
    pub created_at: Option<DateTime<Utc>>,
    /// v5
    pub published_at: Option<DateTime<Utc>>,
}

/// Fields every version sends with the same meaning.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoCommon {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub broadcast_id: i64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub status: String,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default, deserialize_with = "de::nullable")]
    pub length: i64,
    pub url: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub views: i64,
    #[serde(default, deserialize_with = "de::nullable")]
    pub broadcast_type: String,
    #[serde(default)]
    pub channel: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoV2 {
    #[serde(flatten)]
    pub common: VideoCommon,
    pub recorded_at: String,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub embed: Option<String>,
    #[serde(default, rename = "_links")]
    pub links: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoV3 {
    #[serde(flatten)]
    pub common: VideoCommon,
    pub recorded_at: String,
    #[serde(default)]
    pub preview: Option<String>,
    #[serde(default)]
    pub tag_list: Option<String>,
    #[serde(default)]
    pub fps: Option<Value>,
    #[serde(default)]
    pub resolutions: Option<Value>,
    #[serde(default, rename = "_links")]
    pub links: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoV5 {
    #[serde(flatten)]
    pub common: VideoCommon,
    #[serde(default)]
    pub tag_list: Option<String>,
    /// Table of size label to URL; v5 reuses the v2/v3 field name.
    #[serde(default)]
    pub preview: Option<Value>,
    #[serde(default)]
    pub thumbnails: Option<Value>,
    #[serde(default)]
    pub fps: Option<Value>,
    #[serde(default)]
    pub resolutions: Option<Value>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub viewable: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// A video document tagged with the protocol version it was received under.
#[derive(Debug, Clone)]
pub enum RawVideo {
    V2(VideoV2),
    V3(VideoV3),
    V5(VideoV5),
}

impl RawVideo {
    pub fn decode(version: ApiVersion, value: Value) -> Result<Self, MappingError> {
        let decoded = match version {
            ApiVersion::V2 => serde_json::from_value(value).map(RawVideo::V2),
            ApiVersion::V3 => serde_json::from_value(value).map(RawVideo::V3),
            ApiVersion::V5 => serde_json::from_value(value).map(RawVideo::V5),
        };
        decoded.map_err(|source| MappingError::Decode {
            entity: Video::KIND,
            version,
            source,
        })
    }

    pub fn version(&self) -> ApiVersion {
        match self {
            RawVideo::V2(_) => ApiVersion::V2,
            RawVideo::V3(_) => ApiVersion::V3,
            RawVideo::V5(_) => ApiVersion::V5,
        }
    }
}

impl Video {
    /// Map a raw document onto the canonical shape.
    pub fn from_raw(raw: RawVideo) -> Result<Self, MappingError> {
        let version = raw.version();
        match raw {
            RawVideo::V2(v) => Ok(Self {
                recorded_at: Some(mapping::date("recorded_at", &v.recorded_at)?),
                preview: mapping::optional_url("preview", v.preview)?,
                links: mapping::links(v.links)?,
                embed: v.embed,
                ..Self::common(version, v.common)?
            }),
            RawVideo::V3(v) => Ok(Self {
                recorded_at: Some(mapping::date("recorded_at", &v.recorded_at)?),
                preview: mapping::optional_url("preview", v.preview)?,
                links: mapping::links(v.links)?,
                tag_list: v.tag_list,
                fps: media::fps(v.fps)?,
                resolutions: media::resolutions(v.resolutions)?,
                ..Self::common(version, v.common)?
            }),
            RawVideo::V5(v) => Ok(Self {
                tag_list: v.tag_list,
                fps: media::fps(v.fps)?,
                resolutions: media::resolutions(v.resolutions)?,
                previews: media::previews(v.preview)?,
                thumbnails: media::thumbnails(v.thumbnails)?,
                language: v.language,
                viewable: v.viewable,
                created_at: mapping::optional_date("created_at", v.created_at)?,
                published_at: mapping::optional_date("published_at", v.published_at)?,
                ..Self::common(version, v.common)?
            }),
        }
    }

    /// Shared fields set, every version-gated field unset.
    fn common(version: ApiVersion, c: VideoCommon) -> Result<Self, MappingError> {
        Ok(Self {
            version,
            id: c.id,
            title: c.title,
            description: c.description,
            broadcast_id: c.broadcast_id,
            status: c.status,
            game: c.game,
            length: c.length,
            url: mapping::url("url", &c.url)?,
            views: c.views,
            broadcast_type: c.broadcast_type,
            channel: mapping::sub_document("channel", c.channel)?,
            recorded_at: None,
            preview: None,
            links: None,
            embed: None,
            tag_list: None,
            fps: None,
            resolutions: None,
            previews: None,
            thumbnails: None,
            language: None,
            viewable: None,
            created_at: None,
            published_at: None,
        })
    }

    /// Tags split out of `tag_list`.
    pub fn tags(&self) -> Vec<&str> {
        self.tag_list
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Versioned for Video {
    const KIND: &'static str = "video";

    fn decode(version: ApiVersion, value: Value) -> Result<Self, MappingError> {
        Self::from_raw(RawVideo::decode(version, value)?)
    }
}
