use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::mapping::{self, MappingError, de};
use super::Versioned;
use crate::version::ApiVersion;

/// Notification preferences, only present on the authenticated user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifications {
    #[serde(default)]
    pub push: bool,
    #[serde(default)]
    pub email: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub version: ApiVersion,
    pub id: u64,
    pub name: String,
    pub display_name: String,
    pub user_type: String,
    pub bio: Option<String>,
    pub logo: Option<Url>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Set only when reading the token owner.
    pub email: Option<String>,
    /// Set only when reading the token owner.
    pub partnered: Option<bool>,
    /// Set only when reading the token owner.
    pub notifications: Option<Notifications>,

    /// v2/v3
    pub links: Option<BTreeMap<String, Url>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCommon {
    #[serde(rename = "_id", deserialize_with = "de::numeric_id")]
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable")]
    pub display_name: String,
    #[serde(default, rename = "type", deserialize_with = "de::nullable")]
    pub user_type: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub partnered: Option<bool>,
    #[serde(default)]
    pub notifications: Option<Notifications>,
}

/// v2 and v3 user documents share one shape.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyUser {
    #[serde(flatten)]
    pub common: UserCommon,
    #[serde(default, rename = "_links")]
    pub links: Option<Value>,
}

#[derive(Debug, Clone)]
pub enum RawUser {
    V2(LegacyUser),
    V3(LegacyUser),
    V5(UserCommon),
}

impl RawUser {
    pub fn decode(version: ApiVersion, value: Value) -> Result<Self, MappingError> {
        let decoded = match version {
            ApiVersion::V2 => serde_json::from_value(value).map(RawUser::V2),
            ApiVersion::V3 => serde_json::from_value(value).map(RawUser::V3),
            ApiVersion::V5 => serde_json::from_value(value).map(RawUser::V5),
        };
        decoded.map_err(|source| MappingError::Decode {
            entity: User::KIND,
            version,
            source,
        })
    }
}

impl User {
    pub fn from_raw(raw: RawUser) -> Result<Self, MappingError> {
        match raw {
            RawUser::V2(u) => Ok(Self {
                links: mapping::links(u.links)?,
                ..Self::common(ApiVersion::V2, u.common)?
            }),
            RawUser::V3(u) => Ok(Self {
                links: mapping::links(u.links)?,
                ..Self::common(ApiVersion::V3, u.common)?
            }),
            RawUser::V5(u) => Self::common(ApiVersion::V5, u),
        }
    }

    fn common(version: ApiVersion, c: UserCommon) -> Result<Self, MappingError> {
        Ok(Self {
            version,
            id: c.id,
            name: c.name,
            display_name: c.display_name,
            user_type: c.user_type,
            bio: c.bio,
            logo: mapping::optional_url("logo", c.logo)?,
            created_at: mapping::date("created_at", &c.created_at)?,
            updated_at: mapping::date("updated_at", &c.updated_at)?,
            email: c.email,
            partnered: c.partnered,
            notifications: c.notifications,
            links: None,
        })
    }
}

impl Versioned for User {
    const KIND: &'static str = "user";

    fn decode(version: ApiVersion, value: Value) -> Result<Self, MappingError> {
        Self::from_raw(RawUser::decode(version, value)?)
    }
}
