//! Generic result envelopes.
//!
//! [`Wrapped`] pairs one entity with the metadata of a relation (follow,
//! subscription, block). [`Total`] pairs a page of results with the total the
//! server reported. Both only hold data; the decoders below build them for any
//! [`Versioned`] entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::mapping::{self, MappingError, de};
use crate::models::{User, Versioned};
use crate::version::ApiVersion;

/// An entity plus the relation that connects it to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wrapped<T, R> {
    wrapped: T,
    relation: R,
}

impl<T, R> Wrapped<T, R> {
    pub fn new(wrapped: T, relation: R) -> Self {
        Self { wrapped, relation }
    }

    pub fn wrapped(&self) -> &T {
        &self.wrapped
    }

    pub fn relation(&self) -> &R {
        &self.relation
    }

    pub fn into_inner(self) -> T {
        self.wrapped
    }

    pub fn into_parts(self) -> (T, R) {
        (self.wrapped, self.relation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FollowInfo {
    created_at: DateTime<Utc>,
    notifications: bool,
}

impl FollowInfo {
    pub fn new(created_at: &str, notifications: bool) -> Result<Self, MappingError> {
        Ok(Self {
            created_at: mapping::date("created_at", created_at)?,
            notifications,
        })
    }

    /// When the follow was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the follower gets live notifications.
    pub fn notifications(&self) -> bool {
        self.notifications
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionInfo {
    id: String,
    created_at: DateTime<Utc>,
    sub_plan: Option<String>,
    sub_plan_name: Option<String>,
}

impl SubscriptionInfo {
    pub fn new(
        id: impl Into<String>,
        created_at: &str,
        sub_plan: Option<String>,
        sub_plan_name: Option<String>,
    ) -> Result<Self, MappingError> {
        Ok(Self {
            id: id.into(),
            created_at: mapping::date("created_at", created_at)?,
            sub_plan,
            sub_plan_name,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Tier code such as `1000` or `Prime`. v5 only.
    pub fn sub_plan(&self) -> Option<&str> {
        self.sub_plan.as_deref()
    }

    /// v5 only.
    pub fn sub_plan_name(&self) -> Option<&str> {
        self.sub_plan_name.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockInfo {
    id: String,
    updated_at: DateTime<Utc>,
}

impl BlockInfo {
    pub fn new(id: impl Into<String>, updated_at: &str) -> Result<Self, MappingError> {
        Ok(Self {
            id: id.into(),
            updated_at: mapping::date("updated_at", updated_at)?,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

pub type Follow<T> = Wrapped<T, FollowInfo>;
pub type Subscription<T> = Wrapped<T, SubscriptionInfo>;
pub type Block = Wrapped<User, BlockInfo>;

/// One page of results and the total the server reported.
///
/// `total` is informational: pages may hold fewer items, and the two are
/// never reconciled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Total<C> {
    total: u64,
    wrapped: C,
}

impl<C> Total<C> {
    pub fn new(total: u64, wrapped: C) -> Self {
        Self { total, wrapped }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn wrapped(&self) -> &C {
        &self.wrapped
    }

    pub fn into_inner(self) -> C {
        self.wrapped
    }

    pub fn into_parts(self) -> (u64, C) {
        (self.total, self.wrapped)
    }
}

#[derive(Deserialize)]
struct RawFollow {
    created_at: String,
    #[serde(default, deserialize_with = "de::nullable")]
    notifications: bool,
    #[serde(rename = "channel", alias = "user")]
    target: Value,
}

#[derive(Deserialize)]
struct RawSubscription {
    #[serde(rename = "_id", deserialize_with = "de::text_id")]
    id: String,
    created_at: String,
    #[serde(default)]
    sub_plan: Option<String>,
    #[serde(default)]
    sub_plan_name: Option<String>,
    #[serde(rename = "channel", alias = "user")]
    target: Value,
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(rename = "_id", deserialize_with = "de::text_id")]
    id: String,
    updated_at: String,
    user: Value,
}

fn relation<R: serde::de::DeserializeOwned>(
    field: &'static str,
    value: Value,
) -> Result<R, MappingError> {
    serde_json::from_value(value).map_err(|source| MappingError::Shape { field, source })
}

/// Decode `{created_at, notifications, channel|user}`.
pub fn decode_follow<T: Versioned>(
    version: ApiVersion,
    value: Value,
) -> Result<Follow<T>, MappingError> {
    let raw: RawFollow = relation("follow", value)?;
    let info = FollowInfo::new(&raw.created_at, raw.notifications)?;
    Ok(Wrapped::new(T::decode(version, raw.target)?, info))
}

/// Decode `{_id, created_at, sub_plan, channel|user}`. Plan fields are only
/// kept under v5.
pub fn decode_subscription<T: Versioned>(
    version: ApiVersion,
    value: Value,
) -> Result<Subscription<T>, MappingError> {
    let raw: RawSubscription = relation("subscription", value)?;
    let (sub_plan, sub_plan_name) = match version {
        ApiVersion::V5 => (raw.sub_plan, raw.sub_plan_name),
        ApiVersion::V2 | ApiVersion::V3 => (None, None),
    };
    let info = SubscriptionInfo::new(raw.id, &raw.created_at, sub_plan, sub_plan_name)?;
    Ok(Wrapped::new(T::decode(version, raw.target)?, info))
}

/// Decode `{_id, updated_at, user}`.
pub fn decode_block(version: ApiVersion, value: Value) -> Result<Block, MappingError> {
    let raw: RawBlock = relation("block", value)?;
    let info = BlockInfo::new(raw.id, &raw.updated_at)?;
    Ok(Wrapped::new(User::decode(version, raw.user)?, info))
}

fn take_array(value: &mut Value, key: &'static str) -> Result<Vec<Value>, MappingError> {
    match value.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(MappingError::Missing(key)),
    }
}

/// Decode every element of the array under `key`.
pub fn decode_list<T, F>(
    mut value: Value,
    key: &'static str,
    item: F,
) -> Result<Vec<T>, MappingError>
where
    F: FnMut(Value) -> Result<T, MappingError>,
{
    let items = take_array(&mut value, key)?;
    let decoded = items.into_iter().map(item).collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(key, count = decoded.len(), "Decoded list");
    Ok(decoded)
}

/// Decode `{"_total": n, key: [...]}`.
pub fn decode_total<T, F>(
    value: Value,
    key: &'static str,
    item: F,
) -> Result<Total<Vec<T>>, MappingError>
where
    F: FnMut(Value) -> Result<T, MappingError>,
{
    let total = value
        .get("_total")
        .and_then(Value::as_u64)
        .ok_or(MappingError::Missing("_total"))?;
    Ok(Total::new(total, decode_list(value, key, item)?))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::Channel;
    use crate::models::tests::{channel_fixture, user_fixture};

    #[test]
    fn total_keeps_reported_count_and_page_independently() {
        let page: Vec<u32> = (0..10).collect();
        let total = Total::new(50, page);
        assert_eq!(total.total(), 50);
        assert_eq!(total.wrapped().len(), 10);

        let (count, items) = total.into_parts();
        assert_eq!((count, items.len()), (50, 10));
    }

    #[test]
    fn wrapped_exposes_entity_and_relation() {
        let info = FollowInfo::new("2016-12-14T22:49:56Z", true).unwrap();
        let follow = Wrapped::new("dallas", info);
        assert_eq!(*follow.wrapped(), "dallas");
        assert!(follow.relation().notifications());
        assert_eq!(follow.into_inner(), "dallas");
    }

    #[test]
    fn follow_decodes_channel_for_any_version() {
        for version in ApiVersion::ALL {
            let value = json!({
                "created_at": "2016-09-16T20:37:39Z",
                "notifications": false,
                "channel": channel_fixture(version),
            });
            let follow: Follow<Channel> = decode_follow(version, value).unwrap();
            assert_eq!(follow.wrapped().version, version);
            assert!(!follow.relation().notifications());
        }
    }

    #[test]
    fn follow_decodes_user_key() {
        let value = json!({
            "created_at": "2016-09-16T20:37:39Z",
            "notifications": null,
            "user": user_fixture(ApiVersion::V5),
        });
        let follow: Follow<User> = decode_follow(ApiVersion::V5, value).unwrap();
        assert_eq!(follow.wrapped().name, "dallas");
        assert!(!follow.relation().notifications());
    }

    #[test]
    fn follow_with_bad_timestamp_fails() {
        let value = json!({
            "created_at": "soon",
            "channel": channel_fixture(ApiVersion::V5),
        });
        let err = decode_follow::<Channel>(ApiVersion::V5, value).unwrap_err();
        assert!(matches!(err, MappingError::Date { .. }));
    }

    #[test]
    fn subscription_plan_is_v5_only() {
        let value = |version| {
            json!({
                "_id": "ac2f1248993eaf97e71721458bd88aae66c92330",
                "created_at": "2016-12-12T15:52:52Z",
                "sub_plan": "1000",
                "sub_plan_name": "Channel Subscription (mr_woodchuck)",
                "user": user_fixture(version),
            })
        };

        let v5: Subscription<User> =
            decode_subscription(ApiVersion::V5, value(ApiVersion::V5)).unwrap();
        assert_eq!(v5.relation().sub_plan(), Some("1000"));

        let v3: Subscription<User> =
            decode_subscription(ApiVersion::V3, value(ApiVersion::V3)).unwrap();
        assert_eq!(v3.relation().sub_plan(), None);
        assert_eq!(v3.relation().sub_plan_name(), None);
        assert_eq!(v3.relation().id(), "ac2f1248993eaf97e71721458bd88aae66c92330");
    }

    #[test]
    fn block_accepts_numeric_id() {
        let value = json!({
            "_id": 34105660,
            "updated_at": "2016-12-15T18:58:11Z",
            "user": user_fixture(ApiVersion::V3),
        });
        let block = decode_block(ApiVersion::V3, value).unwrap();
        assert_eq!(block.relation().id(), "34105660");
        assert_eq!(block.wrapped().name, "test_user1");
    }

    #[test]
    fn total_decodes_any_item_type() {
        let value = json!({
            "_total": 1234,
            "follows": [
                {
                    "created_at": "2016-09-16T20:37:39Z",
                    "notifications": false,
                    "channel": channel_fixture(ApiVersion::V5)
                },
                {
                    "created_at": "2016-09-17T20:37:39Z",
                    "notifications": true,
                    "channel": channel_fixture(ApiVersion::V5)
                }
            ]
        });
        let page = decode_total(value, "follows", |item| {
            decode_follow::<Channel>(ApiVersion::V5, item)
        })
        .unwrap();
        assert_eq!(page.total(), 1234);
        assert_eq!(page.wrapped().len(), 2);
    }

    #[test]
    fn total_requires_reported_count() {
        let value = json!({"follows": []});
        let err = decode_total(value, "follows", |item| User::decode(ApiVersion::V5, item))
            .unwrap_err();
        assert!(matches!(err, MappingError::Missing("_total")));
    }

    #[test]
    fn list_fails_when_any_item_fails() {
        let value = json!({"users": [user_fixture(ApiVersion::V5), {"name": "broken"}]});
        let err = decode_list(value, "users", |item| User::decode(ApiVersion::V5, item))
            .unwrap_err();
        assert!(matches!(err, MappingError::Decode { entity: "user", .. }));
    }
}
