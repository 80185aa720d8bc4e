//! OAuth scopes and the local scope check.
//!
//! Every gated operation names the [`Scope`] it needs. The check runs against
//! the grants captured at authentication, before any request goes out.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::KrakenError;

/// A named permission the remote service attaches to an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    UserRead,
    UserBlocksEdit,
    UserBlocksRead,
    UserFollowsEdit,
    ChannelRead,
    ChannelEditor,
    ChannelCommercial,
    ChannelStream,
    ChannelSubscriptions,
    UserSubscriptions,
    ChannelCheckSubscription,
    ChatLogin,
    ChannelFeedRead,
    ChannelFeedEdit,
    CollectionsEdit,
    CommunitiesEdit,
    CommunitiesModerate,
    Openid,
    ViewingActivityRead,
}

impl Scope {
    pub const ALL: [Scope; 19] = [
        Scope::UserRead,
        Scope::UserBlocksEdit,
        Scope::UserBlocksRead,
        Scope::UserFollowsEdit,
        Scope::ChannelRead,
        Scope::ChannelEditor,
        Scope::ChannelCommercial,
        Scope::ChannelStream,
        Scope::ChannelSubscriptions,
        Scope::UserSubscriptions,
        Scope::ChannelCheckSubscription,
        Scope::ChatLogin,
        Scope::ChannelFeedRead,
        Scope::ChannelFeedEdit,
        Scope::CollectionsEdit,
        Scope::CommunitiesEdit,
        Scope::CommunitiesModerate,
        Scope::Openid,
        Scope::ViewingActivityRead,
    ];

    /// Wire name as it appears in token authorization documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::UserRead => "user_read",
            Scope::UserBlocksEdit => "user_blocks_edit",
            Scope::UserBlocksRead => "user_blocks_read",
            Scope::UserFollowsEdit => "user_follows_edit",
            Scope::ChannelRead => "channel_read",
            Scope::ChannelEditor => "channel_editor",
            Scope::ChannelCommercial => "channel_commercial",
            Scope::ChannelStream => "channel_stream",
            Scope::ChannelSubscriptions => "channel_subscriptions",
            Scope::UserSubscriptions => "user_subscriptions",
            Scope::ChannelCheckSubscription => "channel_check_subscription",
            Scope::ChatLogin => "chat_login",
            Scope::ChannelFeedRead => "channel_feed_read",
            Scope::ChannelFeedEdit => "channel_feed_edit",
            Scope::CollectionsEdit => "collections_edit",
            Scope::CommunitiesEdit => "communities_edit",
            Scope::CommunitiesModerate => "communities_moderate",
            Scope::Openid => "openid",
            Scope::ViewingActivityRead => "viewing_activity_read",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope: {0:?}")]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| UnknownScope(s.to_string()))
    }
}

/// The scopes granted to one access token.
///
/// Built once when the token is validated. There are no mutating methods;
/// a changed grant means a new token and a new set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopeSet(BTreeSet<Scope>);

impl ScopeSet {
    /// Build a set from wire names. Names this crate does not know are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scopes = BTreeSet::new();
        for name in names {
            match name.as_ref().parse::<Scope>() {
                Ok(scope) => {
                    scopes.insert(scope);
                }
                Err(e) => tracing::warn!(error = %e, "Ignoring unrecognised scope grant"),
            }
        }
        Self(scopes)
    }

    pub fn contains(&self, scope: Scope) -> bool {
        self.0.contains(&scope)
    }

    pub fn iter(&self) -> impl Iterator<Item = Scope> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fail with `InsufficientScope` unless `required` was granted.
    pub fn authorize(&self, required: Scope, operation: &'static str) -> Result<(), KrakenError> {
        if self.contains(required) {
            Ok(())
        } else {
            tracing::debug!(operation, scope = %required, "Missing scope, request not sent");
            Err(KrakenError::insufficient_scope(operation, required))
        }
    }
}

impl FromIterator<Scope> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = Scope>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>().unwrap(), scope);
        }
        assert_eq!(Scope::ViewingActivityRead.as_str(), "viewing_activity_read");
    }

    #[test]
    fn serde_name_matches_wire_name() {
        for scope in Scope::ALL {
            let json = serde_json::to_value(scope).unwrap();
            assert_eq!(json, serde_json::Value::String(scope.as_str().into()));
        }
    }

    #[test]
    fn from_names_drops_unknown_grants() {
        let set = ScopeSet::from_names(["user_read", "chat:read", "channel_editor"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(Scope::UserRead));
        assert!(set.contains(Scope::ChannelEditor));
    }

    #[test]
    fn authorize_passes_granted_scope() {
        let set: ScopeSet = [Scope::UserRead].into_iter().collect();
        assert!(set.authorize(Scope::UserRead, "retrieve_user").is_ok());
    }

    #[test]
    fn authorize_rejects_missing_scope() {
        let set: ScopeSet = [Scope::UserRead].into_iter().collect();
        let err = set
            .authorize(Scope::ChannelEditor, "update_channel")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientScope);
        assert_eq!(err.operation(), "update_channel");
        assert!(err.message().contains("channel_editor"));
        assert_eq!(err.status(), None);
    }
}
