//! Kraken protocol generations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three incompatible Kraken wire formats.
///
/// The variant decides both the `Accept` header sent with every request and
/// which raw record shape the entity mappers expect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V2,
    V3,
    #[default]
    V5,
}

impl ApiVersion {
    pub const ALL: [ApiVersion; 3] = [ApiVersion::V2, ApiVersion::V3, ApiVersion::V5];

    pub fn number(self) -> u8 {
        match self {
            ApiVersion::V2 => 2,
            ApiVersion::V3 => 3,
            ApiVersion::V5 => 5,
        }
    }

    /// Media type selecting this version on the server.
    pub fn accept_header(self) -> &'static str {
        match self {
            ApiVersion::V2 => "application/vnd.twitchtv.v2+json",
            ApiVersion::V3 => "application/vnd.twitchtv.v3+json",
            ApiVersion::V5 => "application/vnd.twitchtv.v5+json",
        }
    }

    /// v5 addresses users and channels by numeric id, older versions by login name.
    pub fn addresses_by_id(self) -> bool {
        self == ApiVersion::V5
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported api version: {0:?}")]
pub struct UnknownVersion(pub String);

impl FromStr for ApiVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(['v', 'V']) {
            "2" => Ok(ApiVersion::V2),
            "3" => Ok(ApiVersion::V3),
            "5" => Ok(ApiVersion::V5),
            _ => Err(UnknownVersion(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_prefix() {
        assert_eq!("v3".parse::<ApiVersion>().unwrap(), ApiVersion::V3);
        assert_eq!("5".parse::<ApiVersion>().unwrap(), ApiVersion::V5);
        assert_eq!(" V2 ".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert!("v4".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn accept_header_names_the_version() {
        for version in ApiVersion::ALL {
            assert!(
                version
                    .accept_header()
                    .contains(&format!("v{}+json", version.number()))
            );
        }
    }
}
