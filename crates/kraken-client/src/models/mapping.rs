//! Shared conversion helpers for the versioned mappers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use url::Url;

use super::media::{ResolutionParseError, ThumbnailError};
use crate::version::ApiVersion;

/// A response that does not have the shape documented for its version.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("`{field}` is not a valid URL ({value:?}): {source}")]
    Url {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("`{field}` is not an RFC 3339 timestamp ({value:?}): {source}")]
    Date {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("resolution `{key}`: {source}")]
    Resolution {
        key: String,
        #[source]
        source: ResolutionParseError,
    },

    #[error("thumbnail `{key}`: {source}")]
    Thumbnail {
        key: String,
        #[source]
        source: ThumbnailError,
    },

    #[error("`{field}` has an unexpected shape: {source}")]
    Shape {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{entity} payload does not match api {version}: {source}")]
    Decode {
        entity: &'static str,
        version: ApiVersion,
        #[source]
        source: serde_json::Error,
    },

    #[error("response is missing `{0}`")]
    Missing(&'static str),
}

pub(crate) fn url(field: &'static str, value: &str) -> Result<Url, MappingError> {
    Url::parse(value).map_err(|source| MappingError::Url {
        field,
        value: value.to_string(),
        source,
    })
}

/// Empty or absent text means "no URL".
pub(crate) fn optional_url(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<Url>, MappingError> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| url(field, &v))
        .transpose()
}

pub(crate) fn date(field: &'static str, value: &str) -> Result<DateTime<Utc>, MappingError> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|source| MappingError::Date {
            field,
            value: value.to_string(),
            source,
        })
}

pub(crate) fn optional_date(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<DateTime<Utc>>, MappingError> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| date(field, &v))
        .transpose()
}

/// Decode an optional nested document.
///
/// `null`, absence and the empty string leave the field unset. A non-empty
/// string is treated as embedded JSON text; anything else is decoded as is.
pub(crate) fn sub_document<T: DeserializeOwned>(
    field: &'static str,
    value: Option<Value>,
) -> Result<Option<T>, MappingError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) if text.is_empty() => return Ok(None),
        Some(Value::String(text)) => serde_json::from_str(&text),
        Some(other) => serde_json::from_value(other),
    };
    parsed
        .map(Some)
        .map_err(|source| MappingError::Shape { field, source })
}

/// `_links` of v2/v3 documents. Every value must be a URL.
pub(crate) fn links(value: Option<Value>) -> Result<Option<BTreeMap<String, Url>>, MappingError> {
    let Some(table) = sub_document::<BTreeMap<String, String>>("_links", value)? else {
        return Ok(None);
    };
    table
        .into_iter()
        .map(|(rel, href)| url("_links", &href).map(|href| (rel, href)))
        .collect::<Result<_, _>>()
        .map(Some)
}

/// serde helpers for the quirks of Kraken payloads.
pub(crate) mod de {
    use super::*;

    /// Treat an explicit `null` like a missing field.
    pub(crate) fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Option::<T>::deserialize(d).map(Option::unwrap_or_default)
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(u64),
        Text(String),
    }

    /// Ids are JSON numbers before v5 and numeric strings from v5 on.
    pub(crate) fn numeric_id<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        match IdRepr::deserialize(d)? {
            IdRepr::Number(n) => Ok(n),
            IdRepr::Text(s) => s
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("id {s:?} is not numeric"))),
        }
    }

    pub(crate) fn optional_numeric_id<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<u64>, D::Error> {
        match Option::<IdRepr>::deserialize(d)? {
            None => Ok(None),
            Some(IdRepr::Number(n)) => Ok(Some(n)),
            Some(IdRepr::Text(s)) if s.is_empty() => Ok(None),
            Some(IdRepr::Text(s)) => s
                .parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("id {s:?} is not numeric"))),
        }
    }

    /// Relation ids are opaque; keep numbers as their decimal text.
    pub(crate) fn text_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match IdRepr::deserialize(d)? {
            IdRepr::Number(n) => Ok(n.to_string()),
            IdRepr::Text(s) => Ok(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sub_document_unset_inputs() {
        for value in [None, Some(Value::Null), Some(json!(""))] {
            let parsed: Option<BTreeMap<String, f64>> = sub_document("fps", value).unwrap();
            assert!(parsed.is_none());
        }
    }

    #[test]
    fn sub_document_accepts_embedded_text_and_objects() {
        let from_text: Option<BTreeMap<String, f64>> =
            sub_document("fps", Some(json!(r#"{"high":30.0}"#))).unwrap();
        let from_object: Option<BTreeMap<String, f64>> =
            sub_document("fps", Some(json!({"high": 30.0}))).unwrap();
        assert_eq!(from_text, from_object);
        assert_eq!(from_text.unwrap()["high"], 30.0);
    }

    #[test]
    fn sub_document_shape_violation_is_an_error() {
        let err = sub_document::<BTreeMap<String, f64>>("fps", Some(json!([1, 2]))).unwrap_err();
        assert!(matches!(err, MappingError::Shape { field: "fps", .. }));
    }

    #[test]
    fn invalid_date_is_a_hard_failure() {
        assert!(date("created_at", "2016-12-14T22:49:56Z").is_ok());
        let err = date("created_at", "yesterday").unwrap_err();
        assert!(matches!(err, MappingError::Date { field: "created_at", .. }));
    }

    #[test]
    fn empty_optional_url_is_unset() {
        assert_eq!(optional_url("logo", Some(String::new())).unwrap(), None);
        assert!(optional_url("logo", Some("not a url".into())).is_err());
    }
}
