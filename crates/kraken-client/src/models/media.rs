//! Small value types for video renditions and the quality-keyed tables
//! they come in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::mapping::{self, MappingError};

/// Rendition labels used as keys in fps and resolution tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quality {
    Chunked,
    High,
    Medium,
    Low,
    Mobile,
    AudioOnly,
}

impl Quality {
    pub const ALL: [Quality; 6] = [
        Quality::Chunked,
        Quality::High,
        Quality::Medium,
        Quality::Low,
        Quality::Mobile,
        Quality::AudioOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Chunked => "chunked",
            Quality::High => "high",
            Quality::Medium => "medium",
            Quality::Low => "low",
            Quality::Mobile => "mobile",
            Quality::AudioOnly => "audio_only",
        }
    }

    /// `audio_only` has a frame rate entry but never a resolution.
    pub fn has_picture(self) -> bool {
        self != Quality::AudioOnly
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame size in pixels, written `WIDTHxHEIGHT` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resolution {
    width: u32,
    height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionParseError {
    #[error("{0:?} has no `x` separator")]
    MissingSeparator(String),
    #[error("{0:?} is not WIDTHxHEIGHT")]
    InvalidDimension(String),
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Components past the second are ignored: `1280x720x1` is 1280x720.
        let mut parts = s.split('x');
        let (Some(w), Some(h)) = (parts.next(), parts.next()) else {
            return Err(ResolutionParseError::MissingSeparator(s.to_string()));
        };
        let invalid = || ResolutionParseError::InvalidDimension(s.to_string());
        Ok(Self {
            width: w.trim().parse().map_err(|_| invalid())?,
            height: h.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A still image for a video, with the kind of image it is
/// (`generated`, `custom`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    url: Url,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThumbnailError {
    #[error("expected a non-empty array of thumbnail objects")]
    NotAnArray,
    #[error("thumbnail object has no string `{0}`")]
    MissingField(&'static str),
    #[error("invalid thumbnail url: {0}")]
    Url(#[from] url::ParseError),
}

impl Thumbnail {
    pub fn new(url: &str, kind: impl Into<String>) -> Result<Self, ThumbnailError> {
        Ok(Self {
            url: Url::parse(url)?,
            kind: kind.into(),
        })
    }

    /// Parse the wire form: `[{"url": "...", "type": "..."}]`.
    pub fn from_entry(entry: &Value) -> Result<Self, ThumbnailError> {
        let first = entry
            .as_array()
            .and_then(|items| items.first())
            .ok_or(ThumbnailError::NotAnArray)?;
        let field = |name: &'static str| {
            first
                .get(name)
                .and_then(Value::as_str)
                .ok_or(ThumbnailError::MissingField(name))
        };
        Self::new(field("url")?, field("type")?)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

/// Parse a resolutions table. Entries without an `x` are skipped.
// TODO: confirm with the API owners whether separator-less entries should fail
// the table like malformed thumbnails do.
pub(crate) fn resolutions(
    value: Option<Value>,
) -> Result<Option<BTreeMap<String, Resolution>>, MappingError> {
    let Some(table) = mapping::sub_document::<BTreeMap<String, String>>("resolutions", value)?
    else {
        return Ok(None);
    };

    let mut out = BTreeMap::new();
    for (key, raw) in table {
        if !raw.contains('x') {
            tracing::debug!(quality = %key, value = %raw, "Skipping resolution without separator");
            continue;
        }
        let resolution = raw
            .parse()
            .map_err(|source| MappingError::Resolution {
                key: key.clone(),
                source,
            })?;
        out.insert(key, resolution);
    }
    Ok(Some(out))
}

pub(crate) fn fps(value: Option<Value>) -> Result<Option<BTreeMap<String, f64>>, MappingError> {
    mapping::sub_document("fps", value)
}

/// Parse a thumbnails table. Any malformed entry fails the whole table.
pub(crate) fn thumbnails(
    value: Option<Value>,
) -> Result<Option<BTreeMap<String, Thumbnail>>, MappingError> {
    let Some(table) = mapping::sub_document::<BTreeMap<String, Value>>("thumbnails", value)? else {
        return Ok(None);
    };
    table
        .into_iter()
        .map(|(key, entry)| match Thumbnail::from_entry(&entry) {
            Ok(thumbnail) => Ok((key, thumbnail)),
            Err(source) => Err(MappingError::Thumbnail { key, source }),
        })
        .collect::<Result<_, _>>()
        .map(Some)
}

/// Parse the v5 preview table of size label to image URL.
pub(crate) fn previews(
    value: Option<Value>,
) -> Result<Option<BTreeMap<String, Url>>, MappingError> {
    let Some(table) = mapping::sub_document::<BTreeMap<String, String>>("preview", value)? else {
        return Ok(None);
    };
    table
        .into_iter()
        .map(|(key, href)| mapping::url("preview", &href).map(|href| (key, href)))
        .collect::<Result<_, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolution_parses_width_and_height() {
        let res: Resolution = "1280x720".parse().unwrap();
        assert_eq!(res, Resolution::new(1280, 720));
        assert_eq!(res.width(), 1280);
        assert_eq!(res.height(), 720);
        assert_eq!(res.to_string(), "1280x720");
    }

    #[test]
    fn resolution_rejects_bad_forms() {
        assert!(matches!(
            "720p".parse::<Resolution>(),
            Err(ResolutionParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "widexhigh".parse::<Resolution>(),
            Err(ResolutionParseError::InvalidDimension(_))
        ));
    }

    #[test]
    fn resolution_ignores_trailing_components() {
        let res: Resolution = "1280x720x1".parse().unwrap();
        assert_eq!(res, Resolution::new(1280, 720));
    }

    #[test]
    fn resolution_table_skips_entries_without_separator() {
        let well_formed = json!({
            "chunked": "1920x1080",
            "high": "1280x720",
            "medium": "852x480",
            "low": "640x360",
            "mobile": "400x226"
        });
        let mut with_bad = well_formed.clone();
        with_bad["high"] = json!("720p");

        let full = resolutions(Some(well_formed)).unwrap().unwrap();
        let partial = resolutions(Some(with_bad)).unwrap().unwrap();

        assert_eq!(full.len(), 5);
        assert_eq!(partial.len(), full.len() - 1);
        assert!(!partial.contains_key("high"));
        assert_eq!(partial["chunked"], Resolution::new(1920, 1080));
    }

    #[test]
    fn resolution_table_fails_on_non_numeric_dimensions() {
        let err = resolutions(Some(json!({"high": "axb"}))).unwrap_err();
        assert!(matches!(err, MappingError::Resolution { ref key, .. } if key == "high"));
    }

    #[test]
    fn thumbnail_entry_parses_url_and_type() {
        let entry = json!([{"url": "http://x/img.jpg", "type": "generated"}]);
        let thumb = Thumbnail::from_entry(&entry).unwrap();
        assert_eq!(thumb.kind(), "generated");
        assert_eq!(thumb.url().as_str(), "http://x/img.jpg");
    }

    #[test]
    fn thumbnail_shape_violations_fail() {
        assert_eq!(
            Thumbnail::from_entry(&json!({"url": "http://x/a.jpg"})),
            Err(ThumbnailError::NotAnArray)
        );
        assert_eq!(Thumbnail::from_entry(&json!([])), Err(ThumbnailError::NotAnArray));
        assert_eq!(
            Thumbnail::from_entry(&json!([{"url": "http://x/a.jpg"}])),
            Err(ThumbnailError::MissingField("type"))
        );
        assert!(matches!(
            Thumbnail::from_entry(&json!([{"url": "nope", "type": "custom"}])),
            Err(ThumbnailError::Url(_))
        ));
    }

    #[test]
    fn thumbnail_table_propagates_entry_failure() {
        let value = json!({
            "large": [{"url": "http://x/large.jpg", "type": "generated"}],
            "small": "http://x/small.jpg"
        });
        let err = thumbnails(Some(value)).unwrap_err();
        assert!(matches!(err, MappingError::Thumbnail { ref key, .. } if key == "small"));
    }

    #[test]
    fn fps_keeps_only_present_keys() {
        let table = fps(Some(json!({"chunked": 59.94, "audio_only": 0.0})))
            .unwrap()
            .unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.contains_key(Quality::High.as_str()));
        assert_eq!(table[Quality::AudioOnly.as_str()], 0.0);
    }

    #[test]
    fn quality_labels_match_wire_keys() {
        let labels: Vec<_> = Quality::ALL.iter().map(|q| q.as_str()).collect();
        assert_eq!(
            labels,
            ["chunked", "high", "medium", "low", "mobile", "audio_only"]
        );
        assert!(!Quality::AudioOnly.has_picture());
    }
}
