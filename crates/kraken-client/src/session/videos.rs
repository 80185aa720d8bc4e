use super::*;

/// Kinds of video a listing can be filtered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BroadcastType {
    Archive,
    Highlight,
    Upload,
}

impl BroadcastType {
    pub fn as_str(self) -> &'static str {
        match self {
            BroadcastType::Archive => "archive",
            BroadcastType::Highlight => "highlight",
            BroadcastType::Upload => "upload",
        }
    }
}

pub(super) fn broadcast_type_query(types: &[BroadcastType]) -> Option<String> {
    if types.is_empty() {
        return None;
    }
    let mut names: Vec<&str> = Vec::with_capacity(types.len());
    for name in types.iter().map(|t| t.as_str()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    Some(names.join(","))
}

impl<T: Transport> Session<T> {
    /// Recent videos from channels the token owner follows.
    ///
    /// An empty `types` lets the server pick its default (highlights).
    pub async fn retrieve_followed_videos(
        &self,
        page: Page,
        types: &[BroadcastType],
    ) -> Result<Vec<Video>, KrakenError> {
        const OP: &str = "retrieve_followed_videos";
        let mut request = page.apply(self.request(Method::Get, "videos/followed"));
        if let Some(filter) = broadcast_type_query(types) {
            request = request.query("broadcast_type", filter);
        }
        let value = self.get_json(OP, Some(Scope::UserRead), request).await?;
        let version = self.version;
        request::map(
            OP,
            envelope::decode_list(value, "videos", |item| Video::decode(version, item)),
        )
    }
}
