use serde::Serialize;
use serde_json::json;

use super::*;
use crate::models::MappingError;

/// Fields to change on the token owner's channel. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    /// Stream delay in seconds; partners only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u32>,
    /// v5 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_feed_enabled: Option<bool>,
}

/// Commercial lengths the API accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommercialLength {
    Sec30,
    Sec60,
    Sec90,
    Sec120,
    Sec150,
    Sec180,
}

impl CommercialLength {
    pub fn seconds(self) -> u32 {
        match self {
            CommercialLength::Sec30 => 30,
            CommercialLength::Sec60 => 60,
            CommercialLength::Sec90 => 90,
            CommercialLength::Sec120 => 120,
            CommercialLength::Sec150 => 150,
            CommercialLength::Sec180 => 180,
        }
    }
}

impl<T: Transport> Session<T> {
    /// Retrieve the token owner's channel, including the stream key.
    pub async fn retrieve_channel(&self) -> Result<Channel, KrakenError> {
        const OP: &str = "retrieve_channel";
        let value = self
            .get_json(OP, Some(Scope::ChannelRead), self.request(Method::Get, "channel"))
            .await?;
        self.decode_one(OP, value)
    }

    /// Update the token owner's channel and return the updated channel.
    pub async fn update_channel(&self, update: &ChannelUpdate) -> Result<Channel, KrakenError> {
        const OP: &str = "update_channel";
        let mut fields = update.clone();
        if !self.version.addresses_by_id() {
            fields.channel_feed_enabled = None;
        }
        let request = self
            .request(Method::Put, format!("channels/{}", self.me()))
            .json(json!({ "channel": fields }));
        let value = self.get_json(OP, Some(Scope::ChannelEditor), request).await?;
        self.decode_one(OP, value)
    }

    /// Reset the stream key and return the new one.
    pub async fn reset_stream_key(&self) -> Result<String, KrakenError> {
        const OP: &str = "reset_stream_key";
        let request = self.request(Method::Delete, format!("channels/{}/stream_key", self.me()));
        let value = self.get_json(OP, Some(Scope::ChannelStream), request).await?;
        value
            .get("stream_key")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| KrakenError::malformed(OP, MappingError::Missing("stream_key")))
    }

    /// Start a commercial on the token owner's channel.
    ///
    /// The server answers 422 when the channel is not a partner or a
    /// commercial ran too recently; that arrives as `BadRequest`.
    pub async fn start_commercial(&self, length: CommercialLength) -> Result<(), KrakenError> {
        const OP: &str = "start_commercial";
        let request = self
            .request(Method::Post, format!("channels/{}/commercial", self.me()))
            .json(json!({ "length": length.seconds() }));
        self.send(OP, Some(Scope::ChannelCommercial), request).await?;
        Ok(())
    }

    /// Users allowed to edit the token owner's channel.
    pub async fn retrieve_channel_editors(&self) -> Result<Vec<User>, KrakenError> {
        const OP: &str = "retrieve_channel_editors";
        let request = self.request(Method::Get, format!("channels/{}/editors", self.me()));
        let value = self.get_json(OP, Some(Scope::ChannelRead), request).await?;
        let version = self.version;
        request::map(
            OP,
            envelope::decode_list(value, "users", |item| User::decode(version, item)),
        )
    }
}
