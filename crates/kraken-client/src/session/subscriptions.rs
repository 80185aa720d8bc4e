use super::*;

impl<T: Transport> Session<T> {
    /// Subscribers to the token owner's channel.
    pub async fn retrieve_subscribers(&self, page: Page) -> Result<Subscribers, KrakenError> {
        const OP: &str = "retrieve_subscribers";
        let request = page.apply(
            self.request(Method::Get, format!("channels/{}/subscriptions", self.me())),
        );
        let value = self.get_json(OP, Some(Scope::ChannelSubscriptions), request).await?;
        let version = self.version;
        request::map(
            OP,
            envelope::decode_total(value, "subscriptions", |item| {
                envelope::decode_subscription(version, item)
            }),
        )
    }

    /// Check whether `user` subscribes to the token owner's channel.
    ///
    /// Fails with `NotFound` when they do not.
    pub async fn retrieve_subscriber(&self, user: &str) -> Result<Subscription<User>, KrakenError> {
        const OP: &str = "retrieve_subscriber";
        let user = request::target(OP, user)?;
        let request = self.request(
            Method::Get,
            format!("channels/{}/subscriptions/{user}", self.me()),
        );
        let value = self
            .get_json(OP, Some(Scope::ChannelCheckSubscription), request)
            .await?;
        request::map(OP, envelope::decode_subscription(self.version, value))
    }

    /// The token owner's subscription to `channel`, or `None` if there is none.
    pub async fn retrieve_subscription(
        &self,
        channel: &str,
    ) -> Result<Option<Subscription<Channel>>, KrakenError> {
        const OP: &str = "retrieve_subscription";
        let channel = request::target(OP, channel)?;
        let request = self.request(
            Method::Get,
            format!("users/{}/subscriptions/{channel}", self.me()),
        );
        let value = match self.get_json(OP, Some(Scope::UserSubscriptions), request).await {
            Ok(value) => value,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        request::map(OP, envelope::decode_subscription(self.version, value)).map(Some)
    }
}
