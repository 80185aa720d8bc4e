use super::*;

impl<T: Transport> Session<T> {
    /// Users following the token owner's channel.
    pub async fn retrieve_followers(&self, page: Page) -> Result<Followers, KrakenError> {
        const OP: &str = "retrieve_followers";
        let request =
            page.apply(self.request(Method::Get, format!("channels/{}/follows", self.me())));
        let value = self.get_json(OP, None, request).await?;
        self.decode_follows(OP, value)
    }

    /// Channels the token owner follows.
    pub async fn retrieve_following(&self, page: Page) -> Result<Following, KrakenError> {
        const OP: &str = "retrieve_following";
        let request = page.apply(
            self.request(Method::Get, format!("users/{}/follows/channels", self.me())),
        );
        let value = self.get_json(OP, None, request).await?;
        self.decode_follows(OP, value)
    }

    /// The follow relation to one channel.
    ///
    /// Fails with `NotFound` when the token owner does not follow `channel`.
    pub async fn retrieve_following_channel(
        &self,
        channel: &str,
    ) -> Result<Follow<Channel>, KrakenError> {
        const OP: &str = "retrieve_following_channel";
        let channel = request::target(OP, channel)?;
        let request = self.request(
            Method::Get,
            format!("users/{}/follows/channels/{channel}", self.me()),
        );
        let value = self.get_json(OP, None, request).await?;
        request::map(OP, envelope::decode_follow(self.version, value))
    }

    pub async fn follow_channel(
        &self,
        channel: &str,
        notifications: bool,
    ) -> Result<Follow<Channel>, KrakenError> {
        const OP: &str = "follow_channel";
        let channel = request::target(OP, channel)?;
        let request = self
            .request(
                Method::Put,
                format!("users/{}/follows/channels/{channel}", self.me()),
            )
            .query("notifications", notifications);
        let value = self.get_json(OP, Some(Scope::UserFollowsEdit), request).await?;
        request::map(OP, envelope::decode_follow(self.version, value))
    }

    /// Fails with `NotFound` when the token owner was not following `channel`.
    pub async fn unfollow_channel(&self, channel: &str) -> Result<(), KrakenError> {
        const OP: &str = "unfollow_channel";
        let channel = request::target(OP, channel)?;
        let request = self.request(
            Method::Delete,
            format!("users/{}/follows/channels/{channel}", self.me()),
        );
        self.send(OP, Some(Scope::UserFollowsEdit), request).await?;
        Ok(())
    }
}
