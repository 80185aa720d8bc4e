use super::*;

impl<T: Transport> Session<T> {
    /// Users the token owner has blocked.
    ///
    /// Only v5 reports a `_total` for this listing, so every version returns
    /// the page alone.
    pub async fn retrieve_blocked_users(&self, page: Page) -> Result<BlockedUsers, KrakenError> {
        const OP: &str = "retrieve_blocked_users";
        let request = page.apply(self.request(Method::Get, format!("users/{}/blocks", self.me())));
        let value = self.get_json(OP, Some(Scope::UserBlocksRead), request).await?;
        let version = self.version;
        request::map(
            OP,
            envelope::decode_list(value, "blocks", |item| envelope::decode_block(version, item)),
        )
    }

    pub async fn block_user(&self, user: &str) -> Result<Block, KrakenError> {
        const OP: &str = "block_user";
        let user = request::target(OP, user)?;
        let request = self.request(Method::Put, format!("users/{}/blocks/{user}", self.me()));
        let value = self.get_json(OP, Some(Scope::UserBlocksEdit), request).await?;
        request::map(OP, envelope::decode_block(self.version, value))
    }

    /// Fails with `NotFound` when `user` was not blocked.
    pub async fn unblock_user(&self, user: &str) -> Result<(), KrakenError> {
        const OP: &str = "unblock_user";
        let user = request::target(OP, user)?;
        let request = self.request(Method::Delete, format!("users/{}/blocks/{user}", self.me()));
        self.send(OP, Some(Scope::UserBlocksEdit), request).await?;
        Ok(())
    }
}
