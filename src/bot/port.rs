use crate::types::error::Result;
use crate::types::model::{MemberRef, Reply};
use async_trait::async_trait;
use std::time::Duration;

/// Every platform side effect a handler can perform, scoped to one interaction.
///
/// The serenity adapter is the production implementation; tests use a
/// recording fake. Mutations that the platform refuses for lack of
/// permissions must surface as `BotError::PlatformPermission`.
#[async_trait]
pub trait DiscordPort: Send + Sync {
    /// The first call answers the interaction, later calls become follow-ups.
    async fn reply(&self, reply: Reply) -> Result<()>;

    /// Acknowledge the interaction without answering it yet. The next
    /// `reply` then completes the deferred response.
    async fn defer(&self) -> Result<()>;

    fn has_replied(&self) -> bool;

    /// Most recent gateway heartbeat round trip, if one was measured.
    async fn latency(&self) -> Option<Duration>;

    /// Post a message to a channel, returning its id.
    async fn send_message(&self, channel_id: u64, message: Reply) -> Result<u64>;

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()>;

    async fn guild_members(&self, guild_id: u64) -> Result<Vec<MemberRef>>;

    async fn set_nickname(&self, guild_id: u64, user_id: u64, nickname: &str) -> Result<()>;

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()>;

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()>;

    /// Delete up to `count` of the newest messages in a channel.
    async fn purge(&self, channel_id: u64, count: usize) -> Result<usize>;
}
