use crate::bot::port::DiscordPort;
use crate::discord::convert::{self, classify};
use crate::discord::ShardManagerContainer;
use crate::types::error::Result;
use crate::types::model::{MemberRef, Reply};
use async_trait::async_trait;
use futures::StreamExt;
use serenity::all::{
    ChannelId, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditMember, GetMessages,
    GuildId, MessageId, ReactionType, RoleId, Timestamp, UserId,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

/// Discord's cap on messages fetched per request.
const MAX_FETCH: usize = 100;

/// Bulk delete rejects the whole batch if any message is older than two
/// weeks. Keep a minute of slack for clock skew.
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60 - 60;

/// Split message ids into those bulk delete accepts and those that must be
/// deleted one at a time.
fn split_by_age(ids: &[MessageId], now_unix: i64) -> (Vec<MessageId>, Vec<MessageId>) {
    ids.iter().copied().partition(|id| {
        now_unix - id.created_at().unix_timestamp() < BULK_DELETE_MAX_AGE_SECS
    })
}

/// [`DiscordPort`] backed by the live gateway context for one interaction.
pub struct SerenityPort<'a> {
    ctx: &'a Context,
    interaction: &'a CommandInteraction,
    deferred: AtomicBool,
    replied: AtomicBool,
}

impl<'a> SerenityPort<'a> {
    pub fn new(ctx: &'a Context, interaction: &'a CommandInteraction) -> Self {
        Self {
            ctx,
            interaction,
            deferred: AtomicBool::new(false),
            replied: AtomicBool::new(false),
        }
    }

    /// A deferred response is public. Ephemeral replies replace the
    /// placeholder with an ephemeral follow-up instead of editing it.
    async fn complete_deferred(&self, reply: &Reply) -> serenity::Result<()> {
        if reply.ephemeral {
            self.interaction.delete_response(&self.ctx.http).await?;
            self.interaction
                .create_followup(&self.ctx.http, convert::followup(reply))
                .await?;
        } else {
            self.interaction
                .edit_response(&self.ctx.http, convert::edit_response(reply))
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl DiscordPort for SerenityPort<'_> {
    async fn reply(&self, reply: Reply) -> Result<()> {
        if self.replied.swap(true, Ordering::SeqCst) {
            self.interaction
                .create_followup(&self.ctx.http, convert::followup(&reply))
                .await
                .map_err(classify)?;
            return Ok(());
        }

        let result = if self.deferred.load(Ordering::SeqCst) {
            self.complete_deferred(&reply).await
        } else {
            let response = CreateInteractionResponse::Message(convert::response_message(&reply));
            self.interaction
                .create_response(&self.ctx.http, response)
                .await
        };
        if let Err(e) = result {
            self.replied.store(false, Ordering::SeqCst);
            return Err(classify(e));
        }
        Ok(())
    }

    async fn defer(&self) -> Result<()> {
        let response = CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new());
        self.interaction
            .create_response(&self.ctx.http, response)
            .await
            .map_err(classify)?;
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn has_replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    async fn latency(&self) -> Option<Duration> {
        let manager = {
            let data = self.ctx.data.read().await;
            data.get::<ShardManagerContainer>()?.clone()
        };
        let runners = manager.runners.lock().await;
        runners.get(&self.ctx.shard_id).and_then(|runner| runner.latency)
    }

    async fn send_message(&self, channel_id: u64, message: Reply) -> Result<u64> {
        let sent = ChannelId::new(channel_id)
            .send_message(&self.ctx.http, convert::channel_message(&message))
            .await
            .map_err(classify)?;
        Ok(sent.id.get())
    }

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()> {
        ChannelId::new(channel_id)
            .create_reaction(
                &self.ctx.http,
                MessageId::new(message_id),
                ReactionType::Unicode(emoji.to_string()),
            )
            .await
            .map_err(classify)
    }

    async fn guild_members(&self, guild_id: u64) -> Result<Vec<MemberRef>> {
        let mut members = Vec::new();
        let mut stream = Box::pin(GuildId::new(guild_id).members_iter(&self.ctx.http));
        while let Some(member) = stream.next().await {
            let member = member.map_err(classify)?;
            members.push(convert::member(&member, Some(&self.ctx.cache)));
        }
        debug!(guild_id, count = members.len(), "Fetched guild members");
        Ok(members)
    }

    async fn set_nickname(&self, guild_id: u64, user_id: u64, nickname: &str) -> Result<()> {
        GuildId::new(guild_id)
            .edit_member(
                &self.ctx.http,
                UserId::new(user_id),
                EditMember::new().nickname(nickname),
            )
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        self.ctx
            .http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                None,
            )
            .await
            .map_err(classify)
    }

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        self.ctx
            .http
            .remove_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                None,
            )
            .await
            .map_err(classify)
    }

    async fn purge(&self, channel_id: u64, count: usize) -> Result<usize> {
        let channel = ChannelId::new(channel_id);
        let limit = count.min(MAX_FETCH) as u8;
        let messages = channel
            .messages(&self.ctx.http, GetMessages::new().limit(limit))
            .await
            .map_err(classify)?;
        let ids: Vec<MessageId> = messages.iter().map(|m| m.id).collect();
        let (recent, old) = split_by_age(&ids, Timestamp::now().unix_timestamp());

        match recent.as_slice() {
            [] => {}
            [single] => channel
                .delete_message(&self.ctx.http, *single)
                .await
                .map_err(classify)?,
            _ => channel
                .delete_messages(&self.ctx.http, &recent)
                .await
                .map_err(classify)?,
        }
        for id in &old {
            channel
                .delete_message(&self.ctx.http, *id)
                .await
                .map_err(classify)?;
        }
        debug!(channel_id, recent = recent.len(), old = old.len(), "Purged messages");
        Ok(ids.len())
    }
}
