//! Owner moderation: /purge, /mod role, /sleep, plus the "Report to
//! Moderators" message menu that anyone can use.

use crate::bot::args::Args;
use crate::bot::context::CommandContext;
use crate::bot::handlers::CommandHandler;
use crate::types::error::{BotError, Result};
use crate::types::model::{Card, Reply};
use crate::types::Outcome;
use async_trait::async_trait;
use tracing::{info, warn};

pub struct Purge;

#[async_trait]
impl CommandHandler for Purge {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let amount = args.integer("amount")?;
        let count = usize::try_from(amount)
            .map_err(|_| BotError::invalid_argument("`amount` must be between 1 and 99"))?;

        ctx.reply(Reply::text(format!("Purging {} messages", amount)))
            .await?;

        // The announcement above is the newest message, so take one extra.
        let deleted = ctx.port.purge(ctx.channel_id(), count + 1).await?;
        info!(channel_id = ctx.channel_id(), requested = count, deleted, "Purged messages");
        Ok(Outcome::Sent)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RoleChange {
    Add,
    Remove,
}

impl RoleChange {
    fn parse(choice: &str) -> Result<Self> {
        match choice {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(BotError::invalid_argument(format!(
                "Invalid choice: {}",
                other
            ))),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

pub struct Role;

#[async_trait]
impl CommandHandler for Role {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let change = RoleChange::parse(args.string("choice")?)?;
        let role = args.role("rank")?;
        let member = args.user("member")?;
        let guild_id = ctx.guild_id()?;

        let result = match change {
            RoleChange::Add => ctx.port.add_role(guild_id, member.id, role.id).await,
            RoleChange::Remove => ctx.port.remove_role(guild_id, member.id, role.id).await,
        };

        match result {
            Ok(()) => {
                let text = match change {
                    RoleChange::Add => format!("Added {} to {}", role.name, member.tag),
                    RoleChange::Remove => format!("Removed {} from {}", role.name, member.tag),
                };
                ctx.reply(Reply::text(text)).await?;
                Ok(Outcome::Sent)
            }
            Err(e) if e.is_forbidden() => {
                warn!(role_id = role.id, user_id = member.id, error = %e, "Role change forbidden");
                ctx.reply(Reply::ephemeral_text(format!(
                    "I do not have permission to {} roles.",
                    change.verb()
                )))
                .await?;
                Ok(Outcome::failed(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

pub struct Sleep;

#[async_trait]
impl CommandHandler for Sleep {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        ctx.reply(Reply::text("Shutting down...")).await?;
        info!(user_id = ctx.user().id, "Shutdown requested from Discord");
        ctx.shutdown.trigger();
        Ok(Outcome::Sent)
    }
}

/// Forwards a message to the moderation log channel.
pub struct Report;

#[async_trait]
impl CommandHandler for Report {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        let message = ctx.target_message()?;

        ctx.reply(Reply::ephemeral_text(format!(
            "Thanks for reporting this message by {} to our moderators.",
            message.author.mention()
        )))
        .await?;

        let mut card = Card::titled("Reported Message")
            .author(
                message.author.display_name.clone(),
                message.author.avatar_url.clone(),
            )
            .timestamp(message.created_at);
        if !message.content.is_empty() {
            card = card.description(message.content.clone());
        }

        let report = Reply::card(card)
            .with_link("Go to Message", message.jump_url(ctx.invocation.guild_id));
        ctx.port
            .send_message(ctx.settings.log_channel_id, report)
            .await?;

        info!(
            message_id = message.id,
            reporter_id = ctx.user().id,
            "Message reported"
        );
        Ok(Outcome::Sent)
    }
}
