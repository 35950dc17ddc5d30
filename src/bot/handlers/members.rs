//! Member commands: /joined, /set_nick and the "Show Join Date" menu

use crate::bot::args::Args;
use crate::bot::context::CommandContext;
use crate::bot::handlers::CommandHandler;
use crate::types::error::Result;
use crate::types::model::{MemberRef, Reply};
use crate::types::Outcome;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Discord refuses longer nicknames.
pub const MAX_NICKNAME_CHARS: usize = 32;

/// Discord timestamp markup, rendered in the reader's locale.
fn discord_time(unix: i64) -> String {
    format!("<t:{}:f>", unix)
}

fn join_line(member: &MemberRef, joined_word: &str) -> String {
    match member.joined_at {
        Some(unix) => format!("{} {} {}", member.tag, joined_word, discord_time(unix)),
        None => format!("{}'s join date is unknown.", member.tag),
    }
}

pub struct Joined;

#[async_trait]
impl CommandHandler for Joined {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let member = args.optional_user("member").unwrap_or(ctx.user());
        ctx.reply(Reply::text(join_line(member, "joined"))).await?;
        Ok(Outcome::Sent)
    }
}

pub struct ShowJoinDate;

#[async_trait]
impl CommandHandler for ShowJoinDate {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        let member = ctx.target_member()?;
        ctx.reply(Reply::text(join_line(member, "joined at"))).await?;
        Ok(Outcome::Sent)
    }
}

/// Renames every member; with no argument, resets each to their username.
pub struct SetNick;

#[async_trait]
impl CommandHandler for SetNick {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let guild_id = ctx.guild_id()?;
        let nickname = args.optional_string("nickname");

        let announcement = match nickname {
            Some(nick) => format!("Changing the nickname of everyone in the guild to {}", nick),
            None => "Changing the nickname of everyone in the guild back to their usernames"
                .to_string(),
        };
        ctx.reply(Reply::text(announcement)).await?;

        let members = ctx.port.guild_members(guild_id).await?;
        let mut renamed = 0usize;
        let mut skipped = 0usize;

        for member in &members {
            let target = nickname.unwrap_or(member.username.as_str());
            match ctx.port.set_nickname(guild_id, member.id, target).await {
                Ok(()) => renamed += 1,
                Err(e) if e.is_forbidden() => {
                    debug!(user_id = member.id, "Skipping member above the bot's role");
                    skipped += 1;
                }
                Err(e) => {
                    warn!(user_id = member.id, error = %e, "Failed to set nickname");
                    skipped += 1;
                }
            }
        }

        info!(guild_id, renamed, skipped, "Nickname sweep finished");
        ctx.reply(Reply::text(format!(
            "Renamed {} members, skipped {}.",
            renamed, skipped
        )))
        .await?;
        Ok(Outcome::Sent)
    }
}
