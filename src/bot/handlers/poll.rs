//! /poll and the "Poll Winner" message menu

use crate::bot::args::Args;
use crate::bot::context::CommandContext;
use crate::bot::handlers::CommandHandler;
use crate::types::error::Result;
use crate::types::model::{Card, ReactionTally, Reply};
use crate::types::Outcome;
use async_trait::async_trait;
use tracing::debug;

pub const MAX_OPTIONS: usize = 10;

/// Split a comma-separated option list, dropping blank entries.
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Keycap emoji for 1..=10.
pub fn number_emoji(n: usize) -> Option<String> {
    match n {
        1..=9 => Some(format!("{}\u{FE0F}\u{20E3}", n)),
        10 => Some("\u{1F51F}".to_string()),
        _ => None,
    }
}

/// Reaction with the strictly highest count. Ties keep the earlier one.
pub fn pick_winner(reactions: &[ReactionTally]) -> Option<&ReactionTally> {
    let mut winner: Option<&ReactionTally> = None;
    for reaction in reactions {
        match winner {
            Some(w) if reaction.count <= w.count => {}
            _ => winner = Some(reaction),
        }
    }
    winner
}

pub struct Poll;

#[async_trait]
impl CommandHandler for Poll {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let question = args.string("poll_question")?;
        let options = parse_options(args.string("poll_options")?);

        if options.is_empty() {
            ctx.reply(Reply::ephemeral_text("Provide at least one poll option."))
                .await?;
            return Ok(Outcome::failed("no poll options"));
        }
        if options.len() > MAX_OPTIONS {
            ctx.reply(Reply::ephemeral_text(
                "You cannot have more than 10 poll options.",
            ))
            .await?;
            return Ok(Outcome::failed("too many poll options"));
        }

        let lines: Vec<String> = options
            .iter()
            .enumerate()
            .map(|(i, option)| format!("{}: {}", i + 1, option))
            .collect();
        let card = Card::titled(question).description(lines.join("\n"));

        let channel_id = ctx.channel_id();
        let message_id = ctx.port.send_message(channel_id, Reply::card(card)).await?;

        // Reactions are rate limited per channel; answer before the interaction expires.
        ctx.reply(Reply::ephemeral_text("Poll posted.")).await?;

        for emoji in (1..=options.len()).filter_map(number_emoji) {
            ctx.port.add_reaction(channel_id, message_id, &emoji).await?;
        }
        debug!(channel_id, message_id, options = options.len(), "Poll posted");
        Ok(Outcome::Sent)
    }
}

pub struct PollWinner;

#[async_trait]
impl CommandHandler for PollWinner {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        let message = ctx.target_message()?;

        if ctx.settings.bot_user_id() != Some(message.author.id) {
            debug!(message_id = message.id, "Poll Winner on a message the bot did not post");
            return Ok(Outcome::Skipped);
        }

        match pick_winner(&message.reactions) {
            Some(winner) => {
                ctx.reply(Reply::text(format!("The winner is {}!", winner.emoji)))
                    .await?;
                Ok(Outcome::Sent)
            }
            None => {
                ctx.reply(Reply::ephemeral_text("This message has no reactions."))
                    .await?;
                Ok(Outcome::Sent)
            }
        }
    }
}
