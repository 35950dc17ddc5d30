//! Small stateless commands: /ping, /free_admin, /add, /say

use crate::bot::args::Args;
use crate::bot::context::CommandContext;
use crate::bot::handlers::CommandHandler;
use crate::types::error::{BotError, Result};
use crate::types::model::{Card, Reply};
use crate::types::Outcome;
use async_trait::async_trait;
use std::time::Duration;

const FREE_ADMIN_GIF: &str =
    "https://tenor.com/view/maniac-wanted-reaction-meme-spongebob-gif-24138039";

fn format_latency(latency: Option<Duration>) -> String {
    match latency {
        Some(latency) => format!("Pong! {:.4} ms", latency.as_secs_f64() * 1000.0),
        None => "Pong! (latency not measured yet)".to_string(),
    }
}

pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        let latency = ctx.port.latency().await;
        ctx.reply(Reply::text(format_latency(latency))).await?;
        Ok(Outcome::Sent)
    }
}

pub struct FreeAdmin;

#[async_trait]
impl CommandHandler for FreeAdmin {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        ctx.reply(Reply::text(FREE_ADMIN_GIF)).await?;
        Ok(Outcome::Sent)
    }
}

pub struct Add;

#[async_trait]
impl CommandHandler for Add {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let a = args.integer("first_value")?;
        let b = args.integer("second_value")?;
        let sum = a
            .checked_add(b)
            .ok_or_else(|| BotError::invalid_argument("That sum is too large to compute."))?;

        ctx.reply(Reply::text(format!("{} + {} = {}", a, b, sum)))
            .await?;
        Ok(Outcome::Sent)
    }
}

pub struct Say;

#[async_trait]
impl CommandHandler for Say {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let text = args.string("text")?;
        let user = ctx.user();

        let mut card = Card::titled(format!("{} said:", user.tag)).description(text);
        if let Some(color) = user.color {
            card = card.color(color);
        }

        ctx.reply(Reply::card(card)).await?;
        Ok(Outcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::args::RawValue;
    use crate::bot::testing::{invocation, opt, Action, RecordingPort, TestEnv, STRANGER_ID};

    #[test]
    fn test_format_latency() {
        assert_eq!(
            format_latency(Some(Duration::from_micros(42_500))),
            "Pong! 42.5000 ms"
        );
        assert_eq!(format_latency(None), "Pong! (latency not measured yet)");
    }

    #[tokio::test]
    async fn test_ping_reports_latency() {
        let env = TestEnv::new();
        let port = RecordingPort::new().latency(Duration::from_millis(12));
        let inv = invocation(STRANGER_ID, &["ping"], vec![]);

        let outcome = env.dispatcher.dispatch(&inv, &port).await;

        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(port.replies(), vec![Reply::text("Pong! 12.0000 ms")]);
    }

    #[tokio::test]
    async fn test_free_admin_links_gif() {
        let env = TestEnv::new();
        let port = RecordingPort::new();
        let inv = invocation(STRANGER_ID, &["free_admin"], vec![]);

        env.dispatcher.dispatch(&inv, &port).await;

        assert_eq!(port.replies(), vec![Reply::text(FREE_ADMIN_GIF)]);
    }

    #[tokio::test]
    async fn test_add_sums_arguments() {
        let env = TestEnv::new();
        let port = RecordingPort::new();
        let inv = invocation(
            STRANGER_ID,
            &["add"],
            vec![
                opt("first_value", RawValue::Integer(2)),
                opt("second_value", RawValue::Integer(-5)),
            ],
        );

        let outcome = env.dispatcher.dispatch(&inv, &port).await;

        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(port.actions(), vec![Action::Reply(Reply::text("2 + -5 = -3"))]);
    }

    #[tokio::test]
    async fn test_add_small_sums() {
        let env = TestEnv::new();

        for (a, b, expected) in [(2, 3, "2 + 3 = 5"), (-1, 1, "-1 + 1 = 0")] {
            let port = RecordingPort::new();
            let inv = invocation(
                STRANGER_ID,
                &["add"],
                vec![
                    opt("first_value", RawValue::Integer(a)),
                    opt("second_value", RawValue::Integer(b)),
                ],
            );

            let outcome = env.dispatcher.dispatch(&inv, &port).await;

            assert_eq!(outcome, Outcome::Sent);
            assert_eq!(port.replies(), vec![Reply::text(expected)]);
        }
    }

    #[tokio::test]
    async fn test_add_overflow_is_invalid_argument() {
        let env = TestEnv::new();
        let port = RecordingPort::new();
        let inv = invocation(
            STRANGER_ID,
            &["add"],
            vec![
                opt("first_value", RawValue::Integer(i64::MAX)),
                opt("second_value", RawValue::Integer(1)),
            ],
        );

        let outcome = env.dispatcher.dispatch(&inv, &port).await;

        assert!(outcome.is_failure());
        assert_eq!(
            port.replies(),
            vec![Reply::ephemeral_text("That sum is too large to compute.")]
        );
    }

    #[tokio::test]
    async fn test_say_echoes_in_card() {
        let env = TestEnv::new();
        let port = RecordingPort::new();
        let inv = invocation(
            STRANGER_ID,
            &["say"],
            vec![opt("text", RawValue::String("hi all".into()))],
        );

        env.dispatcher.dispatch(&inv, &port).await;

        let replies = port.replies();
        assert_eq!(replies.len(), 1);
        let card = &replies[0].cards[0];
        assert_eq!(card.title.as_deref(), Some("someone said:"));
        assert_eq!(card.description.as_deref(), Some("hi all"));
        assert_eq!(card.color, Some(0x3498DB));
    }
}
