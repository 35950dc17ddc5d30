//! `/fetch` subcommands backed by public HTTP APIs

use crate::bot::args::Args;
use crate::bot::context::CommandContext;
use crate::bot::handlers::CommandHandler;
use crate::fetch::WIKIPEDIA_LOGO;
use crate::types::error::{BotError, Result};
use crate::types::model::{Card, Reply};
use crate::types::Outcome;
use async_trait::async_trait;
use tracing::warn;

const XKCD_COLOR: u32 = 0x6B8BA4;
const WIKI_COLOR: u32 = 0xA2A9B1;
const ANIMAL_COLOR: u32 = 0x964B00;
const JOKE_COLOR: u32 = 0x00FF00;
const QUOTE_COLOR: u32 = 0xFF0000;
const FACT_COLOR: u32 = 0x0000FF;

const SUMMARY_CHARS: usize = 200;

/// Log the upstream failure and turn it into the reply the invoker sees.
fn upstream(command: &str, err: anyhow::Error, message: impl Into<String>) -> BotError {
    warn!(command, error = ?err, "Upstream fetch failed");
    BotError::upstream_fetch(message)
}

fn summarize(extract: &str) -> String {
    let head: String = extract.chars().take(SUMMARY_CHARS).collect();
    format!("{}...", head)
}

/// First letter upper-cased, the rest lower-cased.
fn capitalize(topic: &str) -> String {
    let mut chars = topic.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub struct Xkcd;

#[async_trait]
impl CommandHandler for Xkcd {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        const FAILED: &str = "Couldn't fetch that comic.";

        let number = match args.optional_integer("comic_number") {
            Some(n) => Some(u32::try_from(n).map_err(|_| BotError::upstream_fetch(FAILED))?),
            None => None,
        };
        let comic = ctx
            .fetch
            .xkcd(number)
            .await
            .map_err(|e| upstream("xkcd", e, FAILED))?;

        let card = Card::titled(comic.safe_title)
            .description(comic.alt)
            .url(comic.img.clone())
            .image(comic.img)
            .color(XKCD_COLOR);
        ctx.reply(Reply::card(card)).await?;
        Ok(Outcome::Sent)
    }
}

pub struct Wiki;

#[async_trait]
impl CommandHandler for Wiki {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let topic = args.string("topic")?;
        let not_found = || format!("No Wikipedia page found for {}.", topic);

        let page = ctx
            .fetch
            .wiki(topic)
            .await
            .map_err(|e| upstream("wiki", e, not_found()))?
            .ok_or_else(|| BotError::upstream_fetch(not_found()))?;

        let card = Card::titled(page.title)
            .description(summarize(&page.extract))
            .url(page.url)
            .image(page.image.unwrap_or_else(|| WIKIPEDIA_LOGO.to_string()))
            .color(WIKI_COLOR);
        ctx.reply(Reply::card(card)).await?;
        Ok(Outcome::Sent)
    }
}

pub struct Animal;

#[async_trait]
impl CommandHandler for Animal {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome> {
        let topic = args.string("topic")?.trim().to_lowercase();
        if topic.is_empty() || !topic.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(BotError::upstream_fetch("Invalid topic."));
        }

        let animal = ctx
            .fetch
            .animal(&topic)
            .await
            .map_err(|e| upstream("animal", e, "Invalid topic."))?;

        let card = Card::titled(capitalize(&topic))
            .description(animal.fact)
            .image(animal.image)
            .color(ANIMAL_COLOR);
        ctx.reply(Reply::card(card)).await?;
        Ok(Outcome::Sent)
    }
}

pub struct Joke;

#[async_trait]
impl CommandHandler for Joke {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        let joke = ctx
            .fetch
            .joke()
            .await
            .map_err(|e| upstream("joke", e, "Couldn't fetch a joke."))?;

        let card = Card::titled("Joke")
            .description(joke.setup)
            .field("Punchline", joke.punchline, false)
            .color(JOKE_COLOR);
        ctx.reply(Reply::card(card)).await?;
        Ok(Outcome::Sent)
    }
}

pub struct Quote;

#[async_trait]
impl CommandHandler for Quote {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        let quote = ctx
            .fetch
            .quote()
            .await
            .map_err(|e| upstream("quote", e, "Couldn't fetch a quote."))?;

        let card = Card::titled("Quote")
            .description(quote.content)
            .footer(quote.author_slug)
            .color(QUOTE_COLOR);
        ctx.reply(Reply::card(card)).await?;
        Ok(Outcome::Sent)
    }
}

pub struct Fact;

#[async_trait]
impl CommandHandler for Fact {
    async fn handle(&self, ctx: &CommandContext<'_>, _args: &Args) -> Result<Outcome> {
        let fact = ctx
            .fetch
            .fact()
            .await
            .map_err(|e| upstream("fact", e, "Couldn't fetch a fact."))?;

        let card = Card::titled("Fact")
            .description(fact.text)
            .url(fact.permalink)
            .color(FACT_COLOR);
        ctx.reply(Reply::card(card)).await?;
        Ok(Outcome::Sent)
    }
}
