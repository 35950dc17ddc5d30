use crate::bot::args::{Args, ParamSpec};
use crate::bot::commands::{CommandDescriptor, CommandRegistry};
use crate::bot::context::CommandContext;
use crate::types::error::Result;
use crate::types::Outcome;
use async_trait::async_trait;

pub mod fetch;
pub mod members;
pub mod moderation;
pub mod poll;
pub mod utility;

/// One command's behaviour. Arguments arrive already validated against the
/// descriptor's parameter schema.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext<'_>, args: &Args) -> Result<Outcome>;
}

/// Every command the bot serves, in the order they are synced to the guild.
pub fn build_registry() -> Result<CommandRegistry> {
    let mut registry = CommandRegistry::new();
    registry.register_group("fetch", "Fetches data from the internet.")?;
    registry.register_group("mod", "Moderation commands.")?;

    let commands = vec![
        CommandDescriptor::slash("ping", "Shows the bot's latency.", utility::Ping),
        CommandDescriptor::slash("free_admin", "Get admin for free!", utility::FreeAdmin),
        CommandDescriptor::slash(
            "set_nick",
            "Changes the nickname of everyone in the server.",
            members::SetNick,
        )
        .owner_only()
        .param(
            ParamSpec::string("nickname", "The new nickname. Omit to reset.")
                .max_length(members::MAX_NICKNAME_CHARS),
        ),
        CommandDescriptor::slash("sleep", "Shuts the bot down.", moderation::Sleep).owner_only(),
        CommandDescriptor::slash("poll", "Creates a reaction poll.", poll::Poll)
            .owner_only()
            .param(ParamSpec::string("poll_question", "The question to ask.").required())
            .param(
                ParamSpec::string("poll_options", "Comma-separated list of options.").required(),
            ),
        CommandDescriptor::slash("purge", "Deletes recent messages.", moderation::Purge)
            .owner_only()
            .param(
                ParamSpec::integer("amount", "How many messages to delete.")
                    .required()
                    .range(1, 99),
            ),
        CommandDescriptor::slash("add", "Adds two numbers together.", utility::Add)
            .param(ParamSpec::integer("first_value", "The first number.").required())
            .param(ParamSpec::integer("second_value", "The second number.").required()),
        CommandDescriptor::slash("say", "Repeats what you say.", utility::Say)
            .param(ParamSpec::string("text", "What to say.").required()),
        CommandDescriptor::slash("joined", "Shows when a member joined.", members::Joined)
            .param(ParamSpec::user("member", "The member to look up. Defaults to you.")),
        CommandDescriptor::slash("xkcd", "Fetches an xkcd comic.", fetch::Xkcd)
            .in_group("fetch")
            .deferred()
            .param(ParamSpec::integer("comic_number", "Comic number. Omit for the latest.")),
        CommandDescriptor::slash("wiki", "Summarises a Wikipedia page.", fetch::Wiki)
            .in_group("fetch")
            .deferred()
            .param(ParamSpec::string("topic", "The page to look up.").required()),
        CommandDescriptor::slash("animal", "Fetches an animal fact.", fetch::Animal)
            .in_group("fetch")
            .deferred()
            .param(ParamSpec::string("topic", "The animal.").required()),
        CommandDescriptor::slash("joke", "Fetches a random joke.", fetch::Joke)
            .in_group("fetch")
            .deferred(),
        CommandDescriptor::slash("quote", "Fetches a random quote.", fetch::Quote)
            .in_group("fetch")
            .deferred(),
        CommandDescriptor::slash("fact", "Fetches a random fact.", fetch::Fact)
            .in_group("fetch")
            .deferred(),
        CommandDescriptor::slash("role", "Adds or removes a role.", moderation::Role)
            .in_group("mod")
            .owner_only()
            .param(
                ParamSpec::string("choice", "Add or remove.")
                    .required()
                    .choices(&["add", "remove"]),
            )
            .param(ParamSpec::role("rank", "The role.").required())
            .param(ParamSpec::user("member", "The member.").required()),
        CommandDescriptor::user_menu("Show Join Date", members::ShowJoinDate),
        CommandDescriptor::message_menu("Poll Winner", poll::PollWinner),
        CommandDescriptor::message_menu("Report to Moderators", moderation::Report),
    ];

    for command in commands {
        registry.register(command)?;
    }

    Ok(registry)
}
