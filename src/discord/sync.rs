//! Publishing the registry as the guild's application command set.

use crate::bot::args::{ParamSpec, ParamType};
use crate::bot::commands::{CommandDescriptor, CommandKind, CommandRegistry};
use crate::discord::convert::classify;
use crate::types::error::Result;
use serenity::all::{
    CommandOptionType, CommandType, CreateCommand, CreateCommandOption, GuildId, Http,
};
use tracing::info;

fn option(param: &ParamSpec) -> CreateCommandOption {
    let kind = match param.kind {
        ParamType::String => CommandOptionType::String,
        ParamType::Integer => CommandOptionType::Integer,
        ParamType::User => CommandOptionType::User,
        ParamType::Role => CommandOptionType::Role,
    };

    let mut option = CreateCommandOption::new(kind, &param.name, &param.description)
        .required(param.required);
    for choice in &param.choices {
        option = option.add_string_choice(choice, choice);
    }
    if let Some(min) = param.min.and_then(|v| u64::try_from(v).ok()) {
        option = option.min_int_value(min);
    }
    if let Some(max) = param.max.and_then(|v| u64::try_from(v).ok()) {
        option = option.max_int_value(max);
    }
    if let Some(max_length) = param.max_length.and_then(|v| u16::try_from(v).ok()) {
        option = option.max_length(max_length);
    }
    option
}

fn subcommand(descriptor: &CommandDescriptor) -> CreateCommandOption {
    descriptor.params.iter().fold(
        CreateCommandOption::new(
            CommandOptionType::SubCommand,
            &descriptor.name,
            &descriptor.description,
        ),
        |sub, param| sub.add_sub_option(option(param)),
    )
}

fn top_level(descriptor: &CommandDescriptor) -> CreateCommand {
    match descriptor.kind {
        CommandKind::ChatInput => descriptor.params.iter().fold(
            CreateCommand::new(&descriptor.name).description(&descriptor.description),
            |cmd, param| cmd.add_option(option(param)),
        ),
        CommandKind::User => CreateCommand::new(&descriptor.name).kind(CommandType::User),
        CommandKind::Message => CreateCommand::new(&descriptor.name).kind(CommandType::Message),
    }
}

/// Top-level commands in registration order, followed by one command per
/// group carrying its members as sub-commands.
pub fn build_commands(registry: &CommandRegistry) -> Vec<CreateCommand> {
    let mut commands: Vec<CreateCommand> = registry
        .descriptors()
        .iter()
        .filter(|d| d.group.is_none())
        .map(top_level)
        .collect();

    for group in registry.groups() {
        let command = registry
            .descriptors()
            .iter()
            .filter(|d| d.group.as_deref() == Some(group.name.as_str()))
            .fold(
                CreateCommand::new(&group.name).description(&group.description),
                |cmd, d| cmd.add_option(subcommand(d)),
            );
        commands.push(command);
    }

    commands
}

/// Replace the guild's command set with the registry's contents.
pub async fn sync(http: &Http, guild_id: u64, registry: &CommandRegistry) -> Result<usize> {
    let commands = build_commands(registry);
    let registered = GuildId::new(guild_id)
        .set_commands(http, commands)
        .await
        .map_err(classify)?;
    info!(guild_id, count = registered.len(), "Synced application commands");
    Ok(registered.len())
}
