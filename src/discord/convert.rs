//! Translation between serenity models and the bot's platform-neutral types.

use crate::bot::args::RawValue;
use crate::bot::commands::{CommandKind, CommandPath};
use crate::bot::context::{Invocation, Target};
use crate::types::error::BotError;
use crate::types::model::{Card, MemberRef, MessageRef, ReactionTally, Reply, RoleRef};
use serenity::all::{
    Cache, CommandDataOption, CommandDataOptionValue, CommandDataResolved, CommandInteraction,
    CommandType, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedAuthor,
    CreateEmbedFooter, CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    CreateMessage, EditInteractionResponse, Member, Message, ResolvedTarget, Timestamp, User,
};
use serenity::http::HttpError;
use serenity::model::ModelError;
use std::sync::Arc;

fn unix(timestamp: &Timestamp) -> i64 {
    timestamp.unix_timestamp()
}

fn member_ref(
    user: &User,
    nick: Option<&str>,
    joined_at: Option<&Timestamp>,
    color: Option<u32>,
) -> MemberRef {
    MemberRef {
        id: user.id.get(),
        tag: user.tag(),
        username: user.name.clone(),
        display_name: nick.unwrap_or(user.display_name()).to_string(),
        avatar_url: Some(user.face()),
        joined_at: joined_at.map(unix),
        color,
    }
}

/// A full guild member. `cache` resolves the top role colour when available.
pub fn member(member: &Member, cache: Option<&Arc<Cache>>) -> MemberRef {
    let color = cache
        .and_then(|cache| member.colour(cache))
        .map(|colour| colour.0)
        .filter(|&c| c != 0);
    member_ref(
        &member.user,
        member.nick.as_deref(),
        member.joined_at.as_ref(),
        color,
    )
}

pub fn message(message: &Message) -> MessageRef {
    let author = member_ref(
        &message.author,
        message.member.as_ref().and_then(|m| m.nick.as_deref()),
        message.member.as_ref().and_then(|m| m.joined_at.as_ref()),
        None,
    );
    MessageRef {
        id: message.id.get(),
        channel_id: message.channel_id.get(),
        author,
        content: message.content.clone(),
        created_at: unix(&message.timestamp),
        reactions: message
            .reactions
            .iter()
            .map(|r| ReactionTally {
                emoji: r.reaction_type.to_string(),
                count: r.count,
            })
            .collect(),
    }
}

fn resolved_user(resolved: &CommandDataResolved, id: serenity::all::UserId) -> Option<MemberRef> {
    let user = resolved.users.get(&id)?;
    let partial = resolved.members.get(&id);
    Some(member_ref(
        user,
        partial.and_then(|m| m.nick.as_deref()),
        partial.and_then(|m| m.joined_at.as_ref()),
        None,
    ))
}

fn raw_value(value: &CommandDataOptionValue, resolved: &CommandDataResolved) -> Option<RawValue> {
    match value {
        CommandDataOptionValue::String(s) => Some(RawValue::String(s.clone())),
        CommandDataOptionValue::Integer(i) => Some(RawValue::Integer(*i)),
        CommandDataOptionValue::Number(n) => Some(RawValue::Number(*n)),
        CommandDataOptionValue::Boolean(b) => Some(RawValue::Boolean(*b)),
        CommandDataOptionValue::User(id) => resolved_user(resolved, *id).map(RawValue::User),
        CommandDataOptionValue::Role(id) => resolved.roles.get(id).map(|role| {
            RawValue::Role(RoleRef {
                id: role.id.get(),
                name: role.name.clone(),
            })
        }),
        _ => None,
    }
}

/// Walk sub-command groups and sub-commands down to the leaf, returning the
/// path segments below the command name and the leaf's argument values.
pub fn flatten_options(
    options: &[CommandDataOption],
    resolved: &CommandDataResolved,
) -> (Vec<String>, Vec<(String, RawValue)>) {
    let mut segments = Vec::new();
    let mut current = options;

    loop {
        match current.first().map(|o| (&o.name, &o.value)) {
            Some((name, CommandDataOptionValue::SubCommandGroup(inner)))
            | Some((name, CommandDataOptionValue::SubCommand(inner))) => {
                segments.push(name.clone());
                current = inner.as_slice();
            }
            _ => break,
        }
    }

    let values = current
        .iter()
        .filter_map(|o| raw_value(&o.value, resolved).map(|v| (o.name.clone(), v)))
        .collect();
    (segments, values)
}

/// Build an invocation from a command interaction. Returns None for command
/// types the bot does not serve.
pub fn invocation(command: &CommandInteraction, cache: &Arc<Cache>) -> Option<Invocation> {
    let kind = match command.data.kind {
        CommandType::ChatInput => CommandKind::ChatInput,
        CommandType::User => CommandKind::User,
        CommandType::Message => CommandKind::Message,
        _ => return None,
    };

    let (segments, options) = flatten_options(&command.data.options, &command.data.resolved);
    let path = CommandPath::new(std::iter::once(command.data.name.clone()).chain(segments));

    let user = match &command.member {
        Some(m) => member(m, Some(cache)),
        None => member_ref(&command.user, None, None, None),
    };

    let target = match command.data.target() {
        Some(ResolvedTarget::User(user, partial)) => Some(Target::Member(member_ref(
            user,
            partial.and_then(|m| m.nick.as_deref()),
            partial.and_then(|m| m.joined_at.as_ref()),
            None,
        ))),
        Some(ResolvedTarget::Message(msg)) => Some(Target::Message(message(msg))),
        _ => None,
    };

    Some(Invocation {
        interaction_id: command.id.get(),
        user,
        guild_id: command.guild_id.map(|g| g.get()),
        channel_id: command.channel_id.get(),
        kind,
        path,
        options,
        target,
    })
}

pub fn embed(card: &Card) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(ref title) = card.title {
        builder = builder.title(title);
    }
    if let Some(ref description) = card.description {
        builder = builder.description(description);
    }
    if let Some(ref url) = card.url {
        builder = builder.url(url);
    }
    if let Some(color) = card.color {
        builder = builder.color(color);
    }
    if let Some(ref image) = card.image {
        builder = builder.image(image);
    }
    if let Some(ref footer) = card.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(ref author) = card.author {
        let mut a = CreateEmbedAuthor::new(&author.name);
        if let Some(ref icon) = author.icon_url {
            a = a.icon_url(icon);
        }
        builder = builder.author(a);
    }
    if let Some(ts) = card.timestamp {
        if let Ok(timestamp) = Timestamp::from_unix_timestamp(ts) {
            builder = builder.timestamp(timestamp);
        }
    }
    for field in &card.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    builder
}

fn components(reply: &Reply) -> Vec<CreateActionRow> {
    match &reply.link {
        Some(link) => vec![CreateActionRow::Buttons(vec![
            CreateButton::new_link(&link.url).label(&link.label)
        ])],
        None => Vec::new(),
    }
}

pub fn response_message(reply: &Reply) -> CreateInteractionResponseMessage {
    let mut msg = CreateInteractionResponseMessage::new()
        .embeds(reply.cards.iter().map(embed).collect())
        .components(components(reply))
        .ephemeral(reply.ephemeral);
    if let Some(ref content) = reply.content {
        msg = msg.content(content);
    }
    msg
}

pub fn followup(reply: &Reply) -> CreateInteractionResponseFollowup {
    let mut msg = CreateInteractionResponseFollowup::new()
        .embeds(reply.cards.iter().map(embed).collect())
        .components(components(reply))
        .ephemeral(reply.ephemeral);
    if let Some(ref content) = reply.content {
        msg = msg.content(content);
    }
    msg
}

/// Completes a deferred response. Ephemerality was fixed when deferring.
pub fn edit_response(reply: &Reply) -> EditInteractionResponse {
    let mut msg = EditInteractionResponse::new()
        .embeds(reply.cards.iter().map(embed).collect())
        .components(components(reply));
    if let Some(ref content) = reply.content {
        msg = msg.content(content);
    }
    msg
}

pub fn channel_message(reply: &Reply) -> CreateMessage {
    let mut msg = CreateMessage::new()
        .embeds(reply.cards.iter().map(embed).collect())
        .components(components(reply));
    if let Some(ref content) = reply.content {
        msg = msg.content(content);
    }
    msg
}

/// Permission refusals become `PlatformPermission` so batch operations can
/// skip them; everything else is a plain platform error.
pub fn classify(err: serenity::Error) -> BotError {
    match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 =>
        {
            BotError::platform_permission(response.error.message.clone())
        }
        serenity::Error::Model(ModelError::InvalidPermissions { .. }) => {
            BotError::platform_permission(err.to_string())
        }
        _ => BotError::platform(err.to_string()),
    }
}
