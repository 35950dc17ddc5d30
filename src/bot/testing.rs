//! Test doubles shared by the dispatcher and handler tests.

use crate::bot::args::RawValue;
use crate::bot::commands::{CommandKind, CommandPath, CommandRegistry};
use crate::bot::context::{Invocation, Settings, Target};
use crate::bot::dispatch::Dispatcher;
use crate::bot::handlers::build_registry;
use crate::bot::port::DiscordPort;
use crate::bot::shutdown::Shutdown;
use crate::config::FetchEndpoints;
use crate::fetch::FetchClient;
use crate::types::error::{BotError, Result};
use crate::types::model::{MemberRef, MessageRef, Reply};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const OWNER_ID: u64 = 1000;
pub const STRANGER_ID: u64 = 2000;
pub const BOT_ID: u64 = 3000;
pub const GUILD_ID: u64 = 4000;
pub const CHANNEL_ID: u64 = 5000;
pub const LOG_CHANNEL_ID: u64 = 6000;

/// A side effect observed by [`RecordingPort`].
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Defer,
    Reply(Reply),
    SendMessage { channel_id: u64, message: Reply },
    AddReaction { channel_id: u64, message_id: u64, emoji: String },
    SetNickname { user_id: u64, nickname: String },
    AddRole { user_id: u64, role_id: u64 },
    RemoveRole { user_id: u64, role_id: u64 },
    Purge { channel_id: u64, count: usize },
}

/// In-memory [`DiscordPort`] that records every mutation.
pub struct RecordingPort {
    actions: Mutex<Vec<Action>>,
    replied: AtomicBool,
    next_message_id: AtomicU64,
    members: Vec<MemberRef>,
    forbidden_users: HashSet<u64>,
    failing_users: HashSet<u64>,
    forbid_roles: bool,
    latency: Option<Duration>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::with_members(Vec::new())
    }

    pub fn with_members(members: Vec<MemberRef>) -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            replied: AtomicBool::new(false),
            next_message_id: AtomicU64::new(9000),
            members,
            forbidden_users: HashSet::new(),
            failing_users: HashSet::new(),
            forbid_roles: false,
            latency: None,
        }
    }

    /// Edits to this member fail with a permission error.
    pub fn forbid_user(mut self, user_id: u64) -> Self {
        self.forbidden_users.insert(user_id);
        self
    }

    /// Edits to this member fail with a non-permission error.
    pub fn fail_user(mut self, user_id: u64) -> Self {
        self.failing_users.insert(user_id);
        self
    }

    pub fn forbid_roles(mut self) -> Self {
        self.forbid_roles = true;
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.actions()
            .into_iter()
            .filter_map(|a| match a {
                Action::Reply(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn record(&self, action: Action) {
        self.actions.lock().unwrap().push(action);
    }
}

#[async_trait]
impl DiscordPort for RecordingPort {
    async fn reply(&self, reply: Reply) -> Result<()> {
        self.replied.store(true, Ordering::SeqCst);
        self.record(Action::Reply(reply));
        Ok(())
    }

    async fn defer(&self) -> Result<()> {
        self.record(Action::Defer);
        Ok(())
    }

    fn has_replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    async fn latency(&self) -> Option<Duration> {
        self.latency
    }

    async fn send_message(&self, channel_id: u64, message: Reply) -> Result<u64> {
        self.record(Action::SendMessage {
            channel_id,
            message,
        });
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()> {
        self.record(Action::AddReaction {
            channel_id,
            message_id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn guild_members(&self, _guild_id: u64) -> Result<Vec<MemberRef>> {
        Ok(self.members.clone())
    }

    async fn set_nickname(&self, _guild_id: u64, user_id: u64, nickname: &str) -> Result<()> {
        if self.forbidden_users.contains(&user_id) {
            return Err(BotError::platform_permission(format!(
                "cannot edit member {}",
                user_id
            )));
        }
        if self.failing_users.contains(&user_id) {
            return Err(BotError::platform("Unknown Member"));
        }
        self.record(Action::SetNickname {
            user_id,
            nickname: nickname.to_string(),
        });
        Ok(())
    }

    async fn add_role(&self, _guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        if self.forbid_roles {
            return Err(BotError::platform_permission("Missing Permissions"));
        }
        self.record(Action::AddRole { user_id, role_id });
        Ok(())
    }

    async fn remove_role(&self, _guild_id: u64, user_id: u64, role_id: u64) -> Result<()> {
        if self.forbid_roles {
            return Err(BotError::platform_permission("Missing Permissions"));
        }
        self.record(Action::RemoveRole { user_id, role_id });
        Ok(())
    }

    async fn purge(&self, channel_id: u64, count: usize) -> Result<usize> {
        self.record(Action::Purge { channel_id, count });
        Ok(count)
    }
}

pub fn member(id: u64, username: &str) -> MemberRef {
    MemberRef {
        id,
        tag: username.to_string(),
        username: username.to_string(),
        display_name: username.to_string(),
        avatar_url: Some(format!("https://cdn.discordapp.com/avatars/{}/a.png", id)),
        joined_at: Some(1_577_836_800),
        color: Some(0x3498DB),
    }
}

pub fn message(author: MemberRef, reactions: &[(&str, u64)]) -> MessageRef {
    MessageRef {
        id: 7000,
        channel_id: CHANNEL_ID,
        author,
        content: "hello there".to_string(),
        created_at: 1_700_000_000,
        reactions: reactions
            .iter()
            .map(|(emoji, count)| crate::types::model::ReactionTally {
                emoji: emoji.to_string(),
                count: *count,
            })
            .collect(),
    }
}

/// A chat-input invocation from `user_id` in the test guild.
pub fn invocation(user_id: u64, path: &[&str], options: Vec<(String, RawValue)>) -> Invocation {
    Invocation {
        interaction_id: 1,
        user: member(user_id, if user_id == OWNER_ID { "owner" } else { "someone" }),
        guild_id: Some(GUILD_ID),
        channel_id: CHANNEL_ID,
        kind: CommandKind::ChatInput,
        path: CommandPath::new(path.iter().copied()),
        options,
        target: None,
    }
}

pub fn menu_invocation(user_id: u64, kind: CommandKind, name: &str, target: Target) -> Invocation {
    Invocation {
        kind,
        target: Some(target),
        ..invocation(user_id, &[name], vec![])
    }
}

pub fn opt(name: &str, value: RawValue) -> (String, RawValue) {
    (name.to_string(), value)
}

/// A dispatcher wired to the real registry and a fetch client whose
/// endpoints all point at `base_url`.
pub struct TestEnv {
    pub dispatcher: Dispatcher,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_base_url("http://127.0.0.1:9")
    }

    pub fn with_base_url(base_url: &str) -> Self {
        let registry = build_registry().expect("registry builds");
        Self::build(registry, base_url)
    }

    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self::build(registry, "http://127.0.0.1:9")
    }

    fn build(registry: CommandRegistry, base_url: &str) -> Self {
        let endpoints = FetchEndpoints {
            xkcd: base_url.to_string(),
            wikipedia: format!("{}/w/api.php", base_url),
            animal: base_url.to_string(),
            joke: base_url.to_string(),
            quote: base_url.to_string(),
            fact: base_url.to_string(),
        };
        let fetch = FetchClient::new(&endpoints, Duration::from_secs(5)).expect("fetch client");
        let settings = Settings::new(OWNER_ID, GUILD_ID, LOG_CHANNEL_ID);
        settings.set_bot_user_id(BOT_ID);
        Self {
            dispatcher: Dispatcher::new(registry, Arc::new(settings), fetch, Shutdown::new()),
        }
    }
}
