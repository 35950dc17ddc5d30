use crate::bot::args::RawValue;
use crate::bot::auth::AuthContext;
use crate::bot::commands::{CommandKind, CommandPath};
use crate::bot::port::DiscordPort;
use crate::bot::shutdown::Shutdown;
use crate::config::Config;
use crate::fetch::FetchClient;
use crate::types::error::{BotError, Result};
use crate::types::model::{MemberRef, MessageRef, Reply};
use std::sync::OnceLock;

/// Process-wide identities, fixed at startup.
#[derive(Debug, Default)]
pub struct Settings {
    pub owner_id: u64,
    pub guild_id: u64,
    pub log_channel_id: u64,
    bot_user_id: OnceLock<u64>,
}

impl Settings {
    pub fn new(owner_id: u64, guild_id: u64, log_channel_id: u64) -> Self {
        Self {
            owner_id,
            guild_id,
            log_channel_id,
            bot_user_id: OnceLock::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.owner_id, config.guild_id, config.log_channel_id)
    }

    /// Recorded from the first READY; later calls are ignored.
    pub fn set_bot_user_id(&self, id: u64) {
        let _ = self.bot_user_id.set(id);
    }

    pub fn bot_user_id(&self) -> Option<u64> {
        self.bot_user_id.get().copied()
    }
}

/// What a context-menu command was invoked on.
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    Member(MemberRef),
    Message(MessageRef),
}

/// One inbound command interaction, in platform-neutral form.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    pub interaction_id: u64,
    pub user: MemberRef,
    pub guild_id: Option<u64>,
    pub channel_id: u64,
    pub kind: CommandKind,
    pub path: CommandPath,
    pub options: Vec<(String, RawValue)>,
    pub target: Option<Target>,
}

/// Everything a handler can reach while serving one invocation.
pub struct CommandContext<'a> {
    pub invocation: &'a Invocation,
    pub port: &'a dyn DiscordPort,
    pub fetch: &'a FetchClient,
    pub settings: &'a Settings,
    pub shutdown: &'a Shutdown,
}

impl<'a> CommandContext<'a> {
    pub fn auth(&self) -> AuthContext {
        AuthContext::new(self.invocation.user.id, self.settings.owner_id)
    }

    pub fn user(&self) -> &MemberRef {
        &self.invocation.user
    }

    pub fn guild_id(&self) -> Result<u64> {
        self.invocation
            .guild_id
            .ok_or_else(|| BotError::invalid_argument("This command can only be used in a server."))
    }

    pub fn channel_id(&self) -> u64 {
        self.invocation.channel_id
    }

    pub fn target_member(&self) -> Result<&MemberRef> {
        match &self.invocation.target {
            Some(Target::Member(member)) => Ok(member),
            _ => Err(BotError::invalid_argument("This action needs a member target.")),
        }
    }

    pub fn target_message(&self) -> Result<&MessageRef> {
        match &self.invocation.target {
            Some(Target::Message(message)) => Ok(message),
            _ => Err(BotError::invalid_argument("This action needs a message target.")),
        }
    }

    pub async fn reply(&self, reply: Reply) -> Result<()> {
        self.port.reply(reply).await
    }
}
