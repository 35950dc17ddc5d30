//! Command descriptors and the registry they are declared in.

use crate::bot::args::ParamSpec;
use crate::bot::auth::Access;
use crate::bot::handlers::CommandHandler;
use crate::types::error::{BotError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How a command is invoked in the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Typed `/command`.
    ChatInput,
    /// Right-click on a member.
    User,
    /// Right-click on a message.
    Message,
}

/// A command's position: optional group followed by its name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandPath(Vec<String>);

impl CommandPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

#[derive(Clone)]
pub struct CommandDescriptor {
    pub name: String,
    pub group: Option<String>,
    pub kind: CommandKind,
    pub description: String,
    pub access: Access,
    pub params: Vec<ParamSpec>,
    /// Acknowledge before the handler runs, for handlers that may outlast
    /// Discord's three second response window.
    pub deferred: bool,
    pub handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    pub fn slash(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            group: None,
            kind: CommandKind::ChatInput,
            description: description.into(),
            access: Access::Everyone,
            params: Vec::new(),
            deferred: false,
            handler: Arc::new(handler),
        }
    }

    pub fn user_menu(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            kind: CommandKind::User,
            ..Self::slash(name, "", handler)
        }
    }

    pub fn message_menu(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            kind: CommandKind::Message,
            ..Self::slash(name, "", handler)
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.access = Access::Owner;
        self
    }

    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn path(&self) -> CommandPath {
        match &self.group {
            Some(group) => CommandPath::new([group.as_str(), self.name.as_str()]),
            None => CommandPath::new([self.name.as_str()]),
        }
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("path", &self.path().to_string())
            .field("kind", &self.kind)
            .field("access", &self.access)
            .field("params", &self.params.len())
            .field("deferred", &self.deferred)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandGroup {
    pub name: String,
    pub description: String,
}

/// All commands the bot answers to. Read-only once the bot is running.
#[derive(Default)]
pub struct CommandRegistry {
    groups: Vec<CommandGroup>,
    descriptors: Vec<CommandDescriptor>,
    index: HashMap<(CommandKind, CommandPath), usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a chat-input subgroup such as `fetch`.
    pub fn register_group(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        if self.groups.iter().any(|g| g.name == name)
            || self.top_level_command_exists(&name)
        {
            return Err(BotError::duplicate_name(name, "<top level>"));
        }
        self.groups.push(CommandGroup {
            name,
            description: description.into(),
        });
        Ok(())
    }

    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<()> {
        let group_label = descriptor
            .group
            .clone()
            .unwrap_or_else(|| "<top level>".to_string());

        match &descriptor.group {
            Some(group) => {
                if descriptor.kind != CommandKind::ChatInput {
                    return Err(BotError::invalid_argument(format!(
                        "context menu command {} cannot live in group {}",
                        descriptor.name, group
                    )));
                }
                if !self.groups.iter().any(|g| &g.name == group) {
                    return Err(BotError::unknown_command(group.clone()));
                }
            }
            None => {
                if descriptor.kind == CommandKind::ChatInput
                    && self.groups.iter().any(|g| g.name == descriptor.name)
                {
                    return Err(BotError::duplicate_name(descriptor.name, group_label));
                }
            }
        }

        let key = (descriptor.kind, descriptor.path());
        if self.index.contains_key(&key) {
            return Err(BotError::duplicate_name(descriptor.name, group_label));
        }

        self.index.insert(key, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn lookup(&self, kind: CommandKind, path: &CommandPath) -> Result<&CommandDescriptor> {
        self.index
            .get(&(kind, path.clone()))
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| BotError::unknown_command(path.to_string()))
    }

    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    fn top_level_command_exists(&self, name: &str) -> bool {
        self.index
            .contains_key(&(CommandKind::ChatInput, CommandPath::new([name])))
    }
}
