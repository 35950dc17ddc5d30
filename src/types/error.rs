use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BotError {
    #[error("Unknown command: {path}")]
    UnknownCommand { path: String },

    #[error("Duplicate command name: {name} in group {group}")]
    DuplicateName { name: String, group: String },

    #[error("{message}")]
    InvalidArgument { message: String },

    #[error("{message}")]
    Authorization { message: String },

    #[error("{message}")]
    UpstreamFetch { message: String },

    #[error("Missing permissions: {message}")]
    PlatformPermission { message: String },

    #[error("Discord API error: {message}")]
    Platform { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl BotError {
    /// Returns true if the error message is meant for the invoker.
    ///
    /// The dispatcher replies with the error text for these and logs them at
    /// WARN; everything else gets a generic failure reply and an ERROR log.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::Authorization { .. }
                | Self::UpstreamFetch { .. }
                | Self::PlatformPermission { .. }
        )
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::PlatformPermission { .. })
    }

    pub fn unknown_command(path: impl Into<String>) -> Self {
        Self::UnknownCommand { path: path.into() }
    }

    pub fn duplicate_name(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self::DuplicateName {
            name: name.into(),
            group: group.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    pub fn upstream_fetch(message: impl Into<String>) -> Self {
        Self::UpstreamFetch {
            message: message.into(),
        }
    }

    pub fn platform_permission(message: impl Into<String>) -> Self {
        Self::PlatformPermission {
            message: message.into(),
        }
    }

    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
