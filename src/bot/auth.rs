use crate::types::error::{BotError, Result};

/// Denial text sent (ephemerally) to anyone but the owner.
pub const NOT_OWNER_MESSAGE: &str = "You are not the owner of this bot.";

/// Read-only view of who is asking and who owns the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthContext {
    pub invoking_user_id: u64,
    pub owner_id: u64,
}

impl AuthContext {
    pub fn new(invoking_user_id: u64, owner_id: u64) -> Self {
        Self {
            invoking_user_id,
            owner_id,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.invoking_user_id == self.owner_id
    }
}

/// Who may run a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Access {
    #[default]
    Everyone,
    Owner,
}

impl Access {
    pub fn permits(&self, auth: &AuthContext) -> bool {
        match self {
            Access::Everyone => true,
            Access::Owner => auth.is_owner(),
        }
    }

    pub fn check(&self, auth: &AuthContext) -> Result<()> {
        if self.permits(auth) {
            Ok(())
        } else {
            Err(BotError::authorization(NOT_OWNER_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owner() {
        assert!(AuthContext::new(7, 7).is_owner());
        assert!(!AuthContext::new(8, 7).is_owner());
    }

    #[test]
    fn test_access_permits() {
        let owner = AuthContext::new(1, 1);
        let stranger = AuthContext::new(2, 1);

        assert!(Access::Everyone.permits(&owner));
        assert!(Access::Everyone.permits(&stranger));
        assert!(Access::Owner.permits(&owner));
        assert!(!Access::Owner.permits(&stranger));
    }

    #[test]
    fn test_check_denies_with_owner_message() {
        let err = Access::Owner.check(&AuthContext::new(2, 1)).unwrap_err();
        assert!(matches!(err, BotError::Authorization { .. }));
        assert_eq!(err.to_string(), NOT_OWNER_MESSAGE);
        assert!(Access::Owner.check(&AuthContext::new(1, 1)).is_ok());
    }
}
