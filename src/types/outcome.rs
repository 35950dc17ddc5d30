use std::fmt;

/// What a handler did with an interaction.
///
/// Returned instead of raising for the denial and silent-skip paths so the
/// dispatcher can pick the log level and decide whether a reply is owed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A reply (and any side effects) went out.
    Sent,
    /// The invoker was not allowed to run the command.
    Denied,
    /// Deliberately ignored, nothing was sent.
    Skipped,
    /// The command could not complete.
    Failed(String),
}

impl Outcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    #[cfg(test)]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Sent => write!(f, "sent"),
            Outcome::Denied => write!(f, "denied"),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Sent.to_string(), "sent");
        assert_eq!(Outcome::Denied.to_string(), "denied");
        assert_eq!(Outcome::Skipped.to_string(), "skipped");
        assert_eq!(Outcome::failed("timeout").to_string(), "failed: timeout");
    }

    #[test]
    fn test_is_failure() {
        assert!(Outcome::failed("x").is_failure());
        assert!(!Outcome::Sent.is_failure());
        assert!(!Outcome::Skipped.is_failure());
    }
}
