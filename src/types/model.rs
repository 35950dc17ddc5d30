//! Platform-neutral views of the Discord objects handlers work with.
//!
//! The serenity adapter fills these in from interaction payloads so handlers
//! and their tests never touch gateway types directly.

use serde::{Deserialize, Serialize};

/// A guild member (or plain user, outside a guild) resolved from a payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRef {
    pub id: u64,
    /// `name` or `name#discriminator` for legacy accounts.
    pub tag: String,
    /// Account username, used when resetting nicknames.
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Unix seconds.
    pub joined_at: Option<i64>,
    pub color: Option<u32>,
}

impl MemberRef {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleRef {
    pub id: u64,
    pub name: String,
}

/// One reaction on a message with its total count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactionTally {
    pub emoji: String,
    pub count: u64,
}

/// A message picked as a context-menu target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRef {
    pub id: u64,
    pub channel_id: u64,
    pub author: MemberRef,
    pub content: String,
    /// Unix seconds.
    pub created_at: i64,
    /// Reactions in the order the platform returns them.
    pub reactions: Vec<ReactionTally>,
}

impl MessageRef {
    pub fn jump_url(&self, guild_id: Option<u64>) -> String {
        let guild = guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "@me".to_string());
        format!(
            "https://discord.com/channels/{}/{}/{}",
            guild, self.channel_id, self.id
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Rich embed content, converted to a platform embed at the edge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: Option<u32>,
    pub image: Option<String>,
    pub footer: Option<String>,
    pub author: Option<CardAuthor>,
    /// Unix seconds.
    pub timestamp: Option<i64>,
    pub fields: Vec<CardField>,
}

impl Card {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(CardAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    pub fn timestamp(mut self, unix_seconds: i64) -> Self {
        self.timestamp = Some(unix_seconds);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(CardField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkButton {
    pub label: String,
    pub url: String,
}

/// Content for an interaction reply or a plain channel message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub content: Option<String>,
    pub cards: Vec<Card>,
    pub ephemeral: bool,
    pub link: Option<LinkButton>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn ephemeral_text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ephemeral: true,
            ..Self::default()
        }
    }

    pub fn card(card: Card) -> Self {
        Self {
            cards: vec![card],
            ..Self::default()
        }
    }

    pub fn with_link(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.link = Some(LinkButton {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    /// Text plus card titles, for test assertions.
    #[cfg(test)]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(content) = &self.content {
            parts.push(content.clone());
        }
        for card in &self.cards {
            if let Some(title) = &card.title {
                parts.push(title.clone());
            }
        }
        parts.join(" | ")
    }
}
