use crate::bot::dispatch::Dispatcher;
use crate::discord::convert;
use crate::discord::port::SerenityPort;
use crate::discord::sync;
use async_trait::async_trait;
use serenity::all::{ActivityData, Context, EventHandler, Interaction, OnlineStatus, Ready};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Gateway event handler. Every command interaction runs through the
/// dispatcher and is tracked so shutdown can wait for it.
pub struct Handler {
    dispatcher: Arc<Dispatcher>,
}

impl Handler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            user_id = ready.user.id.get(),
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );

        let settings = self.dispatcher.settings();
        settings.set_bot_user_id(ready.user.id.get());
        ctx.set_presence(
            Some(ActivityData::listening("your commands")),
            OnlineStatus::Idle,
        );

        if let Err(e) = sync::sync(&ctx.http, settings.guild_id, self.dispatcher.registry()).await
        {
            error!(guild_id = settings.guild_id, error = %e, "Failed to sync application commands");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let Some(invocation) = convert::invocation(&command, &ctx.cache) else {
            warn!(
                command = %command.data.name,
                kind = ?command.data.kind,
                "Ignoring unsupported command type"
            );
            return;
        };

        self.dispatcher
            .shutdown()
            .track(async {
                let port = SerenityPort::new(&ctx, &command);
                self.dispatcher.dispatch(&invocation, &port).await;
            })
            .await;
    }
}
