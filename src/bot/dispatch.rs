//! Routes an invocation to its handler.
//!
//! Lookup, owner gate, argument coercion, and the handler call all happen
//! here. Nothing escapes: every failure becomes a reply to the invoker (when
//! one is still owed) plus a log line, and the caller only sees an `Outcome`.

use crate::bot::args::Args;
use crate::bot::commands::CommandRegistry;
use crate::bot::context::{CommandContext, Invocation, Settings};
use crate::bot::port::DiscordPort;
use crate::bot::shutdown::Shutdown;
use crate::fetch::FetchClient;
use crate::types::error::BotError;
use crate::types::model::Reply;
use crate::types::Outcome;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const GENERIC_FAILURE: &str = "Something went wrong while running that command.";
const UNKNOWN_COMMAND: &str = "Unknown command.";
const SHUTTING_DOWN: &str = "The bot is shutting down. Try again later.";

pub struct Dispatcher {
    registry: CommandRegistry,
    settings: Arc<Settings>,
    fetch: FetchClient,
    shutdown: Shutdown,
}

impl Dispatcher {
    pub fn new(
        registry: CommandRegistry,
        settings: Arc<Settings>,
        fetch: FetchClient,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            registry,
            settings,
            fetch,
            shutdown,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    pub async fn dispatch(&self, invocation: &Invocation, port: &dyn DiscordPort) -> Outcome {
        let started = Instant::now();
        let outcome = self.run(invocation, port).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Outcome::Sent | Outcome::Skipped => debug!(
                command = %invocation.path,
                user_id = invocation.user.id,
                elapsed_ms,
                outcome = %outcome,
                "Interaction handled"
            ),
            Outcome::Denied => info!(
                command = %invocation.path,
                user_id = invocation.user.id,
                elapsed_ms,
                "Interaction denied"
            ),
            Outcome::Failed(reason) => warn!(
                command = %invocation.path,
                user_id = invocation.user.id,
                elapsed_ms,
                reason = %reason,
                "Interaction failed"
            ),
        }

        outcome
    }

    async fn run(&self, invocation: &Invocation, port: &dyn DiscordPort) -> Outcome {
        if self.shutdown.is_triggered() {
            send_or_log(port, Reply::ephemeral_text(SHUTTING_DOWN)).await;
            return Outcome::Skipped;
        }

        let descriptor = match self.registry.lookup(invocation.kind, &invocation.path) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!(command = %invocation.path, kind = ?invocation.kind, "{}", e);
                send_or_log(port, Reply::ephemeral_text(UNKNOWN_COMMAND)).await;
                return Outcome::failed(e.to_string());
            }
        };

        let ctx = CommandContext {
            invocation,
            port,
            fetch: &self.fetch,
            settings: &self.settings,
            shutdown: &self.shutdown,
        };

        if let Err(denied) = descriptor.access.check(&ctx.auth()) {
            send_or_log(port, Reply::ephemeral_text(denied.to_string())).await;
            return Outcome::Denied;
        }

        let args = match Args::coerce(&descriptor.params, &invocation.options) {
            Ok(args) => args,
            Err(e) => {
                debug!(command = %invocation.path, error = %e, "Argument validation failed");
                send_or_log(port, Reply::ephemeral_text(e.to_string())).await;
                return Outcome::failed(e.to_string());
            }
        };

        if descriptor.deferred {
            if let Err(e) = port.defer().await {
                warn!(command = %invocation.path, error = %e, "Failed to defer interaction");
            }
        }

        match descriptor.handler.handle(&ctx, &args).await {
            Ok(outcome) => outcome,
            Err(e) => self.recover(invocation, port, e).await,
        }
    }

    async fn recover(&self, invocation: &Invocation, port: &dyn DiscordPort, e: BotError) -> Outcome {
        if e.is_user_error() {
            warn!(command = %invocation.path, error = %e, "Command rejected");
            if !port.has_replied() {
                send_or_log(port, Reply::ephemeral_text(e.to_string())).await;
            }
        } else {
            error!(command = %invocation.path, error = ?e, "Unhandled handler error");
            if !port.has_replied() {
                send_or_log(port, Reply::ephemeral_text(GENERIC_FAILURE)).await;
            }
        }
        Outcome::failed(e.to_string())
    }
}

async fn send_or_log(port: &dyn DiscordPort, reply: Reply) {
    if let Err(e) = port.reply(reply).await {
        error!(error = %e, "Failed to send interaction reply");
    }
}
