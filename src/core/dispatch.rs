//! Interaction dispatcher.
//!
//! Every button click or modal submission goes through the same steps:
//!
//! 1. decode the custom id (malformed → `Rejected`)
//! 2. check the cooldown for (actor, `category:action`) (active → `Throttled`)
//! 3. resolve a handler for the interaction kind (none → `Unhandled`)
//! 4. run the handler on its own task under a timeout (`Completed`, or
//!    `HandlerFailed` on error, panic or timeout)
//!
//! Internal errors never reach the user; they get [`GENERIC_FAILURE`] and the
//! details are logged.

use crate::core::{
    cooldown::{CooldownDecision, CooldownGuard, remaining_secs},
    custom_id::{self, ParsedCustomId},
    handler::{ComponentHandler, HandlerContext},
    interaction::{Interaction, Reply},
    registry::RegistryHolder,
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, instrument, warn};

/// Message shown for every internal failure.
pub const GENERIC_FAILURE: &str = "Something went wrong while handling that interaction.";

/// Terminal state of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Custom id could not be decoded
    Rejected,
    /// Cooldown still active
    Throttled {
        /// Time until the action may be used again
        remaining: Duration,
    },
    /// No handler registered for the action
    Unhandled,
    /// Handler ran successfully
    Completed,
    /// Handler failed, panicked or timed out
    HandlerFailed,
}

/// Result of a dispatch: the terminal state and what to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Terminal state
    pub state: DispatchState,
    /// Response for the user
    pub reply: Reply,
}

impl DispatchOutcome {
    fn failure(state: DispatchState) -> Self {
        Self {
            state,
            reply: Reply::ephemeral(GENERIC_FAILURE),
        }
    }
}

/// Routes component interactions to their handlers.
pub struct Dispatcher {
    registry: RegistryHolder,
    cooldowns: Arc<CooldownGuard>,
    context: HandlerContext,
    handler_timeout: Duration,
}

impl Dispatcher {
    /// Assembles a dispatcher from its collaborators.
    #[must_use]
    pub const fn new(
        registry: RegistryHolder,
        cooldowns: Arc<CooldownGuard>,
        context: HandlerContext,
        handler_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            cooldowns,
            context,
            handler_timeout,
        }
    }

    /// Shared resources handed to handlers.
    #[must_use]
    pub const fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Cooldown guard used by this dispatcher.
    #[must_use]
    pub const fn cooldowns(&self) -> &Arc<CooldownGuard> {
        &self.cooldowns
    }

    /// Handles one interaction. Never fails: every error becomes a reply.
    #[instrument(
        skip(self, interaction),
        fields(kind = %interaction.kind, actor = interaction.actor_id, custom_id = %interaction.custom_id)
    )]
    pub async fn dispatch(&self, interaction: &Interaction) -> DispatchOutcome {
        let parsed = match custom_id::decode(&interaction.custom_id) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Rejected malformed custom id: {}", e);
                return DispatchOutcome::failure(DispatchState::Rejected);
            }
        };

        let key = parsed.lookup_key();
        if let CooldownDecision::Denied { remaining } =
            self.cooldowns
                .check(interaction.actor_id, &key, parsed.cooldown_window())
        {
            let seconds = remaining_secs(remaining);
            debug!(key = %key, seconds, "Interaction throttled");
            return DispatchOutcome {
                state: DispatchState::Throttled { remaining },
                reply: Reply::ephemeral(format!(
                    "⏳ Please wait {seconds} more second{} before doing that again.",
                    if seconds == 1 { "" } else { "s" }
                )),
            };
        }

        let handler = match self.registry.resolve(interaction.kind, &key) {
            Ok(handler) => handler,
            Err(e) => {
                warn!("No handler for interaction: {}", e);
                return DispatchOutcome::failure(DispatchState::Unhandled);
            }
        };

        self.run_handler(handler, interaction, parsed).await
    }

    async fn run_handler(
        &self,
        handler: Arc<dyn ComponentHandler>,
        interaction: &Interaction,
        parsed: ParsedCustomId,
    ) -> DispatchOutcome {
        let handler_key = handler.custom_id().to_string();
        let context = self.context.clone();
        let interaction = interaction.clone();

        let mut task =
            tokio::spawn(async move { handler.execute(&context, &interaction, &parsed).await });

        match tokio::time::timeout(self.handler_timeout, &mut task).await {
            Ok(Ok(Ok(reply))) => {
                debug!(handler = %handler_key, "Interaction handled");
                DispatchOutcome {
                    state: DispatchState::Completed,
                    reply,
                }
            }
            Ok(Ok(Err(e))) => {
                error!(handler = %handler_key, "Handler failed: {}", e);
                DispatchOutcome::failure(DispatchState::HandlerFailed)
            }
            Ok(Err(join_error)) => {
                error!(handler = %handler_key, "Handler task aborted: {}", join_error);
                DispatchOutcome::failure(DispatchState::HandlerFailed)
            }
            Err(_) => {
                task.abort();
                error!(
                    handler = %handler_key,
                    timeout = ?self.handler_timeout,
                    "Handler timed out"
                );
                DispatchOutcome::failure(DispatchState::HandlerFailed)
            }
        }
    }
}
