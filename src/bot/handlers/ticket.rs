//! Support ticket buttons and modal.

use crate::core::{
    custom_id::{CustomIdCategory, ParsedCustomId, encode},
    handler::{ComponentHandler, HandlerContext, HandlerError},
    interaction::{Interaction, ModalInput, Reply},
    jobs::{CREATE_TICKET_JOB, JobDescriptor},
    settings,
};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::settings::ensure_same_guild;

/// Modal input holding the ticket reason.
pub const REASON_INPUT: &str = "reason";

/// Cooldown carried by the ticket modal: one submission per minute.
const SUBMIT_COOLDOWN_SECS: u32 = 60;

/// Button that opens the ticket modal, if tickets are enabled in the guild.
pub struct OpenTicketButton;

#[async_trait]
impl ComponentHandler for OpenTicketButton {
    fn custom_id(&self) -> &str {
        "ticket:open"
    }

    async fn execute(
        &self,
        ctx: &HandlerContext,
        interaction: &Interaction,
        parsed: &ParsedCustomId,
    ) -> Result<Reply, HandlerError> {
        ensure_same_guild(interaction, parsed)?;

        let enabled = settings::get_guild_settings(&ctx.database, &parsed.guild_id)
            .await?
            .is_some_and(|settings| settings.tickets_enabled);
        if !enabled {
            return Ok(Reply::ephemeral(
                "🎫 Tickets are disabled in this server. Ask an admin to enable them with `/settings`.",
            ));
        }

        let custom_id = encode::<&str>(
            CustomIdCategory::Ticket,
            "submit",
            &parsed.guild_id,
            SUBMIT_COOLDOWN_SECS,
            &[],
        )
        .map_err(|e| HandlerError::invalid(e.to_string()))?;

        Ok(Reply::Modal {
            custom_id,
            title: "Open a ticket".to_string(),
            inputs: vec![ModalInput {
                custom_id: REASON_INPUT.to_string(),
                label: "How can we help?".to_string(),
                paragraph: true,
                max_length: 1000,
            }],
        })
    }
}

/// Modal submission that queues ticket creation.
pub struct SubmitTicketModal;

#[async_trait]
impl ComponentHandler for SubmitTicketModal {
    fn custom_id(&self) -> &str {
        "ticket:submit"
    }

    async fn execute(
        &self,
        ctx: &HandlerContext,
        interaction: &Interaction,
        parsed: &ParsedCustomId,
    ) -> Result<Reply, HandlerError> {
        ensure_same_guild(interaction, parsed)?;

        let Some(reason) = interaction.field(REASON_INPUT) else {
            return Ok(Reply::ephemeral("⚠️ Please tell us what the ticket is about."));
        };

        let handle = ctx
            .jobs
            .submit(JobDescriptor::new(
                CREATE_TICKET_JOB,
                json!({
                    "guildId": parsed.guild_id,
                    "userId": interaction.actor_id.to_string(),
                    "reason": reason,
                }),
            ))
            .await?;
        info!(job_id = %handle.id, guild_id = %parsed.guild_id, "Ticket queued");

        Ok(Reply::ephemeral(
            "🎫 Your ticket has been submitted. A private channel will open shortly.",
        ))
    }
}
