//! Gateway events: component interactions and guild lifecycle.

use crate::{
    bot::BotData,
    core::{
        dispatch::GENERIC_FAILURE,
        interaction::{Interaction, ModalInput, Reply},
        settings,
    },
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use serenity::{
    ActionRow, ActionRowComponent, ComponentInteractionDataKind, CreateActionRow,
    CreateInputText, CreateInteractionResponse, CreateInteractionResponseMessage, CreateModal,
    InputTextStyle,
};
use tracing::{debug, info, warn};

/// Entry point for every gateway event poise forwards to us.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::InteractionCreate { interaction } => {
            handle_interaction(ctx, interaction, data).await?;
        }
        serenity::FullEvent::GuildCreate { guild, .. } => {
            let guild_id = guild.id.to_string();
            settings::ensure_guild_settings(&data.database, &guild_id).await?;
            debug!(guild_id = %guild_id, "Guild settings ready");
        }
        serenity::FullEvent::GuildDelete { incomplete, .. } => {
            // Outages also send GuildDelete, with `unavailable` set
            if !incomplete.unavailable {
                let guild_id = incomplete.id.to_string();
                if settings::remove_guild_settings(&data.database, &guild_id).await? {
                    info!(guild_id = %guild_id, "Removed settings for departed guild");
                }
            }
        }
        _ => {}
    }
    Ok(())
}

async fn handle_interaction(
    ctx: &serenity::Context,
    interaction: &serenity::Interaction,
    data: &BotData,
) -> Result<()> {
    match interaction {
        serenity::Interaction::Component(component) => {
            if !matches!(component.data.kind, ComponentInteractionDataKind::Button) {
                warn!(custom_id = %component.data.custom_id, "Unsupported component type");
                component
                    .create_response(ctx, unsupported_component_response())
                    .await?;
                return Ok(());
            }
            let inbound = Interaction::button(
                component.data.custom_id.clone(),
                component.user.id.get(),
                component.guild_id.map(serenity::GuildId::get),
            );
            let outcome = data.dispatcher.dispatch(&inbound).await;
            component
                .create_response(ctx, render_response(outcome.reply))
                .await?;
        }
        serenity::Interaction::Modal(modal) => {
            let inbound = Interaction::modal(
                modal.data.custom_id.clone(),
                modal.user.id.get(),
                modal.guild_id.map(serenity::GuildId::get),
                modal_fields(&modal.data.components),
            );
            let outcome = data.dispatcher.dispatch(&inbound).await;
            let reply = match outcome.reply {
                Reply::Modal { custom_id, .. } => {
                    warn!(custom_id = %custom_id, "Handler answered a modal with a modal");
                    Reply::ephemeral(GENERIC_FAILURE)
                }
                reply @ Reply::Message { .. } => reply,
            };
            modal.create_response(ctx, render_response(reply)).await?;
        }
        _ => {}
    }
    Ok(())
}

/// Flattens submitted text inputs into `(input id, value)` pairs.
fn modal_fields(rows: &[ActionRow]) -> Vec<(String, String)> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|component| match component {
            ActionRowComponent::InputText(input) => Some((
                input.custom_id.clone(),
                input.value.clone().unwrap_or_default(),
            )),
            _ => None,
        })
        .collect()
}

fn render_input(input: ModalInput) -> CreateActionRow {
    let style = if input.paragraph {
        InputTextStyle::Paragraph
    } else {
        InputTextStyle::Short
    };
    CreateActionRow::InputText(
        CreateInputText::new(style, input.label, input.custom_id)
            .max_length(input.max_length)
            .required(true),
    )
}

/// Select menus and other non-button components have no handlers.
fn unsupported_component_response() -> CreateInteractionResponse {
    render_response(Reply::ephemeral(GENERIC_FAILURE))
}

/// Builds the Discord response for a handler reply.
pub(crate) fn render_response(reply: Reply) -> CreateInteractionResponse {
    match reply {
        Reply::Message { content, ephemeral } => CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(ephemeral),
        ),
        Reply::Modal {
            custom_id,
            title,
            inputs,
        } => CreateInteractionResponse::Modal(
            CreateModal::new(custom_id, title)
                .components(inputs.into_iter().map(render_input).collect()),
        ),
    }
}
