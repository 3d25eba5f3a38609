//! Clan creation and invite buttons.
//!
//! `clan:create` exists twice: the button opens the modal and the modal
//! submission (same custom id, modal registry) inserts the clan.

use crate::{
    core::{
        clan,
        custom_id::{CustomIdCategory, ParsedCustomId, encode},
        handler::{ComponentHandler, HandlerContext, HandlerError},
        interaction::{Interaction, ModalInput, Reply},
        jobs::{JobDescriptor, PROCESS_INVITE_JOB},
    },
    errors::StoreError,
};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::settings::ensure_same_guild;

/// Modal input holding the clan tag.
pub const TAG_INPUT: &str = "tag";
/// Modal input holding the clan name.
pub const NAME_INPUT: &str = "name";

const MAX_TAG_LEN: u16 = 6;
const MAX_NAME_LEN: u16 = 32;

/// Button that opens the clan creation modal.
pub struct CreateClanButton;

#[async_trait]
impl ComponentHandler for CreateClanButton {
    fn custom_id(&self) -> &str {
        "clan:create"
    }

    async fn execute(
        &self,
        _ctx: &HandlerContext,
        _interaction: &Interaction,
        parsed: &ParsedCustomId,
    ) -> Result<Reply, HandlerError> {
        let custom_id = encode::<&str>(
            CustomIdCategory::Clan,
            "create",
            &parsed.guild_id,
            parsed.cooldown,
            &[],
        )
        .map_err(|e| HandlerError::invalid(e.to_string()))?;

        Ok(Reply::Modal {
            custom_id,
            title: "Create a clan".to_string(),
            inputs: vec![
                ModalInput {
                    custom_id: TAG_INPUT.to_string(),
                    label: "Tag (2-6 letters or digits)".to_string(),
                    paragraph: false,
                    max_length: MAX_TAG_LEN,
                },
                ModalInput {
                    custom_id: NAME_INPUT.to_string(),
                    label: "Clan name".to_string(),
                    paragraph: false,
                    max_length: MAX_NAME_LEN,
                },
            ],
        })
    }
}

/// Modal submission that inserts the clan.
pub struct CreateClanModal;

fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim().to_ascii_uppercase();
    let valid = (2..=usize::from(MAX_TAG_LEN)).contains(&tag.len())
        && tag.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then_some(tag)
}

#[async_trait]
impl ComponentHandler for CreateClanModal {
    fn custom_id(&self) -> &str {
        "clan:create"
    }

    async fn execute(
        &self,
        ctx: &HandlerContext,
        interaction: &Interaction,
        parsed: &ParsedCustomId,
    ) -> Result<Reply, HandlerError> {
        ensure_same_guild(interaction, parsed)?;

        let Some(tag) = interaction.field(TAG_INPUT).and_then(normalize_tag) else {
            return Ok(Reply::ephemeral(
                "⚠️ Clan tags must be 2-6 letters or digits.",
            ));
        };
        let Some(name) = interaction.field(NAME_INPUT) else {
            return Ok(Reply::ephemeral("⚠️ Please give your clan a name."));
        };

        let created_by = interaction.actor_id.to_string();
        match clan::create_clan(&ctx.database, &parsed.guild_id, &tag, name, &created_by).await {
            Ok(created) => {
                info!(guild_id = %created.guild_id, tag = %created.tag, "Clan created");
                Ok(Reply::public(format!(
                    "🛡️ Clan **[{}] {}** has been created by <@{}>.",
                    created.tag, created.name, created.created_by
                )))
            }
            Err(StoreError::AlreadyExists { .. }) => Ok(Reply::ephemeral(format!(
                "⚠️ A clan with the tag **{tag}** already exists in this server."
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

/// Handles every `clan-invite:*` button; the invite code is the first extra argument.
pub struct ClanInviteHandler;

#[async_trait]
impl ComponentHandler for ClanInviteHandler {
    fn custom_id(&self) -> &str {
        "clan-invite"
    }

    async fn execute(
        &self,
        ctx: &HandlerContext,
        _interaction: &Interaction,
        parsed: &ParsedCustomId,
    ) -> Result<Reply, HandlerError> {
        let code = parsed
            .first_extra()
            .ok_or_else(|| HandlerError::invalid("clan invite without a code"))?;

        match parsed.action.as_str() {
            "accept" => {
                let handle = ctx
                    .jobs
                    .submit(JobDescriptor::new(
                        PROCESS_INVITE_JOB,
                        json!({ "guildId": parsed.guild_id, "code": code }),
                    ))
                    .await?;
                info!(job_id = %handle.id, code, "Invite queued for processing");
                Ok(Reply::ephemeral(
                    "📨 Your invite is being processed. You'll be notified once you've joined the clan.",
                ))
            }
            "decline" => Ok(Reply::ephemeral("👋 Invite declined.")),
            other => Err(HandlerError::invalid(format!(
                "unknown clan invite action `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::custom_id::decode,
        test_utils::{setup_test_db, test_context, test_context_with_db},
    };

    fn clan_modal(tag: &str, name: &str) -> Interaction {
        Interaction::modal(
            "clan§create§42§10§",
            7,
            Some(42),
            vec![
                (TAG_INPUT.to_string(), tag.to_string()),
                (NAME_INPUT.to_string(), name.to_string()),
            ],
        )
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag(" wolf "), Some("WOLF".to_string()));
        assert_eq!(normalize_tag("a"), None);
        assert_eq!(normalize_tag("toolong7"), None);
        assert_eq!(normalize_tag("no-go"), None);
    }

    #[tokio::test]
    async fn test_button_opens_modal() {
        let (ctx, _jobs) = test_context();
        let parsed = decode("clan§create§42§10§").unwrap();
        let reply = CreateClanButton
            .execute(&ctx, &Interaction::button("clan§create§42§10§", 7, Some(42)), &parsed)
            .await
            .unwrap();

        let Reply::Modal { custom_id, inputs, .. } = reply else {
            panic!("expected a modal");
        };
        assert_eq!(custom_id, "clan§create§42§10§");
        assert_eq!(inputs.len(), 2);
    }

    #[tokio::test]
    async fn test_create_clan_then_conflict() {
        let (ctx, _jobs) = test_context_with_db(setup_test_db().await.unwrap());
        let parsed = decode("clan§create§42§10§").unwrap();

        let reply = CreateClanModal
            .execute(&ctx, &clan_modal("wolf", "Wolf Pack"), &parsed)
            .await
            .unwrap();
        assert_eq!(
            reply,
            Reply::public("🛡️ Clan **[WOLF] Wolf Pack** has been created by <@7>.")
        );

        let reply = CreateClanModal
            .execute(&ctx, &clan_modal("WOLF", "Copycats"), &parsed)
            .await
            .unwrap();
        assert!(reply.content().unwrap().contains("already exists"));
    }

    #[tokio::test]
    async fn test_invalid_tag_is_explained() {
        let (ctx, _jobs) = test_context();
        let parsed = decode("clan§create§42§10§").unwrap();
        let reply = CreateClanModal
            .execute(&ctx, &clan_modal("!", "Bad"), &parsed)
            .await
            .unwrap();
        assert!(reply.content().unwrap().contains("2-6 letters"));
    }

    #[tokio::test]
    async fn test_decline_submits_nothing() {
        let (ctx, mut jobs) = test_context();
        let raw = "clan-invite§decline§42§10§ABC123";
        let reply = ClanInviteHandler
            .execute(&ctx, &Interaction::button(raw, 7, Some(42)), &decode(raw).unwrap())
            .await
            .unwrap();
        assert_eq!(reply, Reply::ephemeral("👋 Invite declined."));
        assert!(jobs.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invite_without_code_fails() {
        let (ctx, _jobs) = test_context();
        let raw = "clan-invite§accept§42§10§";
        let err = ClanInviteHandler
            .execute(&ctx, &Interaction::button(raw, 7, Some(42)), &decode(raw).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::InvalidInput { .. }));
    }
}
