//! Clan commands - list/create clans and post invites.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            clan,
            custom_id::{CustomIdCategory, encode},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{ButtonStyle, CreateActionRow, CreateButton};

    const CREATE_COOLDOWN_SECS: u32 = 30;
    const INVITE_COOLDOWN_SECS: u32 = 10;

    /// Lists this server's clans and offers to create one.
    #[poise::command(slash_command, guild_only)]
    pub async fn clan(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?.to_string();
        let clans = clan::get_clans_for_guild(&ctx.data().database, &guild_id).await?;

        let listing = if clans.is_empty() {
            "No clans yet. Be the first!".to_string()
        } else {
            clans
                .iter()
                .map(|c| format!("• **[{}]** {}", c.tag, c.name))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let create_id = encode::<&str>(
            CustomIdCategory::Clan,
            "create",
            &guild_id,
            CREATE_COOLDOWN_SECS,
            &[],
        )?;

        ctx.send(
            poise::CreateReply::default()
                .content(format!("🛡️ **Clans**\n{listing}"))
                .components(vec![CreateActionRow::Buttons(vec![
                    CreateButton::new(create_id)
                        .label("Create clan")
                        .style(ButtonStyle::Primary),
                ])])
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Posts a clan invite members can accept or decline.
    #[poise::command(slash_command, guild_only)]
    pub async fn invite(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Invite code"] code: String,
    ) -> Result<()> {
        let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?.to_string();
        let code = code.trim();

        let accept_id = encode(
            CustomIdCategory::ClanInvite,
            "accept",
            &guild_id,
            INVITE_COOLDOWN_SECS,
            &[code],
        );
        let decline_id = encode(
            CustomIdCategory::ClanInvite,
            "decline",
            &guild_id,
            INVITE_COOLDOWN_SECS,
            &[code],
        );
        let (Ok(accept_id), Ok(decline_id)) = (accept_id, decline_id) else {
            ctx.say("⚠️ That invite code can't be used. Try a shorter code without special symbols.")
                .await?;
            return Ok(());
        };

        ctx.send(
            poise::CreateReply::default()
                .content(format!("📨 <@{}> posted a clan invite.", ctx.author().id))
                .components(vec![CreateActionRow::Buttons(vec![
                    CreateButton::new(accept_id)
                        .label("Accept")
                        .style(ButtonStyle::Success),
                    CreateButton::new(decline_id)
                        .label("Decline")
                        .style(ButtonStyle::Secondary),
                ])]),
        )
        .await?;
        Ok(())
    }
}

pub use inner::*;
