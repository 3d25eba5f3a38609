//! `/settings` - shows the guild's toggles with one button per setting.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            custom_id::{CustomIdCategory, encode},
            settings::{self, SettingField},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{ButtonStyle, CreateActionRow, CreateButton};

    /// Seconds between two toggles of the same setting by the same admin.
    const TOGGLE_COOLDOWN_SECS: u32 = 5;

    /// Shows and toggles this server's settings.
    #[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn settings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?.to_string();
        let current = settings::ensure_guild_settings(&ctx.data().database, &guild_id).await?;

        let summary = SettingField::ALL
            .iter()
            .map(|field| {
                let state = if field.value(&current) { "on" } else { "off" };
                format!("• **{field}**: {state}")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let buttons = SettingField::ALL
            .iter()
            .map(|field| {
                let custom_id = encode::<&str>(
                    CustomIdCategory::Settings,
                    &field.toggle_action(),
                    &guild_id,
                    TOGGLE_COOLDOWN_SECS,
                    &[],
                )?;
                Ok(CreateButton::new(custom_id)
                    .label(format!("Toggle {field}"))
                    .style(ButtonStyle::Secondary))
            })
            .collect::<Result<Vec<_>>>()?;

        ctx.send(
            poise::CreateReply::default()
                .content(format!("⚙️ **Server settings**\n{summary}"))
                .components(vec![CreateActionRow::Buttons(buttons)])
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

pub use inner::*;
