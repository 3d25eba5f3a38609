//! `/ticket` - posts the support ticket panel.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::custom_id::{CustomIdCategory, encode},
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{ButtonStyle, CreateActionRow, CreateButton};

    const OPEN_COOLDOWN_SECS: u32 = 30;

    /// Posts a panel with an "Open ticket" button.
    #[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn ticket(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?.to_string();
        let open_id = encode::<&str>(
            CustomIdCategory::Ticket,
            "open",
            &guild_id,
            OPEN_COOLDOWN_SECS,
            &[],
        )?;

        ctx.send(
            poise::CreateReply::default()
                .content("🎫 **Need help?** Press the button below to open a support ticket.")
                .components(vec![CreateActionRow::Buttons(vec![
                    CreateButton::new(open_id)
                        .label("Open ticket")
                        .style(ButtonStyle::Primary),
                ])]),
        )
        .await?;
        Ok(())
    }
}

pub use inner::*;
