//! Settings toggle buttons.

use crate::core::{
    custom_id::ParsedCustomId,
    handler::{ComponentHandler, HandlerContext, HandlerError},
    interaction::{Interaction, Reply},
    settings::{self, SettingField},
};
use async_trait::async_trait;

/// Toggles one boolean setting of the guild named in the custom id.
pub struct ToggleSettingHandler {
    key: String,
    field: SettingField,
}

impl ToggleSettingHandler {
    /// Handler for `settings:toggle-<field>`.
    #[must_use]
    pub fn new(field: SettingField) -> Self {
        Self {
            key: format!("settings:{}", field.toggle_action()),
            field,
        }
    }
}

/// The guild in the custom id must be the guild the button was clicked in.
pub(crate) fn ensure_same_guild(
    interaction: &Interaction,
    parsed: &ParsedCustomId,
) -> Result<(), HandlerError> {
    match interaction.guild_id {
        Some(guild_id) if guild_id.to_string() == parsed.guild_id => Ok(()),
        _ => Err(HandlerError::invalid(format!(
            "custom id targets guild {} but interaction came from {:?}",
            parsed.guild_id, interaction.guild_id
        ))),
    }
}

#[async_trait]
impl ComponentHandler for ToggleSettingHandler {
    fn custom_id(&self) -> &str {
        &self.key
    }

    async fn execute(
        &self,
        ctx: &HandlerContext,
        interaction: &Interaction,
        parsed: &ParsedCustomId,
    ) -> Result<Reply, HandlerError> {
        ensure_same_guild(interaction, parsed)?;

        let updated = settings::toggle_setting(&ctx.database, &parsed.guild_id, self.field).await?;
        let state = if self.field.value(&updated) {
            "enabled ✅"
        } else {
            "disabled ❌"
        };
        Ok(Reply::ephemeral(format!(
            "**{}** are now {state}.",
            capitalize(self.field.name())
        )))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
