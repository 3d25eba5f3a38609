//! General Discord commands - ping and help.
//! These commands don't touch the store or the dispatcher.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Guild Warden Help**\n\
        • `/settings` - Toggle tickets, logs and invites for this server (admins).\n\
        • `/ticket` - Post a panel members can use to open support tickets.\n\
        • `/clan` - List clans and create a new one.\n\
        • `/invite <code>` - Post an invite members can accept or decline.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Buttons have short cooldowns; if one tells you to wait, try again in a few seconds.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
