//! Discord slash command implementations.

/// Clan commands
pub mod clan;

/// General utility commands
pub mod general;

/// Settings panel command
pub mod settings;

/// Ticket panel command
pub mod ticket;

use crate::{bot::BotData, errors::Error};

// Export commands
pub use clan::*;
pub use general::*;
pub use settings::*;
pub use ticket::*;

/// Every slash command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![ping(), help(), settings(), ticket(), clan(), invite()]
}
