//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod clan;
pub mod guild_settings;

// Re-export specific types to avoid conflicts
pub use clan::{Column as ClanColumn, Entity as Clan, Model as ClanModel};
pub use guild_settings::{
    Column as GuildSettingsColumn, Entity as GuildSettings, Model as GuildSettingsModel,
};
