//! Guild settings entity - one row per guild the bot has joined.
//!
//! Holds the feature toggles flipped by the settings buttons.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Guild settings database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guild_settings")]
pub struct Model {
    /// Discord guild ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: String,
    /// Whether members may open support tickets
    pub tickets_enabled: bool,
    /// Whether moderation events are logged
    pub logs_enabled: bool,
    /// Whether clan invites are processed
    pub invites_enabled: bool,
    /// Last time any toggle changed
    pub updated_at: DateTimeUtc,
}

/// Guild settings have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
