//! Clan entity - a named group inside a guild.
//!
//! Tags are unique per guild (enforced by a composite unique index created
//! alongside the table).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Clan database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clans")]
pub struct Model {
    /// Unique identifier for the clan
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord guild ID the clan belongs to
    pub guild_id: String,
    /// Short uppercase tag (e.g. "WOLF")
    pub tag: String,
    /// Display name
    pub name: String,
    /// Discord user ID of the creator
    pub created_by: String,
    /// When the clan was created
    pub created_at: DateTimeUtc,
}

/// Clans have no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
