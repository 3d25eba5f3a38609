//! Database configuration module.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{Clan, GuildSettings, clan};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, sea_query::Index};
use serde::Deserialize;

/// Default database location, created on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/guild_warden.sqlite?mode=rwc";

/// `[database]` section of the configuration file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (`DATABASE_URL` overrides it)
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables (and the clan tag index) if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut guild_settings_table = schema.create_table_from_entity(GuildSettings);
    guild_settings_table.if_not_exists();
    let mut clan_table = schema.create_table_from_entity(Clan);
    clan_table.if_not_exists();

    let clan_tag_index = Index::create()
        .name("idx_clans_guild_tag")
        .table(Clan)
        .col(clan::Column::GuildId)
        .col(clan::Column::Tag)
        .unique()
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&guild_settings_table)).await?;
    db.execute(builder.build(&clan_table)).await?;
    db.execute(builder.build(&clan_tag_index)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ClanModel, GuildSettingsModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<GuildSettingsModel> = GuildSettings::find().limit(1).all(&db).await?;
        let _: Vec<ClanModel> = Clan::find().limit(1).all(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
