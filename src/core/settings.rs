//! Guild settings business logic.
//!
//! One row per guild, created when the bot joins (or lazily on first toggle)
//! and removed when it leaves.

use crate::{
    entities::{GuildSettings, guild_settings},
    errors::StoreError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, sea_query::OnConflict};
use std::fmt;

/// A boolean column that can be toggled from a settings button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    /// `tickets_enabled`
    Tickets,
    /// `logs_enabled`
    Logs,
    /// `invites_enabled`
    Invites,
}

impl SettingField {
    /// All toggleable fields, in display order.
    pub const ALL: [Self; 3] = [Self::Tickets, Self::Logs, Self::Invites];

    /// Short name used in custom id actions (`toggle-<name>`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tickets => "tickets",
            Self::Logs => "logs",
            Self::Invites => "invites",
        }
    }

    /// Custom id action that toggles this field.
    #[must_use]
    pub fn toggle_action(self) -> String {
        format!("toggle-{}", self.name())
    }

    /// Current value of this field in `settings`.
    #[must_use]
    pub const fn value(self, settings: &guild_settings::Model) -> bool {
        match self {
            Self::Tickets => settings.tickets_enabled,
            Self::Logs => settings.logs_enabled,
            Self::Invites => settings.invites_enabled,
        }
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Makes sure a settings row exists for `guild_id` and returns it.
///
/// New rows start with every feature disabled. Concurrent callers are safe:
/// the insert ignores an existing row.
pub async fn ensure_guild_settings(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<guild_settings::Model, StoreError> {
    let row = guild_settings::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        tickets_enabled: Set(false),
        logs_enabled: Set(false),
        invites_enabled: Set(false),
        updated_at: Set(Utc::now()),
    };

    GuildSettings::insert(row)
        .on_conflict(
            OnConflict::column(guild_settings::Column::GuildId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    get_guild_settings(db, guild_id)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            entity: "guild settings",
            key: guild_id.to_string(),
        })
}

/// Fetches the settings row for `guild_id`, if any.
pub async fn get_guild_settings(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Option<guild_settings::Model>, StoreError> {
    GuildSettings::find_by_id(guild_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Flips `field` for `guild_id` and returns the updated row.
pub async fn toggle_setting(
    db: &DatabaseConnection,
    guild_id: &str,
    field: SettingField,
) -> Result<guild_settings::Model, StoreError> {
    let current = ensure_guild_settings(db, guild_id).await?;
    let enabled = !field.value(&current);

    let mut row: guild_settings::ActiveModel = current.into();
    match field {
        SettingField::Tickets => row.tickets_enabled = Set(enabled),
        SettingField::Logs => row.logs_enabled = Set(enabled),
        SettingField::Invites => row.invites_enabled = Set(enabled),
    }
    row.updated_at = Set(Utc::now());

    row.update(db).await.map_err(Into::into)
}

/// Deletes the settings row for `guild_id`. Returns whether a row existed.
pub async fn remove_guild_settings(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<bool, StoreError> {
    let result = GuildSettings::delete_by_id(guild_id.to_string())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[test]
    fn test_toggle_actions() {
        let actions: Vec<String> = SettingField::ALL
            .into_iter()
            .map(SettingField::toggle_action)
            .collect();
        assert_eq!(actions, ["toggle-tickets", "toggle-logs", "toggle-invites"]);
    }

    #[tokio::test]
    async fn test_ensure_guild_settings_is_idempotent() -> Result<(), StoreError> {
        let db = setup_test_db().await.unwrap();

        let first = ensure_guild_settings(&db, "42").await?;
        assert!(!first.tickets_enabled);
        assert!(!first.logs_enabled);
        assert!(!first.invites_enabled);

        let second = ensure_guild_settings(&db, "42").await?;
        assert_eq!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_setting_flips_only_one_field() -> Result<(), StoreError> {
        let db = setup_test_db().await.unwrap();

        let toggled = toggle_setting(&db, "42", SettingField::Tickets).await?;
        assert!(toggled.tickets_enabled);
        assert!(!toggled.logs_enabled);

        let toggled = toggle_setting(&db, "42", SettingField::Tickets).await?;
        assert!(!toggled.tickets_enabled);

        let toggled = toggle_setting(&db, "42", SettingField::Logs).await?;
        assert!(toggled.logs_enabled);
        assert!(!toggled.invites_enabled);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_guild_settings() -> Result<(), StoreError> {
        let db = setup_test_db().await.unwrap();

        ensure_guild_settings(&db, "42").await?;
        assert!(remove_guild_settings(&db, "42").await?);
        assert!(get_guild_settings(&db, "42").await?.is_none());
        assert!(!remove_guild_settings(&db, "42").await?);
        Ok(())
    }
}
