//! Clan business logic.

use crate::{
    entities::{Clan, clan},
    errors::StoreError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Inserts a clan. A tag already used in the guild yields [`StoreError::AlreadyExists`].
pub async fn create_clan(
    db: &DatabaseConnection,
    guild_id: &str,
    tag: &str,
    name: &str,
    created_by: &str,
) -> Result<clan::Model, StoreError> {
    let row = clan::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        tag: Set(tag.to_string()),
        name: Set(name.to_string()),
        created_by: Set(created_by.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    row.insert(db)
        .await
        .map_err(|err| StoreError::classify(err, "clan", tag))
}

/// Lists the clans of a guild ordered by tag.
pub async fn get_clans_for_guild(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Vec<clan::Model>, StoreError> {
    Clan::find()
        .filter(clan::Column::GuildId.eq(guild_id))
        .order_by_asc(clan::Column::Tag)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_clan() -> Result<(), StoreError> {
        let db = setup_test_db().await.unwrap();

        let created = create_clan(&db, "42", "WOLF", "Wolf Pack", "7").await?;
        assert_eq!(created.tag, "WOLF");
        assert_eq!(created.created_by, "7");

        let clans = get_clans_for_guild(&db, "42").await?;
        assert_eq!(clans, vec![created]);
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_tag_is_already_exists() -> Result<(), StoreError> {
        let db = setup_test_db().await.unwrap();

        create_clan(&db, "42", "WOLF", "Wolf Pack", "7").await?;
        let err = create_clan(&db, "42", "WOLF", "Other Wolves", "8")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::AlreadyExists { entity: "clan", ref key } if key == "WOLF"
        ));

        // Same tag in another guild is fine
        create_clan(&db, "43", "WOLF", "Wolf Pack", "7").await?;
        Ok(())
    }
}
