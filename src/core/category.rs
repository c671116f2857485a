//! Category business logic.

use crate::entities::{Category, category};
use crate::errors::{Error, Result};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Payload for creating a category.
#[derive(Debug, Deserialize)]
pub struct NewCategory {
    /// Display name
    pub name: String,
    /// Optional description; stored as an empty string when omitted
    pub description: Option<String>,
}

/// Retrieves all categories ordered by id.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by id, returning None if absent.
pub async fn get_category(
    db: &DatabaseConnection,
    category_id: i32,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new category.
pub async fn create_category(db: &DatabaseConnection, new: NewCategory) -> Result<category::Model> {
    let name = new.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "name must not be empty".to_string(),
        });
    }

    let model = category::ActiveModel {
        name: Set(name),
        description: Set(new.description.unwrap_or_default()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Deletes a category by id.
pub async fn delete_category(db: &DatabaseConnection, category_id: i32) -> Result<()> {
    let existing = Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "category" })?;

    existing.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_and_get_category() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_category(
            &db,
            NewCategory {
                name: "Acids".to_string(),
                description: Some("Strong and weak acids".to_string()),
            },
        )
        .await?;

        let found = get_category(&db, created.id).await?;
        assert_eq!(found, Some(created));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_description_defaults_to_empty() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_category(
            &db,
            NewCategory {
                name: "Solvents".to_string(),
                description: None,
            },
        )
        .await?;

        assert_eq!(created.description, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_name_rejected() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_category(
            &db,
            NewCategory {
                name: "  ".to_string(),
                description: None,
            },
        )
        .await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_category(&db, "Bases").await?;

        delete_category(&db, created.id).await?;
        assert!(get_category(&db, created.id).await?.is_none());

        let result = delete_category(&db, created.id).await;
        assert!(matches!(
            result,
            Err(Error::NotFound { entity: "category" })
        ));

        Ok(())
    }
}
