//! Reagent business logic - inventory item management.
//!
//! Stock adjustments themselves live in [`crate::core::request`]; this module
//! covers the reagent records and their category association.

use crate::entities::{Category, Reagent, category, reagent};
use crate::errors::{Error, Result};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Payload for registering a reagent.
#[derive(Debug, Deserialize)]
pub struct NewReagent {
    /// Display name
    pub name: String,
    /// Initial quantity in stock; must be finite and non-negative
    pub quantity: f64,
    /// Measurement unit
    pub unit: String,
    /// Minimum stock threshold
    pub minimum: f64,
    /// Storage location
    pub location: String,
    /// Category the reagent belongs to
    pub category_id: i32,
    /// User registering the reagent, when known
    pub created_by: Option<i32>,
}

/// Payload for updating a reagent. The creator reference is never changed
/// after registration.
#[derive(Debug, Deserialize)]
pub struct ReagentChanges {
    /// Display name
    pub name: String,
    /// Quantity in stock
    pub quantity: f64,
    /// Measurement unit
    pub unit: String,
    /// Minimum stock threshold
    pub minimum: f64,
    /// Storage location
    pub location: String,
    /// Category the reagent belongs to
    pub category_id: i32,
}

/// Retrieves all reagents with their categories, ordered by id.
pub async fn list_reagents(
    db: &DatabaseConnection,
) -> Result<Vec<(reagent::Model, Option<category::Model>)>> {
    Reagent::find()
        .find_also_related(Category)
        .order_by_asc(reagent::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a reagent by id, returning None if absent.
pub async fn get_reagent(
    db: &DatabaseConnection,
    reagent_id: i32,
) -> Result<Option<reagent::Model>> {
    Reagent::find_by_id(reagent_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a reagent together with its category.
pub async fn get_reagent_with_category(
    db: &DatabaseConnection,
    reagent_id: i32,
) -> Result<Option<(reagent::Model, Option<category::Model>)>> {
    Reagent::find_by_id(reagent_id)
        .find_also_related(Category)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Registers a new reagent.
pub async fn create_reagent(db: &DatabaseConnection, new: NewReagent) -> Result<reagent::Model> {
    validate_quantities(new.quantity, new.minimum)?;

    let name = new.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "name must not be empty".to_string(),
        });
    }

    let model = reagent::ActiveModel {
        name: Set(name),
        quantity: Set(new.quantity),
        unit: Set(new.unit),
        minimum: Set(new.minimum),
        location: Set(new.location),
        category_id: Set(new.category_id),
        created_by: Set(new.created_by),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Applies a full update to a reagent.
pub async fn update_reagent(
    db: &DatabaseConnection,
    reagent_id: i32,
    changes: ReagentChanges,
) -> Result<reagent::Model> {
    validate_quantities(changes.quantity, changes.minimum)?;

    let existing = get_reagent(db, reagent_id)
        .await?
        .ok_or(Error::NotFound { entity: "reagent" })?;

    let mut active: reagent::ActiveModel = existing.into();
    active.name = Set(changes.name);
    active.quantity = Set(changes.quantity);
    active.unit = Set(changes.unit);
    active.minimum = Set(changes.minimum);
    active.location = Set(changes.location);
    active.category_id = Set(changes.category_id);

    active.update(db).await.map_err(Into::into)
}

/// Deletes a reagent by id.
pub async fn delete_reagent(db: &DatabaseConnection, reagent_id: i32) -> Result<()> {
    let existing = get_reagent(db, reagent_id)
        .await?
        .ok_or(Error::NotFound { entity: "reagent" })?;

    existing.delete(db).await?;
    Ok(())
}

fn validate_quantities(quantity: f64, minimum: f64) -> Result<()> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(Error::Validation {
            message: "quantity must be a non-negative number".to_string(),
        });
    }
    if !minimum.is_finite() || minimum < 0.0 {
        return Err(Error::Validation {
            message: "minimum must be a non-negative number".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_reagent_and_fetch_with_category() -> Result<()> {
        let db = setup_test_db().await?;
        let acids = create_test_category(&db, "Acids").await?;

        let created = create_reagent(
            &db,
            NewReagent {
                name: "Hydrochloric acid".to_string(),
                quantity: 500.0,
                unit: "ml".to_string(),
                minimum: 50.0,
                location: "Cabinet 3".to_string(),
                category_id: acids.id,
                created_by: None,
            },
        )
        .await?;

        let (found, found_category) = get_reagent_with_category(&db, created.id).await?.unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found_category, Some(acids));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_reagent_rejects_negative_quantity() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Acids").await?;

        let result = create_reagent(
            &db,
            NewReagent {
                name: "Ethanol".to_string(),
                quantity: -1.0,
                unit: "ml".to_string(),
                minimum: 0.0,
                location: "Shelf 1".to_string(),
                category_id: category.id,
                created_by: None,
            },
        )
        .await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_reagent_replaces_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Solvents").await?;
        let other = create_test_category(&db, "Buffers").await?;
        let reagent = create_test_reagent(&db, "Acetone", 100.0, category.id).await?;

        let updated = update_reagent(
            &db,
            reagent.id,
            ReagentChanges {
                name: "Acetone (HPLC)".to_string(),
                quantity: 75.0,
                unit: "ml".to_string(),
                minimum: 20.0,
                location: "Cabinet 1".to_string(),
                category_id: other.id,
            },
        )
        .await?;

        assert_eq!(updated.name, "Acetone (HPLC)");
        assert_eq!(updated.quantity, 75.0);
        assert_eq!(updated.category_id, other.id);
        // Creator survives a full update
        assert_eq!(updated.created_by, reagent.created_by);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_reagent_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_reagent(
            &db,
            9999,
            ReagentChanges {
                name: "Ghost".to_string(),
                quantity: 1.0,
                unit: "g".to_string(),
                minimum: 0.0,
                location: "Nowhere".to_string(),
                category_id: 1,
            },
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound { entity: "reagent" })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_reagents_includes_categories() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Salts").await?;
        create_test_reagent(&db, "NaCl", 250.0, category.id).await?;
        create_test_reagent(&db, "KCl", 100.0, category.id).await?;

        let listed = list_reagents(&db).await?;
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|(_, c)| c.as_ref() == Some(&category)));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_reagent() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Salts").await?;
        let reagent = create_test_reagent(&db, "NaCl", 250.0, category.id).await?;

        delete_reagent(&db, reagent.id).await?;
        assert!(get_reagent(&db, reagent.id).await?.is_none());

        let result = delete_reagent(&db, reagent.id).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "reagent" })));

        Ok(())
    }
}
