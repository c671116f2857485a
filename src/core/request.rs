//! Request business logic - the reagent inventory engine.
//!
//! Creating a request withdraws stock from its reagent and deleting the
//! request puts the stock back. Each operation runs inside one database
//! transaction so the request row and the quantity adjustment commit or roll
//! back together. The decrement itself is a guarded atomic update
//! (`quantity = quantity - ? ... AND quantity >= ?`), so two concurrent
//! requests can never drive a reagent's quantity negative: whichever commits
//! second sees zero affected rows and fails with `InsufficientStock`.

use crate::entities::{Reagent, Request, reagent, request};
use crate::errors::{Error, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;

/// Payload for placing a reagent request.
#[derive(Debug, Deserialize)]
pub struct NewRequest {
    /// Reagent to withdraw from
    pub reagent_id: i32,
    /// Quantity to withdraw; must be finite and positive
    pub quantity: f64,
    /// Project the withdrawal is charged to
    pub project: String,
    /// Whether this withdrawal belongs to a formal project
    pub is_project: bool,
    /// User placing the request
    pub user_id: i32,
}

/// Retrieves all requests with their reagents, ordered by id.
pub async fn list_requests(
    db: &DatabaseConnection,
) -> Result<Vec<(request::Model, Option<reagent::Model>)>> {
    Request::find()
        .find_also_related(Reagent)
        .order_by_asc(request::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a request by id, returning None if absent.
pub async fn get_request(
    db: &DatabaseConnection,
    request_id: i32,
) -> Result<Option<request::Model>> {
    Request::find_by_id(request_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Places a request, withdrawing the quantity from the reagent's stock.
///
/// Fails with `NotFound` when the reagent does not exist and with
/// `InsufficientStock` when the reagent holds less than the requested
/// quantity. On any failure the transaction rolls back and the stock is
/// left untouched.
pub async fn create_request(db: &DatabaseConnection, new: NewRequest) -> Result<request::Model> {
    if !new.quantity.is_finite() || new.quantity <= 0.0 {
        return Err(Error::Validation {
            message: "quantity must be a positive number".to_string(),
        });
    }

    let txn = db.begin().await?;

    let stock = Reagent::find_by_id(new.reagent_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound { entity: "reagent" })?;

    if stock.quantity < new.quantity {
        return Err(Error::InsufficientStock {
            available: stock.quantity,
            requested: new.quantity,
        });
    }

    // Guarded decrement: only succeeds while enough stock remains, which
    // closes the window between the read above and this write.
    let update = Reagent::update_many()
        .col_expr(
            reagent::Column::Quantity,
            Expr::col(reagent::Column::Quantity).sub(new.quantity),
        )
        .filter(reagent::Column::Id.eq(new.reagent_id))
        .filter(reagent::Column::Quantity.gte(new.quantity))
        .exec(&txn)
        .await?;

    if update.rows_affected == 0 {
        let available = Reagent::find_by_id(new.reagent_id)
            .one(&txn)
            .await?
            .map_or(0.0, |r| r.quantity);
        return Err(Error::InsufficientStock {
            available,
            requested: new.quantity,
        });
    }

    let model = request::ActiveModel {
        reagent_id: Set(new.reagent_id),
        quantity: Set(new.quantity),
        project: Set(new.project),
        is_project: Set(new.is_project),
        user_id: Set(new.user_id),
        requested_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let created = model.insert(&txn).await?;
    txn.commit().await?;

    Ok(created)
}

/// Deletes a request and restores its quantity to the reagent's stock,
/// in one transaction. A reagent that has since been removed is tolerated;
/// the restore simply affects no rows.
pub async fn delete_request(db: &DatabaseConnection, request_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let existing = Request::find_by_id(request_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound { entity: "request" })?;

    Reagent::update_many()
        .col_expr(
            reagent::Column::Quantity,
            Expr::col(reagent::Column::Quantity).add(existing.quantity),
        )
        .filter(reagent::Column::Id.eq(existing.reagent_id))
        .exec(&txn)
        .await?;

    existing.delete(&txn).await?;
    txn.commit().await?;

    Ok(())
}
