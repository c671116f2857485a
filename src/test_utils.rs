//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::core::attachment::AttachmentStore;
use crate::core::{announcement, category, reagent, submission, task, user};
use crate::entities;
use crate::errors::Result;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates an [`AttachmentStore`] rooted in a fresh temporary directory.
/// The directory handle must stay alive for the duration of the test.
pub fn temp_attachment_store() -> (tempfile::TempDir, AttachmentStore) {
    #[allow(clippy::unwrap_used)]
    let dir = tempfile::tempdir().unwrap();
    let store = AttachmentStore::new(dir.path());
    (dir, store)
}

/// Creates a test user with the student role. The email is derived from the
/// username and the password hash is `"test-hash"`.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    create_test_user_with_role(db, username, "student").await
}

/// Creates a test user with an explicit role.
pub async fn create_test_user_with_role(
    db: &DatabaseConnection,
    username: &str,
    role: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        user::NewUser {
            username: username.to_string(),
            name: "Test".to_string(),
            surname: "User".to_string(),
            email: format!("{username}@example.org"),
            password_hash: "test-hash".to_string(),
            role: role.to_string(),
        },
    )
    .await
}

/// Creates a test category with an empty description.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(
        db,
        category::NewCategory {
            name: name.to_string(),
            description: None,
        },
    )
    .await
}

/// Creates a test reagent with the given starting quantity.
///
/// # Defaults
/// * `unit`: "ml"
/// * `minimum`: 10.0
/// * `location`: "Shelf A"
/// * `created_by`: None
pub async fn create_test_reagent(
    db: &DatabaseConnection,
    name: &str,
    quantity: f64,
    category_id: i32,
) -> Result<entities::reagent::Model> {
    reagent::create_reagent(
        db,
        reagent::NewReagent {
            name: name.to_string(),
            quantity,
            unit: "ml".to_string(),
            minimum: 10.0,
            location: "Shelf A".to_string(),
            category_id,
            created_by: None,
        },
    )
    .await
}

/// Creates a test task without attachment, due date, or time.
pub async fn create_test_task(
    db: &DatabaseConnection,
    title: &str,
    created_by: i32,
) -> Result<entities::task::Model> {
    task::create_task(
        db,
        task::TaskDraft {
            title: title.to_string(),
            description: None,
            due_date: None,
            due_time: None,
            created_by,
        },
        None,
    )
    .await
}

/// Creates an ungraded test submission without an attachment.
pub async fn create_test_submission(
    db: &DatabaseConnection,
    task_id: i32,
    student_id: i32,
) -> Result<entities::submission::Model> {
    submission::create_submission(
        db,
        submission::SubmissionDraft {
            task_id,
            student_id,
            grade: None,
            remarks: None,
        },
        None,
    )
    .await
}

/// Creates a test announcement with a short body.
pub async fn create_test_announcement(
    db: &DatabaseConnection,
    user_id: i32,
    title: &str,
) -> Result<entities::announcement::Model> {
    announcement::create_announcement(
        db,
        announcement::NewAnnouncement {
            user_id,
            title: Some(title.to_string()),
            body: "Test announcement body".to_string(),
        },
    )
    .await
}
