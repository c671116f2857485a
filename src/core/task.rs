//! Task business logic - assignments with optional attachments.
//!
//! The per-student completion status is derived at read time from the
//! submissions table and never stored. Deleting a task takes its submissions
//! and stored files with it; the files are removed only after the database
//! transaction commits, so a rollback leaves them in place.

use crate::core::attachment::AttachmentStore;
use crate::entities::{Submission, Task, submission, task, user};
use crate::errors::{Error, Result};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;

/// Fields for creating a task. The attachment, if any, is saved separately
/// and its stored path passed alongside.
#[derive(Debug)]
pub struct TaskDraft {
    /// Title shown to students
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Calendar date the task is due
    pub due_date: Option<Date>,
    /// Time of day submissions close
    pub due_time: Option<Time>,
    /// Creating user
    pub created_by: i32,
}

/// Fields for updating a task. The creator reference never changes.
#[derive(Debug)]
pub struct TaskChanges {
    /// Title shown to students
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Calendar date the task is due
    pub due_date: Option<Date>,
    /// Time of day submissions close
    pub due_time: Option<Time>,
}

/// Retrieves all tasks with their creators, ordered by id.
pub async fn list_tasks(
    db: &DatabaseConnection,
) -> Result<Vec<(task::Model, Option<user::Model>)>> {
    Task::find()
        .find_also_related(crate::entities::User)
        .order_by_asc(task::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The ids of every task the given student has a submission for.
///
/// This feeds the derived "completed"/"pending" annotation on task listings;
/// the status itself is computed by the caller and never persisted.
pub async fn completed_task_ids(
    db: &DatabaseConnection,
    student_id: i32,
) -> Result<HashSet<i32>> {
    let submissions = Submission::find()
        .filter(submission::Column::StudentId.eq(student_id))
        .all(db)
        .await?;

    Ok(submissions.into_iter().map(|s| s.task_id).collect())
}

/// Finds a task by id, returning None if absent.
pub async fn get_task(db: &DatabaseConnection, task_id: i32) -> Result<Option<task::Model>> {
    Task::find_by_id(task_id).one(db).await.map_err(Into::into)
}

/// Finds a task together with its creator.
pub async fn get_task_with_creator(
    db: &DatabaseConnection,
    task_id: i32,
) -> Result<Option<(task::Model, Option<user::Model>)>> {
    Task::find_by_id(task_id)
        .find_also_related(crate::entities::User)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a task, recording the stored attachment path when one was
/// uploaded.
pub async fn create_task(
    db: &DatabaseConnection,
    draft: TaskDraft,
    file_path: Option<String>,
) -> Result<task::Model> {
    let title = draft.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::Validation {
            message: "title must not be empty".to_string(),
        });
    }

    let model = task::ActiveModel {
        title: Set(title),
        description: Set(draft.description),
        due_date: Set(draft.due_date),
        due_time: Set(draft.due_time),
        created_by: Set(Some(draft.created_by)),
        file_path: Set(file_path),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Applies an update to a task. When a new attachment path is supplied the
/// previous path is returned so the caller can remove the old file after the
/// row change is committed.
pub async fn update_task(
    db: &DatabaseConnection,
    task_id: i32,
    changes: TaskChanges,
    new_file_path: Option<String>,
) -> Result<(task::Model, Option<String>)> {
    let title = changes.title.trim().to_string();
    if title.is_empty() {
        return Err(Error::Validation {
            message: "title must not be empty".to_string(),
        });
    }

    let existing = get_task(db, task_id)
        .await?
        .ok_or(Error::NotFound { entity: "task" })?;
    let previous_file = existing.file_path.clone();
    let has_new_file = new_file_path.is_some();

    let mut active: task::ActiveModel = existing.into();
    active.title = Set(title);
    active.description = Set(changes.description);
    active.due_date = Set(changes.due_date);
    active.due_time = Set(changes.due_time);
    if let Some(path) = new_file_path {
        active.file_path = Set(Some(path));
    }

    let updated = active.update(db).await?;
    let replaced = if has_new_file { previous_file } else { None };

    Ok((updated, replaced))
}

/// Deletes a task together with its submissions and stored files.
///
/// Rows go first, inside one transaction; files are removed only after the
/// commit succeeds, and a failed file removal is logged rather than
/// propagated since the records are already gone.
pub async fn delete_task(
    db: &DatabaseConnection,
    store: &AttachmentStore,
    task_id: i32,
) -> Result<()> {
    let txn = db.begin().await?;

    let existing = Task::find_by_id(task_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound { entity: "task" })?;

    let submissions = Submission::find()
        .filter(submission::Column::TaskId.eq(task_id))
        .all(&txn)
        .await?;

    let mut stale_files: Vec<String> =
        submissions.iter().filter_map(|s| s.file_path.clone()).collect();
    if let Some(path) = existing.file_path.clone() {
        stale_files.push(path);
    }

    Submission::delete_many()
        .filter(submission::Column::TaskId.eq(task_id))
        .exec(&txn)
        .await?;

    existing.delete(&txn).await?;
    txn.commit().await?;

    for path in stale_files {
        if let Err(error) = store.delete(&path).await {
            tracing::warn!(%error, %path, "failed to remove stale attachment");
        }
    }

    Ok(())
}
