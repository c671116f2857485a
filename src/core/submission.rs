//! Submission business logic - student responses to tasks.

use crate::core::attachment::AttachmentStore;
use crate::entities::{Submission, submission};
use crate::errors::{Error, Result};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields for handing in a submission. The attachment, if any, is saved
/// separately and its stored path passed alongside.
#[derive(Debug)]
pub struct SubmissionDraft {
    /// Task being answered
    pub task_id: i32,
    /// Student handing the submission in
    pub student_id: i32,
    /// Grade, when the reviewer sets one at creation time
    pub grade: Option<f64>,
    /// Reviewer remarks
    pub remarks: Option<String>,
}

/// Partial update for a submission: only supplied fields change, and the
/// task/student references are fixed for the submission's lifetime.
#[derive(Debug, Default)]
pub struct SubmissionChanges {
    /// New grade, when grading
    pub grade: Option<f64>,
    /// New remarks
    pub remarks: Option<String>,
}

/// Retrieves all submissions ordered by id.
pub async fn list_submissions(db: &DatabaseConnection) -> Result<Vec<submission::Model>> {
    Submission::find()
        .order_by_asc(submission::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a submission by id, returning None if absent.
pub async fn get_submission(
    db: &DatabaseConnection,
    submission_id: i32,
) -> Result<Option<submission::Model>> {
    Submission::find_by_id(submission_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// All submissions handed in for one task. Fails with `NotFound` when the
/// task itself does not exist.
pub async fn list_for_task(
    db: &DatabaseConnection,
    task_id: i32,
) -> Result<Vec<submission::Model>> {
    crate::core::task::get_task(db, task_id)
        .await?
        .ok_or(Error::NotFound { entity: "task" })?;

    Submission::find()
        .filter(submission::Column::TaskId.eq(task_id))
        .order_by_asc(submission::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// All submissions handed in by one student. Fails with `NotFound` when the
/// user does not exist.
pub async fn list_for_student(
    db: &DatabaseConnection,
    student_id: i32,
) -> Result<Vec<submission::Model>> {
    crate::core::user::get_user(db, student_id)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;

    Submission::find()
        .filter(submission::Column::StudentId.eq(student_id))
        .order_by_asc(submission::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Hands in a submission. Both the task and the student must exist.
pub async fn create_submission(
    db: &DatabaseConnection,
    draft: SubmissionDraft,
    file_path: Option<String>,
) -> Result<submission::Model> {
    validate_grade(draft.grade)?;

    crate::core::task::get_task(db, draft.task_id)
        .await?
        .ok_or(Error::NotFound { entity: "task" })?;
    crate::core::user::get_user(db, draft.student_id)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;

    let model = submission::ActiveModel {
        task_id: Set(draft.task_id),
        student_id: Set(draft.student_id),
        file_path: Set(file_path),
        submitted_at: Set(chrono::Utc::now()),
        grade: Set(draft.grade),
        remarks: Set(draft.remarks),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Applies a partial update. When a new attachment path is supplied the
/// previous path is returned so the caller can remove the old file after
/// the row change is committed.
pub async fn update_submission(
    db: &DatabaseConnection,
    submission_id: i32,
    changes: SubmissionChanges,
    new_file_path: Option<String>,
) -> Result<(submission::Model, Option<String>)> {
    validate_grade(changes.grade)?;

    let existing = get_submission(db, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;
    let previous_file = existing.file_path.clone();
    let has_new_file = new_file_path.is_some();

    let mut active: submission::ActiveModel = existing.into();
    if let Some(grade) = changes.grade {
        active.grade = Set(Some(grade));
    }
    if let Some(remarks) = changes.remarks {
        active.remarks = Set(Some(remarks));
    }
    if let Some(path) = new_file_path {
        active.file_path = Set(Some(path));
    }

    let updated = active.update(db).await?;
    let replaced = if has_new_file { previous_file } else { None };

    Ok((updated, replaced))
}

/// Deletes a submission, removing its stored file after the row is gone.
pub async fn delete_submission(
    db: &DatabaseConnection,
    store: &AttachmentStore,
    submission_id: i32,
) -> Result<()> {
    let existing = get_submission(db, submission_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "submission",
        })?;

    let file_path = existing.file_path.clone();
    existing.delete(db).await?;

    if let Some(path) = file_path {
        if let Err(error) = store.delete(&path).await {
            tracing::warn!(%error, %path, "failed to remove stale attachment");
        }
    }

    Ok(())
}

fn validate_grade(grade: Option<f64>) -> Result<()> {
    if let Some(grade) = grade {
        if !grade.is_finite() {
            return Err(Error::Validation {
                message: "grade must be a finite number".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use std::path::Path;

    #[tokio::test]
    async fn test_create_submission_requires_existing_task() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_test_user(&db, "alice").await?;

        let result = create_submission(
            &db,
            SubmissionDraft {
                task_id: 9999,
                student_id: student.id,
                grade: None,
                remarks: None,
            },
            None,
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound { entity: "task" })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_submission_requires_existing_student() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_user_with_role(&db, "dana", "teacher").await?;
        let task = create_test_task(&db, "Quiz", teacher.id).await?;

        let result = create_submission(
            &db,
            SubmissionDraft {
                task_id: task.id,
                student_id: 9999,
                grade: None,
                remarks: None,
            },
            None,
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound { entity: "user" })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_submission_grades_partially() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_user_with_role(&db, "dana", "teacher").await?;
        let student = create_test_user(&db, "alice").await?;
        let task = create_test_task(&db, "Quiz", teacher.id).await?;
        let handed_in = create_test_submission(&db, task.id, student.id).await?;

        let (graded, replaced) = update_submission(
            &db,
            handed_in.id,
            SubmissionChanges {
                grade: Some(8.5),
                remarks: None,
            },
            None,
        )
        .await?;

        assert_eq!(graded.grade, Some(8.5));
        assert_eq!(graded.remarks, handed_in.remarks);
        assert!(replaced.is_none());

        // A later remarks-only update keeps the grade
        let (amended, _) = update_submission(
            &db,
            handed_in.id,
            SubmissionChanges {
                grade: None,
                remarks: Some("Good work".to_string()),
            },
            None,
        )
        .await?;

        assert_eq!(amended.grade, Some(8.5));
        assert_eq!(amended.remarks.as_deref(), Some("Good work"));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_submission_rejects_nan_grade() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_submission(
            &db,
            1,
            SubmissionChanges {
                grade: Some(f64::NAN),
                remarks: None,
            },
            None,
        )
        .await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_submission_removes_file() -> Result<()> {
        let db = setup_test_db().await?;
        let (_dir, store) = temp_attachment_store();
        let teacher = create_test_user_with_role(&db, "dana", "teacher").await?;
        let student = create_test_user(&db, "alice").await?;
        let task = create_test_task(&db, "Quiz", teacher.id).await?;

        let stored = store.save("answer.pdf", b"bytes").await?;
        let handed_in = create_submission(
            &db,
            SubmissionDraft {
                task_id: task.id,
                student_id: student.id,
                grade: None,
                remarks: None,
            },
            Some(stored.clone()),
        )
        .await?;

        delete_submission(&db, &store, handed_in.id).await?;

        assert!(get_submission(&db, handed_in.id).await?.is_none());
        assert!(!Path::new(&stored).exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_filtered_lookups() -> Result<()> {
        let db = setup_test_db().await?;
        let teacher = create_test_user_with_role(&db, "dana", "teacher").await?;
        let alice = create_test_user(&db, "alice").await?;
        let bob = create_test_user(&db, "bob").await?;
        let quiz = create_test_task(&db, "Quiz", teacher.id).await?;
        let report = create_test_task(&db, "Report", teacher.id).await?;

        create_test_submission(&db, quiz.id, alice.id).await?;
        create_test_submission(&db, quiz.id, bob.id).await?;
        create_test_submission(&db, report.id, alice.id).await?;

        assert_eq!(list_for_task(&db, quiz.id).await?.len(), 2);
        assert_eq!(list_for_task(&db, report.id).await?.len(), 1);
        assert_eq!(list_for_student(&db, alice.id).await?.len(), 2);
        assert_eq!(list_for_student(&db, bob.id).await?.len(), 1);

        let missing_task = list_for_task(&db, 9999).await;
        assert!(matches!(
            missing_task,
            Err(Error::NotFound { entity: "task" })
        ));

        let missing_user = list_for_student(&db, 9999).await;
        assert!(matches!(
            missing_user,
            Err(Error::NotFound { entity: "user" })
        ));

        Ok(())
    }
}
