//! Announcement business logic.

use crate::entities::{Announcement, announcement, user};
use crate::errors::{Error, Result};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;

/// Title used when the author does not provide one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Payload for posting an announcement.
#[derive(Debug, Deserialize)]
pub struct NewAnnouncement {
    /// Author of the announcement
    pub user_id: i32,
    /// Headline; defaults to [`DEFAULT_TITLE`] when omitted
    pub title: Option<String>,
    /// Announcement text
    pub body: String,
}

/// Payload for editing an announcement. An omitted title keeps the current
/// one.
#[derive(Debug, Deserialize)]
pub struct AnnouncementChanges {
    /// Author of the announcement
    pub user_id: i32,
    /// Replacement headline, when given
    pub title: Option<String>,
    /// Announcement text
    pub body: String,
}

/// Retrieves all announcements with their authors, ordered by id.
pub async fn list_announcements(
    db: &DatabaseConnection,
) -> Result<Vec<(announcement::Model, Option<user::Model>)>> {
    Announcement::find()
        .find_also_related(crate::entities::User)
        .order_by_asc(announcement::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an announcement by id, returning None if absent.
pub async fn get_announcement(
    db: &DatabaseConnection,
    announcement_id: i32,
) -> Result<Option<announcement::Model>> {
    Announcement::find_by_id(announcement_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Posts an announcement. The author must exist.
pub async fn create_announcement(
    db: &DatabaseConnection,
    new: NewAnnouncement,
) -> Result<announcement::Model> {
    crate::core::user::get_user(db, new.user_id)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;

    let model = announcement::ActiveModel {
        user_id: Set(new.user_id),
        posted_at: Set(chrono::Utc::now()),
        title: Set(new.title.unwrap_or_else(|| DEFAULT_TITLE.to_string())),
        body: Set(new.body),
        ..Default::default()
    };

    model.insert(db).await.map_err(Into::into)
}

/// Edits an announcement. The new author must exist; an omitted title keeps
/// the current one.
pub async fn update_announcement(
    db: &DatabaseConnection,
    announcement_id: i32,
    changes: AnnouncementChanges,
) -> Result<announcement::Model> {
    let existing = get_announcement(db, announcement_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "announcement",
        })?;

    crate::core::user::get_user(db, changes.user_id)
        .await?
        .ok_or(Error::NotFound { entity: "user" })?;

    let mut active: announcement::ActiveModel = existing.into();
    active.user_id = Set(changes.user_id);
    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    active.body = Set(changes.body);

    active.update(db).await.map_err(Into::into)
}

/// Deletes an announcement by id.
pub async fn delete_announcement(db: &DatabaseConnection, announcement_id: i32) -> Result<()> {
    let existing = get_announcement(db, announcement_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "announcement",
        })?;

    existing.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_announcement_defaults_title() -> Result<()> {
        let db = setup_test_db().await?;
        let author = create_test_user(&db, "alice").await?;

        let posted = create_announcement(
            &db,
            NewAnnouncement {
                user_id: author.id,
                title: None,
                body: "Lab closed on Friday".to_string(),
            },
        )
        .await?;

        assert_eq!(posted.title, DEFAULT_TITLE);
        assert_eq!(posted.body, "Lab closed on Friday");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_announcement_requires_author() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_announcement(
            &db,
            NewAnnouncement {
                user_id: 9999,
                title: Some("Notice".to_string()),
                body: "text".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound { entity: "user" })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_keeps_title_when_omitted() -> Result<()> {
        let db = setup_test_db().await?;
        let author = create_test_user(&db, "alice").await?;
        let posted = create_test_announcement(&db, author.id, "Safety briefing").await?;

        let updated = update_announcement(
            &db,
            posted.id,
            AnnouncementChanges {
                user_id: author.id,
                title: None,
                body: "Moved to room 204".to_string(),
            },
        )
        .await?;

        assert_eq!(updated.title, "Safety briefing");
        assert_eq!(updated.body, "Moved to room 204");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_announcement_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let author = create_test_user(&db, "alice").await?;

        let result = update_announcement(
            &db,
            9999,
            AnnouncementChanges {
                user_id: author.id,
                title: None,
                body: "text".to_string(),
            },
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::NotFound {
                entity: "announcement"
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_announcements_includes_authors() -> Result<()> {
        let db = setup_test_db().await?;
        let author = create_test_user(&db, "alice").await?;
        create_test_announcement(&db, author.id, "First").await?;
        create_test_announcement(&db, author.id, "Second").await?;

        let listed = list_announcements(&db).await?;
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|(_, a)| a.as_ref() == Some(&author)));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_announcement() -> Result<()> {
        let db = setup_test_db().await?;
        let author = create_test_user(&db, "alice").await?;
        let posted = create_test_announcement(&db, author.id, "Notice").await?;

        delete_announcement(&db, posted.id).await?;
        assert!(get_announcement(&db, posted.id).await?.is_none());

        Ok(())
    }
}
