use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::bookmark::{Bookmark, BookmarkJobRow, BookmarkWithJob};

#[derive(Debug, thiserror::Error)]
pub enum BookmarkError {
    #[error("Job not found")]
    JobNotFound,

    #[error("Job already bookmarked")]
    AlreadyBookmarked,

    #[error("Bookmark not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<BookmarkError> for ApiError {
    fn from(err: BookmarkError) -> Self {
        match err {
            BookmarkError::JobNotFound => ApiError::not_found("Job not found"),
            // The reference behavior reports the duplicate as a plain 400,
            // not 409. See DESIGN.md.
            BookmarkError::AlreadyBookmarked => ApiError::bad_request("Job already bookmarked"),
            BookmarkError::NotFound => ApiError::not_found("Bookmark not found"),
            BookmarkError::Database(e) => e.into(),
        }
    }
}

/// Toggleable user-to-job bookmarks. The (user, job) pair is unique; the
/// database constraint backs up the pre-insert check so a concurrent
/// duplicate insert surfaces as the same domain condition.
pub struct BookmarkService {
    pool: PgPool,
}

impl BookmarkService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn add(&self, user_id: Uuid, job_id: Uuid) -> Result<Bookmark, BookmarkError> {
        let job_exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;
        if job_exists == 0 {
            return Err(BookmarkError::JobNotFound);
        }

        if self.find(user_id, job_id).await?.is_some() {
            return Err(BookmarkError::AlreadyBookmarked);
        }

        let result = sqlx::query_as::<_, Bookmark>(
            "INSERT INTO bookmarks (user_id, job_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(bookmark) => Ok(bookmark),
            // Lost a race against an identical insert; same condition as the
            // pre-check catching it.
            Err(e) if is_unique_violation(&e) => Err(BookmarkError::AlreadyBookmarked),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove(&self, user_id: Uuid, job_id: Uuid) -> Result<(), BookmarkError> {
        let bookmark_id = self
            .find(user_id, job_id)
            .await?
            .ok_or(BookmarkError::NotFound)?;

        sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(bookmark_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// The caller's bookmarks, newest first, each joined with its job and the
    /// job owner's public fields. Expired jobs are not filtered here.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<BookmarkWithJob>, BookmarkError> {
        let rows = sqlx::query_as::<_, BookmarkJobRow>(
            "SELECT b.id AS bookmark_id, b.user_id AS bookmark_user_id, \
             b.created_at AS bookmark_created_at, \
             j.*, u.\"name\" AS owner_name, u.\"email\" AS owner_email \
             FROM bookmarks b \
             JOIN jobs j ON j.id = b.job_id \
             JOIN users u ON u.id = j.\"user_id\" \
             WHERE b.user_id = $1 \
             ORDER BY b.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BookmarkWithJob::from).collect())
    }

    async fn find(&self, user_id: Uuid, job_id: Uuid) -> Result<Option<Uuid>, BookmarkError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM bookmarks WHERE user_id = $1 AND job_id = $2",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
