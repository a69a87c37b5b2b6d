use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::job::{Job, JobOwnerRow, JobWithOwner};

/// A saved reference from a user to a job. One per (user, job) pair,
/// enforced by a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Flat row for the bookmarks listing join: bookmark + job + job owner.
#[derive(Debug, Clone, FromRow)]
pub struct BookmarkJobRow {
    pub bookmark_id: Uuid,
    pub bookmark_user_id: Uuid,
    pub bookmark_created_at: DateTime<Utc>,
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub job_type: String,
    pub location: String,
    pub job_author: Option<String>,
    pub remote_ok: bool,
    pub apply_url: String,
    pub avatar: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub views: i32,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_name: Option<String>,
    pub owner_email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkWithJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub job: JobWithOwner,
}

impl From<BookmarkJobRow> for BookmarkWithJob {
    fn from(row: BookmarkJobRow) -> Self {
        let job_id = row.id;
        let job = JobWithOwner::from(JobOwnerRow {
            id: row.id,
            title: row.title,
            description: row.description,
            url: row.url,
            job_type: row.job_type,
            location: row.location,
            job_author: row.job_author,
            remote_ok: row.remote_ok,
            apply_url: row.apply_url,
            avatar: row.avatar,
            expires_at: row.expires_at,
            views: row.views,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            owner_name: row.owner_name,
            owner_email: row.owner_email,
        });
        BookmarkWithJob {
            id: row.bookmark_id,
            user_id: row.bookmark_user_id,
            job_id,
            created_at: row.bookmark_created_at,
            job,
        }
    }
}
