use sqlx::postgres::PgArguments;
use sqlx::{PgPool, Postgres};
use std::collections::HashSet;
use uuid::Uuid;

use crate::auth::{can_modify, AuthUser};
use crate::error::ApiError;
use crate::models::job::{Job, JobOwnerRow, JobWithOwner};
use crate::payments::{ChargeRequest, PaymentError, PaymentGateway};
use crate::query::{JobSearch, SqlParam};
use crate::validation::{JobPayload, NewJob, ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Job not found")]
    NotFound,

    #[error("Forbidden: You do not own this job")]
    Forbidden,

    #[error("Invalid input")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<ValidationErrors> for JobError {
    fn from(errors: ValidationErrors) -> Self {
        JobError::Validation(errors)
    }
}

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::NotFound => ApiError::not_found("Job not found"),
            JobError::Forbidden => ApiError::forbidden("Forbidden: You do not own this job"),
            JobError::Validation(errors) => ApiError::Validation(errors),
            JobError::Payment(PaymentError::Declined) => {
                ApiError::PaymentFailed("Payment failed".to_string())
            }
            JobError::Payment(other) => ApiError::internal(other.to_string()),
            JobError::Database(e) => e.into(),
        }
    }
}

/// Create/read/update/delete and listing flows for job postings.
pub struct JobService {
    pool: PgPool,
}

impl JobService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a listing query: one page of jobs joined with owner fields, plus
    /// the total matching count. Without pagination the count is just the
    /// result length.
    pub async fn list(&self, search: &JobSearch) -> Result<(Vec<JobWithOwner>, i64), JobError> {
        let query = search.to_sql();
        let rows = bind_params(sqlx::query_as::<_, JobOwnerRow>(&query.sql), &query.params)
            .fetch_all(&self.pool)
            .await?;

        let total = if search.page.is_some() {
            let count = search.to_count_sql();
            bind_scalar_params(sqlx::query_scalar::<_, i64>(&count.sql), &count.params)
                .fetch_one(&self.pool)
                .await?
        } else {
            rows.len() as i64
        };

        Ok((rows.into_iter().map(JobWithOwner::from).collect(), total))
    }

    /// Job ids the given user has bookmarked. Read-only side channel for
    /// annotating listings; failures degrade to the empty set.
    pub async fn bookmarked_ids(&self, user_id: Uuid) -> HashSet<Uuid> {
        let result = sqlx::query_scalar::<_, Uuid>("SELECT job_id FROM bookmarks WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await;

        match result {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                tracing::warn!("bookmark lookup failed for {}: {}", user_id, e);
                HashSet::new()
            }
        }
    }

    /// Fetch one job with its owner's public fields. Expired jobs are still
    /// returned here; expiry only gates listing views.
    pub async fn get(&self, id: Uuid) -> Result<JobWithOwner, JobError> {
        let row = sqlx::query_as::<_, JobOwnerRow>(
            "SELECT j.*, u.\"name\" AS owner_name, u.\"email\" AS owner_email \
             FROM jobs j JOIN users u ON u.id = j.\"user_id\" WHERE j.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(JobError::NotFound)?;

        Ok(JobWithOwner::from(row))
    }

    /// Create a job: validate, capture the posting fee, then insert. A failed
    /// capture aborts with no row written.
    pub async fn create(
        &self,
        identity: &AuthUser,
        payload: &JobPayload,
        gateway: &dyn PaymentGateway,
        fee_cents: u64,
    ) -> Result<Job, JobError> {
        let (new_job, payment_method_id) = validate_for_create(payload)?;

        let capture = gateway
            .charge(ChargeRequest {
                amount_cents: fee_cents,
                payment_method_id,
                description: format!("Job posting: {}", new_job.title),
                user_id: identity.id,
                job_type: new_job.job_type.as_str().to_string(),
            })
            .await?;

        let job = self.insert(identity.id, &new_job).await?;

        // Keep the gateway reference on the payer's record. Best effort; the
        // job row is already committed.
        let result = sqlx::query("UPDATE users SET stripe_id = $1, updated_at = now() WHERE id = $2")
            .bind(&capture.payment_id)
            .bind(identity.id)
            .execute(&self.pool)
            .await;
        if let Err(e) = result {
            tracing::warn!("failed to record payment {} on user {}: {}", capture.payment_id, identity.id, e);
        }

        tracing::info!("job {} created by {} (payment {})", job.id, identity.id, capture.payment_id);
        Ok(job)
    }

    /// Full-payload update, owner-or-admin only. No patch semantics: every
    /// required field must be resupplied.
    pub async fn update(
        &self,
        identity: &AuthUser,
        id: Uuid,
        payload: &JobPayload,
    ) -> Result<Job, JobError> {
        let owner_id = self.owner_of(id).await?;
        if !can_modify(identity, owner_id) {
            return Err(JobError::Forbidden);
        }

        let new_job = payload.validate()?;

        let job = sqlx::query_as::<_, Job>(
            "UPDATE jobs SET title = $1, description = $2, url = $3, job_type = $4, \
             location = $5, job_author = $6, remote_ok = $7, apply_url = $8, avatar = $9, \
             expires_at = $10, updated_at = now() WHERE id = $11 RETURNING *",
        )
        .bind(&new_job.title)
        .bind(&new_job.description)
        .bind(&new_job.url)
        .bind(new_job.job_type.as_str())
        .bind(&new_job.location)
        .bind(&new_job.job_author)
        .bind(new_job.remote_ok)
        .bind(&new_job.apply_url)
        .bind(&new_job.avatar)
        .bind(new_job.expires_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }

    /// Hard delete, owner-or-admin only. Bookmarks cascade at the database.
    pub async fn delete(&self, identity: &AuthUser, id: Uuid) -> Result<(), JobError> {
        let owner_id = self.owner_of(id).await?;
        if !can_modify(identity, owner_id) {
            return Err(JobError::Forbidden);
        }

        sqlx::query("DELETE FROM jobs WHERE id = $1").bind(id).execute(&self.pool).await?;
        tracing::info!("job {} deleted by {}", id, identity.id);
        Ok(())
    }

    async fn owner_of(&self, id: Uuid) -> Result<Uuid, JobError> {
        sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(JobError::NotFound)
    }

    async fn insert(&self, owner_id: Uuid, new_job: &NewJob) -> Result<Job, JobError> {
        let job = sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (title, description, url, job_type, location, job_author, \
             remote_ok, apply_url, avatar, expires_at, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(&new_job.title)
        .bind(&new_job.description)
        .bind(&new_job.url)
        .bind(new_job.job_type.as_str())
        .bind(&new_job.location)
        .bind(&new_job.job_author)
        .bind(new_job.remote_ok)
        .bind(&new_job.apply_url)
        .bind(&new_job.avatar)
        .bind(new_job.expires_at)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(job)
    }
}

/// Create-time validation: the job payload rules plus the payment method
/// requirement, with failures from both collected into one error list.
fn validate_for_create(payload: &JobPayload) -> Result<(NewJob, String), ValidationErrors> {
    let job = payload.validate();
    let payment = payload.require_payment_method();

    match (job, payment) {
        (Ok(job), Ok(payment_method_id)) => Ok((job, payment_method_id)),
        (job, payment) => {
            let mut merged = ValidationErrors::new();
            if let Err(errors) = job {
                for e in errors.fields() {
                    merged.push(e.field.clone(), e.message.clone());
                }
            }
            if let Err(errors) = payment {
                for e in errors.fields() {
                    merged.push(e.field.clone(), e.message.clone());
                }
            }
            Err(merged)
        }
    }
}

fn bind_params<'q, T>(
    mut query: sqlx::query::QueryAs<'q, Postgres, T, PgArguments>,
    params: &[SqlParam],
) -> sqlx::query::QueryAs<'q, Postgres, T, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s.clone()),
            SqlParam::Uuid(u) => query.bind(*u),
        };
    }
    query
}

fn bind_scalar_params<'q, T>(
    mut query: sqlx::query::QueryScalar<'q, Postgres, T, PgArguments>,
    params: &[SqlParam],
) -> sqlx::query::QueryScalar<'q, Postgres, T, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s.clone()),
            SqlParam::Uuid(u) => query.bind(*u),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_missing_payment() -> JobPayload {
        JobPayload {
            title: Some("Backend Engineer".into()),
            description: Some("Ship features.".into()),
            job_type: Some("Contract".into()),
            location: Some("Remote".into()),
            remote_ok: Some(true),
            apply_url: Some("https://example.com/apply".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_validation_merges_payment_errors() {
        let mut payload = payload_missing_payment();
        payload.title = None;
        let errors = validate_for_create(&payload).unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"paymentMethodId"));
    }

    #[test]
    fn test_create_validation_accepts_complete_payload() {
        let mut payload = payload_missing_payment();
        payload.payment_method_id = Some("pm_42".into());
        let (job, pm) = validate_for_create(&payload).unwrap();
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(pm, "pm_42");
    }
}
