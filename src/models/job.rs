use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The four supported employment categories. Stored as their display literal
/// in the `job_type` text column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Freelance,
}

impl JobType {
    pub const ALL: [JobType; 4] =
        [JobType::FullTime, JobType::PartTime, JobType::Contract, JobType::Freelance];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Freelance => "Freelance",
        }
    }
}

impl FromStr for JobType {
    type Err = UnknownJobType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full-time" => Ok(JobType::FullTime),
            "Part-time" => Ok(JobType::PartTime),
            "Contract" => Ok(JobType::Contract),
            "Freelance" => Ok(JobType::Freelance),
            other => Err(UnknownJobType(other.to_string())),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown job type: {0}")]
pub struct UnknownJobType(pub String);

/// A job posting row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
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
}

/// The owning user's public fields, as joined into job responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerPublic {
    pub name: Option<String>,
    pub email: String,
}

/// A job joined with its owner's public fields. Fetched in one query; the
/// flat row shape keeps `query_as` happy.
#[derive(Debug, Clone, FromRow)]
pub struct JobOwnerRow {
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
pub struct JobWithOwner {
    #[serde(flatten)]
    pub job: Job,
    pub user: OwnerPublic,
}

impl From<JobOwnerRow> for JobWithOwner {
    fn from(row: JobOwnerRow) -> Self {
        JobWithOwner {
            job: Job {
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
            },
            user: OwnerPublic { name: row.owner_name, email: row.owner_email },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_round_trip() {
        for jt in JobType::ALL {
            assert_eq!(jt.as_str().parse::<JobType>().unwrap(), jt);
        }
    }

    #[test]
    fn test_job_type_rejects_unknown() {
        assert!("Internship".parse::<JobType>().is_err());
        assert!("full-time".parse::<JobType>().is_err());
        assert!("".parse::<JobType>().is_err());
    }

    #[test]
    fn test_job_type_serde_literals() {
        assert_eq!(serde_json::to_value(JobType::FullTime).unwrap(), "Full-time");
        assert_eq!(serde_json::to_value(JobType::Contract).unwrap(), "Contract");
        let jt: JobType = serde_json::from_value(serde_json::json!("Part-time")).unwrap();
        assert_eq!(jt, JobType::PartTime);
    }
}
