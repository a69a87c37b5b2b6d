// Job payload validation: untyped payload in, normalized write-model out.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::job::JobType;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Every failed field, collected in one pass. A payload that fails validation
/// is never partially applied.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.errors
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

/// Inbound job payload, as the client sends it. Create and update share the
/// same shape; `paymentMethodId` is only consulted on create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub job_author: Option<String>,
    pub remote_ok: Option<bool>,
    pub apply_url: Option<String>,
    pub avatar: Option<String>,
    pub expires_at: Option<String>,
    pub payment_method_id: Option<String>,
}

/// Fully typed, normalized write-model produced by validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub job_type: JobType,
    pub location: String,
    pub job_author: Option<String>,
    pub remote_ok: bool,
    pub apply_url: String,
    pub avatar: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl JobPayload {
    /// Validate and normalize. Collects every field failure rather than
    /// stopping at the first.
    pub fn validate(&self) -> Result<NewJob, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = require_non_empty(&mut errors, "title", &self.title, "Title is required");
        let description = require_non_empty(
            &mut errors,
            "description",
            &self.description,
            "Description is required",
        );
        let location =
            require_non_empty(&mut errors, "location", &self.location, "Location is required");

        let url = optional_url(&mut errors, "url", &self.url, "Invalid URL");
        let avatar = optional_url(&mut errors, "avatar", &self.avatar, "Invalid avatar URL");

        let job_type = match self.job_type.as_deref() {
            Some(raw) => match raw.parse::<JobType>() {
                Ok(jt) => Some(jt),
                Err(_) => {
                    errors.push(
                        "jobType",
                        "Job type must be one of: Full-time, Part-time, Contract, Freelance",
                    );
                    None
                }
            },
            None => {
                errors.push("jobType", "Job type is required");
                None
            }
        };

        let remote_ok = match self.remote_ok {
            Some(v) => Some(v),
            None => {
                errors.push("remoteOk", "Remote flag is required");
                None
            }
        };

        let apply_url = match self.apply_url.as_deref() {
            Some(raw) if !raw.is_empty() => match Url::parse(raw) {
                Ok(_) => Some(raw.to_string()),
                Err(_) => {
                    errors.push("applyUrl", "Invalid application URL");
                    None
                }
            },
            _ => {
                errors.push("applyUrl", "Application URL is required");
                None
            }
        };

        let expires_at = match self.expires_at.as_deref() {
            // Empty string normalizes to "never expires"
            None | Some("") => None,
            Some(raw) => match parse_expiry(raw) {
                Some(ts) => Some(ts),
                None => {
                    errors.push("expiresAt", "Invalid expiry date");
                    None
                }
            },
        };

        // Blank author collapses to absent
        let job_author = self.job_author.as_deref().filter(|s| !s.is_empty()).map(String::from);

        match (title, description, location, job_type, remote_ok, apply_url) {
            (
                Some(title),
                Some(description),
                Some(location),
                Some(job_type),
                Some(remote_ok),
                Some(apply_url),
            ) if errors.is_empty() => Ok(NewJob {
                title,
                description,
                url,
                job_type,
                location,
                job_author,
                remote_ok,
                apply_url,
                avatar,
                expires_at,
            }),
            _ => Err(errors),
        }
    }

    /// Create-only rule: a payment method must accompany the payload.
    pub fn require_payment_method(&self) -> Result<String, ValidationErrors> {
        match self.payment_method_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id.to_string()),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.push("paymentMethodId", "Payment method is required");
                Err(errors)
            }
        }
    }
}

fn require_non_empty(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    message: &str,
) -> Option<String> {
    match value.as_deref() {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => {
            errors.push(field, message);
            None
        }
    }
}

/// Optional URL field: empty string is treated as absent and normalized to
/// None; anything else must parse as an absolute URL.
fn optional_url(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    message: &str,
) -> Option<String> {
    match value.as_deref() {
        None | Some("") => None,
        Some(raw) => match Url::parse(raw) {
            Ok(_) => Some(raw.to_string()),
            Err(_) => {
                errors.push(field, message);
                None
            }
        },
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Some(DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0)?,
            Utc,
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> JobPayload {
        JobPayload {
            title: Some("Senior Rust Developer".into()),
            description: Some("Build backend services.".into()),
            url: Some("https://example.com".into()),
            job_type: Some("Full-time".into()),
            location: Some("Berlin, Germany".into()),
            job_author: Some("Example GmbH".into()),
            remote_ok: Some(true),
            apply_url: Some("https://example.com/apply".into()),
            avatar: None,
            expires_at: None,
            payment_method_id: Some("pm_123".into()),
        }
    }

    #[test]
    fn test_valid_payload_normalizes() {
        let job = valid_payload().validate().expect("payload should validate");
        assert_eq!(job.title, "Senior Rust Developer");
        assert_eq!(job.job_type, JobType::FullTime);
        assert!(job.remote_ok);
        assert_eq!(job.expires_at, None);
    }

    #[test]
    fn test_missing_required_fields_all_reported() {
        let payload = JobPayload::default();
        let errors = payload.validate().unwrap_err();
        let fields: Vec<&str> = errors.fields().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"title"));
        assert!(fields.contains(&"description"));
        assert!(fields.contains(&"location"));
        assert!(fields.contains(&"jobType"));
        assert!(fields.contains(&"remoteOk"));
        assert!(fields.contains(&"applyUrl"));
    }

    #[test]
    fn test_unknown_job_type_rejected() {
        let mut payload = valid_payload();
        payload.job_type = Some("Internship".into());
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.fields().len(), 1);
        assert_eq!(errors.fields()[0].field, "jobType");
    }

    #[test]
    fn test_empty_url_normalized_to_none() {
        let mut payload = valid_payload();
        payload.url = Some("".into());
        let job = payload.validate().unwrap();
        assert_eq!(job.url, None);
    }

    #[test]
    fn test_relative_url_rejected() {
        let mut payload = valid_payload();
        payload.url = Some("/careers".into());
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.fields()[0].field, "url");
    }

    #[test]
    fn test_invalid_apply_url_rejected() {
        let mut payload = valid_payload();
        payload.apply_url = Some("not a url".into());
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.fields()[0].field, "applyUrl");
    }

    #[test]
    fn test_expiry_date_formats() {
        let mut payload = valid_payload();
        payload.expires_at = Some("2026-01-15".into());
        let job = payload.validate().unwrap();
        assert!(job.expires_at.is_some());

        let mut payload = valid_payload();
        payload.expires_at = Some("2026-01-15T12:30:00Z".into());
        let job = payload.validate().unwrap();
        assert!(job.expires_at.is_some());

        let mut payload = valid_payload();
        payload.expires_at = Some("".into());
        let job = payload.validate().unwrap();
        assert_eq!(job.expires_at, None);

        let mut payload = valid_payload();
        payload.expires_at = Some("next tuesday".into());
        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.fields()[0].field, "expiresAt");
    }

    #[test]
    fn test_payment_method_required_on_create() {
        let mut payload = valid_payload();
        payload.payment_method_id = None;
        let errors = payload.require_payment_method().unwrap_err();
        assert_eq!(errors.fields()[0].field, "paymentMethodId");

        assert_eq!(valid_payload().require_payment_method().unwrap(), "pm_123");
    }
}
