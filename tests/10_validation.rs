use anyhow::Result;
use jobboard_api::models::job::JobType;
use jobboard_api::validation::JobPayload;

fn payload(json: serde_json::Value) -> Result<JobPayload> {
    Ok(serde_json::from_value(json)?)
}

#[test]
fn complete_payload_validates_and_normalizes() -> Result<()> {
    let payload = payload(serde_json::json!({
        "title": "Platform Engineer",
        "description": "Own the deployment pipeline.",
        "url": "",
        "jobType": "Full-time",
        "location": "Oslo, Norway",
        "jobAuthor": "Fjord Systems",
        "remoteOk": false,
        "applyUrl": "https://fjord.example/apply",
        "expiresAt": "2027-03-01",
        "paymentMethodId": "pm_test_123"
    }))?;

    let job = payload.validate().expect("payload should validate");
    assert_eq!(job.job_type, JobType::FullTime);
    assert_eq!(job.url, None, "blank url should normalize to absent");
    assert_eq!(job.job_author.as_deref(), Some("Fjord Systems"));
    let expires = job.expires_at.expect("expiry should parse");
    assert_eq!(expires.to_rfc3339(), "2027-03-01T00:00:00+00:00");
    Ok(())
}

#[test]
fn every_failing_field_is_reported_at_once() -> Result<()> {
    let payload = payload(serde_json::json!({
        "title": "",
        "description": "",
        "url": "not a url",
        "jobType": "Volunteer",
        "location": "",
        "applyUrl": "also not a url",
        "expiresAt": "someday"
    }))?;

    let errors = payload.validate().unwrap_err();
    let fields: Vec<&str> = errors.fields().iter().map(|e| e.field.as_str()).collect();

    for expected in
        ["title", "description", "url", "jobType", "location", "remoteOk", "applyUrl", "expiresAt"]
    {
        assert!(fields.contains(&expected), "missing failure for {expected}: {fields:?}");
    }
    Ok(())
}

#[test]
fn job_type_accepts_exactly_four_literals() -> Result<()> {
    for literal in ["Full-time", "Part-time", "Contract", "Freelance"] {
        let payload = payload(serde_json::json!({
            "title": "t",
            "description": "d",
            "jobType": literal,
            "location": "l",
            "remoteOk": true,
            "applyUrl": "https://example.com/apply"
        }))?;
        assert!(payload.validate().is_ok(), "{literal} should be accepted");
    }

    for literal in ["full-time", "FULL-TIME", "Internship", "Temp", ""] {
        let payload = payload(serde_json::json!({
            "title": "t",
            "description": "d",
            "jobType": literal,
            "location": "l",
            "remoteOk": true,
            "applyUrl": "https://example.com/apply"
        }))?;
        assert!(payload.validate().is_err(), "{literal:?} should be rejected");
    }
    Ok(())
}

#[test]
fn validation_failure_never_yields_a_write_model() -> Result<()> {
    // Missing remoteOk only; everything else fine
    let payload = payload(serde_json::json!({
        "title": "t",
        "description": "d",
        "jobType": "Contract",
        "location": "l",
        "applyUrl": "https://example.com/apply"
    }))?;

    let errors = payload.validate().unwrap_err();
    assert_eq!(errors.fields().len(), 1);
    assert_eq!(errors.fields()[0].field, "remoteOk");
    Ok(())
}
