use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{hash_password, issue_token, verify_password, AuthUser, Claims};
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;
use crate::validation::ValidationErrors;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/register - create an account and issue a session token
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut errors = ValidationErrors::new();
    let email = match body.email.as_deref().filter(|s| !s.is_empty()) {
        Some(e) if e.contains('@') => Some(e.to_lowercase()),
        Some(_) => {
            errors.push("email", "Invalid email address");
            None
        }
        None => {
            errors.push("email", "Email is required");
            None
        }
    };
    let password = match body.password.as_deref() {
        Some(p) if p.len() >= 8 => Some(p),
        Some(_) => {
            errors.push("password", "Password must be at least 8 characters");
            None
        }
        None => {
            errors.push("password", "Password is required");
            None
        }
    };
    let (Some(email), Some(password)) = (email, password) else {
        return Err(errors.into());
    };

    let password_hash =
        hash_password(password).map_err(|e| ApiError::internal(format!("bcrypt: {}", e)))?;

    let result = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&body.name)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.pool)
    .await;

    let user = match result {
        Ok(user) => user,
        Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
            return Err(ApiError::conflict("Email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    let token = token_for(&user, &state)?;
    tracing::info!("registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(json!({ "token": token, "user": user }))))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/login - verify credentials and issue a session token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = body
        .email
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Email is required"))?
        .to_lowercase();
    let password = body
        .password
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Password is required"))?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;

    // Same response for unknown email and wrong password
    let user = match user {
        Some(user) if verify_password(password, &user.password_hash) => user,
        _ => return Err(ApiError::unauthorized("Invalid email or password")),
    };

    let token = token_for(&user, &state)?;
    Ok(Json(json!({ "token": token, "user": user })))
}

/// GET /auth/me - the resolved identity behind the presented token
pub async fn me(Extension(identity): Extension<AuthUser>) -> impl IntoResponse {
    Json(json!({
        "id": identity.id,
        "email": identity.email,
        "admin": identity.admin,
    }))
}

fn token_for(user: &User, state: &AppState) -> Result<String, ApiError> {
    let claims = Claims::new(
        user.id,
        user.email.clone(),
        user.admin,
        state.config.auth.jwt_expiry_hours,
    );
    issue_token(&claims, &state.config.auth)
        .map_err(|e| ApiError::internal(format!("token issue failed: {}", e)))
}
