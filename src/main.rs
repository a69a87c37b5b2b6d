use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use jobboard_api::config::AppConfig;
use jobboard_api::handlers;
use jobboard_api::middleware::require_auth;
use jobboard_api::payments::StripeGateway;
use jobboard_api::state::AppState;
use jobboard_api::database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    let pool = database::connect(&config.database).await?;
    database::migrate(&pool).await?;

    let payments = Arc::new(StripeGateway::new(&config.payments));
    let port = config.server.port;
    let state = AppState::new(pool, config, payments);

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("jobboard API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/jobs", get(handlers::jobs::list))
        .route("/jobs/search", get(handlers::jobs::search))
        .route("/jobs/:id", get(handlers::jobs::get_one))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login));

    // Everything here rejects with 401 before the handler runs
    let protected = Router::new()
        .route("/jobs", post(handlers::jobs::create))
        .route("/jobs/mine", get(handlers::jobs::mine))
        .route(
            "/jobs/:id",
            put(handlers::jobs::update).delete(handlers::jobs::delete),
        )
        .route(
            "/bookmarks",
            get(handlers::bookmarks::list)
                .post(handlers::bookmarks::create)
                .delete(handlers::bookmarks::remove),
        )
        .route("/auth/me", get(handlers::auth::me))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Jobboard API",
        "version": version,
        "endpoints": {
            "jobs": "/jobs[/:id], /jobs/search, /jobs/mine",
            "bookmarks": "/bookmarks",
            "auth": "/auth/register, /auth/login, /auth/me",
            "health": "/health",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "error": "database unavailable",
                })),
            )
        }
    }
}
