use sqlx::PgPool;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::payments::PaymentGateway;

/// Shared application state, constructed once at startup and passed to every
/// handler explicitly. There is no global pool singleton.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig, payments: Arc<dyn PaymentGateway>) -> Self {
        Self { pool, config: Arc::new(config), payments }
    }
}
