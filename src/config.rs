use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub payments: PaymentsConfig,
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    /// Flat job-posting fee, in cents.
    pub posting_fee_cents: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub page_size: i64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn defaults() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7,
            },
            payments: PaymentsConfig {
                stripe_secret_key: String::new(),
                stripe_api_base: "https://api.stripe.com".to_string(),
                posting_fee_cents: 30_000, // $300.00
            },
            listing: ListingConfig { page_size: 12 },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.auth.jwt_expiry_hours = v.parse().unwrap_or(self.auth.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("STRIPE_SECRET_KEY") {
            self.payments.stripe_secret_key = v;
        }
        if let Ok(v) = env::var("STRIPE_API_BASE") {
            self.payments.stripe_api_base = v;
        }
        if let Ok(v) = env::var("JOB_POSTING_FEE_CENTS") {
            self.payments.posting_fee_cents = v.parse().unwrap_or(self.payments.posting_fee_cents);
        }
        if let Ok(v) = env::var("LISTING_PAGE_SIZE") {
            self.listing.page_size = v.parse().unwrap_or(self.listing.page_size);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::defaults();
        assert_eq!(config.listing.page_size, 12);
        assert_eq!(config.payments.posting_fee_cents, 30_000);
        assert_eq!(config.auth.jwt_expiry_hours, 24 * 7);
        assert_eq!(config.server.port, 3000);
    }
}
