//! Payment capture for paid job postings. One synchronous charge per create,
//! no retries; a declined or failed charge aborts the whole create with no
//! job row written.

pub mod stripe;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use stripe::StripeGateway;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment failed")]
    Declined,

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Payment gateway not configured")]
    NotConfigured,
}

/// A charge request for the fixed posting fee.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub amount_cents: u64,
    pub payment_method_id: String,
    pub description: String,
    pub user_id: Uuid,
    pub job_type: String,
}

/// A successful capture, keyed by the gateway's payment id.
#[derive(Debug, Clone)]
pub struct PaymentCapture {
    pub payment_id: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> Result<PaymentCapture, PaymentError>;
}
