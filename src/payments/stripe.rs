use async_trait::async_trait;
use serde::Deserialize;

use super::{ChargeRequest, PaymentCapture, PaymentError, PaymentGateway};
use crate::config::PaymentsConfig;

/// Stripe payment-intents client. Creates and confirms a payment intent in a
/// single call; anything other than `succeeded` is a decline.
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeGateway {
    pub fn new(config: &PaymentsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: config.stripe_secret_key.clone(),
            api_base: config.stripe_api_base.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<PaymentCapture, PaymentError> {
        if self.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured);
        }

        let amount = request.amount_cents.to_string();
        let user_id = request.user_id.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", "usd"),
            ("payment_method", request.payment_method_id.as_str()),
            ("confirm", "true"),
            ("description", request.description.as_str()),
            ("metadata[user_id]", user_id.as_str()),
            ("metadata[job_type]", request.job_type.as_str()),
            // Card flows requiring a redirect cannot complete in a
            // server-side confirm, so disallow them up front.
            ("automatic_payment_methods[enabled]", "true"),
            ("automatic_payment_methods[allow_redirects]", "never"),
        ];

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("HTTP {}", status));
            tracing::warn!("stripe charge rejected: {}", message);
            return Err(PaymentError::Declined);
        }

        let intent = response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;

        if intent.status != "succeeded" {
            tracing::warn!("payment intent {} not captured: {}", intent.id, intent.status);
            return Err(PaymentError::Declined);
        }

        Ok(PaymentCapture { payment_id: intent.id })
    }
}
