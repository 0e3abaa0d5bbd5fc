//! Payment configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: String,

    /// Stripe webhook endpoint signing secret
    pub stripe_webhook_secret: String,

    /// Where Stripe redirects after a completed checkout
    pub stripe_success_url: String,

    /// Where Stripe redirects after an abandoned checkout
    pub stripe_cancel_url: String,

    /// Stripe API base URL
    #[serde(default = "default_api_base_url")]
    pub stripe_api_base_url: String,

    /// Reject webhook events that were not sent in live mode
    #[serde(default)]
    pub require_livemode: bool,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if self.stripe_success_url.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SUCCESS_URL"));
        }
        if self.stripe_cancel_url.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_CANCEL_URL"));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") && !self.stripe_api_key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        for url in [&self.stripe_success_url, &self.stripe_cancel_url] {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidRedirectUrl(url.clone()));
            }
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            stripe_webhook_secret: String::new(),
            stripe_success_url: String::new(),
            stripe_cancel_url: String::new(),
            stripe_api_base_url: default_api_base_url(),
            require_livemode: false,
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
