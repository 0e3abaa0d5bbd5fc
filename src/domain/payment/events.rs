//! Messages this service emits onto the bus.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::EventEnvelope;

/// Emitted once per successful charge.
///
/// Wire shape: `{"stripePaymentId": "...", "orderId": "...", "receiptUrl": "..."}`.
/// A charge created outside the checkout flow has no order id; `orderId` is then `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSucceeded {
    pub stripe_payment_id: String,
    pub order_id: Option<String>,
    pub receipt_url: Option<String>,
}

impl PaymentSucceeded {
    pub const EVENT_TYPE: &'static str = "payment.succeeded";
    pub const AGGREGATE_TYPE: &'static str = "Payment";

    /// Wraps the message for publishing, keyed by order id, or by the charge
    /// id when the charge has none.
    pub fn to_envelope(&self) -> Result<EventEnvelope, serde_json::Error> {
        Ok(EventEnvelope::new(
            Self::EVENT_TYPE,
            self.aggregate_id(),
            Self::AGGREGATE_TYPE,
            serde_json::to_value(self)?,
        ))
    }

    fn aggregate_id(&self) -> String {
        self.order_id
            .clone()
            .unwrap_or_else(|| self.stripe_payment_id.clone())
    }
}
