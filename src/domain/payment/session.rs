//! Payment session request and result.

use serde::Serialize;

use crate::domain::foundation::ValidationError;

use super::LineItem;

/// A request to open a hosted checkout for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSessionRequest {
    currency: String,
    items: Vec<LineItem>,
    order_id: String,
}

impl PaymentSessionRequest {
    /// Creates a validated session request.
    ///
    /// The currency code is passed to the provider as given; only its
    /// presence is checked here.
    pub fn new(
        currency: impl Into<String>,
        items: Vec<LineItem>,
        order_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let currency = currency.into();
        let order_id = order_id.into();

        if currency.trim().is_empty() {
            return Err(ValidationError::empty_field("currency"));
        }
        if items.is_empty() {
            return Err(ValidationError::empty_field("items"));
        }
        if order_id.trim().is_empty() {
            return Err(ValidationError::empty_field("orderId"));
        }

        Ok(Self {
            currency,
            items,
            order_id,
        })
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }
}

/// URLs handed back to the caller once the provider has created the session.
///
/// Values are the provider's, echoed without modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionResult {
    pub cancel_url: Option<String>,
    pub success_url: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item() -> LineItem {
        LineItem::new("Keyboard", dec!(89.9), 1).unwrap()
    }

    #[test]
    fn new_keeps_order_and_currency() {
        let request = PaymentSessionRequest::new("usd", vec![item()], "order-42").unwrap();
        assert_eq!(request.currency(), "usd");
        assert_eq!(request.order_id(), "order-42");
        assert_eq!(request.items().len(), 1);
    }

    #[test]
    fn new_rejects_empty_items() {
        let err = PaymentSessionRequest::new("usd", vec![], "order-42").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("items"));
    }

    #[test]
    fn new_rejects_missing_currency() {
        let err = PaymentSessionRequest::new("", vec![item()], "order-42").unwrap_err();
        assert_eq!(err.field(), "currency");
    }

    #[test]
    fn new_rejects_blank_order_id() {
        let err = PaymentSessionRequest::new("usd", vec![item()], " ").unwrap_err();
        assert_eq!(err.field(), "orderId");
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = PaymentSessionResult {
            cancel_url: Some("https://shop.test/cancel".to_string()),
            success_url: Some("https://shop.test/success".to_string()),
            url: Some("https://checkout.stripe.com/c/pay/cs_test".to_string()),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["cancelUrl"], "https://shop.test/cancel");
        assert_eq!(json["successUrl"], "https://shop.test/success");
        assert_eq!(json["url"], "https://checkout.stripe.com/c/pay/cs_test");
    }
}
