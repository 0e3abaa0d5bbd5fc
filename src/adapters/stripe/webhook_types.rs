//! Stripe wire types for checkout creation and webhook handling.
//!
//! These types represent Stripe API objects as they arrive over HTTP.
//! Unknown fields are ignored so newer API versions keep parsing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    /// Header is empty or missing.
    MissingHeader,
    /// Missing timestamp component (t=...).
    MissingTimestamp,
    /// Missing v1 signature component.
    MissingV1Signature,
    /// Invalid timestamp format.
    InvalidTimestamp,
    /// Invalid signature format (not valid hex).
    InvalidSignatureFormat,
}

impl std::fmt::Display for SignatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "Missing Stripe-Signature header"),
            Self::MissingTimestamp => write!(f, "Missing timestamp (t=) in signature"),
            Self::MissingV1Signature => write!(f, "Missing v1 signature in header"),
            Self::InvalidTimestamp => write!(f, "Invalid timestamp format"),
            Self::InvalidSignatureFormat => write!(f, "Invalid signature format (not valid hex)"),
        }
    }
}

impl std::error::Error for SignatureParseError {}

/// Parsed Stripe-Signature header components.
///
/// The header format is `t=timestamp,v1=signature[,v1=signature...][,v0=legacy]`.
/// Stripe sends more than one `v1` entry while a signing secret is being
/// rolled; a payload is authentic if any of them matches.
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    /// Unix timestamp when Stripe generated the event.
    pub timestamp: i64,

    /// All v1 signatures (HMAC-SHA256, hex-decoded), in header order.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parse a Stripe-Signature header into components.
    ///
    /// `v0` and unrecognised keys are skipped.
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        if header.trim().is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or(SignatureParseError::MissingTimestamp)?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    v1_signatures.push(
                        hex_decode(value).ok_or(SignatureParseError::InvalidSignatureFormat)?,
                    );
                }
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureParseError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureParseError::MissingV1Signature);
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

/// Decode a hex string to bytes.
fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

/// Encode bytes to hex string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Event Types
// ════════════════════════════════════════════════════════════════════════════════

/// Raw Stripe webhook event as received from the API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type (e.g., "charge.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    pub created: i64,

    /// Event payload containing the affected object.
    pub data: StripeEventData,

    /// Whether this is a live or test event.
    #[serde(default)]
    pub livemode: bool,

    /// Stripe API version used for this event.
    pub api_version: Option<String>,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Object Types
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe Charge object, the payload of `charge.*` events.
///
/// Metadata set through `payment_intent_data[metadata]` at checkout is
/// copied onto the charge by Stripe.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCharge {
    /// Unique charge identifier (ch_...).
    pub id: String,

    /// Amount in minor units.
    #[serde(default)]
    pub amount: i64,

    /// Currency (lowercase).
    #[serde(default)]
    pub currency: String,

    /// Hosted receipt page.
    pub receipt_url: Option<String>,

    /// Custom metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Whether the charge succeeded or was authorized.
    #[serde(default)]
    pub paid: bool,

    /// Charge status (succeeded, pending, failed).
    pub status: Option<String>,
}

impl StripeCharge {
    /// Order id attached at checkout, if any.
    pub fn order_id(&self) -> Option<&str> {
        self.metadata
            .get("orderId")
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// Stripe Checkout Session object as returned by session creation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Hosted checkout page.
    pub url: Option<String>,

    /// Payment mode (payment, setup, subscription).
    pub mode: Option<String>,

    /// Session status (open, complete, expired).
    pub status: Option<String>,

    /// Success URL for redirect after checkout.
    pub success_url: Option<String>,

    /// Cancel URL for redirect if checkout is abandoned.
    pub cancel_url: Option<String>,
}

/// Error body returned by the Stripe API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeApiError,
}

/// Inner error object.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    /// Error category (api_error, card_error, invalid_request_error, ...).
    #[serde(rename = "type")]
    pub error_type: Option<String>,

    /// Short machine-readable code.
    pub code: Option<String>,

    /// Human-readable message.
    pub message: Option<String>,
}
