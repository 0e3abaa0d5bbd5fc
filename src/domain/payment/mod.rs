//! Payment domain module.
//!
//! Value objects for starting a hosted checkout and the message emitted
//! when a charge succeeds.
//!
//! # Module Structure
//!
//! - `line_item` - LineItem and minor-unit conversion
//! - `session` - PaymentSessionRequest / PaymentSessionResult
//! - `events` - PaymentSucceeded bus message

mod events;
mod line_item;
mod session;

pub use events::PaymentSucceeded;
pub use line_item::{to_minor_units, LineItem};
pub use session::{PaymentSessionRequest, PaymentSessionResult};
