//! Checkout wizard: stages, form records and the sequencer driving them.
//!
//! ```text
//! review --continue--> shipping --all 8 fields--> payment
//!   payment --submit--> (processing) --succeeded--> confirmation
//!                                    --failed-----> payment (with reason)
//! ```

mod payment;
mod sequencer;
mod shipping;
mod stage;

pub use payment::{PaymentDetails, PaymentField, format_card_number, format_cvv, format_expiry};
pub use sequencer::{CheckoutError, CheckoutSequencer, SettlementOutcome, SettlementState};
pub use shipping::{ShippingDetails, ShippingField};
pub use stage::{CheckoutStage, StepProgress};
