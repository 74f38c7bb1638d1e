use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::{CheckoutStage, PaymentDetails, PaymentField, ShippingDetails, ShippingField};
use crate::cart::{CartLedger, CartRepository};
use crate::types::Price;

/// Errors raised when an action does not fit the current checkout state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Checkout cannot start with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The action is not available at the current stage.
    #[error("cannot {action} during the {stage} step")]
    InvalidTransition {
        stage: CheckoutStage,
        action: &'static str,
    },

    /// A settlement is already running.
    #[error("payment is already being processed")]
    SettlementInProgress,

    /// No settlement is waiting for an outcome.
    #[error("no payment is being processed")]
    NoSettlementPending,

    /// Required shipping fields are blank.
    #[error("missing shipping fields: {}", join_labels(.0))]
    MissingShippingFields(Vec<ShippingField>),

    /// Required payment fields are blank.
    #[error("missing payment fields: {}", join_labels(.0))]
    MissingPaymentFields(Vec<PaymentField>),
}

/// Progress of the payment settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SettlementState {
    #[default]
    NotStarted,
    /// Waiting on the processor; submission is disabled.
    Pending { amount: Price },
    Succeeded { amount: Price, reference: String },
    Failed { reason: String },
}

/// Result reported by a payment processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    Succeeded { reference: String },
    Failed { reason: String },
}

/// State machine for the checkout wizard.
///
/// Holds the current stage, both form records and the settlement state. It
/// is transient: created when checkout opens and dropped when it closes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSequencer {
    stage: CheckoutStage,
    shipping: ShippingDetails,
    payment: PaymentDetails,
    settlement: SettlementState,
}

impl CheckoutSequencer {
    /// Open checkout for the given cart, starting at review.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no entries.
    pub fn open<R: CartRepository>(ledger: &CartLedger<R>) -> Result<Self, CheckoutError> {
        if ledger.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        Ok(Self::default())
    }

    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    #[must_use]
    pub const fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    #[must_use]
    pub const fn payment(&self) -> &PaymentDetails {
        &self.payment
    }

    #[must_use]
    pub const fn settlement(&self) -> &SettlementState {
        &self.settlement
    }

    /// `true` while a settlement is pending. Every action is refused meanwhile.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.settlement, SettlementState::Pending { .. })
    }

    /// Reason of the last failed settlement, shown on the payment step.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.settlement {
            SettlementState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    /// Review -> shipping.
    ///
    /// # Errors
    ///
    /// Fails outside the review step or while processing.
    pub fn continue_to_shipping(&mut self) -> Result<(), CheckoutError> {
        self.expect(CheckoutStage::Review, "continue to shipping")?;
        self.advance();
        Ok(())
    }

    /// Store the shipping form and move to payment once every field is filled.
    ///
    /// The submitted details are kept even when the gate blocks, so the form
    /// can be shown again with what was typed.
    ///
    /// # Errors
    ///
    /// Fails outside the shipping step, while processing, or with
    /// `MissingShippingFields` when a field is blank.
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> Result<(), CheckoutError> {
        self.expect(CheckoutStage::Shipping, "submit shipping details")?;
        let missing = details.missing_fields();
        self.shipping = details;

        if !missing.is_empty() {
            debug!(missing = missing.len(), "Shipping form incomplete");
            return Err(CheckoutError::MissingShippingFields(missing));
        }

        self.advance();
        Ok(())
    }

    /// Store the (formatted) payment form and start settlement of `amount`.
    ///
    /// On success the sequencer is `processing` until
    /// [`complete_settlement`](Self::complete_settlement) is called.
    ///
    /// # Errors
    ///
    /// Fails outside the payment step, with `SettlementInProgress` on a
    /// duplicate submission, or with `MissingPaymentFields`.
    pub fn submit_payment(
        &mut self,
        details: PaymentDetails,
        amount: Price,
    ) -> Result<(), CheckoutError> {
        self.expect(CheckoutStage::Payment, "submit payment")?;
        let details = details.formatted();
        let missing = details.missing_fields();
        self.payment = details;

        if !missing.is_empty() {
            debug!(missing = missing.len(), "Payment form incomplete");
            return Err(CheckoutError::MissingPaymentFields(missing));
        }

        self.settlement = SettlementState::Pending { amount };
        info!(%amount, "Settlement started");
        Ok(())
    }

    /// Apply the processor's verdict.
    ///
    /// Success clears the cart and moves to confirmation. Failure stays on the
    /// payment step with the reason recorded and submission re-enabled.
    ///
    /// # Errors
    ///
    /// Returns `NoSettlementPending` unless a settlement is pending.
    pub fn complete_settlement<R: CartRepository>(
        &mut self,
        outcome: SettlementOutcome,
        ledger: &mut CartLedger<R>,
    ) -> Result<(), CheckoutError> {
        let SettlementState::Pending { amount } = self.settlement else {
            return Err(CheckoutError::NoSettlementPending);
        };

        match outcome {
            SettlementOutcome::Succeeded { reference } => {
                info!(%amount, %reference, "Settlement succeeded");
                ledger.clear_cart();
                self.settlement = SettlementState::Succeeded { amount, reference };
                self.advance();
            }
            SettlementOutcome::Failed { reason } => {
                info!(%amount, %reason, "Settlement failed");
                self.settlement = SettlementState::Failed { reason };
            }
        }
        Ok(())
    }

    /// Check that the flow may be dismissed.
    ///
    /// # Errors
    ///
    /// Returns `SettlementInProgress` while processing.
    pub fn ensure_closable(&self) -> Result<(), CheckoutError> {
        if self.is_processing() {
            return Err(CheckoutError::SettlementInProgress);
        }
        Ok(())
    }

    fn expect(&self, stage: CheckoutStage, action: &'static str) -> Result<(), CheckoutError> {
        if self.is_processing() {
            return Err(CheckoutError::SettlementInProgress);
        }
        if self.stage != stage {
            return Err(CheckoutError::InvalidTransition {
                stage: self.stage,
                action,
            });
        }
        Ok(())
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            debug!(from = %self.stage, to = %next, "Checkout advanced");
            self.stage = next;
        }
    }
}

fn join_labels<T: core::fmt::Display>(fields: &[T]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
