//! Simulated payment processor.
//!
//! No card network is contacted. A settlement waits for the configured delay
//! and then succeeds with a generated reference, except for the documented
//! decline card which always fails.

use std::time::Duration;

use cornerstore_core::Price;
use cornerstore_core::checkout::{PaymentDetails, SettlementOutcome};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::PaymentConfig;

/// Card number the simulator always declines.
pub const DECLINED_CARD: &str = "4000 0000 0000 0002";

/// Prefix of settlement references.
const REFERENCE_PREFIX: &str = "CS-";

/// Simulated payment processor.
#[derive(Debug, Clone)]
pub struct PaymentProcessor {
    settlement_delay: Duration,
}

impl PaymentProcessor {
    /// Create a processor from configuration.
    #[must_use]
    pub const fn new(config: &PaymentConfig) -> Self {
        Self {
            settlement_delay: config.settlement_delay,
        }
    }

    /// How long a settlement takes.
    #[must_use]
    pub const fn settlement_delay(&self) -> Duration {
        self.settlement_delay
    }

    /// Settle `amount` against the submitted card.
    #[instrument(skip(self, payment), fields(card = %payment.card_last4()))]
    pub async fn settle(&self, amount: Price, payment: &PaymentDetails) -> SettlementOutcome {
        if !self.settlement_delay.is_zero() {
            tokio::time::sleep(self.settlement_delay).await;
        }

        if payment.card_number == DECLINED_CARD {
            info!(%amount, "Simulated decline");
            return SettlementOutcome::Failed {
                reason: "Your card was declined. Please use a different card.".to_string(),
            };
        }

        let reference = new_reference();
        info!(%amount, %reference, "Simulated settlement");
        SettlementOutcome::Succeeded { reference }
    }
}

/// Short, shopper-facing settlement reference, e.g. `CS-1A2B3C4D5E6F`.
fn new_reference() -> String {
    let id: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(12)
        .collect();
    format!("{REFERENCE_PREFIX}{}", id.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(number: &str) -> PaymentDetails {
        PaymentDetails {
            card_number: number.to_string(),
            card_holder: "Ada Lovelace".to_string(),
            expiry_date: "12/30".to_string(),
            cvv: "123".to_string(),
        }
    }

    fn instant() -> PaymentProcessor {
        PaymentProcessor::new(&PaymentConfig {
            settlement_delay: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn test_settle_succeeds_with_reference() {
        let outcome = instant()
            .settle(Price::from_cents(1999), &card("4242 4242 4242 4242"))
            .await;
        let SettlementOutcome::Succeeded { reference } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert!(reference.starts_with(REFERENCE_PREFIX));
        assert_eq!(reference.len(), REFERENCE_PREFIX.len() + 12);
    }

    #[tokio::test]
    async fn test_decline_card_fails() {
        let outcome = instant()
            .settle(Price::from_cents(1999), &card(DECLINED_CARD))
            .await;
        assert!(matches!(outcome, SettlementOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_settle_waits_for_delay() {
        let processor = PaymentProcessor::new(&PaymentConfig {
            settlement_delay: Duration::from_millis(50),
        });
        let start = tokio::time::Instant::now();
        processor
            .settle(Price::from_cents(100), &card("4242 4242 4242 4242"))
            .await;
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_references_are_unique() {
        assert_ne!(new_reference(), new_reference());
    }
}
