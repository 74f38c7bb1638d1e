use core::fmt;

use serde::{Deserialize, Serialize};

const CARD_DIGITS: usize = 16;
const CVV_DIGITS: usize = 3;
const EXPIRY_CHARS: usize = 5;

/// Card details collected in the payment step.
///
/// Formatting is cosmetic only: no Luhn check and no expiry sanity check.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentDetails {
    pub card_number: String,
    pub card_holder: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_number", &"[REDACTED]")
            .field("card_holder", &self.card_holder)
            .field("expiry_date", &self.expiry_date)
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// A payment form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentField {
    CardNumber,
    CardHolder,
    ExpiryDate,
    Cvv,
}

impl PaymentField {
    /// All fields in form order.
    pub const ALL: [Self; 4] = [
        Self::CardNumber,
        Self::CardHolder,
        Self::ExpiryDate,
        Self::Cvv,
    ];

    /// Form label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CardNumber => "Card Number",
            Self::CardHolder => "Card Holder Name",
            Self::ExpiryDate => "Expiry Date",
            Self::Cvv => "CVV",
        }
    }
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl PaymentDetails {
    /// Apply the input masks to every field.
    #[must_use]
    pub fn formatted(self) -> Self {
        Self {
            card_number: format_card_number(&self.card_number),
            card_holder: self.card_holder.trim().to_string(),
            expiry_date: format_expiry(&self.expiry_date),
            cvv: format_cvv(&self.cvv),
        }
    }

    /// Value of a single field.
    #[must_use]
    pub fn value(&self, field: PaymentField) -> &str {
        match field {
            PaymentField::CardNumber => &self.card_number,
            PaymentField::CardHolder => &self.card_holder,
            PaymentField::ExpiryDate => &self.expiry_date,
            PaymentField::Cvv => &self.cvv,
        }
    }

    /// Fields that are empty or whitespace-only, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<PaymentField> {
        PaymentField::ALL
            .into_iter()
            .filter(|field| self.value(*field).trim().is_empty())
            .collect()
    }

    /// Last four digits of the card, for receipts.
    #[must_use]
    pub fn card_last4(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        let start = digits.len().saturating_sub(4);
        digits.get(start..).unwrap_or_default().iter().collect()
    }
}

/// Keep up to 16 digits and group them in fours: `"4242424242424242"` becomes
/// `"4242 4242 4242 4242"`.
#[must_use]
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CARD_DIGITS)
        .collect();

    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keep digits and insert the `MM/YY` slash once a third digit is typed.
#[must_use]
pub fn format_expiry(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let slashed = if digits.len() > 2 {
        let (month, year) = digits.split_at(2);
        format!("{month}/{year}")
    } else {
        digits
    };
    slashed.chars().take(EXPIRY_CHARS).collect()
}

/// Keep up to three digits.
#[must_use]
pub fn format_cvv(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CVV_DIGITS)
        .collect()
}
