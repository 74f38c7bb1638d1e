use core::fmt;

use serde::{Deserialize, Serialize};

/// A step of the checkout wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    #[default]
    Review,
    Shipping,
    Payment,
    Confirmation,
}

/// Where a step sits relative to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProgress {
    Done,
    Current,
    Upcoming,
}

impl CheckoutStage {
    /// All stages in wizard order.
    pub const ALL: [Self; 4] = [
        Self::Review,
        Self::Shipping,
        Self::Payment,
        Self::Confirmation,
    ];

    /// The stage after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Review => Some(Self::Shipping),
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    /// Lowercase name, as shown in the step indicator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Shipping => "shipping",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        }
    }

    /// 1-based position in the wizard.
    #[must_use]
    pub const fn number(self) -> usize {
        match self {
            Self::Review => 1,
            Self::Shipping => 2,
            Self::Payment => 3,
            Self::Confirmation => 4,
        }
    }

    /// Progress of `step` when `self` is the current stage.
    #[must_use]
    pub fn progress_of(self, step: Self) -> StepProgress {
        match step.cmp(&self) {
            core::cmp::Ordering::Less => StepProgress::Done,
            core::cmp::Ordering::Equal => StepProgress::Current,
            core::cmp::Ordering::Greater => StepProgress::Upcoming,
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_are_strictly_ordered() {
        let mut stage = CheckoutStage::default();
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen, CheckoutStage::ALL);
    }

    #[test]
    fn test_progress_relative_to_current() {
        let current = CheckoutStage::Payment;
        assert_eq!(current.progress_of(CheckoutStage::Review), StepProgress::Done);
        assert_eq!(current.progress_of(CheckoutStage::Payment), StepProgress::Current);
        assert_eq!(
            current.progress_of(CheckoutStage::Confirmation),
            StepProgress::Upcoming
        );
    }
}
