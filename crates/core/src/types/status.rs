//! Status enums shared across the ordering flow.

use serde::{Deserialize, Serialize};

/// Step of the pickup checkout.
///
/// Steps are ordered: details, then payment, then review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Name, phone and pickup time.
    #[default]
    Details,
    /// Payment proof attachment.
    Payment,
    /// Final review before the order link is produced.
    Review,
}

impl CheckoutStep {
    /// One-based position of the step, as shown in the step indicator.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Details => 1,
            Self::Payment => 2,
            Self::Review => 3,
        }
    }

    /// Heading shown for the step.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Details => "Takeout Details",
            Self::Payment => "Make Payment",
            Self::Review => "Confirm Order",
        }
    }

    /// The following step, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Details => Some(Self::Payment),
            Self::Payment => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// The preceding step, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Details => None,
            Self::Payment => Some(Self::Details),
            Self::Review => Some(Self::Payment),
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Details => write!(f, "details"),
            Self::Payment => write!(f, "payment"),
            Self::Review => write!(f, "review"),
        }
    }
}
