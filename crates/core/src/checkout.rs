//! Three-step pickup checkout: details, payment, review.
//!
//! Moving forward is gated by local validation; moving back is always
//! allowed. Submitting from the review step composes the order, empties the
//! cart and rewinds the flow to the first step.

use thiserror::Error;
use tracing::info;

use crate::cart::CartStore;
use crate::order::{CustomerInfo, OrderFormatter, OrderLink};
use crate::storage::KeyValueStore;
use crate::types::CheckoutStep;

/// Reasons the checkout cannot move forward.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Required customer fields are blank.
    #[error("Please fill in all required fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// No payment screenshot is attached.
    #[error("Please attach your payment screenshot")]
    MissingPaymentProof,

    /// The action needs a different step.
    #[error("cannot {action} from the {step} step")]
    WrongStep {
        action: &'static str,
        step: CheckoutStep,
    },

    /// There is nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,
}

/// A payment screenshot attached by the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentProof {
    /// Original file name of the attachment.
    pub file_name: String,
}

impl PaymentProof {
    /// Create a proof record for `file_name`.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

/// Checkout state for one order attempt.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    customer: CustomerInfo,
    payment_proof: Option<PaymentProof>,
}

impl CheckoutFlow {
    /// A flow at the details step with an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Customer fields entered so far.
    #[must_use]
    pub const fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    /// Replace the customer fields.
    pub fn set_customer(&mut self, customer: CustomerInfo) {
        self.customer = customer;
    }

    /// Attach or replace the payment screenshot.
    pub fn attach_payment_proof(&mut self, proof: PaymentProof) {
        self.payment_proof = Some(proof);
    }

    /// Remove the payment screenshot.
    pub fn remove_payment_proof(&mut self) {
        self.payment_proof = None;
    }

    /// The attached payment screenshot, if any.
    #[must_use]
    pub const fn payment_proof(&self) -> Option<&PaymentProof> {
        self.payment_proof.as_ref()
    }

    /// Move to the next step if the current one validates.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingFields`] or
    /// [`CheckoutError::MissingPaymentProof`] when the current step is
    /// incomplete, and [`CheckoutError::WrongStep`] at the review step.
    pub fn advance(&mut self) -> Result<CheckoutStep, CheckoutError> {
        let next = self.step.next().ok_or(CheckoutError::WrongStep {
            action: "advance",
            step: self.step,
        })?;
        match self.step {
            CheckoutStep::Details => self.validate_details()?,
            CheckoutStep::Payment => self.validate_payment()?,
            CheckoutStep::Review => {}
        }
        self.step = next;
        Ok(next)
    }

    /// Move to the previous step. Stays put at the first step.
    pub fn back(&mut self) -> CheckoutStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
        self.step
    }

    /// Place the order from the review step.
    ///
    /// On success the cart is cleared and the flow is reset to the details
    /// step with an empty form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::WrongStep`] before the review step,
    /// [`CheckoutError::EmptyCart`] if there is nothing to order, and the
    /// validation errors if the form was emptied after advancing.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        cart: &mut CartStore<S>,
        formatter: &OrderFormatter,
    ) -> Result<OrderLink, CheckoutError> {
        if self.step != CheckoutStep::Review {
            return Err(CheckoutError::WrongStep {
                action: "submit",
                step: self.step,
            });
        }
        self.validate_details()?;
        self.validate_payment()?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = formatter.compose(&cart.snapshot(), &self.customer);
        cart.clear();
        self.reset();

        info!("Order composed and cart cleared");
        Ok(order)
    }

    /// Rewind to the details step and forget the form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn validate_details(&self) -> Result<(), CheckoutError> {
        let missing = self.customer.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CheckoutError::MissingFields(missing))
        }
    }

    fn validate_payment(&self) -> Result<(), CheckoutError> {
        if self.payment_proof.is_some() {
            Ok(())
        } else {
            Err(CheckoutError::MissingPaymentProof)
        }
    }
}
