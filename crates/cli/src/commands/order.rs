//! Pickup checkout from the command line.

use std::io::Write;
use std::path::Path;

use tracing::info;

use poppin_deli_core::CheckoutStep;
use poppin_deli_core::checkout::{CheckoutFlow, PaymentProof};
use poppin_deli_core::order::CustomerInfo;
use poppin_deli_storefront::{AppError, AppState};

/// Run the three checkout steps and print the order message and link.
///
/// The cart is cleared once the link has been composed.
///
/// # Errors
///
/// Returns an error if the payment screenshot does not exist, a required
/// field is blank, or the cart is empty.
pub async fn place(
    state: &AppState,
    customer: CustomerInfo,
    payment_proof: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = tokio::fs::metadata(payment_proof).await.map_err(|e| {
        AppError::BadRequest(format!(
            "cannot read payment screenshot {}: {e}",
            payment_proof.display()
        ))
    })?;
    if !metadata.is_file() {
        return Err(AppError::BadRequest(format!(
            "payment screenshot {} is not a file",
            payment_proof.display()
        ))
        .into());
    }
    let file_name = payment_proof
        .file_name()
        .map_or_else(|| payment_proof.display().to_string(), |n| n.to_string_lossy().into_owned());

    let mut cart = state.cart_store();
    let mut flow = CheckoutFlow::new();
    let mut out = std::io::stdout().lock();

    flow.set_customer(customer);
    write_step_done(&mut out, flow.step())?;
    flow.advance().map_err(AppError::from)?;
    flow.attach_payment_proof(PaymentProof::new(file_name));
    write_step_done(&mut out, flow.step())?;
    flow.advance().map_err(AppError::from)?;

    let order = flow
        .submit(&mut cart, state.formatter())
        .map_err(AppError::from)?;
    write_step_done(&mut out, CheckoutStep::Review)?;
    info!("Order ready to send on WhatsApp");

    writeln!(out)?;
    writeln!(out, "{}", order.message)?;
    writeln!(out)?;
    writeln!(out, "Send your order: {}", order.url)?;
    writeln!(out, "Attach your payment screenshot in the chat.")?;
    Ok(())
}

/// Write the progress line for a completed step, e.g. `[2/3] Make Payment`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_step_done(out: &mut impl Write, step: CheckoutStep) -> std::io::Result<()> {
    writeln!(out, "[{}/3] {} ✓", step.number(), step.title())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_write_step_done() {
        let mut out = Vec::new();
        write_step_done(&mut out, CheckoutStep::Details).unwrap();
        write_step_done(&mut out, CheckoutStep::Payment).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[1/3] Takeout Details ✓\n[2/3] Make Payment ✓\n"
        );
    }
}
