//! Cart commands over the persisted cart slot.

use std::io::Write;
use std::str::FromStr;

use tracing::info;

use poppin_deli_core::cart::CartState;
use poppin_deli_core::{ProductId, TaxPercent};
use poppin_deli_storefront::{AppError, AppState};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print the cart lines and billing.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn show(state: &AppState) -> CommandResult {
    let snapshot = state.cart_store().snapshot();
    write_cart(&mut std::io::stdout().lock(), &snapshot)?;
    Ok(())
}

/// Write `cart` as a plain-text summary.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_cart(out: &mut impl Write, cart: &CartState) -> std::io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    for line in cart.lines() {
        writeln!(
            out,
            "[{}] {} x{} @ {} = {}",
            line.id,
            line.name,
            line.quantity,
            line.unit_price,
            line.line_total()
        )?;
    }

    let billing = cart.billing();
    writeln!(out)?;
    writeln!(out, "Items: {}", cart.item_count())?;
    writeln!(out, "Subtotal: {}", billing.subtotal)?;
    writeln!(out, "{}: {}", billing.tax_label(), billing.tax_amount)?;
    writeln!(out, "Total: {}", billing.total)
}

/// Add one unit of the menu item `id`.
///
/// # Errors
///
/// Returns an error if no menu item has that id.
pub async fn add(state: &AppState, id: &str) -> CommandResult {
    let menu = state.content().menu().await;
    let item = menu
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))?;

    let quantity = state.cart_store().add_item(&item.to_product());
    info!(id = %item.id, quantity, "Added to cart");
    show(state)
}

/// Remove one unit of `id`.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn remove(state: &AppState, id: &str) -> CommandResult {
    let quantity = state.cart_store().remove_one_unit(&ProductId::from(id));
    info!(id, quantity, "Removed one from cart");
    show(state)
}

/// Set the quantity of `id`. Items not in the cart are left alone.
///
/// # Errors
///
/// Returns an error if the item is not in the cart.
pub fn set(state: &AppState, id: &str, quantity: u32) -> CommandResult {
    let mut cart = state.cart_store();
    let id = ProductId::from(id);
    if quantity > 0 && cart.quantity_of(&id) == 0 {
        return Err(AppError::NotFound(format!("{id} is not in the cart")).into());
    }
    cart.set_quantity(&id, quantity);
    info!(%id, quantity, "Quantity set");
    show(state)
}

/// Remove `id` entirely.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn delete(state: &AppState, id: &str) -> CommandResult {
    state.cart_store().delete_item(&ProductId::from(id));
    info!(id, "Deleted from cart");
    show(state)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn clear(state: &AppState) -> CommandResult {
    state.cart_store().clear();
    info!("Cart cleared");
    show(state)
}

/// Set the GST percentage.
///
/// # Errors
///
/// Returns an error if `percent` is not a non-negative number.
pub fn tax(state: &AppState, percent: &str) -> CommandResult {
    let percent =
        TaxPercent::from_str(percent).map_err(|e| AppError::BadRequest(e.to_string()))?;
    state.cart_store().set_tax_percent(percent);
    info!(%percent, "GST updated");
    show(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use poppin_deli_core::cart::{CartStore, Product};
    use poppin_deli_core::storage::MemoryStore;

    use super::*;

    #[test]
    fn test_write_cart() {
        let mut store = CartStore::new(MemoryStore::new());
        store.add_item(&Product::with_text_price("A", "Club Sandwich", "100", ""));
        store.add_item(&Product::with_text_price("A", "Club Sandwich", "100", ""));
        store.add_item(&Product::with_text_price("B", "Cold Coffee", "50", ""));

        let mut out = Vec::new();
        write_cart(&mut out, &store.snapshot()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[A] Club Sandwich x2 @ ₹100 = ₹200"));
        assert!(text.contains("Items: 3"));
        assert!(text.contains("GST (5%): ₹12.5"));
        assert!(text.ends_with("Total: ₹262.5\n"));
    }

    #[test]
    fn test_write_empty_cart() {
        let mut out = Vec::new();
        let store = CartStore::new(MemoryStore::new()).snapshot();
        write_cart(&mut out, &store).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Your cart is empty.\n");
    }
}
