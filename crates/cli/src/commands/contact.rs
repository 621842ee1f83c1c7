//! WhatsApp chat links outside the checkout.

use std::io::Write;

use poppin_deli_core::order::OrderFormatter;
use poppin_deli_storefront::content::MenuItem;
use poppin_deli_storefront::{AppError, AppState};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Print a link asking the shop about one menu item.
///
/// # Errors
///
/// Returns an error if no menu item has that id.
pub async fn ask(state: &AppState, id: &str) -> CommandResult {
    let menu = state.content().menu().await;
    let item = menu
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("menu item {id}")))?;

    write_inquiry(&mut std::io::stdout().lock(), state.formatter(), item)?;
    Ok(())
}

/// Write the inquiry line and link for `item`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn write_inquiry(
    out: &mut impl Write,
    formatter: &OrderFormatter,
    item: &MenuItem,
) -> std::io::Result<()> {
    writeln!(out, "Ask about {} ({}):", item.name, item.price)?;
    writeln!(out, "{}", formatter.inquiry_link(&item.name))
}

/// Print a link opening a chat, prefilled with `message` or a greeting.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn chat(state: &AppState, message: Option<&str>) -> CommandResult {
    let message = message.map(str::trim).filter(|m| !m.is_empty());
    writeln!(
        std::io::stdout().lock(),
        "{}",
        state.formatter().greeting_link(message)
    )?;
    Ok(())
}
