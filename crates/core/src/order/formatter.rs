//! WhatsApp order message and deep-link generation.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::customer::CustomerInfo;
use crate::cart::CartState;

/// Default recipient for order messages.
pub const DEFAULT_WHATSAPP_NUMBER: &str = "918770769691";

/// Default deep-link host.
pub const DEFAULT_DEEP_LINK_BASE: &str = "https://wa.me";

/// Settings for the order formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Shop name shown in message headings.
    pub shop_name: String,
    /// Recipient identifier appended to the deep-link base (a phone number).
    pub recipient: String,
    /// Messaging service URL prefix, without trailing slash.
    pub deep_link_base: String,
    /// Payment method named in the message footer.
    pub payment_method: String,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            shop_name: "Poppin Deli".to_string(),
            recipient: DEFAULT_WHATSAPP_NUMBER.to_string(),
            deep_link_base: DEFAULT_DEEP_LINK_BASE.to_string(),
            payment_method: "UPI".to_string(),
        }
    }
}

/// A composed order: the plain-text message and the link that opens it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLink {
    pub message: String,
    pub url: String,
}

/// Builds order messages and deep links.
#[derive(Debug, Clone, Default)]
pub struct OrderFormatter {
    config: OrderConfig,
}

impl OrderFormatter {
    /// Create a formatter.
    #[must_use]
    pub const fn new(config: OrderConfig) -> Self {
        Self { config }
    }

    /// The formatter's settings.
    #[must_use]
    pub const fn config(&self) -> &OrderConfig {
        &self.config
    }

    /// Compose the pickup order for `cart` and `customer`.
    ///
    /// The cart should be non-empty; this is not checked here.
    #[must_use]
    pub fn compose(&self, cart: &CartState, customer: &CustomerInfo) -> OrderLink {
        let message = self.order_message(cart, customer);
        let url = self.deep_link(&message);
        OrderLink { message, url }
    }

    /// Plain-text order message.
    #[must_use]
    pub fn order_message(&self, cart: &CartState, customer: &CustomerInfo) -> String {
        let billing = cart.billing();
        let mut message = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(message, "🛒 *New Pickup Order - {}*", self.config.shop_name);
        let _ = writeln!(message);
        let _ = writeln!(message, "*Items:*");
        for line in cart.lines() {
            let _ = writeln!(
                message,
                "• {} x{} - {}",
                line.name,
                line.quantity,
                line.line_total()
            );
        }
        let _ = writeln!(message);
        let _ = writeln!(message, "*Billing:*");
        let _ = writeln!(message, "Subtotal: {}", billing.subtotal);
        let _ = writeln!(message, "{}: {}", billing.tax_label(), billing.tax_amount);
        let _ = writeln!(message, "*Total: {}*", billing.total);
        let _ = writeln!(message);
        let _ = writeln!(message, "*Pickup Details:*");
        let _ = writeln!(message, "Name: {}", customer.name);
        let _ = writeln!(message, "Phone: {}", customer.phone);
        let _ = writeln!(message, "Time: {}", customer.pickup_time);
        if let Some(notes) = customer.notes() {
            let _ = writeln!(message, "Notes: {notes}");
        }
        let _ = writeln!(message);
        let _ = writeln!(
            message,
            "💳 *Payment:* {} (Screenshot attach below)",
            self.config.payment_method
        );
        let _ = write!(message, "⏳ Please confirm once payment is verified!");

        message
    }

    /// Link asking about a single menu item.
    #[must_use]
    pub fn inquiry_link(&self, item_name: &str) -> String {
        let message = format!(
            "Hi {}! 🍽️\n\nI want to order: {item_name}\n\nTakeout time:\nName:\nPhone:",
            self.config.shop_name
        );
        self.deep_link(&message)
    }

    /// Link opening a chat with `message` prefilled, or a greeting.
    #[must_use]
    pub fn greeting_link(&self, message: Option<&str>) -> String {
        match message {
            Some(text) => self.deep_link(text),
            None => self.deep_link(&format!("Hi {}! 👋", self.config.shop_name)),
        }
    }

    /// `<base>/<recipient>?text=<percent-encoded message>`.
    #[must_use]
    pub fn deep_link(&self, message: &str) -> String {
        format!(
            "{}/{}?text={}",
            self.config.deep_link_base.trim_end_matches('/'),
            self.config.recipient,
            urlencoding::encode(message)
        )
    }
}
