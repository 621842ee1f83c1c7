//! Order composition: customer fields in, WhatsApp message and link out.

pub mod customer;
pub mod formatter;

pub use customer::CustomerInfo;
pub use formatter::{
    DEFAULT_DEEP_LINK_BASE, DEFAULT_WHATSAPP_NUMBER, OrderConfig, OrderFormatter, OrderLink,
};
