//! Products and the cart lines built from them.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A menu product as handed to the cart by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub category: String,
}

impl Product {
    /// Create a product with an already-typed price.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Price,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category: category.into(),
        }
    }

    /// Create a product whose price arrives as text (e.g. a data attribute).
    ///
    /// Unparsable prices become zero.
    #[must_use]
    pub fn with_text_price(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: &str,
        category: impl Into<String>,
    ) -> Self {
        Self::new(id, name, Price::coerce(price), category)
    }
}

/// One product entry in the cart.
///
/// `quantity` is always at least 1 while the line is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    #[serde(rename = "qty")]
    pub quantity: u32,
    #[serde(default)]
    pub category: String,
}

impl CartLine {
    /// A fresh line holding one unit of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self::with_quantity(product, 1)
    }

    pub(crate) fn with_quantity(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            category: product.category.clone(),
        }
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}
