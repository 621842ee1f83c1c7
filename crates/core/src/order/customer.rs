//! Customer fields collected by the checkout form.

use serde::{Deserialize, Serialize};

/// Pickup details entered at checkout. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub pickup_time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CustomerInfo {
    /// Notes with surrounding whitespace removed, or `None` when blank.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }

    /// Names of required fields that are blank, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("pickup time", &self.pickup_time),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}
