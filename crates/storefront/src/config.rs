//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `POPPIN_SHEETS_BASE_URL` - Spreadsheet host (default: `https://docs.google.com/spreadsheets/d`)
//! - `POPPIN_SHEET_<KIND>` - Sheet id per content type, e.g. `POPPIN_SHEET_MENU`
//! - `POPPIN_HTTP_TIMEOUT_SECS` - Feed request timeout (default: 10)
//! - `POPPIN_CACHE_TTL_SECS` - Feed cache lifetime (default: 60)
//! - `POPPIN_DATA_DIR` - Bundled fallback JSON directory (default: `crates/storefront/data`)
//! - `POPPIN_STORAGE_DIR` - Persistent key-value directory (default: `.poppin`)
//! - `POPPIN_WHATSAPP_NUMBER` - Order recipient (default: 918770769691)
//! - `POPPIN_SHOP_NAME` - Shop name in messages (default: Poppin Deli)
//! - `POPPIN_DEFAULT_GST_PERCENT` - Tax rate of a fresh cart (default: 5)

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use poppin_deli_core::TaxPercent;
use poppin_deli_core::cart::CartConfig;
use poppin_deli_core::order::{DEFAULT_WHATSAPP_NUMBER, OrderConfig};

use crate::sheets::SheetKind;

/// Default spreadsheet host.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Spreadsheet feed configuration.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// URL prefix before the sheet id
    pub base_url: String,
    /// Sheet id per content type; blank means not published
    pub sheet_ids: HashMap<SheetKind, String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            sheet_ids: SheetKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.default_sheet_id().to_string()))
                .collect(),
            timeout_secs: 10,
        }
    }
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Spreadsheet feed settings
    pub sheets: SheetsConfig,
    /// How long a fetched feed stays fresh
    pub cache_ttl: Duration,
    /// Directory of bundled fallback JSON files
    pub data_dir: PathBuf,
    /// Directory backing the persistent key-value store
    pub storage_dir: PathBuf,
    /// Order message settings
    pub order: OrderConfig,
    /// Tax rate of a fresh or cleared cart
    pub default_tax: TaxPercent,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            sheets: SheetsConfig::default(),
            cache_ttl: Duration::from_secs(60),
            data_dir: PathBuf::from("crates/storefront/data"),
            storage_dir: PathBuf::from(".poppin"),
            order: OrderConfig::default(),
            default_tax: TaxPercent::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env = Env(lookup);

        let mut sheet_ids = defaults.sheets.sheet_ids;
        for kind in SheetKind::ALL {
            if let Some(id) = env.optional(kind.env_var()) {
                sheet_ids.insert(kind, id);
            }
        }

        let sheets = SheetsConfig {
            base_url: env.or_default("POPPIN_SHEETS_BASE_URL", DEFAULT_SHEETS_BASE_URL),
            sheet_ids,
            timeout_secs: env.parsed("POPPIN_HTTP_TIMEOUT_SECS", defaults.sheets.timeout_secs)?,
        };

        let order = OrderConfig {
            shop_name: env.or_default("POPPIN_SHOP_NAME", &defaults.order.shop_name),
            recipient: env.or_default("POPPIN_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER),
            ..defaults.order
        };

        Ok(Self {
            sheets,
            cache_ttl: Duration::from_secs(env.parsed("POPPIN_CACHE_TTL_SECS", 60)?),
            data_dir: env
                .optional("POPPIN_DATA_DIR")
                .map_or(defaults.data_dir, PathBuf::from),
            storage_dir: env
                .optional("POPPIN_STORAGE_DIR")
                .map_or(defaults.storage_dir, PathBuf::from),
            order,
            default_tax: env.parsed("POPPIN_DEFAULT_GST_PERCENT", defaults.default_tax)?,
        })
    }

    /// Cart settings derived from this configuration.
    #[must_use]
    pub fn cart(&self) -> CartConfig {
        CartConfig {
            default_tax: self.default_tax,
            ..CartConfig::default()
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, using `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SiteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.sheets.base_url, DEFAULT_SHEETS_BASE_URL);
        assert_eq!(config.sheets.timeout_secs, 10);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.order.recipient, "918770769691");
        assert_eq!(config.order.shop_name, "Poppin Deli");
        assert_eq!(config.default_tax.to_string(), "5");
        assert_eq!(
            config.sheets.sheet_ids[&SheetKind::Menu],
            SheetKind::Menu.default_sheet_id()
        );
        assert!(config.sheets.sheet_ids[&SheetKind::Reviews].is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = SiteConfig::from_lookup(lookup(&[
            ("POPPIN_SHEET_REVIEWS", "rev-id"),
            ("POPPIN_CACHE_TTL_SECS", "5"),
            ("POPPIN_WHATSAPP_NUMBER", "911234567890"),
            ("POPPIN_DEFAULT_GST_PERCENT", "12%"),
            ("POPPIN_STORAGE_DIR", "/tmp/poppin"),
        ]))
        .unwrap();
        assert_eq!(config.sheets.sheet_ids[&SheetKind::Reviews], "rev-id");
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert_eq!(config.order.recipient, "911234567890");
        assert_eq!(config.cart().default_tax.to_string(), "12");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/poppin"));
    }

    #[test]
    fn test_blank_value_uses_default() {
        let config = SiteConfig::from_lookup(lookup(&[("POPPIN_SHOP_NAME", "   ")])).unwrap();
        assert_eq!(config.order.shop_name, "Poppin Deli");
    }

    #[test]
    fn test_invalid_number() {
        let err = SiteConfig::from_lookup(lookup(&[("POPPIN_CACHE_TTL_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "POPPIN_CACHE_TTL_SECS"));
    }

    #[test]
    fn test_negative_tax_is_invalid() {
        assert!(SiteConfig::from_lookup(lookup(&[("POPPIN_DEFAULT_GST_PERCENT", "-1")])).is_err());
    }
}
