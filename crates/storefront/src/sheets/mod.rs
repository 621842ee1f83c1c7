//! Public Google Sheets used as a lightweight CMS.
//!
//! # Architecture
//!
//! - One spreadsheet per content type, addressed by [`SheetKind`]
//! - Read through the Google Visualization (`gviz`) endpoint, which answers
//!   with JSONP; [`gviz`] strips the wrapper and flattens the table
//! - Rows come back as [`SheetRow`] header-to-value maps
//!
//! The sheets are public, so there is no authentication. Failures are
//! reported as [`SheetsError`]; callers decide whether to fall back.

mod client;
pub mod gviz;
mod row;

pub use client::SheetsClient;
pub use row::SheetRow;
pub(crate) use row::{value_to_flag, value_to_int, value_to_text};

use thiserror::Error;

/// Errors that can occur when reading a sheet.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// No sheet id is configured for this content type.
    #[error("no sheet id configured for {0}")]
    NotConfigured(SheetKind),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("sheet {kind} returned HTTP {status}")]
    Status { kind: SheetKind, status: u16 },

    /// The response did not contain a JSON object.
    #[error("malformed gviz response: {0}")]
    MalformedResponse(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request URL could not be built.
    #[error("invalid sheet URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Content types backed by a spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SheetKind {
    Status,
    Menu,
    Featured,
    Gallery,
    Site,
    Specials,
    Reviews,
    NowBrewing,
    Pillars,
}

impl SheetKind {
    /// Every content type.
    pub const ALL: [Self; 9] = [
        Self::Status,
        Self::Menu,
        Self::Featured,
        Self::Gallery,
        Self::Site,
        Self::Specials,
        Self::Reviews,
        Self::NowBrewing,
        Self::Pillars,
    ];

    /// Short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Menu => "menu",
            Self::Featured => "featured",
            Self::Gallery => "gallery",
            Self::Site => "site",
            Self::Specials => "specials",
            Self::Reviews => "reviews",
            Self::NowBrewing => "now_brewing",
            Self::Pillars => "pillars",
        }
    }

    /// Storage slot for the cached feed result.
    #[must_use]
    pub const fn cache_key(self) -> &'static str {
        match self {
            Self::Status => "poppin_status_cache",
            Self::Menu => "poppin_menu_cache",
            Self::Featured => "poppin_featured_cache",
            Self::Gallery => "poppin_gallery_cache",
            Self::Site => "poppin_site_cache",
            Self::Specials => "poppin_specials_cache",
            Self::Reviews => "poppin_reviews_cache",
            Self::NowBrewing => "poppin_now_brewing_cache",
            Self::Pillars => "poppin_pillars_cache",
        }
    }

    /// Bundled JSON file used when the feed is unavailable.
    #[must_use]
    pub const fn fallback_file(self) -> Option<&'static str> {
        match self {
            Self::Status => Some("status.json"),
            Self::Menu => Some("menu.json"),
            Self::Specials => Some("specials.json"),
            Self::Reviews => Some("reviews.json"),
            Self::NowBrewing => Some("now_brewing.json"),
            Self::Pillars => Some("pillars.json"),
            Self::Featured | Self::Gallery | Self::Site => None,
        }
    }

    /// Environment variable overriding the sheet id.
    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::Status => "POPPIN_SHEET_STATUS",
            Self::Menu => "POPPIN_SHEET_MENU",
            Self::Featured => "POPPIN_SHEET_FEATURED",
            Self::Gallery => "POPPIN_SHEET_GALLERY",
            Self::Site => "POPPIN_SHEET_SITE",
            Self::Specials => "POPPIN_SHEET_SPECIALS",
            Self::Reviews => "POPPIN_SHEET_REVIEWS",
            Self::NowBrewing => "POPPIN_SHEET_NOW_BREWING",
            Self::Pillars => "POPPIN_SHEET_PILLARS",
        }
    }

    /// Sheet id used when the environment does not override it.
    ///
    /// Content types without a published sheet default to blank.
    #[must_use]
    pub const fn default_sheet_id(self) -> &'static str {
        match self {
            Self::Status => "1OIGx_iPzHohQ0lcOeNdC0czcZiMQYrCK77sqTgXYBgg",
            Self::Menu => "1V_SXJbiDPdXy5mXewtCEkeWAnCVg6M9lnBEVMaTfhyQ",
            Self::Featured => "101WGAAUvBX3UJzW86Rtu7GJGnfweiXEs7gBm9dpxJl4",
            Self::Site => "1Wx8Dzeybc6ndakYJoyMd_a6rBgUgzyb82OVnGR8Yh0w",
            Self::Gallery | Self::Specials | Self::Reviews | Self::NowBrewing | Self::Pillars => "",
        }
    }
}

impl std::fmt::Display for SheetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SheetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown sheet kind: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys_are_unique() {
        let mut keys: Vec<_> = SheetKind::ALL.iter().map(|k| k.cache_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), SheetKind::ALL.len());
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in SheetKind::ALL {
            assert_eq!(kind.as_str().parse::<SheetKind>().unwrap(), kind);
        }
        assert!("drinks".parse::<SheetKind>().is_err());
    }
}
