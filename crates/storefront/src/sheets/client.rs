//! HTTP client for the public gviz endpoint.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, instrument};
use url::Url;

use super::{SheetKind, SheetRow, SheetsError, gviz};
use crate::config::SheetsConfig;

/// Reads published spreadsheets over HTTP.
#[derive(Clone)]
pub struct SheetsClient {
    client: reqwest::Client,
    base_url: String,
    sheet_ids: HashMap<SheetKind, String>,
}

impl SheetsClient {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &SheetsConfig) -> Result<Self, SheetsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("poppin-deli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sheet_ids: config.sheet_ids.clone(),
        })
    }

    /// Sheet id configured for `kind`, if non-blank.
    #[must_use]
    pub fn sheet_id(&self, kind: SheetKind) -> Option<&str> {
        self.sheet_ids
            .get(&kind)
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
    }

    /// Query URL for `kind`: `<base>/<id>/gviz/tq?tqx=out:json`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::NotConfigured`] for a blank sheet id, or a URL
    /// error if the base URL is invalid.
    pub fn sheet_url(&self, kind: SheetKind) -> Result<Url, SheetsError> {
        let id = self.sheet_id(kind).ok_or(SheetsError::NotConfigured(kind))?;
        let mut url = Url::parse(&format!("{}/{id}/gviz/tq", self.base_url))?;
        url.query_pairs_mut().append_pair("tqx", "out:json");
        Ok(url)
    }

    /// Fetch and parse every data row of `kind`.
    ///
    /// # Errors
    ///
    /// Returns error if the sheet is not configured, the request fails or
    /// answers with a non-success status, or the body cannot be parsed.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn fetch_rows(&self, kind: SheetKind) -> Result<Vec<SheetRow>, SheetsError> {
        let url = self.sheet_url(kind)?;
        debug!(%url, "Fetching sheet");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SheetsError::Status {
                kind,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let rows = gviz::parse_rows(&body)?;
        debug!(rows = rows.len(), "Sheet parsed");
        Ok(rows)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> SheetsClient {
        let mut config = SheetsConfig::default();
        config.base_url = base_url.to_string();
        config
            .sheet_ids
            .insert(SheetKind::Menu, "abc123".to_string());
        config.sheet_ids.insert(SheetKind::Gallery, "  ".to_string());
        SheetsClient::new(&config).unwrap()
    }

    #[test]
    fn test_sheet_url() {
        let client = client("https://docs.google.com/spreadsheets/d/");
        assert_eq!(
            client.sheet_url(SheetKind::Menu).unwrap().as_str(),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out%3Ajson"
        );
    }

    #[test]
    fn test_blank_sheet_id_is_not_configured() {
        let client = client("https://docs.google.com/spreadsheets/d");
        assert!(matches!(
            client.sheet_url(SheetKind::Gallery),
            Err(SheetsError::NotConfigured(SheetKind::Gallery))
        ));
    }

    #[tokio::test]
    async fn test_fetch_unconfigured_fails_without_network() {
        let client = client("http://127.0.0.1:9");
        let err = client.fetch_rows(SheetKind::Gallery).await.unwrap_err();
        assert!(matches!(err, SheetsError::NotConfigured(_)));
    }
}
