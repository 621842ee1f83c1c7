//! Integration test helpers for Poppin Deli.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p poppin-deli-integration-tests
//! ```
//!
//! Nothing external is needed: feeds are served by [`StubSheets`], a tiny
//! HTTP server on a loopback port, and storage lives in a temporary directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use poppin_deli_storefront::config::{SheetsConfig, SiteConfig};
use poppin_deli_storefront::sheets::SheetKind;

/// Bundled fallback data shipped with the storefront crate.
#[must_use]
pub fn bundled_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../storefront/data")
}

/// Build a gviz JSONP body with labelled columns.
#[must_use]
pub fn gviz_body(headers: &[&str], rows: &[Vec<Value>]) -> String {
    let cols: Vec<Value> = headers
        .iter()
        .enumerate()
        .map(|(i, label)| json!({"id": column_id(i), "label": label, "type": "string"}))
        .collect();
    let rows: Vec<Value> = rows
        .iter()
        .map(|cells| {
            let c: Vec<Value> = cells
                .iter()
                .map(|v| if v.is_null() { Value::Null } else { json!({"v": v}) })
                .collect();
            json!({"c": c})
        })
        .collect();
    let table = json!({
        "version": "0.6",
        "status": "ok",
        "table": {"cols": cols, "rows": rows}
    });
    format!("/*O_o*/\ngoogle.visualization.Query.setResponse({table});")
}

fn column_id(index: usize) -> String {
    let letter = u8::try_from(index % 26).map_or('A', |i| char::from(b'A' + i));
    letter.to_string()
}

/// Loopback HTTP server answering gviz requests from canned bodies.
///
/// Requests are matched on the sheet id segment of the path; unknown ids
/// get a 404.
pub struct StubSheets {
    base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubSheets {
    /// Start serving `bodies` (sheet id to response body).
    ///
    /// # Panics
    ///
    /// Panics if no loopback port can be bound.
    #[allow(clippy::expect_used)]
    pub async fn start(bodies: HashMap<String, String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let hits = Arc::new(AtomicUsize::new(0));
        let bodies = Arc::new(bodies);

        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let bodies = Arc::clone(&bodies);
                let counter = Arc::clone(&counter);
                tokio::spawn(async move {
                    let mut buf = vec![0_u8; 4096];
                    let Ok(n) = socket.read(&mut buf).await else {
                        return;
                    };
                    let request = String::from_utf8_lossy(buf.get(..n).unwrap_or_default());
                    counter.fetch_add(1, Ordering::SeqCst);

                    let sheet_id = request
                        .split_whitespace()
                        .nth(1)
                        .and_then(|path| path.trim_start_matches('/').split('/').next())
                        .unwrap_or_default()
                        .to_string();

                    let (status, body) = bodies
                        .get(&sheet_id)
                        .map_or(("404 Not Found", String::new()), |b| ("200 OK", b.clone()));
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: text/javascript\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    /// Base URL to configure as the spreadsheet host.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Site configuration pointing at `base_url`, with storage in `storage_dir`.
///
/// Each content type uses its own name as the sheet id, so a stub can serve
/// `menu` for [`SheetKind::Menu`] and so on.
#[must_use]
pub fn test_config(base_url: &str, storage_dir: &Path) -> SiteConfig {
    SiteConfig {
        sheets: SheetsConfig {
            base_url: base_url.to_string(),
            sheet_ids: SheetKind::ALL
                .into_iter()
                .map(|kind| (kind, kind.as_str().to_string()))
                .collect(),
            timeout_secs: 2,
        },
        cache_ttl: Duration::from_secs(60),
        data_dir: bundled_data_dir(),
        storage_dir: storage_dir.to_path_buf(),
        ..SiteConfig::default()
    }
}
