// =============================================================================
// Alpaca Market Data REST Client
// =============================================================================
//
// Key id and secret travel as the `APCA-API-KEY-ID` / `APCA-API-SECRET-KEY`
// headers on every request and are never logged.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{Bar, BarSource};

pub const DEFAULT_DATA_URL: &str = "https://data.alpaca.markets";

#[derive(Debug, Deserialize)]
struct BarsResponse {
    #[serde(default)]
    bars: Option<Vec<Bar>>,
}

/// Alpaca market-data client for historical stock bars.
#[derive(Clone)]
pub struct AlpacaClient {
    base_url: String,
    client: reqwest::Client,
}

impl AlpacaClient {
    /// Build a client against `base_url` (e.g. [`DEFAULT_DATA_URL`]).
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl AsRef<str>,
        secret: impl AsRef<str>,
    ) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "APCA-API-KEY-ID",
            HeaderValue::from_str(key_id.as_ref()).context("invalid Alpaca key id")?,
        );
        let mut secret_header =
            HeaderValue::from_str(secret.as_ref()).context("invalid Alpaca secret key")?;
        secret_header.set_sensitive(true);
        default_headers.insert("APCA-API-SECRET-KEY", secret_header);

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("failed to build HTTP client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "AlpacaClient initialised");

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl BarSource for AlpacaClient {
    /// GET /v2/stocks/{symbol}/bars: the latest `limit` bars, returned oldest
    /// first.
    #[instrument(skip(self), name = "alpaca::get_bars")]
    async fn get_bars(&self, symbol: &str, timeframe: &str, limit: u32) -> Result<Vec<Bar>> {
        let url = format!("{}/v2/stocks/{}/bars", self.base_url, symbol);
        let limit = limit.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("timeframe", timeframe),
                ("limit", limit.as_str()),
                ("sort", "desc"),
            ])
            .send()
            .await
            .with_context(|| format!("GET bars for {symbol} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Alpaca GET bars for {symbol} returned {status}: {body}");
        }

        let body: BarsResponse = resp
            .json()
            .await
            .with_context(|| format!("failed to parse bars response for {symbol}"))?;

        let mut bars = body.bars.unwrap_or_default();
        bars.reverse();

        debug!(symbol, count = bars.len(), "bars fetched");
        Ok(bars)
    }
}

impl std::fmt::Debug for AlpacaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlpacaClient")
            .field("key_id", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bar_json(t: &str, close: f64) -> serde_json::Value {
        serde_json::json!({
            "t": t, "o": close, "h": close + 1.0, "l": close - 1.0, "c": close,
            "v": 1200, "n": 14, "vw": close
        })
    }

    #[tokio::test]
    async fn fetches_bars_oldest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/stocks/AAPL/bars"))
            .and(query_param("timeframe", "1Min"))
            .and(query_param("limit", "3"))
            .and(header("APCA-API-KEY-ID", "key-id"))
            .and(header("APCA-API-SECRET-KEY", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bars": [
                    bar_json("2024-05-01T14:32:00Z", 172.0),
                    bar_json("2024-05-01T14:31:00Z", 171.0),
                    bar_json("2024-05-01T14:30:00Z", 170.0),
                ],
                "symbol": "AAPL",
                "next_page_token": null
            })))
            .mount(&server)
            .await;

        let client = AlpacaClient::new(server.uri(), "key-id", "secret").unwrap();
        let bars = client.get_bars("AAPL", "1Min", 3).await.unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, "2024-05-01T14:30:00Z");
        assert_eq!(super::super::closes(&bars), vec![170.0, 171.0, 172.0]);
        assert_eq!(bars[2].volume, 1200.0);
    }

    #[tokio::test]
    async fn null_bars_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/stocks/HOOD/bars"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "bars": null, "symbol": "HOOD", "next_page_token": null
            })))
            .mount(&server)
            .await;

        let client = AlpacaClient::new(server.uri(), "k", "s").unwrap();
        assert!(client.get_bars("HOOD", "1Min", 300).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = AlpacaClient::new(server.uri(), "k", "s").unwrap();
        let err = client.get_bars("AAPL", "1Min", 300).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("403"), "{msg}");
        assert!(msg.contains("forbidden"), "{msg}");
    }

    #[test]
    fn debug_redacts_credentials() {
        let client = AlpacaClient::new("http://localhost:1/", "key-id", "top-secret").unwrap();
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("top-secret"));
        assert!(!dbg.contains("key-id"));
        assert!(dbg.contains("http://localhost:1"));
    }

    #[test]
    fn rejects_unprintable_credentials() {
        assert!(AlpacaClient::new(DEFAULT_DATA_URL, "bad\nkey", "s").is_err());
    }
}
