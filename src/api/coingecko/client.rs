use reqwest::Client as HttpClient;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::models::{
    ApiError, CoinDetail, CoinMarket, FetchOutcome, GlobalResponse, GlobalSnapshot, MarketChart,
};
use super::source::MarketDataSource;
use crate::config::ApiConfig;
use crate::models::{CoinId, PricePoint, VolumePoint};

pub const DEMO_KEY_PARAM: &str = "x_cg_demo_api_key";
pub const DEMO_KEY_HEADER: &str = "x-cg-demo-api-key";
/// Window of the volume bar chart, in days
pub const VOLUME_WINDOW_DAYS: u32 = 4;
/// Listing page size; also caps the portfolio at five coins
pub const MARKETS_PAGE_SIZE: usize = 5;
const QUOTE_CURRENCY: &str = "usd";

/// CoinGecko REST client. Every call is a single round trip with no retry.
pub struct CoinGeckoClient {
    http_client: HttpClient,
    config: Arc<ApiConfig>,
}

impl CoinGeckoClient {
    pub fn new(config: Arc<ApiConfig>) -> Self {
        Self {
            http_client: HttpClient::new(),
            config,
        }
    }

    /// Attach the API key as a query parameter or header, per `use_demo_key`
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        if self.config.use_demo_key {
            request.query(&[(DEMO_KEY_PARAM, self.config.api_key.as_str())])
        } else {
            request.header(DEMO_KEY_HEADER, self.config.api_key.as_str())
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!("GET {} {:?}", url, params);

        let request = self.authorize(self.http_client.get(&url).query(params));
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), body, retry_after));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    /// GET /coins/{id}/market_chart
    pub async fn market_chart(&self, coin: &CoinId, days: u32) -> Result<MarketChart, ApiError> {
        self.get_json(
            &format!("/coins/{}/market_chart", coin),
            &[("vs_currency", QUOTE_CURRENCY.to_string()), ("days", days.to_string())],
        )
        .await
    }

    /// GET /global
    pub async fn global(&self) -> Result<GlobalSnapshot, ApiError> {
        let envelope: GlobalResponse = self.get_json("/global", &[]).await?;
        Ok(envelope.data)
    }

    /// GET /coins/{id} with market data only
    pub async fn coin(&self, coin: &CoinId) -> Result<CoinDetail, ApiError> {
        self.get_json(
            &format!("/coins/{}", coin),
            &[
                ("localization", "false".to_string()),
                ("tickers", "false".to_string()),
                ("market_data", "true".to_string()),
                ("community_data", "false".to_string()),
                ("developer_data", "false".to_string()),
                ("sparkline", "false".to_string()),
            ],
        )
        .await
    }

    /// GET /coins/markets, largest market cap first. `ids` narrows the listing.
    pub async fn markets(&self, ids: Option<&[CoinId]>, per_page: usize) -> Result<Vec<CoinMarket>, ApiError> {
        let mut params = vec![("vs_currency", QUOTE_CURRENCY.to_string())];
        if let Some(ids) = ids {
            let joined: Vec<&str> = ids.iter().map(|c| c.as_str()).collect();
            params.push(("ids", joined.join(",")));
        }
        params.extend([
            ("order", "market_cap_desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
        ]);
        self.get_json("/coins/markets", &params).await
    }
}

/// Map a non-2xx status and its body to an [`ApiError`]
pub fn classify_status(status: u16, body: String, retry_after_secs: Option<u64>) -> ApiError {
    match status {
        400 => {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").or_else(|| v.get("message")).and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(body);
            ApiError::BadRequest(message)
        }
        401 => ApiError::Unauthorized(body),
        403 => ApiError::Forbidden(body),
        404 => ApiError::NotFound(body),
        429 => {
            warn!("Rate limited by market-data API, retry after {:?} s", retry_after_secs);
            ApiError::RateLimited { retry_after_secs }
        }
        500..=599 => ApiError::ServerError(status, body),
        _ => ApiError::HttpError(status, body),
    }
}

/// Log and convert a failed request; the caller sees only the tagged outcome
fn swallow<T>(endpoint: &str, result: Result<T, ApiError>) -> FetchOutcome<T> {
    match result {
        Ok(data) => FetchOutcome::Data(data),
        Err(e) => {
            warn!("{} fetch failed: {}", endpoint, e);
            FetchOutcome::Failed(e)
        }
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_price_series(&self, coin: &CoinId, days: u32) -> FetchOutcome<Vec<PricePoint>> {
        match swallow("price series", self.market_chart(coin, days).await) {
            FetchOutcome::Data(chart) => FetchOutcome::from_list(chart.price_points()),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Failed(e) => FetchOutcome::Failed(e),
        }
    }

    async fn fetch_global_snapshot(&self) -> FetchOutcome<GlobalSnapshot> {
        swallow("global snapshot", self.global().await)
    }

    async fn fetch_coin_detail(&self, coin: &CoinId) -> FetchOutcome<CoinDetail> {
        swallow("coin detail", self.coin(coin).await)
    }

    async fn fetch_volume_series(&self, coin: &CoinId) -> FetchOutcome<Vec<VolumePoint>> {
        match swallow("volume series", self.market_chart(coin, VOLUME_WINDOW_DAYS).await) {
            FetchOutcome::Data(chart) => FetchOutcome::from_list(chart.volume_points()),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Failed(e) => FetchOutcome::Failed(e),
        }
    }

    async fn fetch_portfolio_markets(&self, coins: &[CoinId]) -> FetchOutcome<Vec<CoinMarket>> {
        match swallow("portfolio markets", self.markets(Some(coins), MARKETS_PAGE_SIZE).await) {
            FetchOutcome::Data(mut markets) => {
                markets.truncate(MARKETS_PAGE_SIZE);
                FetchOutcome::from_list(markets)
            }
            other => other,
        }
    }

    async fn fetch_top_markets(&self, limit: usize) -> FetchOutcome<Vec<CoinMarket>> {
        match swallow("top markets", self.markets(None, limit).await) {
            FetchOutcome::Data(markets) => FetchOutcome::from_list(markets),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned HTTP response and hand back the raw request head
    async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.expect("read");
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let _ = tx.send(String::from_utf8_lossy(&buf).to_string());
            socket.write_all(response.as_bytes()).await.expect("write");
            let _ = socket.shutdown().await;
        });

        (format!("http://{}", addr), rx)
    }

    fn client(base_url: String, use_demo_key: bool) -> CoinGeckoClient {
        CoinGeckoClient::new(Arc::new(ApiConfig {
            base_url,
            api_key: "test-key".to_string(),
            use_demo_key,
        }))
    }

    #[tokio::test]
    async fn test_demo_key_goes_in_query() {
        let (base, request) = serve_once("200 OK", r#"{"prices": [[1704067200000, 1.5]]}"#).await;
        let series = client(base, true).fetch_price_series(&CoinId::new("bitcoin"), 2).await;

        let head = request.await.expect("request captured");
        let request_line = head.lines().next().unwrap_or_default().to_string();
        assert!(request_line.starts_with("GET /coins/bitcoin/market_chart?"));
        assert!(request_line.contains("vs_currency=usd"));
        assert!(request_line.contains("days=2"));
        assert!(request_line.contains("x_cg_demo_api_key=test-key"));
        assert_eq!(series.into_option().map(|s| s.len()), Some(1));
    }

    #[tokio::test]
    async fn test_header_key_when_demo_disabled() {
        let body = r#"{"data": {"total_market_cap": {"usd": 2.0e12}, "total_volume": {"usd": 1.0e11}, "market_cap_change_percentage_24h_usd": -0.5}}"#;
        let (base, request) = serve_once("200 OK", body).await;
        let global = client(base, false).fetch_global_snapshot().await;

        let head = request.await.expect("request captured").to_lowercase();
        assert!(head.starts_with("get /global"));
        assert!(head.contains("x-cg-demo-api-key: test-key"));
        assert!(!head.contains("x_cg_demo_api_key"));
        let snapshot = global.into_option().expect("snapshot");
        assert_eq!(snapshot.total_market_cap.get("usd"), Some(2.0e12));
    }

    #[tokio::test]
    async fn test_not_found_is_swallowed_as_failed() {
        let (base, _request) = serve_once("404 Not Found", r#"{"error": "coin not found"}"#).await;
        let outcome = client(base, true).fetch_volume_series(&CoinId::new("foobar")).await;
        assert!(matches!(outcome, FetchOutcome::Failed(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_volume_history_is_empty_not_failed() {
        let body = r#"{"prices": [], "market_caps": [], "total_volumes": []}"#;
        let (base, request) = serve_once("200 OK", body).await;
        let outcome = client(base, true).fetch_volume_series(&CoinId::new("newcoin")).await;

        let head = request.await.expect("request captured");
        assert!(head.contains("days=4"));
        assert!(matches!(outcome, FetchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_failed() {
        let (base, _request) = serve_once("200 OK", "not json").await;
        let outcome = client(base, true).fetch_coin_detail(&CoinId::new("bitcoin")).await;
        assert!(matches!(outcome, FetchOutcome::Failed(ApiError::DeserializationError(_))));
    }

    #[tokio::test]
    async fn test_empty_listing_is_empty() {
        let (base, request) = serve_once("200 OK", "[]").await;
        let ids = vec![CoinId::new("dogecoin"), CoinId::new("bitcoin")];
        let outcome = client(base, true).fetch_portfolio_markets(&ids).await;

        let head = request.await.expect("request captured");
        assert!(head.contains("ids=dogecoin%2Cbitcoin"));
        assert!(head.contains("order=market_cap_desc"));
        assert!(head.contains("per_page=5"));
        assert!(matches!(outcome, FetchOutcome::Empty));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_failed() {
        let outcome = client("http://127.0.0.1:1".to_string(), true).fetch_top_markets(5).await;
        assert!(matches!(outcome, FetchOutcome::Failed(ApiError::RequestError(_))));
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(400, r#"{"error": "invalid vs_currency"}"#.into(), None),
            ApiError::BadRequest(m) if m == "invalid vs_currency"
        ));
        assert!(matches!(classify_status(401, String::new(), None), ApiError::Unauthorized(_)));
        assert!(matches!(
            classify_status(429, String::new(), Some(30)),
            ApiError::RateLimited { retry_after_secs: Some(30) }
        ));
        assert!(matches!(classify_status(503, "down".into(), None), ApiError::ServerError(503, _)));
        assert!(matches!(classify_status(418, String::new(), None), ApiError::HttpError(418, _)));
    }
}
