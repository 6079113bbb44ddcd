use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use indexmap::IndexMap;
use nonzero_ext::nonzero;
use reqwest::{Client, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::{debug, warn};

use crate::{
    models::{
        bar::{Bar, BarSeries},
        request_params::BarsRequestParams,
    },
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidApiKeySnafu, MissingEnvVarSnafu,
        ProviderError, ProviderInitError, ReqwestSnafu,
        alpaca_rest::{
            params::{construct_params, validate_request},
            response::{AlpacaBar, AlpacaResponse},
        },
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks/bars";

/// Retry behaviour for throttled (429) and server-side (5xx) responses.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff: `base_delay * 2^attempt`.
    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

pub struct AlpacaProvider {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
    retry: RetryPolicy,
    _api_key: SecretString,
    _secret_key: SecretString,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider.
    ///
    /// Reads API keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = get_env_var("APCA_API_KEY_ID").context(MissingEnvVarSnafu)?;
        let secret_key = get_env_var("APCA_API_SECRET_KEY").context(MissingEnvVarSnafu)?;
        Self::with_credentials(
            SecretString::new(api_key.into()),
            SecretString::new(secret_key.into()),
        )
    }

    pub fn with_credentials(
        api_key: SecretString,
        secret_key: SecretString,
    ) -> Result<Self, ProviderInitError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key.expose_secret()).context(InvalidApiKeySnafu)?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(secret_key.expose_secret())
                .context(InvalidApiKeySnafu)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            // free plan allows 200 requests per minute
            limiter: RateLimiter::direct(Quota::per_minute(nonzero!(200u32))),
            retry: RetryPolicy::default(),
            _api_key: api_key,
            _secret_key: secret_key,
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Points the provider at a different endpoint, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_page(&self, query: &[(String, String)]) -> Result<AlpacaResponse, ProviderError> {
        let mut attempt = 0;
        loop {
            self.limiter.until_ready().await;
            let response = self
                .client
                .get(&self.base_url)
                .query(query)
                .send()
                .await
                .context(ReqwestSnafu)?;

            let status = response.status();
            if status.is_success() {
                return response.json::<AlpacaResponse>().await.context(ReqwestSnafu);
            }

            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < self.retry.max_retries {
                let delay = self.retry.delay(attempt);
                warn!(%status, attempt, ?delay, "alpaca request failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                status: status.as_u16(),
                message,
            }
            .fail();
        }
    }
}

#[async_trait]
impl DataProvider for AlpacaProvider {
    fn name(&self) -> &'static str {
        "alpaca"
    }

    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        validate_request(&params)?;

        let mut all_bars: IndexMap<String, Vec<AlpacaBar>> = IndexMap::new();
        let mut next_page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let mut query_params = construct_params(&params);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            let alpaca_response = self.fetch_page(&query_params).await?;
            pages += 1;

            // Merge the bars from the current page into our collection.
            for (symbol, bars) in alpaca_response.bars.unwrap_or_default() {
                all_bars.entry(symbol).or_default().extend(bars);
            }

            match alpaca_response.next_page_token {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }
        debug!(pages, symbols = all_bars.len(), "alpaca bars fetched");

        let result = all_bars
            .into_iter()
            .map(|(symbol, alpaca_bars)| BarSeries {
                symbol,
                timeframe: params.timeframe.clone(),
                bars: alpaca_bars.into_iter().map(Bar::from).collect(),
            })
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay(0), Duration::from_millis(100));
        assert_eq!(policy.delay(1), Duration::from_millis(200));
        assert_eq!(policy.delay(3), Duration::from_millis(800));
    }

    #[test]
    fn test_rejects_header_unsafe_key() {
        let result = AlpacaProvider::with_credentials(
            SecretString::from("bad\nkey"),
            SecretString::from("secret"),
        );
        assert!(matches!(result, Err(ProviderInitError::InvalidApiKey { .. })));
    }
}
