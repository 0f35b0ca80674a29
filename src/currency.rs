//! Exchange rates and currency conversion
//!
//! Rates come from a [`RateSource`] (the HTTP source talks to the open
//! ExchangeRate-API endpoint) and are memoised per base currency in a
//! [`TtlCache`]. A failed fetch leaves the cache as it was.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::cache::TtlCache;
use crate::config::ExchangeConfig;
use crate::models::CurrencyCode;
use crate::{PlannerError, Result};

/// Currency code to rate relative to the base currency
pub type Rates = HashMap<String, f64>;

/// Where exchange rates come from
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self, base: &CurrencyCode) -> Result<Rates>;
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: Option<Rates>,
}

/// Extract the `rates` map from a rate API response body
pub fn parse_rates(body: &str) -> Result<Rates> {
    let response: RatesResponse = serde_json::from_str(body)
        .map_err(|e| PlannerError::api(format!("Failed to parse exchange rate response: {e}")))?;
    response
        .rates
        .ok_or_else(|| PlannerError::api("Invalid response from exchange rate API"))
}

/// Rate source backed by an HTTP JSON API
pub struct HttpRateSource {
    client: ClientWithMiddleware,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(config: &ExchangeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("trip-planner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlannerError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch(&self, base: &CurrencyCode) -> Result<Rates> {
        let url = format!(
            "{}/latest/{}",
            self.base_url,
            urlencoding::encode(base.as_str())
        );
        debug!("Calling the exchange rate API: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(PlannerError::api(format!(
                "Exchange rate API error {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_rates(&body)
    }
}

/// Exchange rates memoised per base currency
pub struct ExchangeRateService {
    source: Box<dyn RateSource>,
    cache: TtlCache<CurrencyCode, Rates>,
}

impl ExchangeRateService {
    #[must_use]
    pub fn new(source: Box<dyn RateSource>, cache: TtlCache<CurrencyCode, Rates>) -> Self {
        Self { source, cache }
    }

    /// Rates relative to `base`, from cache when younger than the TTL
    #[instrument(skip(self), fields(base = %base))]
    pub async fn rates(&self, base: &CurrencyCode) -> Result<Rates> {
        if let Some(rates) = self.cache.get(base) {
            debug!("Using cached exchange rates");
            return Ok(rates);
        }

        let rates = self.source.fetch(base).await?;
        info!("Fetched {} exchange rates for {}", rates.len(), base);
        self.cache.put(base.clone(), rates.clone());
        Ok(rates)
    }
}

/// Convert `amount` between currencies using USD-based `rates`.
///
/// The result is rounded to two decimals. Identical currencies return the
/// amount untouched.
pub fn convert_currency(
    amount: f64,
    from: &CurrencyCode,
    to: &CurrencyCode,
    rates: &Rates,
) -> Result<f64> {
    if from == to {
        return Ok(amount);
    }

    let rate_for = |code: &CurrencyCode| {
        rates
            .get(code.as_str())
            .copied()
            .filter(|rate| *rate > 0.0)
            .ok_or_else(|| PlannerError::validation(format!("No exchange rate for {code}")))
    };

    let amount_in_usd = if from.is_usd() {
        amount
    } else {
        amount / rate_for(from)?
    };

    let converted = if to.is_usd() {
        amount_in_usd
    } else {
        amount_in_usd * rate_for(to)?
    };

    Ok((converted * 100.0).round() / 100.0)
}
