//! Currency conversion for displayed costs
//!
//! Catalog prices are in USD. Displaying another currency needs exactly one
//! number, the USD to target rate, which is fetched from a public rates API.
//! Rate lookups never fail from the caller's point of view: any problem
//! falls back to a built-in constant for the currency.

use async_trait::async_trait;
use llmcost_core::error::{FetchError, LlmCostError};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Latest USD-based rates
pub const EXCHANGE_RATE_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Supported display currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cny,
    Inr,
    Cad,
    Aud,
}

impl Currency {
    pub const ALL: [Currency; 8] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cny,
        Currency::Inr,
        Currency::Cad,
        Currency::Aud,
    ];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cny => "CNY",
            Currency::Inr => "INR",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy | Currency::Cny => "¥",
            Currency::Inr => "₹",
            Currency::Cad => "CA$",
            Currency::Aud => "A$",
        }
    }

    /// Rate used when the live lookup is unavailable
    pub fn fallback_rate(&self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Eur => 0.92,
            Currency::Gbp => 0.79,
            Currency::Jpy => 150.0,
            Currency::Cny => 7.2,
            Currency::Inr => 83.0,
            Currency::Cad => 1.36,
            Currency::Aud => 1.52,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = LlmCostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| {
                let supported: Vec<&str> = Currency::ALL.iter().map(Currency::code).collect();
                LlmCostError::InvalidArgument(format!(
                    "unsupported currency '{}', expected one of {}",
                    s,
                    supported.join(", ")
                ))
            })
    }
}

/// Where a conversion rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateOrigin {
    /// Target is USD, no lookup needed
    Identity,
    /// Fetched from the rate source
    Live,
    /// Built-in constant after a failed lookup
    Fallback,
}

/// Source of USD to target-currency rates
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch how many units of `currency` one USD buys
    async fn fetch_rate(&self, currency: Currency) -> Result<f64, FetchError>;
}

/// HTTP client for an `{ "rates": { "EUR": 0.92, ... } }` endpoint
pub struct ExchangeRateApi {
    url: String,
    client: reqwest::Client,
}

impl ExchangeRateApi {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Client for the default public endpoint
    pub fn public(timeout: Duration) -> Result<Self, FetchError> {
        Self::new(EXCHANGE_RATE_URL, timeout)
    }
}

#[async_trait]
impl RateSource for ExchangeRateApi {
    async fn fetch_rate(&self, currency: Currency) -> Result<f64, FetchError> {
        debug!("Fetching {} rate from {}", currency, self.url);
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let body: Value = response.json().await?;
        parse_rate(&body, currency)
    }
}

/// Extract the rate for `currency` from a rates document
pub fn parse_rate(body: &Value, currency: Currency) -> Result<f64, FetchError> {
    body.get("rates")
        .and_then(|rates| rates.get(currency.code()))
        .and_then(Value::as_f64)
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .ok_or_else(|| {
            FetchError::MalformedResponse(format!("no usable rate for {}", currency.code()))
        })
}

/// A resolved USD to target conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyConverter {
    currency: Currency,
    rate: f64,
    origin: RateOrigin,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::usd()
    }
}

impl CurrencyConverter {
    pub fn new(currency: Currency, rate: f64, origin: RateOrigin) -> Self {
        Self {
            currency,
            rate,
            origin,
        }
    }

    /// Identity conversion
    pub fn usd() -> Self {
        Self::new(Currency::Usd, 1.0, RateOrigin::Identity)
    }

    /// Converter using the built-in constant rate
    pub fn fallback(currency: Currency) -> Self {
        if currency == Currency::Usd {
            return Self::usd();
        }
        Self::new(currency, currency.fallback_rate(), RateOrigin::Fallback)
    }

    /// Look up the live rate, falling back to the built-in constant
    ///
    /// Never fails. USD never touches the network.
    pub async fn resolve(source: &dyn RateSource, currency: Currency) -> Self {
        if currency == Currency::Usd {
            return Self::usd();
        }

        match source.fetch_rate(currency).await {
            Ok(rate) => {
                debug!("Using live {} rate {}", currency, rate);
                Self::new(currency, rate, RateOrigin::Live)
            }
            Err(e) => {
                warn!(
                    "Failed to fetch {} rate: {}, using fallback {}",
                    currency,
                    e,
                    currency.fallback_rate()
                );
                Self::fallback(currency)
            }
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn origin(&self) -> RateOrigin {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeRates {
        calls: AtomicUsize,
        result: Result<f64, FetchError>,
    }

    #[async_trait]
    impl RateSource for FakeRates {
        async fn fetch_rate(&self, _currency: Currency) -> Result<f64, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn rates(result: Result<f64, FetchError>) -> FakeRates {
        FakeRates {
            calls: AtomicUsize::new(0),
            result,
        }
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!(" GBP ".parse::<Currency>().unwrap(), Currency::Gbp);
        assert!(matches!(
            "XYZ".parse::<Currency>(),
            Err(LlmCostError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse_rate() {
        let body = json!({"result": "success", "rates": {"USD": 1, "EUR": 0.91}});
        assert_eq!(parse_rate(&body, Currency::Eur).unwrap(), 0.91);
        assert!(parse_rate(&body, Currency::Jpy).is_err());
        assert!(parse_rate(&json!({"rates": {"EUR": "0.9"}}), Currency::Eur).is_err());
        assert!(parse_rate(&json!({"rates": {"EUR": -1.0}}), Currency::Eur).is_err());
        assert!(parse_rate(&json!([]), Currency::Eur).is_err());
    }

    #[tokio::test]
    async fn test_resolve_live_rate() {
        let source = rates(Ok(0.9));
        let converter = CurrencyConverter::resolve(&source, Currency::Eur).await;
        assert_eq!(converter.rate(), 0.9);
        assert_eq!(converter.origin(), RateOrigin::Live);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_failure() {
        let source = rates(Err(FetchError::Network("timeout".to_string())));
        let converter = CurrencyConverter::resolve(&source, Currency::Inr).await;
        assert_eq!(converter.rate(), Currency::Inr.fallback_rate());
        assert_eq!(converter.origin(), RateOrigin::Fallback);
    }

    #[tokio::test]
    async fn test_usd_skips_lookup() {
        let source = rates(Ok(42.0));
        let converter = CurrencyConverter::resolve(&source, Currency::Usd).await;
        assert_eq!(converter.rate(), 1.0);
        assert_eq!(converter.origin(), RateOrigin::Identity);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
