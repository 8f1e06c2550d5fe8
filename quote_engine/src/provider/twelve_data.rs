//! HTTP quote provider speaking the Twelve Data JSON format.
//!
//! Requests go through a blocking `reqwest` client whose timeout bounds every
//! call. Decoding is kept in free functions so payload handling can be tested
//! without a network.

use std::time::Duration;

use log::debug;
use quote_common::net::{DEFAULT_BASE_URL, FETCH_TIMEOUT, QUOTE_PATH, SEARCH_PATH, endpoint};
use quote_common::{Quote, QuoteError, Result, Ticker};
use serde_json::Value;

use super::{QuoteProvider, SymbolMatch};

/// Blocking HTTP provider.
pub struct TwelveDataProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl TwelveDataProvider {
    /// Provider against the public endpoint with the default timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, FETCH_TIMEOUT)
    }

    /// Provider against `base_url`, bounding each request by `timeout`.
    pub fn with_base_url(api_key: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuoteError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.into(),
        })
    }

    fn get(&self, path: &str, symbol: &str) -> Result<String> {
        let url = endpoint(&self.base_url, path);
        debug!("GET {} symbol={}", url, symbol);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("apikey", self.api_key.as_str())])
            .send()
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Network(format!("{url} answered HTTP {status}")));
        }
        response.text().map_err(|e| QuoteError::Network(e.to_string()))
    }
}

impl QuoteProvider for TwelveDataProvider {
    fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote> {
        let body = self.get(QUOTE_PATH, ticker.as_str())?;
        decode_quote(ticker, &body)
    }

    fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>> {
        let body = self.get(SEARCH_PATH, query.trim())?;
        decode_search(&body)
    }
}

/// Decodes a quote payload for `ticker`.
///
/// `name`, `close` and `percent_change` are required. Numbers may arrive as
/// strings or as JSON numbers. The provider reports the change in whole
/// percent; it is stored in fractional form.
pub fn decode_quote(ticker: &Ticker, body: &str) -> Result<Quote> {
    let json: Value = serde_json::from_str(body)?;

    let name = json
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| missing(ticker, "name", &json))?;
    let price = numeric_field(&json, "close").ok_or_else(|| missing(ticker, "close", &json))?;
    let percent = numeric_field(&json, "percent_change")
        .ok_or_else(|| missing(ticker, "percent_change", &json))?;

    Ok(Quote::fetched(ticker.clone(), name, price, percent / 100.0))
}

/// Decodes a symbol search payload. Malformed entries are skipped.
pub fn decode_search(body: &str) -> Result<Vec<SymbolMatch>> {
    let json: Value = serde_json::from_str(body)?;
    let data = json
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| QuoteError::Decode("search payload has no `data` array".to_string()))?;

    Ok(data
        .iter()
        .filter_map(|entry| serde_json::from_value::<SymbolMatch>(entry.clone()).ok())
        .collect())
}

fn numeric_field(json: &Value, field: &str) -> Option<f64> {
    let value = json.get(field)?;
    let number = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn missing(ticker: &Ticker, field: &str, json: &Value) -> QuoteError {
    // error payloads look like {"code":404,"message":"...","status":"error"}
    match json.get("message").and_then(Value::as_str) {
        Some(message) => QuoteError::Decode(format!("{ticker}: no `{field}` ({message})")),
        None => QuoteError::Decode(format!("{ticker}: missing or malformed `{field}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::FailureKind;

    fn aapl() -> Ticker {
        "AAPL".parse().unwrap()
    }

    #[test]
    fn decodes_string_numbers_and_scales_percent() {
        let body = r#"{"symbol":"AAPL","name":"Apple Inc","close":"105.00","percent_change":"2.00"}"#;
        let quote = decode_quote(&aapl(), body).unwrap();
        assert_eq!(quote.ticker, aapl());
        assert_eq!(quote.name, "Apple Inc");
        assert_eq!(quote.price, 105.0);
        assert!((quote.percent_change - 0.02).abs() < 1e-12);
        assert!(quote.last_updated.is_some());
    }

    #[test]
    fn accepts_plain_json_numbers() {
        let body = r#"{"name":"Microsoft","close":200.5,"percent_change":-2.34}"#;
        let quote = decode_quote(&"MSFT".parse().unwrap(), body).unwrap();
        assert_eq!(quote.price, 200.5);
        assert!((quote.percent_change + 0.0234).abs() < 1e-12);
    }

    #[test]
    fn missing_field_is_a_decode_failure() {
        for body in [
            r#"{"close":"1","percent_change":"1"}"#,
            r#"{"name":"Apple","percent_change":"1"}"#,
            r#"{"name":"Apple","close":"1"}"#,
            r#"{"name":"Apple","close":"abc","percent_change":"1"}"#,
            r#"{"name":"Apple","close":"NaN","percent_change":"1"}"#,
        ] {
            let err = decode_quote(&aapl(), body).unwrap_err();
            assert_eq!(err.failure_kind(), FailureKind::Decode, "{body}");
        }
    }

    #[test]
    fn provider_error_payload_carries_message() {
        let body = r#"{"code":404,"message":"symbol not found","status":"error"}"#;
        let err = decode_quote(&aapl(), body).unwrap_err();
        assert!(err.to_string().contains("symbol not found"));
    }

    #[test]
    fn malformed_body_is_a_decode_failure() {
        let err = decode_quote(&aapl(), "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::Decode);
    }

    #[test]
    fn search_skips_malformed_entries() {
        let body = r#"{"data":[
            {"symbol":"AAPL","instrument_name":"Apple Inc","country":"United States"},
            {"symbol":"BROKEN"},
            42,
            {"symbol":"AAPL.MX","instrument_name":"Apple Inc","country":"Mexico","exchange":"BMV"}
        ],"status":"ok"}"#;
        let matches = decode_search(body).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].symbol, "AAPL");
        assert_eq!(matches[1].country, "Mexico");
    }

    #[test]
    fn search_without_data_is_a_decode_failure() {
        let err = decode_search(r#"{"status":"error"}"#).unwrap_err();
        assert!(matches!(err, QuoteError::Decode(_)));
    }
}
