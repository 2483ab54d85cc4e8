//! Client for the upstream rate feed.
//!
//! The feed quotes every currency against its own base (EUR by default). Snapshots are stored against a different
//! base (GBP by default), so every fetched table is re-based in memory before anyone gets to see it.
use std::{collections::HashMap, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use log::*;
use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde_json::{Number, Value};

use crate::{config::FeedConfig, errors::FeedError, exchange_rate::RateSnapshot, latest_rates::LatestRates};

#[derive(Debug, Clone)]
pub struct RateFetcher {
    client: Client,
    config: FeedConfig,
}

impl RateFetcher {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetches the latest rates and re-bases them onto the configured target currency.
    ///
    /// Nothing is persisted here; a failure at any stage leaves the caller's state untouched.
    pub async fn fetch_and_normalize(&self) -> Result<RateSnapshot, FeedError> {
        let body = self.load_latest().await?;
        let latest = parse_latest(&body)?;
        let feed_base = latest.base.as_deref().map(str::to_uppercase).unwrap_or_else(|| self.config.feed_base.clone());
        let rates = rebase(&latest.rates, &feed_base, &self.config.target_base)?;
        let timestamp = snapshot_timestamp(latest.date.as_ref());
        info!(
            "Fetched {} rates from the feed, re-based from {feed_base} to {}",
            rates.len(),
            self.config.target_base
        );
        Ok(RateSnapshot::new(&self.config.target_base, rates, timestamp))
    }

    async fn load_latest(&self) -> Result<String, FeedError> {
        let url = self.url()?;
        debug!("Requesting rates from {url}");
        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(FeedError::Upstream(format!("Can't download the rates: {}", resp.status())));
        }

        let text = resp.text().await?;

        Ok(text)
    }

    fn url(&self) -> Result<Url, FeedError> {
        let symbols = self.config.symbols.join(",");
        let params = [("source", self.config.source.as_str()), ("symbols", symbols.as_str())];
        Url::parse_with_params(&self.config.url, &params)
            .map_err(|e| FeedError::Upstream(format!("Invalid feed URL {}. {e}", self.config.url)))
    }
}

fn parse_latest(body: &str) -> Result<LatestRates, FeedError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| FeedError::UpstreamFormat(format!("API response is not valid JSON. {e}")))?;
    if value.get("rates").is_none() {
        return Err(FeedError::UpstreamFormat(format!("API response missing 'rates'. Full response: {value}")));
    }
    serde_json::from_value(value).map_err(|e| {
        warn!("Malformed feed response: {body}");
        FeedError::UpstreamFormat(format!("API response has malformed rates. {e}"))
    })
}

/// Re-expresses `rates`, quoted against `feed_base`, against `target_base`.
///
/// Each currency `cur` becomes `rates[target_base] / rates[cur]`. Currencies with a zero rate are dropped, and
/// neither `target_base` nor `feed_base` appear in the result.
pub fn rebase(
    rates: &HashMap<String, Number>,
    feed_base: &str,
    target_base: &str,
) -> Result<HashMap<String, Decimal>, FeedError> {
    let mut source = HashMap::with_capacity(rates.len());
    for (code, value) in rates {
        let rate = number_to_decimal(value)
            .ok_or_else(|| FeedError::UpstreamFormat(format!("Rate for {code} is not a decimal number: {value}")))?;
        if rate.is_sign_negative() && !rate.is_zero() {
            return Err(FeedError::UpstreamFormat(format!("Rate for {code} is negative: {rate}")));
        }
        source.insert(code.to_uppercase(), rate);
    }

    let target_rate = source
        .get(target_base)
        .copied()
        .ok_or_else(|| FeedError::UpstreamFormat(format!("API did not return {target_base} rate, cannot convert.")))?;
    if target_rate.is_zero() {
        return Err(FeedError::UpstreamFormat(format!("API returned a zero {target_base} rate, cannot convert.")));
    }

    let mut result = HashMap::with_capacity(source.len());
    for (code, rate) in source {
        if code == target_base || code == feed_base {
            continue;
        }
        if rate.is_zero() {
            debug!("Skipping {code}: the feed reported a zero rate");
            continue;
        }
        let rebased = target_rate
            .checked_div(rate)
            .ok_or_else(|| FeedError::UpstreamFormat(format!("Rate for {code} is out of range: {rate}")))?;
        result.insert(code, rebased);
    }
    Ok(result)
}

fn number_to_decimal(n: &Number) -> Option<Decimal> {
    let s = n.to_string();
    Decimal::from_str(&s).or_else(|_| Decimal::from_scientific(&s)).ok()
}

/// The feed's own date when it can be understood, otherwise the current time.
fn snapshot_timestamp(date: Option<&Value>) -> DateTime<Utc> {
    match date {
        None | Some(Value::Null) => retrieval_time(),
        Some(Value::String(s)) => parse_feed_date(s).unwrap_or_else(|| {
            warn!("Could not parse the feed date '{s}'. Using the retrieval time instead.");
            retrieval_time()
        }),
        Some(other) => {
            warn!("The feed date {other} is not a string. Using the retrieval time instead.");
            retrieval_time()
        },
    }
}

// Postgres keeps microseconds, so the in-memory value is truncated to match what gets read back.
fn retrieval_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn parse_feed_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).trunc_subsecs(6));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().trunc_subsecs(6));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc())
}
