use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

/// The current set of rates, all expressed against `base`.
///
/// `base` itself never appears in `rates`; its rate is implicitly one.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub base: String,
    pub rates: HashMap<String, Decimal>,
    pub timestamp: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(base: &str, rates: HashMap<String, Decimal>, timestamp: DateTime<Utc>) -> Self {
        Self { base: base.to_uppercase(), rates, timestamp }
    }

    /// The number of units of `currency` that one unit of the base buys, if the snapshot knows the currency.
    pub fn rate_for(&self, currency: &str) -> Option<Decimal> {
        if currency == self.base {
            Some(Decimal::ONE)
        } else {
            self.rates.get(currency).copied()
        }
    }
}

/// Renders a timestamp as an RFC 3339 UTC string with a trailing `Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
