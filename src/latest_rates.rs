use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Number, Value};

/// Body returned by the `latest` endpoint of the rate feed.
///
/// Rates are parsed as JSON numbers (`f64` precision) and turned into decimals from their shortest textual form.
/// `date` stays untyped because a bad date only costs the timestamp, never the rates.
#[derive(Debug, Deserialize, PartialEq)]
pub struct LatestRates {
    pub rates: HashMap<String, Number>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub base: Option<String>,
}
