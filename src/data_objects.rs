use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    convert::Conversion,
    exchange_rate::{RateSnapshot, format_timestamp},
};

const STATUS_OK: &str = "ok";

/// Body of `POST /api/convert`. Both the short and long field names are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub from_currency: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub to_currency: Option<String>,
    #[serde(default)]
    pub amount: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResult {
    pub status: String,
    pub base: String,
    pub updated: String,
}

impl From<&RateSnapshot> for UpdateResult {
    fn from(snapshot: &RateSnapshot) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            base: snapshot.base.clone(),
            updated: format_timestamp(&snapshot.timestamp),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastUpdateResult {
    pub status: String,
    pub base: String,
    pub timestamp: String,
}

impl From<&RateSnapshot> for LastUpdateResult {
    fn from(snapshot: &RateSnapshot) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            base: snapshot.base.clone(),
            timestamp: format_timestamp(&snapshot.timestamp),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyResult {
    pub status: String,
    pub message: String,
}

impl EmptyResult {
    pub fn no_rates() -> Self {
        Self { status: "empty".to_string(), message: "No rates in database".to_string() }
    }
}

/// Amounts are rendered as plain decimal strings so that no precision is lost on the way to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    pub status: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub result: String,
    pub base: String,
    pub rates_timestamp: String,
}

impl From<Conversion> for ConversionResult {
    fn from(c: Conversion) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            from: c.from,
            to: c.to,
            amount: c.amount.to_string(),
            result: c.result.to_string(),
            base: c.base,
            rates_timestamp: format_timestamp(&c.rates_timestamp),
        }
    }
}
