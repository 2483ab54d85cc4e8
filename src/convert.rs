//! Decimal conversion between two currencies of a snapshot.
//!
//! Amounts are converted through the snapshot base: `amount / rate_from * rate_to`, then rounded half-up to
//! [`RESULT_DECIMAL_PLACES`] places.
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::{errors::ConversionError, exchange_rate::RateSnapshot};

pub const RESULT_DECIMAL_PLACES: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    /// The input amount with trailing zeros stripped.
    pub amount: Decimal,
    pub result: Decimal,
    pub base: String,
    pub rates_timestamp: DateTime<Utc>,
}

/// Trims and upper-cases a currency code. Empty codes are rejected.
pub fn normalize_currency(code: Option<&str>) -> Option<String> {
    code.map(|c| c.trim().to_uppercase()).filter(|c| !c.is_empty())
}

/// Reads a non-negative amount from a JSON string or number.
pub fn parse_amount(raw: Option<&Value>) -> Result<Decimal, ConversionError> {
    let invalid = || ConversionError::InvalidAmount("Invalid amount.".to_string());
    let text = match raw {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(invalid()),
    };
    let amount = Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)).map_err(|_| invalid())?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ConversionError::InvalidAmount("Amount must be non-negative.".to_string()));
    }
    Ok(amount)
}

/// Converts `amount` of `from` into `to` using the rates in `snapshot`.
///
/// `from` and `to` must already be normalized with [`normalize_currency`].
pub fn convert(snapshot: &RateSnapshot, from: &str, to: &str, amount: Decimal) -> Result<Conversion, ConversionError> {
    let rate_from = snapshot.rate_for(from).ok_or_else(|| ConversionError::UnknownCurrency(from.to_string()))?;
    let rate_to = snapshot.rate_for(to).ok_or_else(|| ConversionError::UnknownCurrency(to.to_string()))?;
    if rate_from.is_zero() {
        return Err(ConversionError::ZeroRate(from.to_string()));
    }

    let too_large = || ConversionError::InvalidAmount("Amount is too large to convert.".to_string());
    let amount_in_base = amount.checked_div(rate_from).ok_or_else(too_large)?;
    let result = amount_in_base
        .checked_mul(rate_to)
        .ok_or_else(too_large)?
        .round_dp_with_strategy(RESULT_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    Ok(Conversion {
        from: from.to_string(),
        to: to.to_string(),
        amount: amount.normalize(),
        result,
        base: snapshot.base.clone(),
        rates_timestamp: snapshot.timestamp,
    })
}
