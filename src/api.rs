//! `RatesApi` ties the rate feed to the snapshot store and is what the HTTP handlers talk to.
use std::fmt::Debug;

use log::*;

use crate::{
    convert::{self, Conversion, normalize_currency, parse_amount},
    data_objects::ConvertRequest,
    errors::{ConversionError, ServerError},
    exchange_rate::RateSnapshot,
    feed::RateFetcher,
    store::RateStore,
};

pub struct RatesApi<S> {
    fetcher: RateFetcher,
    store: S,
}

impl<S> Debug for RatesApi<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RatesApi ({})", self.fetcher.config().url)
    }
}

impl<S> RatesApi<S>
where S: RateStore
{
    pub fn new(fetcher: RateFetcher, store: S) -> Self {
        Self { fetcher, store }
    }

    /// Fetches fresh rates and replaces the stored snapshot with them.
    ///
    /// The feed response is fully validated and re-based before the store is written, so a failed update leaves the
    /// previous snapshot in place.
    pub async fn update_rates(&self) -> Result<RateSnapshot, ServerError> {
        let snapshot = self.fetcher.fetch_and_normalize().await.inspect_err(|e| warn!("Rate update failed. {e}"))?;
        self.store.save(&snapshot).await?;
        info!("Stored {} rates against {}, dated {}", snapshot.rates.len(), snapshot.base, snapshot.timestamp);
        Ok(snapshot)
    }

    pub async fn last_update(&self) -> Result<Option<RateSnapshot>, ServerError> {
        Ok(self.store.load().await?)
    }

    pub async fn convert(&self, request: &ConvertRequest) -> Result<Conversion, ServerError> {
        let from = normalize_currency(request.from.as_deref())
            .or_else(|| normalize_currency(request.from_currency.as_deref()));
        let to =
            normalize_currency(request.to.as_deref()).or_else(|| normalize_currency(request.to_currency.as_deref()));
        let (Some(from), Some(to)) = (from, to) else {
            let msg = "Both 'from' and 'to' currencies are required.";
            return Err(ConversionError::InvalidRequest(msg.to_string()).into());
        };
        let amount = parse_amount(request.amount.as_ref())?;
        let snapshot = self.store.load().await?.ok_or(ConversionError::NoSnapshot)?;
        let conversion = convert::convert(&snapshot, &from, &to, amount)?;
        debug!("Converted {} {from} to {} {to}", conversion.amount, conversion.result);
        Ok(conversion)
    }
}
