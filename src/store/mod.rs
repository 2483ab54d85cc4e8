//! Persistence for the single current [`RateSnapshot`].
pub mod memory;
pub mod postgres;

pub use memory::MemoryRateStore;
pub use postgres::PgRateStore;

use crate::{errors::StoreError, exchange_rate::RateSnapshot};

#[allow(async_fn_in_trait)]
pub trait RateStore: Clone {
    /// Replace the current snapshot with `snapshot`, creating it if none exists yet. Currencies that are not in the
    /// new snapshot are gone afterwards.
    async fn save(&self, snapshot: &RateSnapshot) -> Result<(), StoreError>;
    /// The current snapshot, or `None` if nothing has ever been saved.
    async fn load(&self) -> Result<Option<RateSnapshot>, StoreError>;
}
