use std::{collections::HashMap, fmt::Debug};

use chrono::{DateTime, Utc};
use log::*;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions, types::Json};

use super::RateStore;
use crate::{errors::StoreError, exchange_rate::RateSnapshot};

/// Primary key of the one and only snapshot row.
const SNAPSHOT_ID: i16 = 1;

#[derive(Clone)]
pub struct PgRateStore {
    pool: PgPool,
}

impl Debug for PgRateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PgRateStore ({:?})", self.pool)
    }
}

#[derive(FromRow)]
struct SnapshotRow {
    base: String,
    rates: Json<HashMap<String, Decimal>>,
    fetched_at: DateTime<Utc>,
}

impl From<SnapshotRow> for RateSnapshot {
    fn from(row: SnapshotRow) -> Self {
        RateSnapshot::new(&row.base, row.rates.0, row.fetched_at)
    }
}

impl PgRateStore {
    /// Connects to `url` and brings the schema up to date.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(url).await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(format!("Could not run migrations. {e}")))?;
        info!("Connected to the rates database");
        Ok(Self { pool })
    }
}

impl RateStore for PgRateStore {
    async fn save(&self, snapshot: &RateSnapshot) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO rate_snapshot (id, base, rates, fetched_at) VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET base = EXCLUDED.base, rates = EXCLUDED.rates, fetched_at = EXCLUDED.fetched_at"#,
        )
        .bind(SNAPSHOT_ID)
        .bind(&snapshot.base)
        .bind(Json(&snapshot.rates))
        .bind(snapshot.timestamp)
        .execute(&self.pool)
        .await?;
        debug!("Saved {} snapshot with {} rates", snapshot.base, snapshot.rates.len());
        Ok(())
    }

    async fn load(&self) -> Result<Option<RateSnapshot>, StoreError> {
        let row = sqlx::query_as::<_, SnapshotRow>("SELECT base, rates, fetched_at FROM rate_snapshot WHERE id = $1")
            .bind(SNAPSHOT_ID)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(RateSnapshot::from))
    }
}
