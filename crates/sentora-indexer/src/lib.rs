pub mod subgraph;
pub mod task;

use anyhow::Context;
use chrono::{DateTime, Utc};
use deadpool_diesel::postgres::Pool;
use std::time::Duration;

use sentora_db::SentoraPool;
use sentora_db::models::{NewSnapshot, Snapshot};

use crate::subgraph::{PairDayData, SubgraphClient};

/// Fixed DEX fee tier applied to daily volume to derive fee revenue.
/// The core metrics consume `fees` as data and never assume this rate.
pub const FEE_RATE: f64 = 0.003;

/// How far back the very first run fetches
const BACKFILL_SECS: i64 = 48 * 3600;

/// Periodically pulls daily pair data from the subgraph and appends it to
/// the snapshots table. The only writer of that table.
pub struct IndexerService {
    db_pool: Pool,
    client: SubgraphClient,
    pairs: Vec<String>,
    interval_minutes: u64,
}

impl IndexerService {
    pub const fn new(
        db_pool: Pool,
        client: SubgraphClient,
        pairs: Vec<String>,
        interval_minutes: u64,
    ) -> Self {
        Self {
            db_pool,
            client,
            pairs,
            interval_minutes,
        }
    }

    pub async fn run_forever(&self) -> anyhow::Result<()> {
        let mut first_run = true;
        loop {
            if let Err(e) = self.take_snapshots_for_all_pairs(first_run).await {
                tracing::error!("[IndexerService] 🔴 Snapshot cycle failed: {e}");
            }
            first_run = false;

            tokio::time::sleep(Duration::from_secs(self.interval_minutes * 60)).await;
        }
    }

    async fn take_snapshots_for_all_pairs(&self, first_run: bool) -> anyhow::Result<()> {
        let now = Utc::now().timestamp();

        for pair_address in &self.pairs {
            let mut since = now - BACKFILL_SECS;

            if !first_run {
                if let Some(last) = self.last_snapshot_time(pair_address).await? {
                    since = last.timestamp() + self.interval_minutes as i64 * 60;
                }
            }

            if since >= now {
                tracing::debug!("[IndexerService] ⏭️ No new data expected for {pair_address}");
                continue;
            }

            match self.ingest_pair(pair_address, since).await {
                Ok(0) => {}
                Ok(stored) => {
                    tracing::info!(
                        "[IndexerService] ✅ Stored {stored} snapshot(s) for {pair_address}"
                    );
                }
                Err(e) => {
                    // One failing pair must not starve the others.
                    tracing::error!("[IndexerService] ❌ Snapshot failed for {pair_address}: {e}");
                }
            }
        }

        Ok(())
    }

    async fn ingest_pair(&self, pair_address: &str, since: i64) -> anyhow::Result<usize> {
        let rows = self.client.pair_day_datas(pair_address, since).await?;
        if rows.is_empty() {
            return Ok(0);
        }

        let new_snapshots = rows
            .iter()
            .map(|row| snapshot_from_day_data(pair_address, row))
            .collect::<anyhow::Result<Vec<NewSnapshot>>>()?;

        let stored = self
            .db_pool
            .interact_with_context(
                format!("insert snapshots for pair: {pair_address}"),
                move |conn| Snapshot::insert_ignore_duplicates(&new_snapshots, conn),
            )
            .await?;

        Ok(stored)
    }

    async fn last_snapshot_time(
        &self,
        pair_address: &str,
    ) -> anyhow::Result<Option<DateTime<Utc>>> {
        let pair = pair_address.to_string();
        let latest = self
            .db_pool
            .interact_with_context(
                format!("find latest snapshot for pair: {pair_address}"),
                move |conn| Snapshot::find_latest_for_pair(&pair, conn),
            )
            .await?;

        Ok(latest.map(|snapshot| snapshot.timestamp))
    }
}

/// Turn one subgraph row into an insertable snapshot, deriving the fee
/// revenue from the daily volume.
pub fn snapshot_from_day_data(
    pair_address: &str,
    row: &PairDayData,
) -> anyhow::Result<NewSnapshot> {
    let timestamp = DateTime::from_timestamp(row.date, 0)
        .with_context(|| format!("invalid day-data timestamp: {}", row.date))?;
    let liquidity: f64 = row
        .reserve_usd
        .parse()
        .with_context(|| format!("invalid reserveUSD: {}", row.reserve_usd))?;
    let volume: f64 = row
        .daily_volume_usd
        .parse()
        .with_context(|| format!("invalid dailyVolumeUSD: {}", row.daily_volume_usd))?;

    Ok(NewSnapshot {
        pair_address: pair_address.to_string(),
        timestamp,
        liquidity,
        volume,
        fees: volume * FEE_RATE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_day_data_derives_fees() {
        let row = PairDayData {
            date: 1_721_433_600,
            reserve_usd: "24731904.55".to_string(),
            daily_volume_usd: "1000000".to_string(),
        };

        let snapshot = snapshot_from_day_data("0xpair", &row).unwrap();
        assert_eq!(snapshot.pair_address, "0xpair");
        assert_eq!(snapshot.timestamp.timestamp(), 1_721_433_600);
        assert_eq!(snapshot.liquidity, 24_731_904.55);
        assert_eq!(snapshot.volume, 1_000_000.0);
        assert_eq!(snapshot.fees, 3000.0);
    }

    #[test]
    fn test_snapshot_from_day_data_rejects_bad_numbers() {
        let row = PairDayData {
            date: 1_721_433_600,
            reserve_usd: "not-a-number".to_string(),
            daily_volume_usd: "1".to_string(),
        };
        assert!(snapshot_from_day_data("0xpair", &row).is_err());
    }
}
