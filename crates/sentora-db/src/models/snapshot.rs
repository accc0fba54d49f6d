use chrono::{DateTime, Utc};
use diesel::dsl::{count, max, min};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::schema::snapshots;

/// One observation of a trading pair pulled from the upstream subgraph.
/// Rows are append-only; the ingestion job is the only writer.
#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, ToSchema)]
#[diesel(table_name = snapshots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Snapshot {
    pub id: i32,
    pub pair_address: String,
    pub timestamp: DateTime<Utc>,
    pub liquidity: f64,
    pub volume: f64,
    pub fees: f64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Insertable)]
#[diesel(table_name = snapshots)]
pub struct NewSnapshot {
    pub pair_address: String,
    pub timestamp: DateTime<Utc>,
    pub liquidity: f64,
    pub volume: f64,
    pub fees: f64,
}

/// Per-pair aggregate used by the pairs listing endpoint
pub type PairSummaryRow = (String, i64, Option<DateTime<Utc>>, Option<DateTime<Utc>>);

impl Snapshot {
    /// Latest snapshots across all pairs, newest first
    pub fn find_latest(limit: i64, conn: &mut diesel::PgConnection) -> QueryResult<Vec<Self>> {
        snapshots::table
            .order(snapshots::timestamp.desc())
            .limit(limit)
            .load(conn)
    }

    /// Snapshots filtered by pair and/or date bounds, newest first
    pub fn find_filtered(
        pair_address: Option<&str>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = snapshots::table.into_boxed();

        if let Some(pair) = pair_address {
            query = query.filter(snapshots::pair_address.eq(pair.to_owned()));
        }
        if let Some(from) = from {
            query = query.filter(snapshots::timestamp.ge(from));
        }
        if let Some(to) = to {
            query = query.filter(snapshots::timestamp.le(to));
        }

        query
            .order(snapshots::timestamp.desc())
            .limit(limit)
            .load(conn)
    }

    /// Snapshots for a set of pairs inside a time window, oldest first.
    /// This is the input shape the APR and chart computations expect.
    pub fn find_range_asc(
        pair_addresses: &[String],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        snapshots::table
            .filter(snapshots::pair_address.eq_any(pair_addresses))
            .filter(snapshots::timestamp.ge(from))
            .filter(snapshots::timestamp.le(to))
            .order(snapshots::timestamp.asc())
            .load(conn)
    }

    /// Snapshots for one pair inside optional bounds, oldest first
    pub fn find_for_pair_asc(
        pair_address: &str,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        let mut query = snapshots::table
            .filter(snapshots::pair_address.eq(pair_address.to_owned()))
            .into_boxed();

        if let Some(from) = from {
            query = query.filter(snapshots::timestamp.ge(from));
        }
        if let Some(to) = to {
            query = query.filter(snapshots::timestamp.le(to));
        }

        query
            .order(snapshots::timestamp.asc())
            .limit(limit)
            .load(conn)
    }

    /// Latest snapshots across a set of pairs, newest first
    pub fn find_latest_for_pairs(
        pair_addresses: &[String],
        limit: i64,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Vec<Self>> {
        snapshots::table
            .filter(snapshots::pair_address.eq_any(pair_addresses))
            .order(snapshots::timestamp.desc())
            .limit(limit)
            .load(conn)
    }

    /// Most recent snapshot of a pair, if any
    pub fn find_latest_for_pair(
        pair_address: &str,
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Option<Self>> {
        snapshots::table
            .filter(snapshots::pair_address.eq(pair_address))
            .order(snapshots::timestamp.desc())
            .first(conn)
            .optional()
    }

    /// Bulk insert, silently skipping rows that collide with the unique
    /// `(pair_address, timestamp)` index. Returns the number of new rows.
    pub fn insert_ignore_duplicates(
        rows: &[NewSnapshot],
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<usize> {
        diesel::insert_into(snapshots::table)
            .values(rows)
            .on_conflict_do_nothing()
            .execute(conn)
    }

    pub fn count_all(conn: &mut diesel::PgConnection) -> QueryResult<i64> {
        snapshots::table.count().get_result(conn)
    }

    pub fn latest_timestamp(
        conn: &mut diesel::PgConnection,
    ) -> QueryResult<Option<DateTime<Utc>>> {
        snapshots::table
            .select(max(snapshots::timestamp))
            .get_result(conn)
    }

    /// Per-pair snapshot counts and first/last observation times, most
    /// active pairs first
    pub fn pair_summaries(conn: &mut diesel::PgConnection) -> QueryResult<Vec<PairSummaryRow>> {
        snapshots::table
            .group_by(snapshots::pair_address)
            .select((
                snapshots::pair_address,
                count(snapshots::id),
                min(snapshots::timestamp),
                max(snapshots::timestamp),
            ))
            .order(count(snapshots::id).desc())
            .load(conn)
    }
}
