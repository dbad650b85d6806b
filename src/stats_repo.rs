// SQLite stats access. Read-only: the collector that fills the tables is a
// separate process, so there is no schema setup or write path here.
// Uses sqlx for async + connection pooling; every value is bound, never
// interpolated into the SQL text.

use std::time::{Duration, Instant};

use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::str::FromStr;
use tokio::time::timeout;
use tracing::instrument;

use crate::error::ApiError;
use crate::filter::StatsFilter;
use crate::models::StatsBundle;
use crate::query::{QueryMode, TableQuery};
use crate::tables::LogicalTable;

pub struct StatsRepo {
    pool: SqlitePool,
    query_timeout: Duration,
}

impl StatsRepo {
    /// Open a pool on an existing SQLite database. Fails at startup if the
    /// file is missing rather than creating an empty store.
    pub async fn connect(
        path: &str,
        max_pool_size: u32,
        query_timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .busy_timeout(Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_pool_size)
            .connect_with(opts)
            .await?;
        Ok(Self {
            pool,
            query_timeout: Duration::from_millis(query_timeout_ms),
        })
    }

    /// All stats for one machine: the five time-series tables filtered by the
    /// requested range, the three snapshot tables unfiltered. The eight
    /// queries run concurrently (bounded by the pool); assembly order is
    /// fixed by the bundle's fields, so completion order does not matter.
    /// Fail-fast: the first failing sub-query aborts the whole aggregation.
    #[instrument(skip(self), fields(repo = "stats", operation = "get_machine_stats"))]
    pub async fn get_machine_stats(&self, filter: &StatsFilter) -> Result<StatsBundle, ApiError> {
        let (rent_ts, reliability_ts, cost_ts, hardware_ts, avg_ts, eod_snp, disk_snp, cpu_ram_snp) =
            tokio::try_join!(
                self.fetch_table(filter, LogicalTable::Rent),
                self.fetch_table(filter, LogicalTable::Reliability),
                self.fetch_table(filter, LogicalTable::Cost),
                self.fetch_table(filter, LogicalTable::Hardware),
                self.fetch_table(filter, LogicalTable::Average),
                self.fetch_table(filter, LogicalTable::EndOfDay),
                self.fetch_table(filter, LogicalTable::Disk),
                self.fetch_table(filter, LogicalTable::CpuRam),
            )?;
        Ok(StatsBundle {
            rent_ts,
            reliability_ts,
            cost_ts,
            hardware_ts,
            avg_ts,
            eod_snp,
            disk_snp,
            cpu_ram_snp,
        })
    }

    /// Newest row for a machine in one table, or None if the machine has no
    /// rows there. The table name comes from outside and is validated
    /// against the fixed enumeration.
    #[instrument(skip(self), fields(repo = "stats", operation = "get_last_value"))]
    pub async fn get_last_value(
        &self,
        machine_id: i64,
        table_name: &str,
    ) -> Result<Option<Value>, ApiError> {
        let table = LogicalTable::from_name(table_name)?;
        let query = TableQuery::build(
            &StatsFilter::unbounded(machine_id),
            table,
            QueryMode::LatestRow,
        );
        let mut rows = self.run_query(&query, table.name()).await?;
        Ok(rows.pop())
    }

    /// Up to `limit` distinct machine ids, for the /test diagnostic sampler.
    pub async fn sample_machine_ids(&self, limit: u32) -> Result<Vec<i64>, ApiError> {
        let fetch = sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT machine_id FROM machine_host_map ORDER BY RANDOM() LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool);
        let ids = timeout(self.query_timeout, fetch)
            .await
            .map_err(|_| ApiError::QueryTimeout {
                table: "machine_host_map",
            })??;
        Ok(ids)
    }

    async fn fetch_table(
        &self,
        filter: &StatsFilter,
        table: LogicalTable,
    ) -> Result<Vec<Value>, ApiError> {
        let query = TableQuery::for_table(filter, table);
        self.run_query(&query, table.name()).await
    }

    async fn run_query(
        &self,
        query: &TableQuery,
        table: &'static str,
    ) -> Result<Vec<Value>, ApiError> {
        let mut q = sqlx::query(&query.sql);
        for bind in &query.binds {
            q = q.bind(*bind);
        }

        let start = Instant::now();
        let rows = timeout(self.query_timeout, q.fetch_all(&self.pool))
            .await
            .map_err(|_| ApiError::QueryTimeout { table })??;
        tracing::debug!(
            table,
            rows = rows.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "read sql"
        );

        rows.iter().map(row_to_json).collect()
    }
}

/// Decode a row to a JSON object keyed by column name. The tables carry
/// whatever columns the collector wrote, so decoding is driven by the
/// declared SQLite type instead of a compile-time struct.
fn row_to_json(row: &SqliteRow) -> Result<Value, ApiError> {
    let mut obj = serde_json::Map::with_capacity(row.columns().len());
    for (i, col) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => Value::from(row.try_get::<i64, _>(i)?),
                "REAL" => Value::from(row.try_get::<f64, _>(i)?),
                "TEXT" => Value::from(row.try_get::<String, _>(i)?),
                "BLOB" => Value::from(row.try_get::<Vec<u8>, _>(i)?),
                other => {
                    return Err(ApiError::Encoding(format!(
                        "unsupported column type {} for {}",
                        other,
                        col.name()
                    )));
                }
            }
        };
        obj.insert(col.name().to_string(), value);
    }
    Ok(Value::Object(obj))
}
