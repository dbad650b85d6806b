// Shared test helpers: fixture SQLite databases with the stats schema.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

pub const ALL_TABLES: [&str; 8] = [
    "rent_ts",
    "reliability_ts",
    "cost_ts",
    "hardware_ts",
    "avg_ts",
    "eod_snp",
    "disk_snp",
    "cpu_ram_snp",
];

/// Create a fixture database at `path` with the full stats schema (all eight
/// tables plus machine_host_map), empty.
pub async fn create_fixture_db(path: &str) -> SqlitePool {
    create_fixture_db_with_tables(path, &ALL_TABLES).await
}

/// Same, but only the named stats tables — omitting a table lets tests
/// inject a sub-query failure.
pub async fn create_fixture_db_with_tables(path: &str, tables: &[&str]) -> SqlitePool {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{path}"))
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(opts).await.unwrap();
    for table in tables {
        sqlx::query(&format!(
            "CREATE TABLE {table} (machine_id INTEGER NOT NULL, timestamp INTEGER NOT NULL, value REAL)"
        ))
        .execute(&pool)
        .await
        .unwrap();
    }
    sqlx::query(
        "CREATE TABLE machine_host_map (machine_id INTEGER NOT NULL, host_id INTEGER NOT NULL)",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool
}

pub async fn insert_row(pool: &SqlitePool, table: &str, machine_id: i64, timestamp: i64, value: f64) {
    sqlx::query(&format!(
        "INSERT INTO {table} (machine_id, timestamp, value) VALUES (?, ?, ?)"
    ))
    .bind(machine_id)
    .bind(timestamp)
    .bind(value)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_host_mapping(pool: &SqlitePool, machine_id: i64, host_id: i64) {
    sqlx::query("INSERT INTO machine_host_map (machine_id, host_id) VALUES (?, ?)")
        .bind(machine_id)
        .bind(host_id)
        .execute(pool)
        .await
        .unwrap();
}
