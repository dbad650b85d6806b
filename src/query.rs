// Parameterized query construction. Values are always bound, never
// interpolated; only compile-time table names from LogicalTable reach the
// SQL text.

use crate::filter::StatsFilter;
use crate::tables::LogicalTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// machine_id equality plus inclusive timestamp bounds when present.
    Ranged,
    /// machine_id equality only (snapshot tables).
    FullMatch,
    /// machine_id equality, newest row only.
    LatestRow,
}

/// A built query: SQL with `?` placeholders and the values to bind, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub sql: String,
    pub binds: Vec<i64>,
}

impl TableQuery {
    pub fn build(filter: &StatsFilter, table: LogicalTable, mode: QueryMode) -> Self {
        let mut sql = format!("SELECT * FROM {} WHERE machine_id = ?", table.name());
        let mut binds = vec![filter.machine_id];
        match mode {
            QueryMode::Ranged => {
                if let Some(from_ts) = filter.from_ts {
                    sql.push_str(" AND timestamp >= ?");
                    binds.push(from_ts);
                }
                if let Some(to_ts) = filter.to_ts {
                    sql.push_str(" AND timestamp <= ?");
                    binds.push(to_ts);
                }
            }
            QueryMode::FullMatch => {}
            QueryMode::LatestRow => sql.push_str(" ORDER BY timestamp DESC LIMIT 1"),
        }
        Self { sql, binds }
    }

    /// Query for the aggregation path: ranged tables get the filter's bounds,
    /// snapshot tables ignore them.
    pub fn for_table(filter: &StatsFilter, table: LogicalTable) -> Self {
        let mode = if table.is_ranged() {
            QueryMode::Ranged
        } else {
            QueryMode::FullMatch
        };
        Self::build(filter, table, mode)
    }
}
