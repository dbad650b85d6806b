// Response models

use serde::Serialize;
use serde_json::Value;

/// One JSON array of rows per logical table. Field order matches
/// LogicalTable::ALL and fixes the serialized key order; the struct shape
/// guarantees exactly one entry per table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsBundle {
    pub rent_ts: Vec<Value>,
    pub reliability_ts: Vec<Value>,
    pub cost_ts: Vec<Value>,
    pub hardware_ts: Vec<Value>,
    pub avg_ts: Vec<Value>,
    pub eod_snp: Vec<Value>,
    pub disk_snp: Vec<Value>,
    pub cpu_ram_snp: Vec<Value>,
}
