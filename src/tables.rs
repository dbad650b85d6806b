// Logical stats tables. Fixed set, known at compile time: five time-ranged
// series plus three latest-state snapshots. Snapshot tables never take a
// time predicate no matter what the caller passed.

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalTable {
    Rent,
    Reliability,
    Cost,
    Hardware,
    Average,
    EndOfDay,
    Disk,
    CpuRam,
}

impl LogicalTable {
    /// Tables that accept the filter's time range.
    pub const RANGED: [LogicalTable; 5] = [
        LogicalTable::Rent,
        LogicalTable::Reliability,
        LogicalTable::Cost,
        LogicalTable::Hardware,
        LogicalTable::Average,
    ];

    /// Tables that ignore the time range and return the machine's row set as-is.
    pub const SNAPSHOT: [LogicalTable; 3] = [
        LogicalTable::EndOfDay,
        LogicalTable::Disk,
        LogicalTable::CpuRam,
    ];

    /// Enumeration order. StatsBundle field order must match this.
    pub const ALL: [LogicalTable; 8] = [
        LogicalTable::Rent,
        LogicalTable::Reliability,
        LogicalTable::Cost,
        LogicalTable::Hardware,
        LogicalTable::Average,
        LogicalTable::EndOfDay,
        LogicalTable::Disk,
        LogicalTable::CpuRam,
    ];

    /// SQL table name. Only these names ever reach a query string.
    pub fn name(self) -> &'static str {
        match self {
            LogicalTable::Rent => "rent_ts",
            LogicalTable::Reliability => "reliability_ts",
            LogicalTable::Cost => "cost_ts",
            LogicalTable::Hardware => "hardware_ts",
            LogicalTable::Average => "avg_ts",
            LogicalTable::EndOfDay => "eod_snp",
            LogicalTable::Disk => "disk_snp",
            LogicalTable::CpuRam => "cpu_ram_snp",
        }
    }

    pub fn is_ranged(self) -> bool {
        matches!(
            self,
            LogicalTable::Rent
                | LogicalTable::Reliability
                | LogicalTable::Cost
                | LogicalTable::Hardware
                | LogicalTable::Average
        )
    }

    /// Validate an externally supplied table name against the fixed set.
    pub fn from_name(name: &str) -> Result<Self, ApiError> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| ApiError::InvalidParameter(format!("unknown table: {name}")))
    }
}
