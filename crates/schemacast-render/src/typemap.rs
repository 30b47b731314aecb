//! Native SQL Server type to pipeline type mapping.
//!
//! Matching is case-sensitive against the lowercase names the catalog
//! reports. Anything not listed maps to the generic `string` type on both
//! sides.

use std::fmt;

/// Column type used by the extraction (Embulk input) stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionType {
    /// 64-bit integer.
    Long,
    Timestamp,
    String,
}

impl ExtractionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionType::Long => "long",
            ExtractionType::Timestamp => "timestamp",
            ExtractionType::String => "string",
        }
    }
}

impl fmt::Display for ExtractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column type used by the warehouse (BigQuery output) stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarehouseType {
    Integer,
    /// `DATETIME` parsed with the given strftime format.
    Datetime(&'static str),
    Timestamp,
    String,
}

impl WarehouseType {
    pub fn name(self) -> &'static str {
        match self {
            WarehouseType::Integer => "INTEGER",
            WarehouseType::Datetime(_) => "DATETIME",
            WarehouseType::Timestamp => "timestamp",
            WarehouseType::String => "string",
        }
    }

    pub fn format(self) -> Option<&'static str> {
        match self {
            WarehouseType::Datetime(format) => Some(format),
            _ => None,
        }
    }
}

const EXTRACTION_TYPES: &[(&str, ExtractionType)] = &[
    ("int", ExtractionType::Long),
    ("smallint", ExtractionType::Long),
    ("bigint", ExtractionType::Long),
    ("date", ExtractionType::Timestamp),
    ("time", ExtractionType::Timestamp),
    ("datetime", ExtractionType::Timestamp),
    ("timestamp", ExtractionType::Timestamp),
];

const WAREHOUSE_TYPES: &[(&str, WarehouseType)] = &[
    ("int", WarehouseType::Integer),
    ("smallint", WarehouseType::Integer),
    ("bigint", WarehouseType::Integer),
    ("date", WarehouseType::Datetime("%Y-%m-%d")),
    ("time", WarehouseType::Datetime("%H:%M:%S")),
    ("datetime", WarehouseType::Datetime("%Y-%m-%d %H:%M:%S")),
    ("timestamp", WarehouseType::Timestamp),
];

/// Map a native type to its extraction type.
pub fn extraction_type(native_type: &str) -> ExtractionType {
    EXTRACTION_TYPES
        .iter()
        .find(|(native, _)| *native == native_type)
        .map(|(_, mapped)| *mapped)
        .unwrap_or(ExtractionType::String)
}

/// Map a native type to its warehouse type and optional format.
pub fn warehouse_type(native_type: &str) -> WarehouseType {
    WAREHOUSE_TYPES
        .iter()
        .find(|(native, _)| *native == native_type)
        .map(|(_, mapped)| *mapped)
        .unwrap_or(WarehouseType::String)
}
