//! Appointment Common Library
//!
//! 任用・給与スプレッドシートの変換コア（I/Oなしの純粋な変換）

pub mod types;
pub mod error;
pub mod header;
pub mod pivot;
pub mod reformat;

pub use types::{
    ColumnKind, DataCell, DataRow, HeaderColumn, LogicalHeader, OutputRecord, RawTable,
    OUTPUT_FIELDNAMES, SPECIAL_KEYS,
};
pub use error::{Error, Result};
pub use header::{collapse_header, corrected_rows, normalize, NormalizedTable};
pub use pivot::{is_blank, pivot, split_column_key};
pub use reformat::{
    pivot_table, read_records, reformat, reformat_normalized, transform, write_records, write_rows,
};
