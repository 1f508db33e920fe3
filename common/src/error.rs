//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// どのエラーも変換ジョブ全体を中断する（部分出力なし）
#[derive(Error, Debug)]
pub enum Error {
    /// 行数・列数の不整合
    #[error("Malformed table: {0}")]
    MalformedTable(String),

    /// 配分列名にハイフンがちょうど1つ含まれていない
    #[error("Malformed column key: {0:?} (expected exactly one '-')")]
    MalformedColumnKey(String),

    /// 必須フィールドがデータ行に存在しない
    #[error("Missing field {field:?} in data row {row}")]
    MissingField { field: String, row: usize },

    /// 出力フィールド順に含まれないフィールドがある
    #[error("Field order error: {0}")]
    FieldOrder(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
