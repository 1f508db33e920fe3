//! 表・ヘッダー・出力レコードの型定義
//!
//! - RawTable: 読み込んだままの表（3行ヘッダー + データ行）
//! - LogicalHeader: 3行ヘッダーを1行にまとめた列名と列種別
//! - DataRow: 列名 → 値のマッピング（データ行1行分）
//! - OutputRecord: 配分1件分の出力レコード

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// 先頭列の固定名（行0の値は無視される）
pub const STAFF_NAME_KEY: &str = "staff_name";
pub const TITLE_CODE_KEY: &str = "Title Code";
pub const START_KEY: &str = "Start";
pub const END_KEY: &str = "End";
pub const PAYRATE_KEY: &str = "Payrate";
pub const PI_KEY: &str = "PI";

/// 配分列として扱わない列名
///
/// `"-"` は行1・行2ともに空の列を畳んだ結果
pub const SPECIAL_KEYS: [&str; 7] = [
    STAFF_NAME_KEY,
    TITLE_CODE_KEY,
    START_KEY,
    END_KEY,
    PAYRATE_KEY,
    "-",
    PI_KEY,
];

/// 出力CSVの列順
pub const OUTPUT_FIELDNAMES: [&str; 9] = [
    "Name",
    "PI",
    "Title Code",
    "Dist %",
    "Acct",
    "Subacct",
    "Start",
    "End",
    "Payrate",
];

pub const HEADER_ROW: usize = 0;
pub const SUBACCOUNT_ROW: usize = 1;
pub const ACCOUNT_ROW: usize = 2;
pub const DATA_START_ROW: usize = 3;

/// 読み込んだままの表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// CSVテキストから読み込む
    ///
    /// 行ごとの列数は揃っていなくても読み込む（検証はヘッダー正規化側で行う）。
    /// 空行はCSVリーダーが読み飛ばす。
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 列種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// 氏名・職種コード・期間・給与・PIなど固定の意味を持つ列
    Special,
    /// 勘定科目/補助科目ごとの配分率の列
    Distribution,
}

impl ColumnKind {
    pub fn classify(name: &str) -> Self {
        if SPECIAL_KEYS.contains(&name) {
            ColumnKind::Special
        } else {
            ColumnKind::Distribution
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// 1行にまとめたヘッダー
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalHeader {
    columns: Vec<HeaderColumn>,
}

impl LogicalHeader {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let kind = ColumnKind::classify(&name);
                HeaderColumn { name, kind }
            })
            .collect();
        Self { columns }
    }

    pub fn columns(&self) -> &[HeaderColumn] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// 配分列名（重複は最初の出現位置のみ、列順）
    pub fn distribution_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for column in &self.columns {
            if column.kind == ColumnKind::Distribution && !keys.contains(&column.name.as_str()) {
                keys.push(&column.name);
            }
        }
        keys
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCell {
    pub name: String,
    pub value: String,
}

/// データ行1行分のマッピング
///
/// 同名の列が複数ある場合は右側の値で上書きされ、位置は最初の出現のまま
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRow {
    row_number: usize,
    cells: Vec<DataCell>,
}

impl DataRow {
    /// `row_number` は元の表での1始まりの行番号（エラーメッセージ用）
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: Vec::new(),
        }
    }

    pub fn from_pairs<I, K, V>(row_number: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new(row_number);
        for (name, value) in pairs {
            row.insert(name, value);
        }
        row
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cells.iter_mut().find(|c| c.name == name) {
            Some(cell) => cell.value = value,
            None => self.cells.push(DataCell { name, value }),
        }
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    pub fn cells(&self) -> &[DataCell] {
        &self.cells
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| Error::MissingField {
            field: name.to_string(),
            row: self.row_number,
        })
    }
}

/// 配分1件分の出力レコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    #[serde(rename = "Name")]
    pub name: String,

    /// PI列がない表では None（空セルとして出力）
    #[serde(rename = "PI", default)]
    pub pi: Option<String>,

    #[serde(rename = "Title Code")]
    pub title_code: String,

    #[serde(rename = "Dist %")]
    pub dist_pct: String,

    #[serde(rename = "Acct")]
    pub acct: String,

    #[serde(rename = "Subacct")]
    pub subacct: String,

    #[serde(rename = "Start")]
    pub start: String,

    #[serde(rename = "End")]
    pub end: String,

    #[serde(rename = "Payrate")]
    pub payrate: String,
}

impl OutputRecord {
    /// 出力フィールド名で値を引く
    ///
    /// 未知のフィールド名は `None`、PIが未設定なら `Some(None)`
    pub fn field(&self, name: &str) -> Option<Option<&str>> {
        let value = match name {
            "Name" => Some(self.name.as_str()),
            "PI" => self.pi.as_deref(),
            "Title Code" => Some(self.title_code.as_str()),
            "Dist %" => Some(self.dist_pct.as_str()),
            "Acct" => Some(self.acct.as_str()),
            "Subacct" => Some(self.subacct.as_str()),
            "Start" => Some(self.start.as_str()),
            "End" => Some(self.end.as_str()),
            "Payrate" => Some(self.payrate.as_str()),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_special_keys() {
        for key in SPECIAL_KEYS {
            assert_eq!(ColumnKind::classify(key), ColumnKind::Special, "{}", key);
        }
        assert_eq!(ColumnKind::classify("200-22"), ColumnKind::Distribution);
        // 行0に名前があっても特殊キーでなければ配分列
        assert_eq!(ColumnKind::classify("PayCode"), ColumnKind::Distribution);
    }

    #[test]
    fn test_raw_table_from_csv_reader() {
        let text = "a,b,c\n1,2\n\n\"x,y\",z,\n";
        let table = RawTable::from_csv_reader(text.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0], vec!["a", "b", "c"]);
        assert_eq!(table.rows()[1], vec!["1", "2"]);
        assert_eq!(table.rows()[2], vec!["x,y", "z", ""]);
    }

    #[test]
    fn test_distribution_keys_keep_column_order_and_dedupe() {
        let header = LogicalHeader::new(["staff_name", "300-33", "PI", "100-11", "300-33"]);
        assert_eq!(header.distribution_keys(), vec!["300-33", "100-11"]);
    }

    #[test]
    fn test_data_row_duplicate_name_last_value_wins() {
        let row = DataRow::from_pairs(4, [("staff_name", "A"), ("100-11", "10"), ("100-11", "20")]);
        assert_eq!(row.get("100-11"), Some("20"));
        assert_eq!(row.cells().len(), 2);
    }

    #[test]
    fn test_data_row_require_missing() {
        let row = DataRow::from_pairs(7, [("staff_name", "A")]);
        let err = row.require("Payrate").unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, row: 7 } if field == "Payrate"));
    }

    #[test]
    fn test_output_record_field_lookup() {
        let record = OutputRecord {
            name: "Jane Doe".into(),
            acct: "200".into(),
            ..Default::default()
        };
        assert_eq!(record.field("Name"), Some(Some("Jane Doe")));
        assert_eq!(record.field("Acct"), Some(Some("200")));
        assert_eq!(record.field("PI"), Some(None));
        assert_eq!(record.field("Unknown"), None);
    }
}
