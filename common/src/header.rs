//! ヘッダー正規化
//!
//! 3行構成のヘッダー（行0: 固定列名 / 行1: 補助科目 / 行2: 勘定科目）を
//! 1行の論理ヘッダーにまとめ、行3以降をデータ行として返す

use crate::error::{Error, Result};
use crate::types::{
    DataRow, LogicalHeader, RawTable, ACCOUNT_ROW, DATA_START_ROW, HEADER_ROW,
    STAFF_NAME_KEY, SUBACCOUNT_ROW,
};

/// 正規化結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub header: LogicalHeader,
    pub rows: Vec<DataRow>,
}

/// 論理ヘッダーの列名だけを計算する
///
/// 行0が空の列は `"{勘定科目}-{補助科目}"`（行2が先、行1が後）。
/// 先頭列は行0の値に関係なく `staff_name`。
pub fn collapse_header(table: &RawTable) -> Result<Vec<String>> {
    validate_shape(table)?;

    let rows = table.rows();
    let header_row = &rows[HEADER_ROW];
    let subaccounts = &rows[SUBACCOUNT_ROW];
    let accounts = &rows[ACCOUNT_ROW];

    let mut names: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(col, value)| {
            if value.is_empty() {
                format!("{}-{}", accounts[col], subaccounts[col])
            } else {
                value.clone()
            }
        })
        .collect();

    names[0] = STAFF_NAME_KEY.to_string();
    Ok(names)
}

/// 表を論理ヘッダーとデータ行に正規化する
pub fn normalize(table: &RawTable) -> Result<NormalizedTable> {
    let header = LogicalHeader::new(collapse_header(table)?);

    let rows = table
        .rows()
        .iter()
        .enumerate()
        .skip(DATA_START_ROW)
        .map(|(index, cells)| {
            let mut row = DataRow::new(index + 1);
            for (column, value) in header.columns().iter().zip(cells) {
                row.insert(column.name.as_str(), value.as_str());
            }
            row
        })
        .collect();

    Ok(NormalizedTable { header, rows })
}

/// 「ヘッダー修正済み」の行列（論理ヘッダー1行 + 元のデータ行）
///
/// `header` は同じ表を `normalize` した結果を渡す
pub fn corrected_rows(header: &LogicalHeader, table: &RawTable) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = vec![header.names().into_iter().map(str::to_string).collect()];
    rows.extend(table.rows().iter().skip(DATA_START_ROW).cloned());
    rows
}

fn validate_shape(table: &RawTable) -> Result<()> {
    if table.len() < DATA_START_ROW {
        return Err(Error::MalformedTable(format!(
            "expected at least {} header rows, found {} rows",
            DATA_START_ROW,
            table.len()
        )));
    }

    let width = table.rows()[HEADER_ROW].len();
    if width == 0 {
        return Err(Error::MalformedTable("header row has no columns".into()));
    }

    for (index, row) in table.rows().iter().enumerate() {
        if row.len() != width {
            return Err(Error::MalformedTable(format!(
                "row {} has {} cells, expected {}",
                index + 1,
                row.len(),
                width
            )));
        }
    }

    Ok(())
}
