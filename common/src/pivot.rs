//! 行ピボット
//!
//! 横持ちのデータ行（従業員1人 = 1行、配分列が多数）を
//! 配分1件 = 1レコードの縦持ちに展開する

use crate::error::{Error, Result};
use crate::types::{
    DataRow, LogicalHeader, OutputRecord, END_KEY, PAYRATE_KEY, PI_KEY, STAFF_NAME_KEY, START_KEY,
    TITLE_CODE_KEY,
};

/// 配分値が未使用かどうか
///
/// 空文字と半角スペース1文字のみを空欄とみなす（2文字以上の空白は空欄扱いしない）
pub fn is_blank(value: &str) -> bool {
    value.is_empty() || value == " "
}

/// 配分列名を (勘定科目, 補助科目) に分割する
pub fn split_column_key(key: &str) -> Result<(&str, &str)> {
    let mut parts = key.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(acct), Some(subacct), None) => Ok((acct, subacct)),
        _ => Err(Error::MalformedColumnKey(key.to_string())),
    }
}

/// データ行1行を出力レコードに展開する
///
/// 配分列はヘッダー正規化時に分類済みの `distribution_keys()` を列順に処理する。
/// 必須フィールドはレコードを出力するときに初めて参照するので、
/// 配分が全て空欄の行はフィールド欠落でもエラーにならない。
/// PIが空欄の場合は列がないときと同じく `None`。
pub fn pivot(header: &LogicalHeader, row: &DataRow) -> Result<Vec<OutputRecord>> {
    let mut records = Vec::new();

    for key in header.distribution_keys() {
        let value = match row.get(key) {
            Some(value) if !is_blank(value) => value,
            _ => continue,
        };

        let (acct, subacct) = split_column_key(key)?;

        records.push(OutputRecord {
            name: row.require(STAFF_NAME_KEY)?.to_string(),
            pi: row
                .get(PI_KEY)
                .filter(|pi| !pi.is_empty())
                .map(str::to_string),
            title_code: row.require(TITLE_CODE_KEY)?.to_string(),
            dist_pct: value.to_string(),
            acct: acct.to_string(),
            subacct: subacct.to_string(),
            start: row.require(START_KEY)?.to_string(),
            end: row.require(END_KEY)?.to_string(),
            payrate: row.require(PAYRATE_KEY)?.to_string(),
        });
    }

    Ok(records)
}
