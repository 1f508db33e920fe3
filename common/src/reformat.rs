//! 変換の統合処理とCSV入出力
//!
//! ヘッダー正規化 → 行ピボット → 固定列順のCSV出力

use crate::error::{Error, Result};
use crate::header::{normalize, NormalizedTable};
use crate::pivot::pivot;
use crate::types::{OutputRecord, RawTable, OUTPUT_FIELDNAMES};
use std::io::{Read, Write};

/// 表全体を出力レコード列に変換する
///
/// 途中でエラーになった場合はレコードを一切返さない
pub fn transform(table: &RawTable) -> Result<Vec<OutputRecord>> {
    pivot_table(&normalize(table)?)
}

/// 正規化済みの全データ行を入力順に展開する
pub fn pivot_table(normalized: &NormalizedTable) -> Result<Vec<OutputRecord>> {
    let mut records = Vec::new();
    for row in &normalized.rows {
        records.extend(pivot(&normalized.header, row)?);
    }
    Ok(records)
}

/// 変換してCSVに書き出す
///
/// 書き出しは変換が全て成功してから行う
pub fn reformat<W: Write>(
    table: &RawTable,
    field_order: &[&str],
    writer: W,
) -> Result<Vec<OutputRecord>> {
    reformat_normalized(&normalize(table)?, field_order, writer)
}

/// 正規化済みの表から `reformat` する（ヘッダー正規化を二重に行わないため）
pub fn reformat_normalized<W: Write>(
    normalized: &NormalizedTable,
    field_order: &[&str],
    writer: W,
) -> Result<Vec<OutputRecord>> {
    let records = pivot_table(normalized)?;
    write_records(&records, field_order, writer)?;
    Ok(records)
}

/// 出力レコードをヘッダー行付きでCSVに書き出す
///
/// 出力フィールドは全て `field_order` に含まれている必要がある。
/// `field_order` 側の未知の列名は空セルになる。
pub fn write_records<W: Write>(
    records: &[OutputRecord],
    field_order: &[&str],
    writer: W,
) -> Result<()> {
    let missing: Vec<&str> = OUTPUT_FIELDNAMES
        .iter()
        .copied()
        .filter(|name| !field_order.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(Error::FieldOrder(format!(
            "fields not in field order: {}",
            missing.join(", ")
        )));
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(field_order)?;

    for record in records {
        let cells = field_order
            .iter()
            .map(|name| record.field(name).flatten().unwrap_or(""));
        wtr.write_record(cells)?;
    }

    wtr.flush()?;
    Ok(())
}

/// 出力CSVを読み戻す（列はヘッダー名で対応付ける）
pub fn read_records<R: Read>(reader: R) -> Result<Vec<OutputRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for record in rdr.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// 行列をそのままCSVに書き出す
pub fn write_rows<W: Write>(rows: &[Vec<String>], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_table() -> RawTable {
        RawTable::from_rows([
            vec!["", "Title Code", "", "Start", "End", "Payrate", "PI"],
            vec!["11", "", "22", "", "", "", ""],
            vec!["100", "", "200", "", "", "", ""],
            vec!["Jane Doe", "T1", "50", "2024-01-01", "2024-06-01", "40.00", "Dr. Smith"],
        ])
    }

    #[test]
    fn test_end_to_end_scenario() {
        let records = transform(&scenario_table()).unwrap();

        assert_eq!(
            records,
            vec![OutputRecord {
                name: "Jane Doe".into(),
                pi: Some("Dr. Smith".into()),
                title_code: "T1".into(),
                dist_pct: "50".into(),
                acct: "200".into(),
                subacct: "22".into(),
                start: "2024-01-01".into(),
                end: "2024-06-01".into(),
                payrate: "40.00".into(),
            }]
        );
    }

    #[test]
    fn test_reformat_writes_header_and_rows() {
        let mut out = Vec::new();
        let records = reformat(&scenario_table(), &OUTPUT_FIELDNAMES, &mut out).unwrap();
        assert_eq!(records.len(), 1);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name,PI,Title Code,Dist %,Acct,Subacct,Start,End,Payrate");
        assert_eq!(lines[1], "Jane Doe,Dr. Smith,T1,50,200,22,2024-01-01,2024-06-01,40.00");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_reformat_no_partial_output_on_error() {
        let table = RawTable::from_rows([
            vec!["", "Title Code", "Start", "End", "Payrate"],
            vec!["", "", "", "", ""],
            vec!["", "", "", "", ""],
            vec!["Jane Doe", "T1", "a", "b", "1"],
            vec!["Bad Row", "T1", "a", "b"],
        ]);
        let mut out = Vec::new();
        let result = reformat(&table, &OUTPUT_FIELDNAMES, &mut out);
        assert!(matches!(result, Err(Error::MalformedTable(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_records_custom_order() {
        let records = transform(&scenario_table()).unwrap();
        let order = ["Acct", "Subacct", "Dist %", "Name", "PI", "Title Code", "Start", "End", "Payrate", "Note"];
        let mut out = Vec::new();
        write_records(&records, &order, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Acct,Subacct,Dist %,Name,PI,Title Code,Start,End,Payrate,Note");
        assert_eq!(lines[1], "200,22,50,Jane Doe,Dr. Smith,T1,2024-01-01,2024-06-01,40.00,");
    }

    #[test]
    fn test_write_records_rejects_incomplete_order() {
        let mut out = Vec::new();
        let err = write_records(&[], &["Name", "PI"], &mut out).unwrap_err();
        match err {
            Error::FieldOrder(msg) => assert!(msg.contains("Payrate")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_serialization_round_trip() {
        let records = vec![
            OutputRecord {
                name: "Doe, Jane".into(),
                pi: Some("Dr. \"Smith\"".into()),
                title_code: "T1".into(),
                dist_pct: "50".into(),
                acct: "200".into(),
                subacct: "22".into(),
                start: "2024-01-01".into(),
                end: "2024-06-01".into(),
                payrate: "40.00".into(),
            },
            OutputRecord {
                name: "John Roe".into(),
                pi: None,
                title_code: "T2".into(),
                dist_pct: "  ".into(),
                acct: "300".into(),
                subacct: "".into(),
                start: "2024-02-01".into(),
                end: "2024-07-01".into(),
                payrate: "35.50".into(),
            },
        ];

        let mut out = Vec::new();
        write_records(&records, &OUTPUT_FIELDNAMES, &mut out).unwrap();
        let parsed = read_records(out.as_slice()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_blank_pi_round_trip() {
        let table = RawTable::from_rows([
            vec!["", "Title Code", "", "Start", "End", "Payrate", "PI"],
            vec!["", "", "22", "", "", "", ""],
            vec!["", "", "200", "", "", "", ""],
            vec!["Jane Doe", "T1", "50", "2024-01-01", "2024-06-01", "40.00", ""],
        ]);

        let mut out = Vec::new();
        let records = reformat(&table, &OUTPUT_FIELDNAMES, &mut out).unwrap();
        assert_eq!(records[0].pi, None);

        let text = String::from_utf8(out.clone()).unwrap();
        assert_eq!(text.lines().nth(1), Some("Jane Doe,,T1,50,200,22,2024-01-01,2024-06-01,40.00"));
        assert_eq!(read_records(out.as_slice()).unwrap(), records);
    }

    #[test]
    fn test_reformat_normalized_matches_reformat() {
        let table = scenario_table();
        let normalized = normalize(&table).unwrap();

        let mut direct = Vec::new();
        let mut from_normalized = Vec::new();
        let a = reformat(&table, &OUTPUT_FIELDNAMES, &mut direct).unwrap();
        let b = reformat_normalized(&normalized, &OUTPUT_FIELDNAMES, &mut from_normalized).unwrap();

        assert_eq!(a, b);
        assert_eq!(direct, from_normalized);
    }

    #[test]
    fn test_write_rows() {
        let rows = vec![
            vec!["staff_name".to_string(), "200-22".to_string()],
            vec!["Jane Doe".to_string(), "50".to_string()],
        ];
        let mut out = Vec::new();
        write_rows(&rows, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "staff_name,200-22\nJane Doe,50\n");
    }
}
