//! calamine による .xlsx 読み込み

use super::ConversionError;
use appointment_common::RawTable;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, TimeDelta, Timelike};
use std::path::Path;
use tracing::debug;

/// ワークブックの1シートを文字列の行列として読み込む
///
/// シート名省略時は先頭シート。ヘッダー行の位置がずれないよう、
/// 使用範囲がA1から始まっていなくてもA1起点で埋める
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable, ConversionError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ConversionError::Workbook(e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => {
            if !workbook.sheet_names().iter().any(|s| s == name) {
                return Err(ConversionError::SheetNotFound(name.to_string()));
            }
            name.to_string()
        }
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ConversionError::EmptyWorkbook)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ConversionError::Workbook(e.to_string()))?;

    let (start, end) = match (range.start(), range.end()) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ConversionError::EmptyWorkbook),
    };
    debug!("sheet {:?}: {:?}..{:?}", sheet_name, start, end);

    let width = end.1 as usize + 1;
    let leading_cols = start.1 as usize;

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(end.0 as usize + 1);
    for _ in 0..start.0 {
        rows.push(vec![String::new(); width]);
    }
    for cells in range.rows() {
        let mut row = vec![String::new(); leading_cols];
        row.extend(cells.iter().map(cell_to_string));
        rows.push(row);
    }

    Ok(RawTable::from_rows(rows))
}

/// セル値をCSV出力と同じ表記の文字列にする
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => if *b { "TRUE".into() } else { "FALSE".into() },
        Data::DateTime(dt) => excel_serial_to_string(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

/// Excelのシリアル日付（1900年方式）を日付文字列にする
///
/// 時刻が 00:00:00 なら日付のみ
fn excel_serial_to_string(serial: f64) -> String {
    let seconds = (serial * 86_400.0).round() as i64;
    let datetime = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .zip(TimeDelta::try_seconds(seconds))
        .and_then(|(base, delta)| base.checked_add_signed(delta));

    match datetime {
        Some(dt) if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 => {
            dt.format("%Y-%m-%d").to_string()
        }
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => serial.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("Jane Doe".into())), "Jane Doe");
        assert_eq!(cell_to_string(&Data::Int(200)), "200");
        assert_eq!(cell_to_string(&Data::Float(50.0)), "50");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
    }

    #[test]
    fn test_excel_serial_dates() {
        assert_eq!(excel_serial_to_string(45292.0), "2024-01-01");
        assert_eq!(excel_serial_to_string(45292.5), "2024-01-01 12:00:00");
    }

    #[test]
    fn test_missing_workbook() {
        let result = read_workbook(Path::new("/nonexistent/book.xlsx"), None);
        assert!(matches!(result, Err(ConversionError::Workbook(_))));
    }
}
