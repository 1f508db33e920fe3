//! スプレッドシート → 行データ変換
//!
//! .csv はそのまま読み込み、.xlsx は設定に応じて calamine か外部コマンドで変換する。
//! 変換の失敗は `ConversionError` として返す

mod external;
mod xlsx;

pub use external::run_converter;
pub use xlsx::{cell_to_string, read_workbook};

use crate::config::{Config, XlsxBackend};
use crate::error::{ReformatError, Result};
use crate::intake::SourceFormat;
use crate::workspace::timestamped;
use appointment_common::RawTable;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// .xlsx 変換の失敗
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("変換コマンドを起動できません: {0}")]
    ToolSpawn(String),

    #[error("変換コマンドが失敗しました (code {code:?}): {stderr}")]
    ToolFailed { code: Option<i32>, stderr: String },

    #[error("ワークブックを読み込めません: {0}")]
    Workbook(String),

    #[error("シートが見つかりません: {0}")]
    SheetNotFound(String),

    #[error("ワークブックが空です")]
    EmptyWorkbook,
}

/// 入力ファイルを RawTable として読み込む
///
/// 外部コマンドを使う場合の中間CSVは `transforms_dir` に書き出す
pub fn load_raw_table(path: &Path, config: &Config, transforms_dir: &Path) -> Result<RawTable> {
    let format = SourceFormat::from_path(path).ok_or_else(|| {
        ReformatError::ExtensionNotAllowed(path.display().to_string())
    })?;

    let table = match format {
        SourceFormat::Csv => read_csv_file(path)?,
        SourceFormat::Xlsx => match config.xlsx_backend {
            XlsxBackend::Builtin => {
                info!("reading workbook with calamine");
                read_workbook(path, config.sheet.as_deref())?
            }
            XlsxBackend::External => {
                let converted = transforms_dir.join(timestamped("xlsx_converted", "csv"));
                info!("converting workbook with {}", config.converter_command);
                run_converter(&config.converter_command, &config.converter_args, path, &converted)?;
                read_csv_file(&converted)?
            }
        },
    };

    debug!("loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

fn read_csv_file(path: &Path) -> Result<RawTable> {
    let file = File::open(path)?;
    Ok(RawTable::from_csv_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let table = load_raw_table(&path, &Config::default(), dir.path()).unwrap();
        assert_eq!(table.rows(), &[vec!["a".to_string(), "b".to_string()], vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn test_load_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_raw_table(&dir.path().join("sheet.ods"), &Config::default(), dir.path())
            .unwrap_err();
        assert!(matches!(err, ReformatError::ExtensionNotAllowed(_)));
    }

    #[test]
    fn test_conversion_error_display() {
        let err = ConversionError::ToolFailed {
            code: Some(2),
            stderr: "bad zip".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("Some(2)"));
        assert!(display.contains("bad zip"));
    }
}
