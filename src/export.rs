//! 中間CSV・出力CSVの書き出し

use crate::error::Result;
use crate::workspace::timestamped;
use appointment_common::{reformat_normalized, write_rows, NormalizedTable, OutputRecord};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// ヘッダー修正済みCSV（論理ヘッダー + データ行）を transforms に書き出す
pub fn write_corrected_header(rows: &[Vec<String>], transforms_dir: &Path) -> Result<PathBuf> {
    let path = transforms_dir.join(timestamped("corrected_header", "csv"));
    write_atomically(&path, |file| Ok(write_rows(rows, file)?))?;
    debug!("corrected header written to {}", path.display());
    Ok(path)
}

/// 出力先ファイル名（downloads/transformed_{日時}.csv）
pub fn transformed_path(downloads_dir: &Path) -> PathBuf {
    downloads_dir.join(timestamped("transformed", "csv"))
}

/// 正規化済みの表を展開して CSV に書き出す
///
/// 一時ファイルに書いてから置き換えるので、失敗しても途中までのファイルは残らない
pub fn write_transformed(
    normalized: &NormalizedTable,
    field_order: &[&str],
    dest: &Path,
) -> Result<Vec<OutputRecord>> {
    write_atomically(dest, |file| {
        Ok(reformat_normalized(normalized, field_order, file)?)
    })
}

fn write_atomically<T, F>(dest: &Path, write: F) -> Result<T>
where
    F: FnOnce(BufWriter<File>) -> Result<T>,
{
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output.csv".into());
    let tmp = dest.with_file_name(format!(".{}.partial", file_name));

    let file = File::create(&tmp)?;
    let value = match write(BufWriter::new(file)) {
        Ok(value) => value,
        Err(e) => {
            std::fs::remove_file(&tmp).ok();
            return Err(e);
        }
    };

    std::fs::rename(&tmp, dest)?;
    Ok(value)
}
