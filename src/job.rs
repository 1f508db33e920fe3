//! 変換ジョブ全体の流れ
//!
//! 前回出力の削除 → 受け付け → 行データ化 → ヘッダー修正 → ピボット → 出力 → アップロード削除

use crate::config::Config;
use crate::converter::load_raw_table;
use crate::error::Result;
use crate::export::{transformed_path, write_corrected_header, write_transformed};
use crate::intake::stage_upload;
use crate::workspace::Workspace;
use appointment_common::{corrected_rows, normalize, OUTPUT_FIELDNAMES};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 変換ジョブの結果
#[derive(Debug, Clone)]
pub struct JobReport {
    pub output_path: PathBuf,
    pub data_rows: usize,
    pub records: usize,
    /// 削除できなかった一時ファイル
    pub cleanup_messages: Vec<String>,
}

/// 1ファイルを変換する
///
/// `output` を省略した場合は downloads/transformed_{日時}.csv に書き出す
pub fn reformat_file(
    input: &Path,
    workspace: &Workspace,
    config: &Config,
    output: Option<&Path>,
) -> Result<JobReport> {
    workspace.ensure()?;
    let mut cleanup_messages = workspace.purge_outputs();

    let result = run(input, workspace, config, output);

    cleanup_messages.extend(workspace.purge_uploads());
    for message in &cleanup_messages {
        warn!("{}", message);
    }

    let (output_path, data_rows, records) = result?;
    Ok(JobReport {
        output_path,
        data_rows,
        records,
        cleanup_messages,
    })
}

fn run(
    input: &Path,
    workspace: &Workspace,
    config: &Config,
    output: Option<&Path>,
) -> Result<(PathBuf, usize, usize)> {
    let staged = stage_upload(input, workspace)?;
    info!("staged upload {}", staged.display());

    let table = load_raw_table(&staged, config, &workspace.transforms)?;

    let normalized = normalize(&table)?;
    write_corrected_header(&corrected_rows(&normalized.header, &table), &workspace.transforms)?;
    let data_rows = normalized.rows.len();

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => transformed_path(&workspace.downloads),
    };
    let records = write_transformed(&normalized, &OUTPUT_FIELDNAMES, &output_path)?;
    info!("{} data rows -> {} distribution records", data_rows, records.len());

    Ok((output_path, data_rows, records.len()))
}
