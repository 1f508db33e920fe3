//! 入力ファイルの受け付け
//!
//! 拡張子チェック・ファイル名の無害化・作業フォルダへのコピー

use crate::error::{ReformatError, Result};
use crate::workspace::Workspace;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "csv"];

/// 入力ファイル形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "csv" => Some(SourceFormat::Csv),
            "xlsx" => Some(SourceFormat::Xlsx),
            _ => None,
        }
    }
}

/// 許可された拡張子か（大文字小文字は区別しない）
pub fn allowed_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// ファイル名を保存用に無害化する
///
/// パス区切りと空白は `_` にまとめ、ASCII英数字と `_.-` 以外は除去、
/// 先頭・末尾の `.` `_` を取り除く
pub fn secure_filename(file_name: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_.-]").unwrap();
    }

    let spaced = file_name.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    UNSAFE_CHARS
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// 入力ファイルを検証して uploads にコピーする
pub fn stage_upload(source: &Path, workspace: &Workspace) -> Result<PathBuf> {
    let original_name = source
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if original_name.is_empty() {
        return Err(ReformatError::NoSelectedFile);
    }

    if !allowed_file(&original_name) {
        return Err(ReformatError::ExtensionNotAllowed(original_name));
    }

    if !source.is_file() {
        return Err(ReformatError::FileNotFound(source.display().to_string()));
    }

    // ASCII以外だけの名前は拡張子ごと消えるので固定名にする
    let mut safe_name = secure_filename(&original_name);
    if !allowed_file(&safe_name) {
        let ext = source
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        safe_name = format!("upload.{}", ext);
    }

    let staged = workspace.uploads.join(&safe_name);
    // uploads 内のファイルをそのまま渡された場合は自分自身へのコピーになる
    if staged.canonicalize().ok() != Some(source.canonicalize()?) {
        std::fs::copy(source, &staged)?;
    }
    debug!("staged {} as {}", source.display(), staged.display());

    Ok(staged)
}
