//! 変換ジョブの作業フォルダ
//!
//! uploads / transforms / downloads の3フォルダを1つのルートの下に持つ。
//! ルートは呼び出し側から渡す（グローバルなパスは持たない）

use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 生成ファイル名に付けるタイムスタンプ形式
pub const DATE_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone)]
pub struct Workspace {
    pub uploads: PathBuf,
    pub transforms: PathBuf,
    pub downloads: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path) -> Self {
        Self {
            uploads: root.join("uploads"),
            transforms: root.join("transforms"),
            downloads: root.join("downloads"),
        }
    }

    /// 3フォルダを作成する（既存なら何もしない）
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.uploads, &self.transforms, &self.downloads] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// 前回ジョブの中間ファイルと出力を削除
    pub fn purge_outputs(&self) -> Vec<String> {
        let mut messages = clean_folder(&self.transforms);
        messages.extend(clean_folder(&self.downloads));
        messages
    }

    /// アップロードされたファイルを削除
    pub fn purge_uploads(&self) -> Vec<String> {
        clean_folder(&self.uploads)
    }

    pub fn purge_all(&self) -> Vec<String> {
        let mut messages = self.purge_outputs();
        messages.extend(self.purge_uploads());
        messages
    }
}

/// フォルダ直下のファイルを全て削除
///
/// 削除できなかったファイルはメッセージとして返す（エラーにはしない）。
/// サブフォルダは削除対象外なので、同じくメッセージとして返す
pub fn clean_folder(dir: &Path) -> Vec<String> {
    let mut messages = Vec::new();
    if !dir.exists() {
        return messages;
    }

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)  // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_dir() {
            warn!("unable to delete {}: is a directory", path.display());
            messages.push(format!("Unable to delete {}", path.display()));
            continue;
        }

        match std::fs::remove_file(path) {
            Ok(()) => debug!("removed {}", path.display()),
            Err(e) => {
                warn!("unable to delete {}: {}", path.display(), e);
                messages.push(format!("Unable to delete {}", path.display()));
            }
        }
    }

    messages
}

/// `{prefix}_{日時}.{ext}` 形式のファイル名
pub fn timestamped(prefix: &str, ext: &str) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        chrono::Local::now().format(DATE_FORMAT),
        ext
    )
}
