use crate::error::{ReformatError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 作業フォルダを上書きする環境変数
pub const WORKSPACE_ENV: &str = "APPOINTMENT_REFORMAT_WORKSPACE";

const DEFAULT_WORKSPACE: &str = "appointment-workspace";
const DEFAULT_CONVERTER: &str = "xlsx2csv";

/// .xlsx を行データにする方法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XlsxBackend {
    /// calamineでプロセス内読み込み
    #[default]
    Builtin,
    /// 外部コマンド（xlsx2csv等）でCSVに変換
    External,
}

impl std::str::FromStr for XlsxBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "builtin" | "calamine" => Ok(XlsxBackend::Builtin),
            "external" | "xlsx2csv" => Ok(XlsxBackend::External),
            _ => Err(format!("Unknown backend: {}. Use builtin or external", s)),
        }
    }
}

impl std::fmt::Display for XlsxBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XlsxBackend::Builtin => write!(f, "builtin"),
            XlsxBackend::External => write!(f, "external"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workspace_dir: Option<PathBuf>,
    pub xlsx_backend: XlsxBackend,
    pub converter_command: String,
    /// 入力パス・出力パスの前に渡す追加引数
    pub converter_args: Vec<String>,
    /// 読み込むシート名（省略時は先頭シート）
    pub sheet: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_dir: None,
            xlsx_backend: XlsxBackend::Builtin,
            converter_command: DEFAULT_CONVERTER.into(),
            converter_args: Vec::new(),
            sheet: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReformatError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home
            .join(".config")
            .join("appointment-reformat")
            .join("config.json"))
    }

    /// 作業フォルダのルート
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル > ./appointment-workspace
    pub fn workspace_root(&self, overridden: Option<PathBuf>) -> PathBuf {
        if let Some(dir) = overridden {
            return dir;
        }
        if let Ok(dir) = std::env::var(WORKSPACE_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        self.workspace_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKSPACE))
    }
}
