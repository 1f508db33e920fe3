use crate::converter::ConversionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReformatError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ファイルが選択されていません")]
    NoSelectedFile,

    #[error("許可されていない拡張子です: {0}（.xlsx / .csv のみ）")]
    ExtensionNotAllowed(String),

    #[error("CSV変換エラー: {0}")]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Common(#[from] appointment_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl ReformatError {
    /// 利用者向けのメッセージ（内部パスを含めない）
    pub fn user_message(&self) -> String {
        match self {
            ReformatError::Conversion(_) => "Unable to Convert to CSV!".into(),
            ReformatError::ExtensionNotAllowed(_) => "File Extension not allowed!".into(),
            ReformatError::NoSelectedFile => "No selected file".into(),
            ReformatError::FileNotFound(_) => "File not found".into(),
            ReformatError::Common(e) => format!("Unable to reformat spreadsheet: {}", e),
            ReformatError::Config(_) | ReformatError::JsonParse(_) => {
                "Configuration could not be loaded".into()
            }
            ReformatError::Io(_) => "Unable to read or write files".into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReformatError>;
