//! 任用・給与スプレッドシート変換ツール
//!
//! 変換コアは appointment_common、このクレートはファイル受け付け・
//! .xlsx変換・作業フォルダ管理・CLIを担う

pub mod cli;
pub mod config;
pub mod converter;
pub mod error;
pub mod export;
pub mod intake;
pub mod job;
pub mod workspace;
