use crate::config::XlsxBackend;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "appointment-reformat")]
#[command(about = "任用・給与スプレッドシートを配分行CSVに変換するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スプレッドシート(.xlsx/.csv)を配分行CSVに変換
    Convert {
        /// 入力ファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力CSV（デフォルト: 作業フォルダ/downloads/transformed_{日時}.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 作業フォルダ
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// 読み込むシート名（.xlsx、省略時は先頭シート）
        #[arg(long)]
        sheet: Option<String>,

        /// .xlsx 変換方法 (builtin/external)
        #[arg(long)]
        backend: Option<XlsxBackend>,
    },

    /// 正規化したヘッダーを表示
    Header {
        /// 入力ファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 読み込むシート名
        #[arg(long)]
        sheet: Option<String>,
    },

    /// 作業フォルダの一時ファイルを削除
    Clean {
        /// 作業フォルダ
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 作業フォルダを設定
        #[arg(long)]
        set_workspace: Option<PathBuf>,

        /// 外部変換コマンドを設定
        #[arg(long)]
        set_converter: Option<String>,

        /// .xlsx 変換方法を設定 (builtin/external)
        #[arg(long)]
        backend: Option<XlsxBackend>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from([
            "appointment-reformat",
            "convert",
            "payroll.xlsx",
            "-o",
            "out.csv",
            "--backend",
            "external",
        ]);
        match cli.command {
            Commands::Convert { input, output, backend, .. } => {
                assert_eq!(input, PathBuf::from("payroll.xlsx"));
                assert_eq!(output, Some(PathBuf::from("out.csv")));
                assert_eq!(backend, Some(XlsxBackend::External));
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["appointment-reformat", "clean", "-v"]);
        assert!(cli.verbose);
    }
}
