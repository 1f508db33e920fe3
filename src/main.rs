use anyhow::Context;
use appointment_common::{normalize, ColumnKind};
use appointment_reformat::{cli, config, converter, job, workspace};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};
use workspace::Workspace;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗")?;

    match cli.command {
        Commands::Convert { input, output, workspace, sheet, backend } => {
            println!("📄 appointment-reformat - 配分CSV変換\n");

            let mut config = config;
            if sheet.is_some() {
                config.sheet = sheet;
            }
            if let Some(backend) = backend {
                config.xlsx_backend = backend;
            }

            let workspace = Workspace::new(&config.workspace_root(workspace));

            println!("[1/2] 変換中... ({})", input.display());
            match job::reformat_file(&input, &workspace, &config, output.as_deref()) {
                Ok(report) => {
                    println!("✔ {}行 → {}件の配分レコード\n", report.data_rows, report.records);
                    println!("[2/2] 出力: {}", report.output_path.display());
                    println!("\n✅ 変換完了");
                }
                Err(e) => {
                    error!("{}", e);
                    eprintln!("✖ {}", e.user_message());
                    std::process::exit(1);
                }
            }
        }

        Commands::Header { input, sheet } => {
            let mut config = config;
            if sheet.is_some() {
                config.sheet = sheet;
            }

            // 外部変換コマンドの中間ファイル置き場（スコープを抜けると削除）
            let scratch = tempfile::tempdir()?;
            let table = converter::load_raw_table(&input, &config, scratch.path())
                .with_context(|| format!("{} を読み込めません", input.display()))?;
            let normalized = normalize(&table)?;

            println!("ヘッダー ({}列, データ{}行):", normalized.header.len(), normalized.rows.len());
            for (index, column) in normalized.header.columns().iter().enumerate() {
                let kind = match column.kind {
                    ColumnKind::Special => "固定",
                    ColumnKind::Distribution => "配分",
                };
                println!("  {:>3}  {}  {}", index + 1, kind, column.name);
            }
        }

        Commands::Clean { workspace } => {
            let workspace = Workspace::new(&config.workspace_root(workspace));
            let messages = workspace.purge_all();
            if messages.is_empty() {
                println!("✔ 作業フォルダを削除しました");
            } else {
                for message in &messages {
                    println!("  {}", message);
                }
            }
        }

        Commands::Config { set_workspace, set_converter, backend, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(dir) = set_workspace {
                config.workspace_dir = Some(dir);
                changed = true;
            }
            if let Some(command) = set_converter {
                config.converter_command = command;
                changed = true;
            }
            if let Some(backend) = backend {
                config.xlsx_backend = backend;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  作業フォルダ: {}", config.workspace_root(None).display());
                println!("  .xlsx変換: {}", config.xlsx_backend);
                println!("  変換コマンド: {} {}", config.converter_command, config.converter_args.join(" "));
                println!("  シート: {}", config.sheet.as_deref().unwrap_or("(先頭)"));
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

