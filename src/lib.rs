pub mod batch;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod image_utils;
pub mod pipeline;
pub mod progress;
pub mod targets;
pub mod thumbnail;
pub mod types;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use batch::run_batch;
use cache::ThumbnailCache;
use cli::Cli;
use config::Config;
use error::ThumbnailResult;
use pipeline::Thumbnailer;
use progress::ZenityProgress;
use targets::expand_targets;
use thumbnail::check_dependencies;
use types::BatchReport;

// 依存ツールを確認してからキャッシュディレクトリを作成する
// 依存が欠けていれば何も書き込まずにエラーを返す
pub fn prepare(config: &Config) -> ThumbnailResult<Thumbnailer> {
    let backend = config.backend.build();
    check_dependencies(backend.as_ref())?;

    let cache = ThumbnailCache::new(&config.cache_root);
    cache.ensure_dirs()?;

    info!(
        backend = backend.name(),
        cache_dir = %cache.cache_dir.display(),
        "サムネイル生成準備完了"
    );
    Ok(Thumbnailer::new(cache, backend, config.commit_unstamped))
}

fn write_report(path: &Path, report: &BatchReport) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("レポートを作成できません: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("レポート書き込みエラー: {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 標準出力は進捗表示に使うのでログは標準エラーへ
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config();
    let thumbnailer = prepare(&config)?;

    let targets = expand_targets(&cli.paths);
    if targets.is_empty() {
        println!("処理対象のファイルが見つかりません。");
        return Ok(());
    }

    let mut progress = ZenityProgress::stdout();
    let report = run_batch(&thumbnailer, &targets, &mut progress);

    if let Some(path) = &config.report_path {
        write_report(path, &report)?;
    }
    Ok(())
}

pub fn run() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = execute(cli) {
        eprintln!("エラー: {:#}", e);
        std::process::exit(1);
    }
}
