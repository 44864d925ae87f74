use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{BackendKind, Config};

/// PCManFM などが読む freedesktop 形式のサムネイルキャッシュを生成する
#[derive(Debug, Parser)]
#[command(name = "thumbcache-gen", version, about)]
pub struct Cli {
    /// 対象のファイルまたはディレクトリ（ディレクトリは直下のみ）
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// キャッシュのルート（normal / large を含むディレクトリ）
    #[arg(long, env = "THUMBNAIL_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// レンダリングに使うバックエンド
    #[arg(long, value_enum, default_value = "magick")]
    pub backend: BackendKind,

    /// メタデータの書き込みに失敗してもサムネイルを公開する
    #[arg(long)]
    pub commit_unstamped: bool,

    /// 処理結果のレポートをJSONで書き出す
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// ログを詳しくする（-v: info, -vv: debug）
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            cache_root: self
                .cache_dir
                .clone()
                .unwrap_or_else(Config::default_cache_root),
            backend: self.backend,
            commit_unstamped: self.commit_unstamped,
            report_path: self.report.clone(),
        }
    }
}
