use std::path::PathBuf;

use clap::ValueEnum;

use crate::thumbnail::{MagickBackend, NativeBackend, ThumbnailBackend};

/// 使用するバックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackendKind {
    /// ffmpeg + ImageMagick（convert / mogrify）
    #[default]
    Magick,
    /// ffmpeg + 組み込みの画像処理
    Native,
}

impl BackendKind {
    pub fn build(self) -> Box<dyn ThumbnailBackend> {
        match self {
            Self::Magick => Box::new(MagickBackend::new()),
            Self::Native => Box::new(NativeBackend::new()),
        }
    }
}

// 実行設定（キャッシュの場所はここで明示的に渡す）
#[derive(Debug, Clone)]
pub struct Config {
    /// normal / large を含むキャッシュのルート
    pub cache_root: PathBuf,
    pub backend: BackendKind,
    /// メタデータ書き込みに失敗しても公開する
    pub commit_unstamped: bool,
    /// バッチレポート(JSON)の出力先
    pub report_path: Option<PathBuf>,
}

impl Config {
    // $XDG_CACHE_HOME/thumbnails（未設定なら ~/.cache/thumbnails）
    pub fn default_cache_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thumbnails")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_root: Self::default_cache_root(),
            backend: BackendKind::default(),
            commit_unstamped: false,
            report_path: None,
        }
    }
}
