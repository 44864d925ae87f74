use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cache::CacheKey;
use crate::constants::{LARGE_TIER_DIR, NORMAL_TIER_DIR};

// サムネイルキャッシュディレクトリ（normal / large の2階層）
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    /// 書き込み先（128px 階層）
    pub cache_dir: PathBuf,
    /// 256px 階層（作成のみ、書き込まない）
    pub large_dir: PathBuf,
}

impl ThumbnailCache {
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        let cache_root = cache_root.as_ref();
        Self {
            cache_dir: cache_root.join(NORMAL_TIER_DIR),
            large_dir: cache_root.join(LARGE_TIER_DIR),
        }
    }

    // 両階層を作成（既存なら何もしない）
    pub fn ensure_dirs(&self) -> io::Result<()> {
        for dir in [&self.cache_dir, &self.large_dir] {
            fs::create_dir_all(dir)?;
            debug!(dir = %dir.display(), "キャッシュディレクトリ確認");
        }
        Ok(())
    }

    pub fn cache_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }
}
