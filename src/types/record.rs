use std::path::PathBuf;

use tracing::{debug, trace};

use crate::cache::{CacheKey, CanonicalUri};

/// 生成処理の進行状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Pending,
    Rendering,
    Stamping,
    Committed,
    Failed,
}

// 1ファイル・1回の実行ごとのサムネイル生成記録（永続化しない）
#[derive(Debug, Clone)]
pub struct ThumbnailRecord {
    pub uri: CanonicalUri,
    pub key: CacheKey,
    pub cache_path: PathBuf,
    pub temp_path: Option<PathBuf>,
    pub captured_mtime: u64,
    pub status: RecordStatus,
}

impl ThumbnailRecord {
    pub fn new(uri: CanonicalUri, key: CacheKey, cache_path: PathBuf, captured_mtime: u64) -> Self {
        Self {
            uri,
            key,
            cache_path,
            temp_path: None,
            captured_mtime,
            status: RecordStatus::Pending,
        }
    }

    pub fn advance(&mut self, status: RecordStatus) {
        trace!(key = %self.key, from = ?self.status, to = ?status, "状態遷移");
        self.status = status;
    }

    // 失敗として終える（一時ファイルは呼び出し側の drop で削除済み）
    pub fn fail(&mut self) {
        if let Some(temp) = &self.temp_path {
            debug!(temp = %temp.display(), "一時ファイルを破棄");
        }
        self.advance(RecordStatus::Failed);
    }
}
