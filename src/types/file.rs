use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::cache::absolute_path;
use crate::constants::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
use crate::error::{ThumbnailError, ThumbnailResult};

/// 拡張子から決まるレンダリング方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    // 拡張子で分類（対象外は None）
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else {
            None
        }
    }
}

// ソースファイル情報（1回の生成処理中は不変）
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// 処理開始時に一度だけ取得した更新時刻（秒）
    pub mtime: u64,
    pub kind: MediaKind,
}

impl SourceFile {
    /// ファイルの存在確認・分類・更新時刻の取得を行う。
    ///
    /// 対象外の拡張子なら `Ok(None)`。
    pub fn capture(path: &Path) -> ThumbnailResult<Option<Self>> {
        let metadata = match fs::metadata(path) {
            Ok(m) if m.is_file() => m,
            Ok(_) => return Err(ThumbnailError::SourceNotFound(path.to_path_buf())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ThumbnailError::SourceNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        let Some(kind) = MediaKind::from_path(path) else {
            return Ok(None);
        };

        // エポック以前は 0 扱い
        let mtime = metadata
            .modified()
            .map(|t| t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs())
            .unwrap_or(0);

        Ok(Some(Self {
            path: absolute_path(path)?,
            mtime,
            kind,
        }))
    }
}
