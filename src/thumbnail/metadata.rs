use std::path::Path;

use crate::cache::CanonicalUri;
use crate::constants::{GENERATOR_TAG, META_MTIME_KEY, META_SOFTWARE_KEY, META_URI_KEY};
use crate::error::{ThumbnailError, ThumbnailResult};
use crate::thumbnail::ThumbnailBackend;

/// サムネイルに埋め込む検証用属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailMetadata {
    pub uri: CanonicalUri,
    pub mtime: u64,
}

impl ThumbnailMetadata {
    pub fn new(uri: CanonicalUri, mtime: u64) -> Self {
        Self { uri, mtime }
    }

    // 書き込む3属性（順序固定）
    pub fn attributes(&self) -> [(&'static str, String); 3] {
        [
            (META_URI_KEY, self.uri.to_string()),
            (META_MTIME_KEY, self.mtime.to_string()),
            (META_SOFTWARE_KEY, GENERATOR_TAG.to_string()),
        ]
    }
}

// 一時レンダリング結果にメタデータを書き込む
pub fn stamp_render(
    backend: &dyn ThumbnailBackend,
    image: &Path,
    metadata: &ThumbnailMetadata,
) -> ThumbnailResult<()> {
    backend
        .stamp(image, metadata)
        .map_err(|e| ThumbnailError::MetadataStampFailure {
            path: image.to_path_buf(),
            reason: match e {
                ThumbnailError::Tool { detail, .. } => detail,
                other => other.to_string(),
            },
        })
}
