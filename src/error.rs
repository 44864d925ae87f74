use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// 失敗の分類（バッチレポート集計用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    MissingDependency,
    SourceNotFound,
    ExtractionFailure,
    MetadataStampFailure,
    UnexpectedFailure,
}

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("依存ツールが見つかりません: {}", .0.join(", "))]
    MissingDependency(Vec<String>),

    #[error("ファイルが存在しません: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("サムネイル抽出に失敗しました ({attempts}回試行): {}", path.display())]
    ExtractionFailure { path: PathBuf, attempts: u32 },

    #[error("メタデータ書き込みに失敗しました: {}: {reason}", path.display())]
    MetadataStampFailure { path: PathBuf, reason: String },

    #[error("{program} が失敗しました: {detail}")]
    Tool { program: String, detail: String },

    #[error("予期しないエラー: {0}")]
    Unexpected(String),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("画像処理エラー: {0}")]
    Image(#[from] image::ImageError),

    #[error("PNGエンコードエラー: {0}")]
    Png(#[from] png::EncodingError),
}

impl ThumbnailError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingDependency(_) => FailureKind::MissingDependency,
            Self::SourceNotFound(_) => FailureKind::SourceNotFound,
            Self::ExtractionFailure { .. } | Self::Tool { .. } => FailureKind::ExtractionFailure,
            Self::MetadataStampFailure { .. } => FailureKind::MetadataStampFailure,
            Self::Unexpected(_) | Self::Io(_) | Self::Image(_) | Self::Png(_) => {
                FailureKind::UnexpectedFailure
            }
        }
    }
}

pub type ThumbnailResult<T> = Result<T, ThumbnailError>;
