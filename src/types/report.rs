use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{FailureKind, ThumbnailError};

/// 1ファイルの処理結果
#[derive(Debug)]
pub enum ItemOutcome {
    /// キャッシュへ公開済み
    Committed { cache_path: PathBuf },
    /// 対象外の拡張子（記録なし）
    Unsupported,
    Failed(ThumbnailError),
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

// レポート用の個別結果
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub path: PathBuf,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "kind")]
pub enum ItemStatus {
    Committed,
    Unsupported,
    Failed(FailureKind),
}

/// バッチ全体の集計
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub committed: usize,
    pub unsupported: usize,
    pub failed: BTreeMap<FailureKind, usize>,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn record(&mut self, path: PathBuf, outcome: &ItemOutcome) {
        self.total += 1;

        let item = match outcome {
            ItemOutcome::Committed { cache_path } => {
                self.committed += 1;
                ItemReport {
                    path,
                    status: ItemStatus::Committed,
                    cache_path: Some(cache_path.clone()),
                    error: None,
                }
            }
            ItemOutcome::Unsupported => {
                self.unsupported += 1;
                ItemReport {
                    path,
                    status: ItemStatus::Unsupported,
                    cache_path: None,
                    error: None,
                }
            }
            ItemOutcome::Failed(e) => {
                *self.failed.entry(e.kind()).or_insert(0) += 1;
                ItemReport {
                    path,
                    status: ItemStatus::Failed(e.kind()),
                    cache_path: None,
                    error: Some(e.to_string()),
                }
            }
        };
        self.items.push(item);
    }

    pub fn failed_total(&self) -> usize {
        self.failed.values().sum()
    }
}
