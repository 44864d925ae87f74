use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ThumbnailError;
use crate::pipeline::Thumbnailer;
use crate::progress::{percent_complete, ProgressSink};
use crate::types::{BatchReport, ItemOutcome};

// 対象を順番に処理する（1件の失敗でバッチは止めない）
pub fn run_batch(
    thumbnailer: &Thumbnailer,
    targets: &[PathBuf],
    progress: &mut dyn ProgressSink,
) -> BatchReport {
    let total = targets.len();
    let mut report = BatchReport::default();
    progress.start(total);

    for (index, path) in targets.iter().enumerate() {
        // サードパーティクレート内のパニックもこのファイル限りの失敗にする
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| thumbnailer.generate(path)))
            .unwrap_or_else(|payload| {
                ItemOutcome::Failed(ThumbnailError::Unexpected(panic_message(payload.as_ref())))
            });

        if let ItemOutcome::Failed(e) = &outcome {
            warn!(path = %path.display(), kind = ?e.kind(), error = %e, "サムネイル生成失敗");
        }

        progress.item(percent_complete(index + 1, total), &status_line(path, &outcome));
        report.record(path.clone(), &outcome);
    }

    progress.finish();
    info!(
        total = report.total,
        committed = report.committed,
        unsupported = report.unsupported,
        failed = report.failed_total(),
        "バッチ処理完了"
    );
    report
}

fn status_line(path: &Path, outcome: &ItemOutcome) -> String {
    let name = path
        .file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy();
    let label = match outcome {
        ItemOutcome::Committed { .. } => "生成完了",
        ItemOutcome::Unsupported => "対象外",
        ItemOutcome::Failed(_) => "失敗",
    };
    format!("{}: {}", label, name)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "パニックが発生しました".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ThumbnailCache;
    use crate::error::FailureKind;
    use crate::progress::ZenityProgress;
    use crate::thumbnail::tests::MockBackend;
    use std::fs;

    fn thumbnailer(root: &Path, backend: MockBackend) -> Thumbnailer {
        let cache = ThumbnailCache::new(root.join("thumbnails"));
        cache.ensure_dirs().unwrap();
        Thumbnailer::new(cache, Box::new(backend), false)
    }

    fn touch(root: &Path, name: &str) -> PathBuf {
        let path = root.join(name);
        fs::write(&path, b"data").unwrap();
        path
    }

    #[test]
    fn corrupt_item_does_not_abort_batch() {
        let root = tempfile::tempdir().unwrap();
        let thumbnailer = thumbnailer(root.path(), MockBackend::new().with_corrupt("corrupt.jpg"));
        let targets = vec![touch(root.path(), "corrupt.jpg"), touch(root.path(), "valid.jpg")];
        let mut progress = ZenityProgress::new(Vec::new());

        let report = run_batch(&thumbnailer, &targets, &mut progress);

        assert_eq!(report.total, 2);
        assert_eq!(report.committed, 1);
        assert_eq!(report.failed[&FailureKind::ExtractionFailure], 1);
        assert_eq!(fs::read_dir(&thumbnailer.cache().cache_dir).unwrap().count(), 1);

        let out = String::from_utf8(progress.into_inner()).unwrap();
        assert!(out.contains("50\n# 失敗: corrupt.jpg\n"));
        assert!(out.contains("100\n# 生成完了: valid.jpg\n"));
        assert!(out.ends_with("100\n# 完了\n"));
    }

    #[test]
    fn panic_is_isolated_and_leaves_no_temp() {
        let root = tempfile::tempdir().unwrap();
        let thumbnailer = thumbnailer(root.path(), MockBackend::new().panicking_on("boom.png"));
        let targets = vec![touch(root.path(), "boom.png"), touch(root.path(), "fine.png")];
        let mut progress = ZenityProgress::new(Vec::new());

        let report = run_batch(&thumbnailer, &targets, &mut progress);

        assert_eq!(report.committed, 1);
        assert_eq!(report.failed[&FailureKind::UnexpectedFailure], 1);
        assert_eq!(report.items[0].error.as_deref(), Some("予期しないエラー: decoder exploded"));

        let names: Vec<String> = fs::read_dir(&thumbnailer.cache().cache_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(!names[0].contains(".tmp"));
    }

    #[test]
    fn short_video_gets_committed_from_first_frame() {
        let root = tempfile::tempdir().unwrap();
        let thumbnailer = thumbnailer(root.path(), MockBackend::new().without_frame_at("00:00:05"));
        let targets = vec![touch(root.path(), "two-seconds.mp4")];
        let mut progress = ZenityProgress::new(Vec::new());

        let report = run_batch(&thumbnailer, &targets, &mut progress);

        assert_eq!(report.committed, 1);
        let cache_path = report.items[0].cache_path.clone().unwrap();
        assert!(fs::metadata(cache_path).unwrap().len() > 0);
    }

    #[test]
    fn every_failure_path_leaves_cache_dir_clean() {
        let root = tempfile::tempdir().unwrap();
        let backend = MockBackend::new()
            .with_corrupt("bad.gif")
            .without_frame_at("00:00:05")
            .without_frame_at("00:00:00")
            .panicking_on("explodes.webp");
        let thumbnailer = thumbnailer(root.path(), backend);
        let targets = vec![
            touch(root.path(), "bad.gif"),
            touch(root.path(), "blank.mkv"),
            touch(root.path(), "explodes.webp"),
            root.path().join("missing.png"),
            touch(root.path(), "readme.md"),
        ];
        let mut progress = ZenityProgress::new(Vec::new());

        let report = run_batch(&thumbnailer, &targets, &mut progress);

        assert_eq!(report.total, 5);
        assert_eq!(report.committed, 0);
        assert_eq!(report.unsupported, 1);
        assert_eq!(report.failed_total(), 4);
        assert_eq!(fs::read_dir(&thumbnailer.cache().cache_dir).unwrap().count(), 0);
    }

    #[test]
    fn panic_message_handles_owned_and_static() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let fixed: Box<dyn Any + Send> = Box::new("fixed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);

        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(fixed.as_ref()), "fixed");
        assert_eq!(panic_message(other.as_ref()), "パニックが発生しました");
    }
}
