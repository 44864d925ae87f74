mod magick;
mod metadata;
mod native;
mod tool;
mod video;

pub use self::magick::MagickBackend;
pub use self::metadata::{stamp_render, ThumbnailMetadata};
pub use self::native::NativeBackend;

use std::fs;
use std::path::Path;

use tracing::{debug, trace};

use crate::constants::{VIDEO_SEEK_FALLBACK, VIDEO_SEEK_PRIMARY};
use crate::error::{ThumbnailError, ThumbnailResult};
use crate::types::{MediaKind, SourceFile};

/// レンダリングとメタデータ書き込みを担うバックエンド
///
/// 再試行や出力確認は呼び出し側（[`render`]）が行うので、実装は1回分の処理だけを書く。
pub trait ThumbnailBackend {
    fn name(&self) -> &'static str;

    /// PATH 上に必要な外部ツール
    fn required_tools(&self) -> &[&'static str];

    /// 動画の `seek` 位置から1フレームを `output` へ書き出す
    fn extract_frame(&self, source: &Path, output: &Path, seek: &str) -> ThumbnailResult<()>;

    /// 画像の先頭フレームを縮小・向き補正して `output` へ書き出す
    fn convert_image(&self, source: &Path, output: &Path) -> ThumbnailResult<()>;

    /// 既存メタデータを削除し、検証用属性を `image` へ書き込む
    fn stamp(&self, image: &Path, metadata: &ThumbnailMetadata) -> ThumbnailResult<()>;
}

// 必要な外部ツールがすべて揃っているか確認
pub fn check_dependencies(backend: &dyn ThumbnailBackend) -> ThumbnailResult<()> {
    let missing = tool::missing_tools(backend.required_tools());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ThumbnailError::MissingDependency(missing))
    }
}

// 種類に応じてバックエンドを呼び分ける
// 動画: 5秒地点 → 失敗なら0秒地点で1回だけ再試行 / 画像: 1回のみ
pub fn render(backend: &dyn ThumbnailBackend, source: &SourceFile, output: &Path) -> ThumbnailResult<()> {
    let attempts: &[&str] = match source.kind {
        MediaKind::Video => &[VIDEO_SEEK_PRIMARY, VIDEO_SEEK_FALLBACK],
        MediaKind::Image => &[""],
    };

    for (attempt, seek) in attempts.iter().enumerate() {
        let result = match source.kind {
            MediaKind::Video => backend.extract_frame(&source.path, output, seek),
            MediaKind::Image => backend.convert_image(&source.path, output),
        }
        .and_then(|()| ensure_output(output));

        match result {
            Ok(()) => {
                trace!(attempt = attempt + 1, seek, "レンダリング成功");
                return Ok(());
            }
            Err(e) => debug!(attempt = attempt + 1, seek, error = %e, "レンダリング失敗"),
        }
    }

    Err(ThumbnailError::ExtractionFailure {
        path: source.path.clone(),
        attempts: attempts.len() as u32,
    })
}

// 終了コードが 0 でも出力が無い（空）場合は失敗扱い
fn ensure_output(output: &Path) -> ThumbnailResult<()> {
    let len = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    if len == 0 {
        return Err(ThumbnailError::Tool {
            program: "render".to_string(),
            detail: format!("出力がありません: {}", output.display()),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// バックエンド呼び出しの記録
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        ExtractFrame { source: PathBuf, seek: String },
        ConvertImage { source: PathBuf },
        Stamp { uri: String, mtime: u64 },
    }

    /// 外部ツールなしでパイプラインを検証するためのモック
    ///
    /// 成功時はダミーのバイト列を出力へ書く。
    #[derive(Debug, Default)]
    pub struct MockBackend {
        pub calls: Rc<RefCell<Vec<Call>>>,
        /// このシーク位置では何も出力しない
        pub missing_seeks: HashSet<String>,
        /// このファイル名の変換は失敗する
        pub corrupt_files: HashSet<String>,
        pub fail_stamp: bool,
        pub panic_on: Option<String>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn without_frame_at(mut self, seek: &str) -> Self {
            self.missing_seeks.insert(seek.to_string());
            self
        }

        pub fn with_corrupt(mut self, file_name: &str) -> Self {
            self.corrupt_files.insert(file_name.to_string());
            self
        }

        pub fn with_failing_stamp(mut self) -> Self {
            self.fail_stamp = true;
            self
        }

        pub fn panicking_on(mut self, file_name: &str) -> Self {
            self.panic_on = Some(file_name.to_string());
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        /// Box に移した後も呼び出しを確認できるよう共有する
        pub fn call_log(&self) -> Rc<RefCell<Vec<Call>>> {
            Rc::clone(&self.calls)
        }

        fn file_name(path: &Path) -> String {
            path.file_name().unwrap().to_string_lossy().to_string()
        }

        fn check_panic(&self, source: &Path) {
            if self.panic_on.as_deref() == Some(Self::file_name(source).as_str()) {
                panic!("decoder exploded");
            }
        }
    }

    impl ThumbnailBackend for MockBackend {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn required_tools(&self) -> &[&'static str] {
            &[]
        }

        fn extract_frame(&self, source: &Path, output: &Path, seek: &str) -> ThumbnailResult<()> {
            self.calls.borrow_mut().push(Call::ExtractFrame {
                source: source.to_path_buf(),
                seek: seek.to_string(),
            });
            self.check_panic(source);
            // ffmpeg は範囲外のシークでも 0 で終了し、何も書かない
            if !self.missing_seeks.contains(seek) {
                fs::write(output, b"frame")?;
            }
            Ok(())
        }

        fn convert_image(&self, source: &Path, output: &Path) -> ThumbnailResult<()> {
            self.calls.borrow_mut().push(Call::ConvertImage {
                source: source.to_path_buf(),
            });
            self.check_panic(source);
            if self.corrupt_files.contains(&Self::file_name(source)) {
                return Err(ThumbnailError::Tool {
                    program: "mock".to_string(),
                    detail: "corrupt".to_string(),
                });
            }
            fs::write(output, b"image")?;
            Ok(())
        }

        fn stamp(&self, _image: &Path, metadata: &ThumbnailMetadata) -> ThumbnailResult<()> {
            self.calls.borrow_mut().push(Call::Stamp {
                uri: metadata.uri.to_string(),
                mtime: metadata.mtime,
            });
            if self.fail_stamp {
                return Err(ThumbnailError::Tool {
                    program: "mock".to_string(),
                    detail: "stamp refused".to_string(),
                });
            }
            Ok(())
        }
    }

    fn source(dir: &Path, name: &str, kind: MediaKind) -> SourceFile {
        let path = dir.join(name);
        fs::write(&path, b"source").unwrap();
        SourceFile { path, mtime: 1, kind }
    }

    #[test]
    fn video_uses_primary_seek_when_frame_exists() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new();
        let src = source(dir.path(), "long.mp4", MediaKind::Video);
        let out = dir.path().join("out.png");

        render(&backend, &src, &out).unwrap();

        assert_eq!(
            backend.calls(),
            vec![Call::ExtractFrame { source: src.path.clone(), seek: "00:00:05".into() }]
        );
    }

    #[test]
    fn short_video_retries_at_zero() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new().without_frame_at("00:00:05");
        let src = source(dir.path(), "short.mp4", MediaKind::Video);
        let out = dir.path().join("out.png");

        render(&backend, &src, &out).unwrap();

        let seeks: Vec<_> = backend
            .calls()
            .into_iter()
            .map(|c| match c {
                Call::ExtractFrame { seek, .. } => seek,
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(seeks, vec!["00:00:05", "00:00:00"]);
        assert!(fs::metadata(&out).unwrap().len() > 0);
    }

    #[test]
    fn video_fails_after_two_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new()
            .without_frame_at("00:00:05")
            .without_frame_at("00:00:00");
        let src = source(dir.path(), "empty.mkv", MediaKind::Video);

        let err = render(&backend, &src, &dir.path().join("out.png")).unwrap_err();

        assert!(matches!(err, ThumbnailError::ExtractionFailure { attempts: 2, .. }));
        assert_eq!(backend.calls().len(), 2);
    }

    #[test]
    fn image_is_attempted_once() {
        let dir = tempfile::tempdir().unwrap();
        let backend = MockBackend::new().with_corrupt("bad.jpg");
        let src = source(dir.path(), "bad.jpg", MediaKind::Image);

        let err = render(&backend, &src, &dir.path().join("out.png")).unwrap_err();

        assert!(matches!(err, ThumbnailError::ExtractionFailure { attempts: 1, .. }));
        assert_eq!(backend.calls().len(), 1);
    }

    #[test]
    fn empty_output_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        fs::write(&out, b"").unwrap();
        assert!(ensure_output(&out).is_err());
        assert!(ensure_output(&dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn missing_tools_are_reported() {
        struct Needy;
        impl ThumbnailBackend for Needy {
            fn name(&self) -> &'static str {
                "needy"
            }
            fn required_tools(&self) -> &[&'static str] {
                &["thumbcache-gen-missing-a", "thumbcache-gen-missing-b"]
            }
            fn extract_frame(&self, _: &Path, _: &Path, _: &str) -> ThumbnailResult<()> {
                Ok(())
            }
            fn convert_image(&self, _: &Path, _: &Path) -> ThumbnailResult<()> {
                Ok(())
            }
            fn stamp(&self, _: &Path, _: &ThumbnailMetadata) -> ThumbnailResult<()> {
                Ok(())
            }
        }

        match check_dependencies(&Needy) {
            Err(ThumbnailError::MissingDependency(missing)) => {
                assert_eq!(missing, vec!["thumbcache-gen-missing-a", "thumbcache-gen-missing-b"])
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(check_dependencies(&MockBackend::new()).is_ok());
    }
}
