use std::path::Path;

use image::ImageFormat;

use crate::constants::FFMPEG_PROGRAM;
use crate::error::ThumbnailResult;
use crate::image_utils::{create_thumbnail, load_oriented, write_png_with_text};
use crate::thumbnail::metadata::ThumbnailMetadata;
use crate::thumbnail::{video, ThumbnailBackend};

/// 画像のデコード・縮小・メタデータ書き込みを `image` / `png` クレートで行う実装
///
/// 動画フレームの抽出だけは ffmpeg を使う。
#[derive(Debug, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ThumbnailBackend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn required_tools(&self) -> &[&'static str] {
        &[FFMPEG_PROGRAM]
    }

    fn extract_frame(&self, source: &Path, output: &Path, seek: &str) -> ThumbnailResult<()> {
        video::extract_frame(source, output, seek)
    }

    fn convert_image(&self, source: &Path, output: &Path) -> ThumbnailResult<()> {
        let img = load_oriented(source)?;
        create_thumbnail(&img).save_with_format(output, ImageFormat::Png)?;
        Ok(())
    }

    fn stamp(&self, render: &Path, metadata: &ThumbnailMetadata) -> ThumbnailResult<()> {
        // 再エンコードで既存チャンクを落としてから属性を付ける
        let img = image::open(render)?;
        write_png_with_text(render, &img, &metadata.attributes())
    }
}
