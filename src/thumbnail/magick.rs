use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::constants::{CONVERT_PROGRAM, FFMPEG_PROGRAM, MOGRIFY_PROGRAM, THUMBNAIL_SIZE};
use crate::error::ThumbnailResult;
use crate::thumbnail::metadata::ThumbnailMetadata;
use crate::thumbnail::tool::{run_capturing_stderr, run_silent};
use crate::thumbnail::{video, ThumbnailBackend};

/// ffmpeg + ImageMagick（convert / mogrify）による外部ツール実装
#[derive(Debug, Default)]
pub struct MagickBackend;

impl MagickBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ThumbnailBackend for MagickBackend {
    fn name(&self) -> &'static str {
        "magick"
    }

    fn required_tools(&self) -> &[&'static str] {
        &[FFMPEG_PROGRAM, CONVERT_PROGRAM, MOGRIFY_PROGRAM]
    }

    fn extract_frame(&self, source: &Path, output: &Path, seek: &str) -> ThumbnailResult<()> {
        video::extract_frame(source, output, seek)
    }

    fn convert_image(&self, source: &Path, output: &Path) -> ThumbnailResult<()> {
        run_silent(convert_command(source, output))
    }

    fn stamp(&self, image: &Path, metadata: &ThumbnailMetadata) -> ThumbnailResult<()> {
        // mogrify の失敗は標準エラーを警告に含める
        run_capturing_stderr(mogrify_command(image, metadata))
    }
}

// [0] で先頭フレームのみ（巨大なGIF対策）、-auto-orient でEXIFの向きを補正
fn convert_command(source: &Path, output: &Path) -> Command {
    let mut first_frame = OsString::from(source.as_os_str());
    first_frame.push("[0]");

    let mut command = Command::new(CONVERT_PROGRAM);
    command
        .arg(first_frame)
        .args(["-thumbnail", &format!("{size}x{size}", size = THUMBNAIL_SIZE)])
        .arg("-auto-orient")
        .arg(output);
    command
}

// 既存メタデータを削除してから3属性を設定（その場で書き換え）
fn mogrify_command(image: &Path, metadata: &ThumbnailMetadata) -> Command {
    let mut command = Command::new(MOGRIFY_PROGRAM);
    command.arg("-strip");
    for (key, value) in metadata.attributes() {
        command.args(["-set", key, value.as_str()]);
    }
    command.arg(image);
    command
}
