use std::path::Path;
use std::process::Command;

use crate::constants::{FFMPEG_PROGRAM, THUMBNAIL_SIZE};
use crate::error::ThumbnailResult;
use crate::thumbnail::tool::run_silent;

// 動画の指定位置から1フレームを抽出し、128x128 に収まるよう縮小してPNG出力
pub fn extract_frame(source: &Path, output: &Path, seek: &str) -> ThumbnailResult<()> {
    run_silent(frame_command(source, output, seek))
}

fn frame_command(source: &Path, output: &Path, seek: &str) -> Command {
    let filter = format!(
        "thumbnail,scale={size}:{size}:force_original_aspect_ratio=decrease",
        size = THUMBNAIL_SIZE
    );

    let mut command = Command::new(FFMPEG_PROGRAM);
    command
        .args(["-ss", seek, "-i"])
        .arg(source)
        .args(["-vf", &filter, "-vframes", "1", "-f", "image2", "-y"])
        .arg(output);
    command
}
