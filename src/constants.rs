// サムネイル設定（freedesktop "normal" 階層・PNG形式）
pub const THUMBNAIL_SIZE: u32 = 128;

// キャッシュ階層ディレクトリ名（書き込むのは normal のみ）
pub const NORMAL_TIER_DIR: &str = "normal";
pub const LARGE_TIER_DIR: &str = "large";
pub const THUMBNAIL_EXTENSION: &str = "png";

// 画像サイズ制限（DoS防止）
pub const MAX_IMAGE_DIMENSION: u32 = 65535;      // 最大辺長
pub const MAX_PIXEL_COUNT: u64 = 100_000_000;    // 最大ピクセル数（100メガピクセル）

// サポートする拡張子
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "ts", "m4v"];
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff"];

// 動画フレーム抽出位置（先頭5秒、失敗時は0秒で再試行）
pub const VIDEO_SEEK_PRIMARY: &str = "00:00:05";
pub const VIDEO_SEEK_FALLBACK: &str = "00:00:00";

// 埋め込みメタデータ（PCManFM / GLib が検証に使う）
pub const META_URI_KEY: &str = "Thumb::URI";
pub const META_MTIME_KEY: &str = "Thumb::MTime";
pub const META_SOFTWARE_KEY: &str = "Software";
pub const GENERATOR_TAG: &str = "GNOME::ThumbnailFactory";

// 外部ツール
pub const FFMPEG_PROGRAM: &str = "ffmpeg";
pub const CONVERT_PROGRAM: &str = "convert";
pub const MOGRIFY_PROGRAM: &str = "mogrify";
