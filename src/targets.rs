use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

// 引数をファイル一覧に展開する
// ディレクトリは直下のファイルのみ（再帰しない）、ファイルはそのまま、それ以外は無視
pub fn expand_targets<P: AsRef<Path>>(args: &[P]) -> Vec<PathBuf> {
    let mut targets = Vec::new();

    for arg in args {
        let path = arg.as_ref();
        if path.is_dir() {
            targets.extend(list_directory(path));
        } else if path.is_file() {
            targets.push(path.to_path_buf());
        } else {
            debug!(path = %path.display(), "存在しないパスを無視");
        }
    }

    targets
}

fn list_directory(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();

    for entry_result in WalkDir::new(dir).min_depth(1).max_depth(1) {
        // 権限エラーなどはログ出力してスキップ
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "ディレクトリエントリ読み込みエラー");
                continue;
            }
        };

        // シンボリックリンクはリンク先がファイルなら含める
        if entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    // ファイル名で自然順ソート
    files.sort_by(|a, b| natord::compare(&file_name(a), &file_name(b)));
    files
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
