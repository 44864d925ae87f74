use std::fs;
use std::io;
use std::path::Path;

use tempfile::TempPath;
use tracing::trace;
#[cfg(unix)]
use tracing::warn;

// 最終パスと同じディレクトリに非公開の一時ファイルを作成
// TempPath は drop 時に削除される
pub fn create_temp(cache_path: &Path) -> io::Result<TempPath> {
    let dir = cache_path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "キャッシュパスに親ディレクトリがありません"))?;
    let stem = cache_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("thumbnail");

    // 拡張子 .png は外部ツールが出力形式を判定するのに必要
    let temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", stem))
        .suffix(".tmp.png")
        .tempfile_in(dir)?
        .into_temp_path();

    trace!(temp = %temp.display(), "一時ファイル作成");
    Ok(temp)
}

// 一時ファイルを最終パスへアトミックに公開する
// unix では所有者のみ読み書き可（0600）にする
pub fn commit(temp: TempPath, cache_path: &Path) -> io::Result<()> {
    // 失敗時は PathPersistError 内の TempPath が drop されて削除される
    temp.persist(cache_path).map_err(|e| e.error)?;

    // 公開済みなので権限設定の失敗は警告のみ
    #[cfg(unix)]
    {
        if let Err(e) = set_private_permissions(cache_path) {
            warn!(path = %cache_path.display(), error = %e, "権限設定失敗");
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_private_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}
