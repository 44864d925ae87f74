use std::env;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, NON_ALPHANUMERIC};

const URI_SCHEME: &str = "file://";

// 英数字と "-._~/" 以外はすべてエスケープ
const PATH_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// ソースファイルの正規URI（`file:///...`）
///
/// キャッシュキーの唯一の入力。絶対パスのみから決まり、更新時刻や内容には依存しない。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUri(String);

impl CanonicalUri {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// パスを正規URIに変換
// file:// で始まる入力は復号してパスとして扱い直す（正規URIなら同じ値に戻る）
pub fn canonicalize(path: impl AsRef<Path>) -> io::Result<CanonicalUri> {
    let path = path.as_ref();

    let absolute = match path.to_str().and_then(|s| s.strip_prefix(URI_SCHEME)) {
        Some(encoded) => absolute_path(&path_from_bytes(percent_decode_str(encoded).collect()))?,
        None => absolute_path(path)?,
    };
    let encoded = percent_encode(path_bytes(&absolute).as_ref(), PATH_ESCAPE_SET).to_string();

    // 絶対パスは "/" で始まるので file:/// になる
    Ok(CanonicalUri(format!("{}{}", URI_SCHEME, encoded)))
}

// 絶対パス化（シンボリックリンクは解決せず、"." と ".." を字句的に除去）
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(path.to_string_lossy().replace('\\', "/").into_bytes())
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    use std::os::unix::ffi::OsStringExt;
    PathBuf::from(std::ffi::OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&bytes).into_owned())
}
