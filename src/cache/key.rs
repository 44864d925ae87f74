use std::fmt;

use crate::cache::CanonicalUri;
use crate::constants::THUMBNAIL_EXTENSION;

/// キャッシュキー（正規URIのMD5、小文字16進32桁）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // キャッシュエントリのファイル名
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, THUMBNAIL_EXTENSION)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// freedesktop 規約どおり URI の UTF-8 バイト列を MD5 でハッシュ
pub fn derive_key(uri: &CanonicalUri) -> CacheKey {
    CacheKey(format!("{:x}", md5::compute(uri.as_str().as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::canonicalize;

    #[test]
    fn key_matches_known_md5() {
        // md5("file:///home/user/a.png")
        let uri = canonicalize("/home/user/a.png").unwrap();
        let key = derive_key(&uri);
        assert_eq!(key.as_str(), format!("{:x}", md5::compute(b"file:///home/user/a.png")));
        assert_eq!(key.as_str().len(), 32);
        assert!(key.as_str().chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn key_is_stable() {
        let first = derive_key(&canonicalize("/srv/media/clip.mkv").unwrap());
        let second = derive_key(&canonicalize("/srv/media/clip.mkv").unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn distinct_paths_give_distinct_keys() {
        let paths = ["/a/b.png", "/a/b.PNG", "/a/b .png", "/a/c.png", "/b/b.png"];
        let keys: std::collections::HashSet<_> = paths
            .iter()
            .map(|p| derive_key(&canonicalize(p).unwrap()))
            .collect();
        assert_eq!(keys.len(), paths.len());
    }

    #[test]
    fn file_name_has_png_extension() {
        let key = derive_key(&canonicalize("/x.jpg").unwrap());
        assert_eq!(key.file_name(), format!("{}.png", key));
    }
}
