mod commit;
mod disk;
mod key;
mod uri;

pub use commit::{commit, create_temp};
pub use disk::ThumbnailCache;
pub use key::{derive_key, CacheKey};
pub use uri::{absolute_path, canonicalize, CanonicalUri};
