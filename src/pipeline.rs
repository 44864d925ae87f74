use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::cache::{canonicalize, commit, create_temp, derive_key, ThumbnailCache};
use crate::error::{ThumbnailError, ThumbnailResult};
use crate::thumbnail::{render, stamp_render, ThumbnailBackend, ThumbnailMetadata};
use crate::types::{ItemOutcome, RecordStatus, SourceFile, ThumbnailRecord};

/// 1ファイル分のサムネイル生成（URI解決 → レンダリング → メタデータ → 公開）
pub struct Thumbnailer {
    cache: ThumbnailCache,
    backend: Box<dyn ThumbnailBackend>,
    /// メタデータ書き込みに失敗しても公開する（旧来の挙動）
    commit_unstamped: bool,
}

impl Thumbnailer {
    pub fn new(cache: ThumbnailCache, backend: Box<dyn ThumbnailBackend>, commit_unstamped: bool) -> Self {
        Self {
            cache,
            backend,
            commit_unstamped,
        }
    }

    pub fn cache(&self) -> &ThumbnailCache {
        &self.cache
    }

    pub fn generate(&self, path: &Path) -> ItemOutcome {
        match self.try_generate(path) {
            Ok(Some(record)) => ItemOutcome::Committed {
                cache_path: record.cache_path,
            },
            Ok(None) => ItemOutcome::Unsupported,
            Err(e) => ItemOutcome::Failed(e),
        }
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn try_generate(&self, path: &Path) -> ThumbnailResult<Option<ThumbnailRecord>> {
        let Some(source) = SourceFile::capture(path)? else {
            debug!("対象外の拡張子");
            return Ok(None);
        };

        let uri = canonicalize(&source.path)?;
        let key = derive_key(&uri);
        let cache_path = self.cache.cache_path(&key);
        let mut record = ThumbnailRecord::new(uri, key, cache_path, source.mtime);

        self.process(&source, &mut record)?;
        Ok(Some(record))
    }

    // どの段階で失敗しても記録を Failed にする
    fn process(&self, source: &SourceFile, record: &mut ThumbnailRecord) -> ThumbnailResult<()> {
        let result = self.publish(source, record);
        if result.is_err() {
            record.fail();
        }
        result
    }

    fn publish(&self, source: &SourceFile, record: &mut ThumbnailRecord) -> ThumbnailResult<()> {
        // ここで作った一時ファイルは、公開前にどの経路で抜けても drop で削除される
        let temp = create_temp(&record.cache_path)?;
        record.temp_path = Some(temp.to_path_buf());

        self.render_and_stamp(source, &temp, record)?;

        commit(temp, &record.cache_path)?;
        record.advance(RecordStatus::Committed);
        debug!(key = %record.key, cache_path = %record.cache_path.display(), "サムネイル公開");
        Ok(())
    }

    fn render_and_stamp(
        &self,
        source: &SourceFile,
        temp: &Path,
        record: &mut ThumbnailRecord,
    ) -> ThumbnailResult<()> {
        record.advance(RecordStatus::Rendering);
        render(self.backend.as_ref(), source, temp)?;

        record.advance(RecordStatus::Stamping);
        let metadata = ThumbnailMetadata::new(record.uri.clone(), record.captured_mtime);
        match stamp_render(self.backend.as_ref(), temp, &metadata) {
            Ok(()) => Ok(()),
            Err(e @ ThumbnailError::MetadataStampFailure { .. }) if self.commit_unstamped => {
                warn!(path = %source.path.display(), error = %e, "メタデータなしで公開します");
                Ok(())
            }
            Err(e) => {
                warn!(path = %source.path.display(), error = %e, "メタデータ書き込み失敗");
                Err(e)
            }
        }
    }
}
