mod file;
mod record;
mod report;

pub use file::{MediaKind, SourceFile};
pub use record::{RecordStatus, ThumbnailRecord};
pub use report::{BatchReport, ItemOutcome, ItemReport, ItemStatus};
