pub mod error;
pub mod findings;
pub mod summary_log;

pub use error::StoreError;
pub use findings::{FindingsDocument, FindingsStore};
pub use summary_log::SummaryLog;
