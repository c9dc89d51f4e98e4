//! Hierarchical project summarization.
//!
//! Summaries are produced bottom-up within a directory (files, then the
//! directory) and top-down across directories, after a single root pass over
//! the flat project listing. Every artifact is persisted to the findings
//! document and the summary log as soon as it exists; the guide is built from
//! both once the walk is finished.

pub mod analyzer;
pub mod error;
pub mod filter;
pub mod generate;
pub mod guide;
pub mod prompts;
pub mod session;
pub mod walker;

pub use analyzer::{AnalysisOutcome, AnalyzerConfig, ProjectAnalyzer};
pub use error::EngineError;
pub use filter::ExclusionFilter;
pub use guide::{Guide, GuideBuilder};
pub use session::{ConversationTurn, InteractiveSession, TranscriptWindow};
pub use walker::{TreeWalker, WalkReport};
