// Library interface for arxivscope modules
// This allows tests and the CLI binary to import modules

pub mod error;
pub mod heuristic;
pub mod item;
pub mod llm;
pub mod summarizer;
pub mod text;
pub mod vocab;

pub use error::SummarizeError;
pub use heuristic::{heuristic_digest, heuristic_two_stage};
pub use item::{Digest, Item, Lang, Mode, Scope, SummaryRecord, TwoStage};
pub use summarizer::{build_two_stage_summary, llm_two_stage};
