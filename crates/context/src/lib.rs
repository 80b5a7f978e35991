//! Requirements-aware context pipeline.
//!
//! Turns a student's selection into the system prompt for one chat turn:
//!
//! | Stage | Module | Notes |
//! |-------|--------|-------|
//! | 1. Load corpora | [`corpus`], [`source`] | Fetched once, single flight |
//! | 2. Extract sections | [`extractor`] | Line-oriented header heuristic |
//! | 3. Assemble + cap | [`assembler`], [`truncate`] | Fallback to full corpus |
//! | 4. Render | [`prompt`] | Fixed template, deterministic |
//!
//! Stages 2–4 are pure and synchronous; only stage 1 touches I/O.

pub mod assembler;
pub mod corpus;
pub mod extractor;
pub mod prompt;
pub mod source;
pub mod truncate;

pub use assembler::{AssembledContext, ContextAssembler, DetailSource};
pub use corpus::{CorpusKind, CorpusSnapshot, CorpusStore};
pub use extractor::{ExtractedSection, SectionExtractor};
pub use prompt::PromptBuilder;
pub use source::{CorpusSource, LocatorSource, StaticSource};
pub use truncate::{TRUNCATION_NOTE, truncate};
