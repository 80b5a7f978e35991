//! Context assembly — turns the corpora plus the student's selection into a
//! bounded pair of text blocks for the prompt.
//!
//! 1. **Summary** — the program summary corpus, always included, capped
//! 2. **Detail** — per-program sections for the detailed-family programs,
//!    merged in selection order, falling back to the whole detailed corpus
//!    when none of them can be found, capped
//!
//! # Determinism
//!
//! Assembly is pure: identical selection and corpora always produce the
//! same output. Missing sections and fallbacks are reported through
//! [`DetailSource`], never as errors.

use std::borrow::Cow;

use coursechat_config::{AppConfig, BudgetConfig};
use coursechat_core::selection::{ProgramId, SelectionContext};
use tracing::debug;

use crate::corpus::CorpusSnapshot;
use crate::extractor::SectionExtractor;
use crate::truncate::truncate;

/// Separator between merged program sections.
const SECTION_SEPARATOR: &str = "\n\n";

/// Where the detail block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    /// No detailed-family program selected.
    None,
    /// Extracted sections; `found` of `requested` targets had one.
    Sections { found: usize, requested: usize },
    /// Targets selected but no section found; the whole corpus was used.
    FullCorpusFallback,
}

/// The bounded context handed to the prompt builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    pub summary_text: String,
    /// Empty unless at least one selected program is in the detailed family.
    pub detail_text: String,
    pub detail_source: DetailSource,
}

/// The context assembler. Stateless; create one and reuse it.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    extractor: SectionExtractor,
    budget: BudgetConfig,
}

impl ContextAssembler {
    pub fn new(extractor: SectionExtractor, budget: BudgetConfig) -> Self {
        Self { extractor, budget }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            SectionExtractor::new(&config.extraction),
            config.budget.clone(),
        )
    }

    pub fn extractor(&self) -> &SectionExtractor {
        &self.extractor
    }

    /// Selected programs that have sections in the detailed corpus, in
    /// selection order.
    pub fn targets<'s>(&self, selection: &'s SelectionContext) -> Vec<&'s ProgramId> {
        selection
            .programs
            .iter()
            .filter(|p| self.extractor.is_detailed(p))
            .collect()
    }

    /// Build the summary and detail blocks for `selection`.
    pub fn assemble(
        &self,
        selection: &SelectionContext,
        corpora: &CorpusSnapshot<'_>,
    ) -> AssembledContext {
        let summary_text = truncate(corpora.summary, self.budget.summary_chars).into_owned();

        let targets = self.targets(selection);
        let (detail, detail_source) = self.merge_sections(&targets, corpora.detailed);

        let capped = truncate(&detail, self.budget.detail_chars);
        if matches!(capped, Cow::Owned(_)) {
            debug!(
                input_bytes = detail.len(),
                cap_chars = self.budget.detail_chars,
                "Detail block truncated"
            );
        }
        let detail_text = capped.into_owned();

        AssembledContext {
            summary_text,
            detail_text,
            detail_source,
        }
    }

    fn merge_sections(&self, targets: &[&ProgramId], detailed: &str) -> (String, DetailSource) {
        if targets.is_empty() {
            return (String::new(), DetailSource::None);
        }

        let sections: Vec<&str> = targets
            .iter()
            .filter_map(|program| self.extractor.extract(detailed, program))
            .map(|section| section.text)
            .collect();

        if sections.is_empty() {
            debug!(
                requested = targets.len(),
                "No program sections found, using full detailed corpus"
            );
            return (detailed.to_string(), DetailSource::FullCorpusFallback);
        }

        let source = DetailSource::Sections {
            found: sections.len(),
            requested: targets.len(),
        };
        (sections.join(SECTION_SEPARATOR), source)
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(SectionExtractor::default(), BudgetConfig::default())
    }
}
