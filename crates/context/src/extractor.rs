//! Program section extraction from the detailed requirements corpus.
//!
//! The corpus is plain text with one header line per program, e.g.
//!
//! ```text
//! 6-3 Computer Science and Engineering
//! ...requirements...
//! 6-2 Electrical Engineering and Computer Science
//! ...requirements...
//! ```
//!
//! A section **starts** at the first line containing the program's bare code
//! (`6-3`) together with one of the configured discipline keywords, and
//! **ends** just before the next line shaped like a program header
//! (`<course>-<digit>` at line start) that does not mention the same code.
//! Without a later header the section runs to the end of the corpus.
//!
//! This is a heuristic, not a parser: a header without any keyword is
//! missed, and codes sharing a prefix (`6-1` vs `6-14`) are only told apart
//! by the keyword filter.

use coursechat_config::ExtractionConfig;
use coursechat_core::selection::ProgramId;
use tracing::debug;

/// A program's section: a contiguous slice of the detailed corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection<'a> {
    /// The program the section belongs to.
    pub program: ProgramId,
    /// Header line through the last line before the next program header.
    pub text: &'a str,
}

/// Finds one program's section in the detailed corpus.
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    identifier_prefix: String,
    detailed_course: String,
    /// `identifier_prefix + detailed_course`, e.g. `major6`.
    family_prefix: String,
    keywords: Vec<String>,
}

impl SectionExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            identifier_prefix: config.identifier_prefix.clone(),
            detailed_course: config.detailed_course.clone(),
            family_prefix: format!("{}{}", config.identifier_prefix, config.detailed_course),
            keywords: config
                .keywords
                .iter()
                .filter(|k| !k.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// Whether `program` can have a section in the detailed corpus.
    pub fn is_detailed(&self, program: &ProgramId) -> bool {
        program.as_str().starts_with(&self.family_prefix)
    }

    /// The code used to find the program's header (`major6-3` → `6-3`).
    pub fn bare_code<'p>(&self, program: &'p ProgramId) -> Option<&'p str> {
        if !self.is_detailed(program) {
            return None;
        }
        program.as_str().strip_prefix(&self.identifier_prefix)
    }

    /// Extract `program`'s section from `corpus`.
    ///
    /// Returns `None` for programs outside the detailed family (without
    /// scanning) and when no header line for the program exists. Only the
    /// first header match is used.
    pub fn extract<'a>(
        &self,
        corpus: &'a str,
        program: &ProgramId,
    ) -> Option<ExtractedSection<'a>> {
        let code = self.bare_code(program)?;

        let mut start: Option<usize> = None;
        let mut offset = 0;

        for raw in corpus.split_inclusive('\n') {
            let line = raw.trim_end_matches(['\n', '\r']);
            match start {
                None if self.starts_section(line, code) => start = Some(offset),
                Some(begin) if self.ends_section(line, code) => {
                    debug!(program = %program, bytes = offset - begin, "Extracted program section");
                    return Some(Self::section(program, corpus, begin, offset));
                }
                _ => {}
            }
            offset += raw.len();
        }

        match start {
            Some(begin) => {
                debug!(
                    program = %program,
                    bytes = corpus.len() - begin,
                    "Program section runs to end of corpus"
                );
                Some(Self::section(program, corpus, begin, corpus.len()))
            }
            None => {
                debug!(program = %program, code, "No section header found");
                None
            }
        }
    }

    fn section<'a>(
        program: &ProgramId,
        corpus: &'a str,
        begin: usize,
        end: usize,
    ) -> ExtractedSection<'a> {
        ExtractedSection {
            program: program.clone(),
            text: &corpus[begin..end],
        }
    }

    fn starts_section(&self, line: &str, code: &str) -> bool {
        line.contains(code) && self.keywords.iter().any(|k| line.contains(k.as_str()))
    }

    fn ends_section(&self, line: &str, code: &str) -> bool {
        self.is_program_header(line) && !line.contains(code)
    }

    /// `<course>-<digit>` at the very start of the line.
    fn is_program_header(&self, line: &str) -> bool {
        line.strip_prefix(self.detailed_course.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
    }
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}
