//! System prompt rendering.
//!
//! Fixed template, sections in this order:
//!
//! 1. role framing
//! 2. formatting directives
//! 3. the student's selection (subjects + programs as JSON arrays)
//! 4. program summary
//! 5. detailed requirements (only when there is detail text)
//! 6. focus directive (only when detailed-family programs are selected)
//!
//! Rendering is a pure function of its inputs; the same inputs always give
//! byte-identical prompts.

use coursechat_config::PromptConfig;
use coursechat_core::selection::{ProgramId, SelectionContext};

use crate::assembler::AssembledContext;

const FORMATTING_RULES: &str = "\
FORMATTING RULES:
- Reply in plain text only. Do not use Markdown, HTML, tables, or any other rich markup.
- Keep paragraphs short and separate them with a single blank line.
- Start each list item on its own line with a hyphen and a space.
- Write subject numbers exactly as the student does (for example 6.1010 or 18.06).
- When listing requirements, give one requirement per line and say which program it belongs to.";

/// Renders the system message for one chat turn.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    institution: String,
    tool_name: String,
}

impl PromptBuilder {
    pub fn new(institution: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            tool_name: tool_name.into(),
        }
    }

    pub fn from_config(config: &PromptConfig) -> Self {
        Self::new(config.institution.clone(), config.tool_name.clone())
    }

    /// Render the system prompt.
    ///
    /// `targets` are the selected detailed-family programs, as returned by
    /// [`ContextAssembler::targets`](crate::assembler::ContextAssembler::targets).
    pub fn render(
        &self,
        selection: &SelectionContext,
        context: &AssembledContext,
        targets: &[&ProgramId],
    ) -> String {
        let mut sections = vec![
            self.role_framing(),
            FORMATTING_RULES.to_string(),
            Self::selection_block(selection),
            format!("PROGRAM SUMMARY:\n{}", context.summary_text),
        ];

        if !context.detail_text.is_empty() {
            sections.push(format!("DETAILED REQUIREMENTS:\n{}", context.detail_text));
        }

        if !targets.is_empty() {
            let names: Vec<&str> = targets.iter().map(|p| p.as_str()).collect();
            sections.push(format!(
                "FOCUS:\nPrioritize the requirements of these programs: {}. \
                 Base answers about them on the detailed requirements above.",
                names.join(", ")
            ));
        }

        sections.join("\n\n")
    }

    fn role_framing(&self) -> String {
        format!(
            "You are an AI assistant for {inst} {tool}, a course planning tool for {inst} students.\n\
             You help students plan their academic journey by answering questions about subjects, \
             degree requirements, and programs of study. Use the context below, which reflects the \
             student's current plan, and say so when the context does not cover a question.",
            inst = self.institution,
            tool = self.tool_name,
        )
    }

    fn selection_block(selection: &SelectionContext) -> String {
        format!(
            "STUDENT SELECTION:\nSelected Subjects: {}\nPrograms of Study: {}",
            serde_json::to_string(&selection.subjects).unwrap_or_default(),
            serde_json::to_string(&selection.programs).unwrap_or_default(),
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::from_config(&PromptConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::DetailSource;

    fn context(summary: &str, detail: &str) -> AssembledContext {
        AssembledContext {
            summary_text: summary.into(),
            detail_text: detail.into(),
            detail_source: if detail.is_empty() {
                DetailSource::None
            } else {
                DetailSource::Sections {
                    found: 1,
                    requested: 1,
                }
            },
        }
    }

    #[test]
    fn full_prompt_golden() {
        let builder = PromptBuilder::new("MIT", "CourseRoad");
        let selection = SelectionContext::new(["6.1010", "18.06"], ["major6-3", "major18"]);
        let ctx = context("SUMMARY BODY", "DETAIL BODY");
        let major63 = ProgramId::from("major6-3");

        let prompt = builder.render(&selection, &ctx, &[&major63]);

        let expected = format!(
            "You are an AI assistant for MIT CourseRoad, a course planning tool for MIT students.\n\
             You help students plan their academic journey by answering questions about subjects, \
             degree requirements, and programs of study. Use the context below, which reflects the \
             student's current plan, and say so when the context does not cover a question.\
             \n\n{FORMATTING_RULES}\n\n\
             STUDENT SELECTION:\n\
             Selected Subjects: [\"6.1010\",\"18.06\"]\n\
             Programs of Study: [\"major6-3\",\"major18\"]\n\n\
             PROGRAM SUMMARY:\nSUMMARY BODY\n\n\
             DETAILED REQUIREMENTS:\nDETAIL BODY\n\n\
             FOCUS:\nPrioritize the requirements of these programs: major6-3. \
             Base answers about them on the detailed requirements above."
        );
        assert_eq!(prompt, expected);
    }

    #[test]
    fn sections_appear_in_order() {
        let builder = PromptBuilder::default();
        let selection = SelectionContext::new(["6.1010"], ["major6-3"]);
        let major63 = ProgramId::from("major6-3");
        let prompt = builder.render(&selection, &context("sum", "det"), &[&major63]);

        let positions: Vec<usize> = [
            "You are an AI assistant",
            "FORMATTING RULES:",
            "STUDENT SELECTION:",
            "PROGRAM SUMMARY:",
            "DETAILED REQUIREMENTS:",
            "FOCUS:",
        ]
        .iter()
        .map(|marker| prompt.find(marker).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn detail_block_omitted_when_empty() {
        let builder = PromptBuilder::default();
        let selection = SelectionContext::new(["18.06"], ["major18"]);
        let prompt = builder.render(&selection, &context("sum", ""), &[]);
        assert!(!prompt.contains("DETAILED REQUIREMENTS:"));
        assert!(!prompt.contains("FOCUS:"));
        assert!(prompt.ends_with("PROGRAM SUMMARY:\nsum"));
    }

    #[test]
    fn focus_lists_targets_comma_joined() {
        let builder = PromptBuilder::default();
        let selection = SelectionContext::new(Vec::<String>::new(), ["major6-4", "major6-2"]);
        let a = ProgramId::from("major6-4");
        let b = ProgramId::from("major6-2");
        let prompt = builder.render(&selection, &context("sum", "det"), &[&a, &b]);
        assert!(prompt.contains("these programs: major6-4, major6-2."));
    }

    #[test]
    fn empty_selection_serializes_as_empty_arrays() {
        let builder = PromptBuilder::default();
        let prompt = builder.render(&SelectionContext::default(), &context("", ""), &[]);
        assert!(prompt.contains("Selected Subjects: []\nPrograms of Study: []"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let builder = PromptBuilder::default();
        let selection = SelectionContext::new(["6.1010", "6.1210"], ["major6-3", "major6-4"]);
        let a = ProgramId::from("major6-3");
        let b = ProgramId::from("major6-4");
        let ctx = context("summary", "detail");
        let first = builder.render(&selection, &ctx, &[&a, &b]);
        let second = builder.render(&selection.clone(), &ctx.clone(), &[&a, &b]);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn institution_is_configurable() {
        let builder = PromptBuilder::from_config(&PromptConfig {
            institution: "Example Tech".into(),
            tool_name: "PlanBoard".into(),
        });
        let prompt = builder.render(&SelectionContext::default(), &context("", ""), &[]);
        assert!(prompt.starts_with(
            "You are an AI assistant for Example Tech PlanBoard, a course planning tool for Example Tech students."
        ));
    }
}
