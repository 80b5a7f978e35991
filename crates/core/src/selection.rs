//! Per-turn selection state supplied by the course-planning UI.

use serde::{Deserialize, Serialize};

/// Opaque token identifying a degree program, e.g. `major6-3` or `minor21M`.
///
/// Whether a program has a section in the detailed requirements corpus is
/// decided by the section extractor's configuration, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(String);

impl ProgramId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProgramId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProgramId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ProgramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's current selection, built fresh for every chat turn.
///
/// Both lists keep the order the user selected them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    /// Selected subject identifiers (e.g. `6.1010`, `18.06`).
    #[serde(default)]
    pub subjects: Vec<String>,

    /// Declared programs of study.
    #[serde(default)]
    pub programs: Vec<ProgramId>,
}

impl SelectionContext {
    pub fn new<S, P>(subjects: S, programs: P) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<ProgramId>,
    {
        Self {
            subjects: subjects.into_iter().map(Into::into).collect(),
            programs: programs.into_iter().map(Into::into).collect(),
        }
    }
}
