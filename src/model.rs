use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder reported for a section with no content.
pub const NONE_SENTINEL: &str = "None";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Completed,
    Next,
    Blockers,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Completed, Section::Next, Section::Blockers];

    /// Bucket label used in the rendered digest.
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Next => "In Progress",
            Self::Blockers => "Blockers",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Completed => "\u{2705}",
            Self::Next => "\u{1F504}",
            Self::Blockers => "\u{26A0}\u{FE0F}",
        }
    }
}

/// Normalized content of one logical section, or the none-sentinel.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SectionResult {
    Content(String),
    #[default]
    Missing,
}

impl SectionResult {
    pub fn from_merged(merged: String) -> Self {
        if merged.is_empty() {
            Self::Missing
        } else {
            Self::Content(merged)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Content(text) => text,
            Self::Missing => NONE_SENTINEL,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// True when the content only says there is nothing to report
    /// ("None.", "no", "N/A", "No blockers", ...).
    pub fn is_negative(&self) -> bool {
        let Self::Content(text) = self else {
            return true;
        };

        let lowered = text.trim().to_lowercase();
        let stripped = lowered.trim_end_matches(['.', '!', '?']).trim_end();
        matches!(stripped, "" | "none" | "no" | "na" | "n/a" | "no blockers")
    }
}

impl fmt::Display for SectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SectionResult> for String {
    fn from(value: SectionResult) -> Self {
        value.as_str().to_string()
    }
}

impl From<String> for SectionResult {
    fn from(value: String) -> Self {
        if value == NONE_SENTINEL {
            Self::Missing
        } else {
            Self::from_merged(value)
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub identifier: String,
    pub name: String,
    pub completed: SectionResult,
    pub next: SectionResult,
    pub blockers: SectionResult,
}

impl ReportRecord {
    pub fn section(&self, section: Section) -> &SectionResult {
        match section {
            Section::Completed => &self.completed,
            Section::Next => &self.next,
            Section::Blockers => &self.blockers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub filename: String,
    pub period: Option<u32>,
    pub name: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub report_count: usize,
    pub latest_period: Option<u32>,
    pub latest_period_count: usize,
    pub reports: Vec<ReportEntry>,
}
