use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Header synonyms for each logical section, in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSets {
    pub completed: Vec<String>,
    pub next: Vec<String>,
    pub blockers: Vec<String>,
}

impl HeaderSets {
    pub fn groups(&self) -> [&[String]; 3] {
        [&self.completed, &self.next, &self.blockers]
    }
}

/// Static vocabulary used by the section locator and the line normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub headers: HeaderSets,
    pub stop_headers: Vec<String>,
    pub noise_patterns: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            headers: HeaderSets {
                completed: strings(&["What did you do this week?", "What have you done this week?"]),
                next: strings(&["What are you going to do next week?", "Next week"]),
                blockers: strings(&[
                    "Blockers",
                    "Blockers, things you want to flag, problems, etc.",
                ]),
            },
            stop_headers: strings(&[
                "Abstracts",
                "Abstract",
                "References",
                "Reference Article",
                "Summary",
                "What did you do and prove it",
                "Proof of Progress",
                "Visualization Validation",
            ]),
            noise_patterns: strings(&[r"things you want to flag", r"Week \d+", r"@\w+"]),
        }
    }
}

impl ExtractionConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse extraction config {}", path.display()))
    }

    /// Every header synonym of every logical section.
    pub fn all_headers(&self) -> impl Iterator<Item = &String> {
        self.headers.groups().into_iter().flatten()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
