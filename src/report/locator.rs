use anyhow::{Context, Result};
use regex::Regex;

use crate::config::ExtractionConfig;
use crate::model::Section;

/// One header synonym with the boundary pattern used when it matches.
#[derive(Debug)]
struct HeaderMatcher {
    phrase: String,
    header: Regex,
    boundary: Option<Regex>,
}

/// Finds the raw span of a logical section inside extracted report text.
///
/// Headers and boundaries only count when they begin a line (leading
/// whitespace allowed) and are compared case-insensitively.
#[derive(Debug)]
pub struct SectionLocator {
    completed: Vec<HeaderMatcher>,
    next: Vec<HeaderMatcher>,
    blockers: Vec<HeaderMatcher>,
}

impl SectionLocator {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let headers = &config.headers;
        Ok(Self {
            completed: compile_group(config, &headers.completed)?,
            next: compile_group(config, &headers.next)?,
            blockers: compile_group(config, &headers.blockers)?,
        })
    }

    /// Returns the span following the first synonym (in priority order)
    /// found in `text`, up to the next boundary header or end of text.
    pub fn locate<'a>(&self, text: &'a str, section: Section) -> Option<&'a str> {
        let matchers = match section {
            Section::Completed => &self.completed,
            Section::Next => &self.next,
            Section::Blockers => &self.blockers,
        };

        for matcher in matchers {
            let Some(found) = matcher.header.find(text) else {
                continue;
            };

            let rest = &text[found.end()..];
            let start = found.end() + (rest.len() - rest.trim_start().len());
            let end = matcher
                .boundary
                .as_ref()
                .and_then(|boundary| boundary.find_at(text, start))
                .map(|boundary| boundary.start())
                .unwrap_or(text.len());

            tracing::trace!(header = %matcher.phrase, start, end, "matched section header");
            return Some(&text[start..end]);
        }

        None
    }
}

fn compile_group(config: &ExtractionConfig, group: &[String]) -> Result<Vec<HeaderMatcher>> {
    let own: Vec<String> = group.iter().map(|phrase| phrase.to_lowercase()).collect();

    // A longer synonym of the same section must never end the span of a
    // shorter one it starts with, so the whole group is left out.
    let boundaries: Vec<&str> = config
        .all_headers()
        .chain(config.stop_headers.iter())
        .map(|phrase| phrase.trim())
        .filter(|phrase| !phrase.is_empty())
        .filter(|phrase| !own.contains(&phrase.to_lowercase()))
        .collect();

    let boundary = if boundaries.is_empty() {
        None
    } else {
        let alternation = boundaries
            .iter()
            .map(|phrase| regex::escape(phrase))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = format!(r"(?im)^\s*(?:{alternation})");
        Some(Regex::new(&pattern).context("failed to compile section boundary regex")?)
    };

    group
        .iter()
        .map(|phrase| phrase.trim())
        .filter(|phrase| !phrase.is_empty())
        .map(|phrase| -> Result<HeaderMatcher> {
            let pattern = format!(r"(?im)^\s*{}", regex::escape(phrase));
            let header = Regex::new(&pattern)
                .with_context(|| format!("failed to compile header regex for {phrase:?}"))?;
            Ok(HeaderMatcher {
                phrase: phrase.to_string(),
                header,
                boundary: boundary.clone(),
            })
        })
        .collect()
}
