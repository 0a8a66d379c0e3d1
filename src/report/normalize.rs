use anyhow::{Context, Result};
use regex::Regex;

use crate::cli::NormalizeMode;
use crate::config::ExtractionConfig;
use crate::model::SectionResult;

const BULLET_GLYPHS: [char; 3] = ['\u{2022}', '-', '\u{25CF}'];
const BASIC_SEPARATOR: &str = " \u{2022} ";

/// Cleans a raw section span into a single line of text.
#[derive(Debug)]
pub struct LineNormalizer {
    mode: NormalizeMode,
    noise: Option<Regex>,
    leaked_tails: Vec<Regex>,
}

impl LineNormalizer {
    pub fn new(config: &ExtractionConfig, mode: NormalizeMode) -> Result<Self> {
        let noise = if config.noise_patterns.is_empty() {
            None
        } else {
            let alternation = config
                .noise_patterns
                .iter()
                .map(|pattern| format!("(?:{pattern})"))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!("(?i){alternation}"))
                .context("failed to compile noise line patterns")?;
            Some(regex)
        };

        let leaked_tails = leaked_header_tails(config)
            .into_iter()
            .map(|tail| {
                Regex::new(&format!(r"(?i)^\s*,?\s*{}", regex::escape(&tail)))
                    .with_context(|| format!("failed to compile header tail regex for {tail:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            mode,
            noise,
            leaked_tails,
        })
    }

    pub fn normalize(&self, raw: &str) -> SectionResult {
        let merged = match self.mode {
            NormalizeMode::Smart => self.merge_prose(raw),
            NormalizeMode::Basic => self.join_bullets(raw),
        };
        SectionResult::from_merged(merged)
    }

    fn is_noise(&self, line: &str) -> bool {
        self.noise.as_ref().is_some_and(|noise| noise.is_match(line))
    }

    fn merge_prose(&self, raw: &str) -> String {
        let lines = raw
            .trim()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !self.is_noise(line))
            .map(|line| collapse_whitespace(strip_bullet(line)))
            .filter(|line| !line.is_empty());

        let mut merged = String::new();
        for line in lines {
            if !merged.is_empty() {
                if ends_with_terminal(&merged) {
                    merged.push(' ');
                } else {
                    merged.push_str(". ");
                }
            }
            merged.push_str(&line);
        }

        if !merged.is_empty() && !ends_with_terminal(&merged) {
            merged.push('.');
        }
        merged
    }

    fn join_bullets(&self, raw: &str) -> String {
        let mut content = raw;
        for tail in &self.leaked_tails {
            if let Some(found) = tail.find(content) {
                content = &content[found.end()..];
            }
        }

        content
            .trim()
            .lines()
            .map(|line| {
                line.trim()
                    .trim_start_matches(|c: char| BULLET_GLYPHS.contains(&c) || c == ' ')
            })
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(BASIC_SEPARATOR)
    }
}

/// Text left over when a shorter synonym matched the start of a longer one,
/// e.g. ", things you want to flag, problems, etc." after "Blockers".
fn leaked_header_tails(config: &ExtractionConfig) -> Vec<String> {
    let mut tails = Vec::new();
    for group in config.headers.groups() {
        for short in group {
            let short_lower = short.trim().to_lowercase();
            for long in group {
                let long_lower = long.trim().to_lowercase();
                if long_lower.len() <= short_lower.len() || !long_lower.starts_with(&short_lower) {
                    continue;
                }
                let Some(rest) = long.trim().get(short.trim().len()..) else {
                    continue;
                };
                let tail = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
                if !tail.is_empty() && !tails.iter().any(|known| known == tail) {
                    tails.push(tail.to_string());
                }
            }
        }
    }
    tails
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| BULLET_GLYPHS.contains(&c) || c.is_whitespace())
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn ends_with_terminal(text: &str) -> bool {
    text.ends_with(['.', '!', '?'])
}
