use anyhow::Result;
use tracing::debug;

use crate::cli::NormalizeMode;
use crate::config::ExtractionConfig;
use crate::model::{ReportRecord, Section, SectionResult};
use crate::pdf_text::TextExtractor;
use crate::report::{LineNormalizer, SectionLocator};
use crate::source::Document;

/// Extracts the three logical sections of a single progress report.
pub struct ReportParser<E> {
    extractor: E,
    locator: SectionLocator,
    normalizer: LineNormalizer,
}

impl<E: TextExtractor> ReportParser<E> {
    pub fn new(config: &ExtractionConfig, mode: NormalizeMode, extractor: E) -> Result<Self> {
        Ok(Self {
            extractor,
            locator: SectionLocator::new(config)?,
            normalizer: LineNormalizer::new(config, mode)?,
        })
    }

    pub fn parse_report(&self, document: &Document, name: &str) -> ReportRecord {
        let text = self.extractor.extract(&document.path);

        let record = ReportRecord {
            identifier: document.identifier.clone(),
            name: name.to_string(),
            completed: self.section(&text, Section::Completed),
            next: self.section(&text, Section::Next),
            blockers: self.section(&text, Section::Blockers),
        };

        debug!(
            identifier = %record.identifier,
            text_chars = text.len(),
            missing_sections = Section::ALL
                .iter()
                .filter(|section| record.section(**section).is_missing())
                .count(),
            "parsed report"
        );
        record
    }

    pub fn section(&self, text: &str, section: Section) -> SectionResult {
        self.locator
            .locate(text, section)
            .map(|span| self.normalizer.normalize(span))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::pdf_text::testing::CannedText;

    fn document(identifier: &str) -> Document {
        Document {
            identifier: identifier.to_string(),
            path: PathBuf::from(identifier),
        }
    }

    const REPORT: &str = "Weekly Progress Report\n\
        Week 5 - alice@example.com\n\
        What did you do this week?\n\
        \u{2022} Fixed the parser\n\
        \u{2022} Wrote   regression tests.\n\
        What are you going to do next week?\n\
        - Ship the release\n\
        Blockers, things you want to flag, problems, etc.\n\
        - Waiting on API access\n\
        References\n\
        [1] Some paper\n";

    #[test]
    fn parses_all_three_sections() {
        let extractor = CannedText::default().with("Week5-Alice.pdf", REPORT);
        let parser =
            ReportParser::new(&ExtractionConfig::default(), NormalizeMode::Smart, extractor).unwrap();

        let record = parser.parse_report(&document("Week5-Alice.pdf"), "Alice");

        assert_eq!(record.identifier, "Week5-Alice.pdf");
        assert_eq!(record.name, "Alice");
        assert_eq!(record.completed.as_str(), "Fixed the parser. Wrote regression tests.");
        assert_eq!(record.next.as_str(), "Ship the release.");
        assert_eq!(record.blockers.as_str(), "Waiting on API access.");
    }

    #[test]
    fn basic_mode_keeps_bullet_separators() {
        let extractor = CannedText::default().with("Week5-Alice.pdf", REPORT);
        let parser =
            ReportParser::new(&ExtractionConfig::default(), NormalizeMode::Basic, extractor).unwrap();

        let record = parser.parse_report(&document("Week5-Alice.pdf"), "Alice");

        assert_eq!(
            record.completed.as_str(),
            "Fixed the parser \u{2022} Wrote   regression tests."
        );
        assert_eq!(record.blockers.as_str(), "Waiting on API access");
    }

    #[test]
    fn unreadable_document_yields_sentinels() {
        let parser = ReportParser::new(
            &ExtractionConfig::default(),
            NormalizeMode::Smart,
            CannedText::default(),
        )
        .unwrap();

        let record = parser.parse_report(&document("Week5-Ghost.pdf"), "Ghost");

        assert!(record.completed.is_missing());
        assert!(record.next.is_missing());
        assert!(record.blockers.is_missing());
    }

    #[test]
    fn unrecognized_headers_yield_sentinels() {
        let extractor =
            CannedText::default().with("Notes.pdf", "Abstract\nMeeting notes\nTODO list\n");
        let parser =
            ReportParser::new(&ExtractionConfig::default(), NormalizeMode::Smart, extractor).unwrap();

        let record = parser.parse_report(&document("Notes.pdf"), "Notes.pdf");

        for section in Section::ALL {
            assert_eq!(record.section(section), &SectionResult::Missing);
        }
    }

    #[test]
    fn missing_section_does_not_affect_others() {
        let extractor = CannedText::default().with(
            "Week2-Bob.pdf",
            "Next week\nProfile the indexer\nBlockers\nNone\n",
        );
        let parser =
            ReportParser::new(&ExtractionConfig::default(), NormalizeMode::Smart, extractor).unwrap();

        let record = parser.parse_report(&document("Week2-Bob.pdf"), "Bob");

        assert!(record.completed.is_missing());
        assert_eq!(record.next.as_str(), "Profile the indexer.");
        assert_eq!(record.blockers.as_str(), "None.");
        assert!(record.blockers.is_negative());
    }
}
