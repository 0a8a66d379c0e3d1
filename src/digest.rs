use std::fmt::Write as _;

use anyhow::Result;
use tracing::info;

use crate::cli::NormalizeMode;
use crate::config::ExtractionConfig;
use crate::model::{ReportRecord, Section};
use crate::pdf_text::TextExtractor;
use crate::report::ReportParser;
use crate::source::{Document, ReportNaming};

pub const NO_REPORTS_MESSAGE: &str = "No reports found for the latest week.";

// Completed and In Progress list every group member, so this only shows
// when rendering an empty record set.
const EMPTY_BUCKET: &str = "\u{2022} None reported";
const EMPTY_BLOCKERS: &str = "\u{2022} None";

/// Documents sharing the highest period number, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodGroup {
    pub period: u32,
    pub documents: Vec<Document>,
}

pub struct BatchSummarizer<E> {
    parser: ReportParser<E>,
    naming: ReportNaming,
}

impl<E: TextExtractor> BatchSummarizer<E> {
    pub fn new(config: &ExtractionConfig, mode: NormalizeMode, extractor: E) -> Result<Self> {
        Ok(Self {
            parser: ReportParser::new(config, mode, extractor)?,
            naming: ReportNaming::new()?,
        })
    }

    /// Renders the digest for the latest period, or the fixed
    /// no-reports message when no document carries a period token.
    pub fn summarize(&self, documents: Vec<Document>) -> String {
        match self.select_latest_period(documents) {
            Some(group) => {
                let records = self.collect_records(&group);
                render_digest(group.period, &records)
            }
            None => NO_REPORTS_MESSAGE.to_string(),
        }
    }

    pub fn select_latest_period(&self, documents: Vec<Document>) -> Option<PeriodGroup> {
        let mut latest_period: Option<u32> = None;
        let mut members = Vec::new();

        for document in documents {
            let Some(period) = self.naming.period(&document.identifier) else {
                continue;
            };

            if latest_period.is_none_or(|current| period > current) {
                latest_period = Some(period);
                members = vec![document];
            } else if latest_period == Some(period) {
                members.push(document);
            }
        }

        match latest_period {
            Some(period) => {
                info!(period, reports = members.len(), "selected latest period");
                Some(PeriodGroup {
                    period,
                    documents: members,
                })
            }
            None => {
                info!("no reports carry a period token");
                None
            }
        }
    }

    pub fn collect_records(&self, group: &PeriodGroup) -> Vec<ReportRecord> {
        group
            .documents
            .iter()
            .map(|document| {
                let name = self.naming.display_name(&document.identifier);
                self.parser.parse_report(document, &name)
            })
            .collect()
    }
}

pub fn render_digest(period: u32, records: &[ReportRecord]) -> String {
    let mut digest = format!("*Week {period} Progress Summary*\n\n");

    for section in Section::ALL {
        let lines: Vec<String> = records
            .iter()
            .filter(|record| section != Section::Blockers || !record.blockers.is_negative())
            .map(|record| format!("- {}: {}", record.name, record.section(section)))
            .collect();

        let _ = writeln!(digest, "{} {}:", section.icon(), section.label());
        if lines.is_empty() {
            digest.push_str(match section {
                Section::Blockers => EMPTY_BLOCKERS,
                _ => EMPTY_BUCKET,
            });
        } else {
            digest.push_str(&lines.join("\n"));
        }
        digest.push_str("\n\n");
    }

    digest.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::model::SectionResult;
    use crate::pdf_text::testing::CannedText;

    fn documents(identifiers: &[&str]) -> Vec<Document> {
        identifiers
            .iter()
            .map(|identifier| Document {
                identifier: identifier.to_string(),
                path: PathBuf::from(identifier),
            })
            .collect()
    }

    fn summarizer(extractor: CannedText) -> BatchSummarizer<CannedText> {
        BatchSummarizer::new(&ExtractionConfig::default(), NormalizeMode::Smart, extractor).unwrap()
    }

    fn record(name: &str, blockers: SectionResult) -> ReportRecord {
        ReportRecord {
            identifier: format!("Week5-{name}.pdf"),
            name: name.to_string(),
            completed: SectionResult::Content(format!("{name} did things.")),
            next: SectionResult::Missing,
            blockers,
        }
    }

    #[test]
    fn latest_period_group_excludes_older_and_untagged() {
        let group = summarizer(CannedText::default())
            .select_latest_period(documents(&[
                "Week3-Alice.pdf",
                "Week5-Bob.pdf",
                "Notes.pdf",
                "Week5-Carol.pdf",
            ]))
            .unwrap();

        assert_eq!(group.period, 5);
        assert_eq!(group.documents, documents(&["Week5-Bob.pdf", "Week5-Carol.pdf"]));
    }

    #[test]
    fn later_period_resets_group() {
        let group = summarizer(CannedText::default())
            .select_latest_period(documents(&["Week5-Bob.pdf", "Week12-Dan.pdf", "Week5-Eve.pdf"]))
            .unwrap();

        assert_eq!(group.period, 12);
        assert_eq!(group.documents, documents(&["Week12-Dan.pdf"]));
    }

    #[test]
    fn no_tagged_documents_yields_fixed_message() {
        let digest = summarizer(CannedText::default()).summarize(documents(&["Notes.pdf"]));
        assert_eq!(digest, NO_REPORTS_MESSAGE);
        assert!(!digest.contains("Completed"));

        assert_eq!(summarizer(CannedText::default()).summarize(Vec::new()), NO_REPORTS_MESSAGE);
    }

    #[test]
    fn negative_blockers_are_left_out() {
        let records = vec![
            record("Bob", SectionResult::Content("None.".to_string())),
            record("Carol", SectionResult::Content("Waiting on API access.".to_string())),
            record("Dan", SectionResult::Missing),
        ];

        let digest = render_digest(5, &records);
        let (_, blockers) = digest.split_once("Blockers:\n").unwrap();

        assert_eq!(blockers, "- Carol: Waiting on API access.");
        assert!(digest.contains("- Bob: Bob did things."));
        assert!(digest.contains("- Dan: Dan did things."));
    }

    #[test]
    fn empty_record_set_renders_placeholders() {
        let digest = render_digest(7, &[]);

        assert!(digest.contains("Completed:\n\u{2022} None reported\n\n"));
        assert!(digest.contains("In Progress:\n\u{2022} None reported\n\n"));
        assert!(digest.ends_with("Blockers:\n\u{2022} None"));
    }

    #[test]
    fn digest_layout_is_stable() {
        let records = vec![record("Bob", SectionResult::Content("no blockers".to_string()))];

        let digest = render_digest(5, &records);

        assert_eq!(
            digest,
            "*Week 5 Progress Summary*\n\n\
             \u{2705} Completed:\n- Bob: Bob did things.\n\n\
             \u{1F504} In Progress:\n- Bob: None\n\n\
             \u{26A0}\u{FE0F} Blockers:\n\u{2022} None"
        );
    }

    #[test]
    fn summarize_parses_each_document_of_the_latest_period() {
        let extractor = CannedText::default()
            .with(
                "Week5-Bob.pdf",
                "What did you do this week?\n- Did X\n- Did Y.\nBlockers\nWaiting on API access\n",
            )
            .with("Week5-Carol.pdf", "")
            .with("Week4-Alice.pdf", "What did you do this week?\nOld news\n");

        let digest = summarizer(extractor).summarize(documents(&[
            "Week4-Alice.pdf",
            "Week5-Bob.pdf",
            "Week5-Carol.pdf",
        ]));

        assert!(digest.starts_with("*Week 5 Progress Summary*\n\n"));
        assert!(digest.contains("- Bob: Did X. Did Y.\n- Carol: None\n"));
        assert!(digest.contains("Blockers:\n- Bob: Waiting on API access."));
        let blockers = digest.split("Blockers:\n").nth(1).unwrap();
        assert!(!blockers.contains("Carol"));
        assert!(!digest.contains("Alice"));
    }
}
