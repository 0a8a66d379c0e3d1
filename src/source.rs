use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info, warn};

/// A candidate report: its file name and where its bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub identifier: String,
    pub path: PathBuf,
}

impl Document {
    pub fn from_path(path: PathBuf) -> Result<Self> {
        let identifier = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToOwned::to_owned)
            .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

        Ok(Self { identifier, path })
    }
}

/// Yields the candidate reports for one digest run.
pub trait DocumentSource {
    fn documents(&self) -> Result<Vec<Document>>;
}

/// PDFs directly inside a local directory, sorted by path.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocumentSource for DirectorySource {
    fn documents(&self) -> Result<Vec<Document>> {
        let mut paths = discover_pdfs(&self.root)?;
        paths.sort();

        info!(path = %self.root.display(), pdf_count = paths.len(), "scanned reports directory");

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match Document::from_path(path) {
                Ok(document) => documents.push(document),
                Err(err) => warn!(error = %err, "skipping report"),
            }
        }
        Ok(documents)
    }
}

fn discover_pdfs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();

    let entries =
        fs::read_dir(root).with_context(|| format!("failed to read {}", root.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", root.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            pdfs.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-pdf file");
        }
    }

    Ok(pdfs)
}

/// File naming convention `Week<N>-<Name>.pdf`.
#[derive(Debug, Clone)]
pub struct ReportNaming {
    period: Regex,
    name: Regex,
}

impl ReportNaming {
    pub fn new() -> Result<Self> {
        Ok(Self {
            period: Regex::new(r"Week(\d+)").context("failed to compile period regex")?,
            name: Regex::new(r"Week\d+-(.*)\.pdf").context("failed to compile report name regex")?,
        })
    }

    /// Period number following the first `Week` label, if any.
    pub fn period(&self, identifier: &str) -> Option<u32> {
        self.period
            .captures(identifier)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse::<u32>().ok())
    }

    /// Author name after the period token, or the identifier itself.
    pub fn display_name(&self, identifier: &str) -> String {
        self.name
            .captures(identifier)
            .and_then(|captures| captures.get(1))
            .map(|name| name.as_str().to_string())
            .unwrap_or_else(|| identifier.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_is_read_from_week_token() {
        let naming = ReportNaming::new().unwrap();

        assert_eq!(naming.period("Week5-Bob.pdf"), Some(5));
        assert_eq!(naming.period("Team Week12 Carol.pdf"), Some(12));
        assert_eq!(naming.period("Notes.pdf"), None);
        assert_eq!(naming.period("week5-lowercase.pdf"), None);
    }

    #[test]
    fn display_name_falls_back_to_identifier() {
        let naming = ReportNaming::new().unwrap();

        assert_eq!(naming.display_name("Week5-Bob.pdf"), "Bob");
        assert_eq!(naming.display_name("Week10-Mary Ann.pdf"), "Mary Ann");
        assert_eq!(naming.display_name("Week5 Bob.pdf"), "Week5 Bob.pdf");
        assert_eq!(naming.display_name("Notes.pdf"), "Notes.pdf");
    }

    #[test]
    fn directory_source_lists_sorted_pdfs_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Week5-Carol.pdf", "Week5-Bob.PDF", "readme.txt"] {
            fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
        }
        fs::create_dir(dir.path().join("Week6-archive.pdf")).unwrap();

        let documents = DirectorySource::new(dir.path()).documents().unwrap();
        let identifiers: Vec<&str> = documents
            .iter()
            .map(|document| document.identifier.as_str())
            .collect();

        assert_eq!(identifiers, vec!["Week5-Bob.PDF", "Week5-Carol.pdf"]);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_name_does_not_block_other_reports() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Week5-Bob.pdf"), b"%PDF-1.4").unwrap();
        fs::write(
            dir.path().join(OsStr::from_bytes(b"Week5-\xffCarol.pdf")),
            b"%PDF-1.4",
        )
        .unwrap();

        let documents = DirectorySource::new(dir.path()).documents().unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].identifier, "Week5-Bob.pdf");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DirectorySource::new(dir.path().join("absent")).documents();
        assert!(result.is_err());
    }
}
