use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

/// Turns a document into one plain-text blob.
///
/// Implementations never fail: an unreadable document yields an empty
/// string and the failure is logged.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> String;
}

/// Text-layer extraction through poppler's `pdftotext`.
#[derive(Debug, Clone, Default)]
pub struct PdftotextExtractor;

impl TextExtractor for PdftotextExtractor {
    fn extract(&self, path: &Path) -> String {
        match extract_pages_with_pdftotext(path) {
            Ok(pages) => {
                debug!(path = %path.display(), pages = pages.len(), "extracted text");
                join_pages(pages)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read report");
                String::new()
            }
        }
    }
}

fn extract_pages_with_pdftotext(pdf_path: &Path) -> Result<Vec<String>> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(pdf_path)
        .arg("-")
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    Ok(split_pages(&raw))
}

fn split_pages(raw: &str) -> Vec<String> {
    raw.split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect()
}

/// Joins page texts in order, skipping pages without any text.
fn join_pages(pages: Vec<String>) -> String {
    pages
        .into_iter()
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
