use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{ReportEntry, ReportInventoryManifest};
use crate::source::{DirectorySource, DocumentSource, ReportNaming};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.reports_dir)?;

    if args.dry_run {
        info!(
            report_count = manifest.report_count,
            latest_period = ?manifest.latest_period,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.reports_dir.join("report_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(
        report_count = manifest.report_count,
        latest_period_count = manifest.latest_period_count,
        "inventory completed"
    );

    Ok(())
}

pub fn build_manifest(reports_dir: &Path) -> Result<ReportInventoryManifest> {
    let naming = ReportNaming::new()?;
    let documents = DirectorySource::new(reports_dir).documents()?;

    let mut reports = Vec::with_capacity(documents.len());
    for document in documents {
        let sha256 = sha256_file(&document.path)?;
        reports.push(ReportEntry {
            period: naming.period(&document.identifier),
            name: naming.display_name(&document.identifier),
            filename: document.identifier,
            sha256,
        });
    }

    reports.sort_by(|a, b| a.period.cmp(&b.period).then(a.filename.cmp(&b.filename)));

    let latest_period = reports.iter().filter_map(|entry| entry.period).max();
    let latest_period_count = reports
        .iter()
        .filter(|entry| latest_period.is_some() && entry.period == latest_period)
        .count();

    Ok(ReportInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: reports_dir.display().to_string(),
        report_count: reports.len(),
        latest_period,
        latest_period_count,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn manifest_records_periods_and_latest_group() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Week3-Alice.pdf", "Week5-Bob.pdf", "Week5-Carol.pdf", "Notes.pdf"] {
            fs::write(dir.path().join(name), name.as_bytes()).unwrap();
        }

        let manifest = build_manifest(dir.path()).unwrap();

        assert_eq!(manifest.report_count, 4);
        assert_eq!(manifest.latest_period, Some(5));
        assert_eq!(manifest.latest_period_count, 2);
        assert_eq!(manifest.reports[0].filename, "Notes.pdf");
        assert_eq!(manifest.reports[0].period, None);
        assert_eq!(manifest.reports[0].name, "Notes.pdf");
        assert_eq!(manifest.reports[3].name, "Carol");
        assert_eq!(manifest.reports[3].sha256.len(), 64);
    }

    #[test]
    fn manifest_without_period_tokens_has_no_latest_period() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Notes.pdf"), b"notes").unwrap();

        let manifest = build_manifest(dir.path()).unwrap();

        assert_eq!(manifest.latest_period, None);
        assert_eq!(manifest.latest_period_count, 0);
    }
}
