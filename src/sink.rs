use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::util::ensure_directory;

/// Receives a finished digest; delivery failures never reach back into
/// digest computation.
pub trait DigestSink {
    fn deliver(&self, digest: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

impl DigestSink for StdoutSink {
    fn deliver(&self, digest: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{digest}").context("failed to write digest to stdout")
    }
}

#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DigestSink for FileSink {
    fn deliver(&self, digest: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_directory(parent)?;
        }

        let mut file = File::create(&self.path)
            .with_context(|| format!("failed to create digest file: {}", self.path.display()))?;
        file.write_all(digest.as_bytes())
            .with_context(|| format!("failed to write digest file: {}", self.path.display()))?;
        file.write_all(b"\n")
            .with_context(|| format!("failed to finalize digest file: {}", self.path.display()))?;

        info!(path = %self.path.display(), "wrote digest");
        Ok(())
    }
}
