use anyhow::{Context, Result};
use tracing::info;

use crate::cli::SlackArgs;
use crate::config::ExtractionConfig;
use crate::digest::BatchSummarizer;
use crate::pdf_text::PdftotextExtractor;
use crate::sink::{DigestSink, StdoutSink};
use crate::slack::{SlackChannelSource, SlackClient, SlackSink};
use crate::source::DocumentSource;

pub fn run(args: SlackArgs) -> Result<()> {
    let config = ExtractionConfig::load(args.config.as_deref())?;
    let summarizer = BatchSummarizer::new(&config, args.mode, PdftotextExtractor)?;
    let client = SlackClient::new(&args.token, &args.api_base)?;

    let scratch = tempfile::tempdir().context("failed to create download directory")?;
    info!(path = %scratch.path().display(), "downloading reports");

    let documents = SlackChannelSource::new(&client, &args.channel, scratch.path()).documents()?;
    let digest = summarizer.summarize(documents);

    if args.dry_run {
        return StdoutSink.deliver(&digest);
    }

    SlackSink::new(&client, &args.channel).deliver(&digest)
}
