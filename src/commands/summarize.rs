use anyhow::{Context, Result};
use tracing::info;

use crate::cli::SummarizeArgs;
use crate::config::ExtractionConfig;
use crate::digest::BatchSummarizer;
use crate::pdf_text::PdftotextExtractor;
use crate::sink::{DigestSink, FileSink, StdoutSink};
use crate::slack::{SlackClient, SlackSink};
use crate::source::{DirectorySource, DocumentSource};

const SLACK_API_BASE: &str = "https://slack.com/api";

pub fn run(args: SummarizeArgs) -> Result<()> {
    let config = ExtractionConfig::load(args.config.as_deref())?;
    let summarizer = BatchSummarizer::new(&config, args.mode, PdftotextExtractor)?;

    info!(
        reports_dir = %args.reports_dir.display(),
        mode = args.mode.as_str(),
        "summarizing reports"
    );

    let documents = DirectorySource::new(&args.reports_dir).documents()?;

    if args.json {
        let records = summarizer
            .select_latest_period(documents)
            .map(|group| summarizer.collect_records(&group))
            .unwrap_or_default();
        let rendered =
            serde_json::to_string_pretty(&records).context("failed to serialize records")?;
        println!("{rendered}");
        return Ok(());
    }

    let digest = summarizer.summarize(documents);

    match &args.output {
        Some(path) => FileSink::new(path).deliver(&digest)?,
        None => StdoutSink.deliver(&digest)?,
    }

    if args.post {
        let token = args
            .token
            .as_deref()
            .context("--post requires --token or SLACK_BOT_TOKEN")?;
        let channel = args
            .channel
            .as_deref()
            .context("--post requires --channel or SLACK_CHANNEL_ID")?;
        let client = SlackClient::new(token, SLACK_API_BASE)?;
        SlackSink::new(&client, channel).deliver(&digest)?;
    }

    Ok(())
}
