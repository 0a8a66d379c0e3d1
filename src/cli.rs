use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "progress-digest",
    version,
    about = "Compile weekly PDF progress reports into a single digest"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Summarize(SummarizeArgs),
    Slack(SlackArgs),
    Inventory(InventoryArgs),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum NormalizeMode {
    /// Bullet-joined fragments.
    Basic,
    /// Fragments stitched into sentence-terminated prose.
    #[default]
    Smart,
}

impl NormalizeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Smart => "smart",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SummarizeArgs {
    #[arg(long, default_value = "Weekly Progress Reports")]
    pub reports_dir: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = NormalizeMode::Smart)]
    pub mode: NormalizeMode,

    /// Write the digest to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the parsed records of the latest period as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Also post the digest to the Slack channel.
    #[arg(long, default_value_t = false)]
    pub post: bool,

    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "SLACK_CHANNEL_ID")]
    pub channel: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SlackArgs {
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    pub token: String,

    #[arg(long, env = "SLACK_CHANNEL_ID")]
    pub channel: String,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = NormalizeMode::Smart)]
    pub mode: NormalizeMode,

    #[arg(long, default_value = "https://slack.com/api")]
    pub api_base: String,

    /// Build the digest but print it instead of posting.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = "Weekly Progress Reports")]
    pub reports_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
