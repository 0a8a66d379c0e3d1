use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{info, warn};

use crate::sink::DigestSink;
use crate::source::{Document, DocumentSource};

#[derive(Debug, Deserialize)]
struct SlackApiResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackFile {
    pub name: String,
    #[serde(default)]
    pub filetype: Option<String>,
    #[serde(default)]
    pub url_private_download: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FilesListResponse {
    #[serde(default)]
    files: Vec<SlackFile>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ts: Option<String>,
}

/// Minimal Slack Web API client: list channel files, download, post.
pub struct SlackClient {
    http: HttpClient,
    token: String,
    api_base: String,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            http,
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn api_get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{endpoint}", self.api_base);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .with_context(|| format!("send slack {endpoint} request"))?;
        let status = response.status();
        let payload = response
            .text()
            .with_context(|| format!("read slack {endpoint} response"))?;
        parse_slack_payload(status, &payload)
    }

    fn api_post<T: DeserializeOwned>(&self, endpoint: &str, body: serde_json::Value) -> Result<T> {
        let url = format!("{}/{endpoint}", self.api_base);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .with_context(|| format!("send slack {endpoint} request"))?;
        let status = response.status();
        let payload = response
            .text()
            .with_context(|| format!("read slack {endpoint} response"))?;
        parse_slack_payload(status, &payload)
    }

    /// PDF files shared in `channel`.
    pub fn list_pdf_files(&self, channel: &str) -> Result<Vec<SlackFile>> {
        let listing: FilesListResponse = self.api_get("files.list", &[("channel", channel)])?;
        Ok(listing
            .files
            .into_iter()
            .filter(|file| file.filetype.as_deref() == Some("pdf"))
            .collect())
    }

    pub fn download(&self, file: &SlackFile, dir: &Path) -> Result<PathBuf> {
        let url = file
            .url_private_download
            .as_deref()
            .with_context(|| format!("no download url for {}", file.name))?;
        let local_name = safe_file_name(&file.name)
            .with_context(|| format!("unusable file name: {:?}", file.name))?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .with_context(|| format!("failed to download {}", file.name))?;
        let status = response.status();
        if !status.is_success() {
            bail!("failed to download {}: {}", file.name, status);
        }
        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read body of {}", file.name))?;

        let path = dir.join(local_name);
        fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Posts `text` to `channel` and returns the message timestamp.
    pub fn post_message(&self, channel: &str, text: &str) -> Result<String> {
        let body = json!({ "channel": channel, "text": text });
        let response: PostMessageResponse = self.api_post("chat.postMessage", body)?;
        Ok(response.ts.unwrap_or_default())
    }
}

fn parse_slack_payload<T: DeserializeOwned>(status: StatusCode, payload: &str) -> Result<T> {
    if !status.is_success() {
        bail!("slack api error: {} {}", status, payload);
    }
    let parsed: serde_json::Value =
        serde_json::from_str(payload).context("parse slack api response")?;
    let ok = serde_json::from_value::<SlackApiResponse>(parsed.clone())
        .context("parse slack api ok response")?;
    if !ok.ok {
        bail!(
            "slack api error: {}",
            ok.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }
    serde_json::from_value(parsed).context("parse slack api payload")
}

/// Final path component of a remote file name, so downloads stay inside
/// the target directory.
fn safe_file_name(name: &str) -> Option<&str> {
    Path::new(name)
        .file_name()
        .and_then(|value| value.to_str())
        .filter(|value| !value.is_empty())
}

/// Keeps the first listed file for each local name; the listing is newest
/// first, so later uploads of the same report win over older ones.
fn unique_by_local_name(files: Vec<SlackFile>) -> Vec<SlackFile> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|file| {
            let Some(name) = safe_file_name(&file.name) else {
                return true;
            };
            if seen.insert(name.to_string()) {
                true
            } else {
                warn!(file = %file.name, "skipping duplicate report name");
                false
            }
        })
        .collect()
}

/// Channel PDFs downloaded into a scratch directory.
///
/// A failed listing yields no documents; single failed downloads are
/// skipped.
pub struct SlackChannelSource<'a> {
    client: &'a SlackClient,
    channel: &'a str,
    dir: &'a Path,
}

impl<'a> SlackChannelSource<'a> {
    pub fn new(client: &'a SlackClient, channel: &'a str, dir: &'a Path) -> Self {
        Self {
            client,
            channel,
            dir,
        }
    }
}

impl DocumentSource for SlackChannelSource<'_> {
    fn documents(&self) -> Result<Vec<Document>> {
        let files = match self.client.list_pdf_files(self.channel) {
            Ok(files) => unique_by_local_name(files),
            Err(err) => {
                warn!(channel = %self.channel, error = %err, "failed to list channel files");
                return Ok(Vec::new());
            }
        };

        let mut documents = Vec::with_capacity(files.len());
        for file in &files {
            match self.client.download(file, self.dir) {
                Ok(path) => documents.push(Document::from_path(path)?),
                Err(err) => warn!(file = %file.name, error = %err, "skipping report"),
            }
        }

        info!(
            channel = %self.channel,
            listed = files.len(),
            downloaded = documents.len(),
            "downloaded channel reports"
        );
        Ok(documents)
    }
}

pub struct SlackSink<'a> {
    client: &'a SlackClient,
    channel: &'a str,
}

impl<'a> SlackSink<'a> {
    pub fn new(client: &'a SlackClient, channel: &'a str) -> Self {
        Self { client, channel }
    }
}

impl DigestSink for SlackSink<'_> {
    fn deliver(&self, digest: &str) -> Result<()> {
        let ts = self
            .client
            .post_message(self.channel, digest)
            .with_context(|| format!("failed to post digest to {}", self.channel))?;
        info!(channel = %self.channel, ts = %ts, "posted digest");
        Ok(())
    }
}
