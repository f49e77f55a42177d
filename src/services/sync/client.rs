use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use super::{MutationSink, SyncRequest};

/// Posts sync requests as JSON to a spreadsheet web app.
pub struct AppsScriptClient {
    client: Client,
    url: String,
}

impl AppsScriptClient {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        if !url.starts_with("https://") {
            return Err(anyhow!("Sync endpoint must use HTTPS"));
        }

        // Script endpoints are slow to cold start.
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build sync HTTP client")?;

        Ok(Self { client, url })
    }
}

impl MutationSink for AppsScriptClient {
    fn submit(&self, request: &SyncRequest) -> Result<()> {
        log::info!("Submitting {} request", request.kind());

        let body = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .with_context(|| format!("Network error during {} sync", request.kind()))?
            .error_for_status()
            .with_context(|| format!("Sync endpoint rejected {} request", request.kind()))?
            .text()
            .context("Failed to read sync response")?;

        check_reply(&body)
    }
}

/// Script endpoints answer 200 even when the script fails; a JSON body with
/// `"status": "error"` is the only signal. Anything else counts as success.
fn check_reply(body: &str) -> Result<()> {
    let Ok(reply) = serde_json::from_str::<Value>(body) else {
        return Ok(());
    };
    if reply.get("status").and_then(Value::as_str) == Some("error") {
        let message = reply
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no details");
        bail!("Sync endpoint reported an error: {}", message);
    }
    Ok(())
}
