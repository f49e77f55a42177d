use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::time::Duration;

use super::parser::{read_csv_rows, RawScheduleRow};
use super::ScheduleSource;

const SHEET_PATH: &str = "/spreadsheets/d/";
const BOM: char = '\u{feff}';

/// Downloads the CSV export of a link-shared sheet.
///
/// One request per load. A failed load leaves the board as it was and the
/// user can reload, so there is no retry here.
pub struct SheetFetcher {
    client: Client,
    url: Url,
}

impl SheetFetcher {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid sheet URL {}", describe_url(url)))?;
        if url.scheme() != "https" {
            bail!("Sheet URL must use HTTPS");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .context("Failed to build sheet fetch HTTP client")?;

        Ok(Self { client, url })
    }

    pub fn fetch_csv(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .with_context(|| format!("Network error loading {}", self.describe()))?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("Loading {} failed with HTTP status {}", self.describe(), status);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .context("Failed to read sheet response body")?;

        decode_export(content_type.as_deref(), &body)
    }
}

/// Turn an export response into CSV text.
///
/// A sheet that is not shared by link answers with its sign-in page, which
/// is HTML served with status 200.
fn decode_export(content_type: Option<&str>, body: &[u8]) -> Result<String> {
    let html_type = content_type.is_some_and(|value| value.starts_with("text/html"));
    let text = std::str::from_utf8(body).context("Sheet export is not valid UTF-8")?;
    let text = text.trim_start_matches(BOM);

    if html_type || text.trim_start().starts_with('<') {
        return Err(anyhow!(
            "Got a web page instead of CSV; is the sheet shared with \"anyone with the link\"?"
        ));
    }
    Ok(text.to_string())
}

/// Loggable name for a sheet URL. Sheet ids grant access, so only a prefix
/// is shown.
fn describe_url(url: &str) -> String {
    if let Some(index) = url.find(SHEET_PATH) {
        let id: String = url[index + SHEET_PATH.len()..]
            .chars()
            .take_while(|c| *c != '/')
            .take(4)
            .collect();
        return format!("sheet {}…", id);
    }

    match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) {
        Some(host) => format!("CSV on {}", host),
        None => "CSV source".to_string(),
    }
}

impl ScheduleSource for SheetFetcher {
    fn fetch_rows(&self) -> Result<Vec<RawScheduleRow>> {
        let content = self.fetch_csv()?;
        read_csv_rows(&content)
    }

    fn describe(&self) -> String {
        describe_url(self.url.as_str())
    }
}
