//! Infrastructure implementation of the `HttpFetcher` port over reqwest.

use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt;

use crate::application::ports::{HttpFetcher, HttpResponse};

/// Production `HttpFetcher`. Streams the body and draws a progress bar when
/// `show_progress` is set.
pub struct ReqwestFetcher {
    client: reqwest::Client,
    show_progress: bool,
}

impl ReqwestFetcher {
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(show_progress: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hostprep/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            show_progress,
        })
    }
}

impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            tracing::warn!(url, status, "download refused");
            return Ok(HttpResponse {
                status,
                body: Vec::new(),
            });
        }

        let total = response.content_length();
        let pb = make_progress_bar(!self.show_progress, total);
        let mut body = Vec::with_capacity(usize::try_from(total.unwrap_or(0)).unwrap_or(0));
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.with_context(|| format!("reading response body from {url}"))?;
            body.extend_from_slice(&chunk);
            pb.inc(chunk.len() as u64);
        }
        pb.finish_and_clear();

        Ok(HttpResponse { status, body })
    }
}

fn make_progress_bar(quiet: bool, total: Option<u64>) -> indicatif::ProgressBar {
    if quiet {
        return indicatif::ProgressBar::hidden();
    }
    if let Some(t) = total {
        let pb = indicatif::ProgressBar::new(t);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("    {bar:40.cyan/dim} {percent}%  {bytes}/{total_bytes}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("━━─"),
        );
        pb
    } else {
        indicatif::ProgressBar::new_spinner()
    }
}
