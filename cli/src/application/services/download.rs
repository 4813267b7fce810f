//! Application service: fetch a file over HTTPS into the temp directory.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{HttpFetcher, LocalFs};
use crate::domain::error::ProvisionError;

/// Download `url` to `dest`, creating the parent directory if needed.
///
/// The body is written byte-for-byte, replacing any existing file. Nothing
/// is written when the server answers with a non-2xx status.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns `ProvisionError::Http` on a non-2xx status, or an error if the
/// request, directory creation or write fails.
pub async fn download_to(
    http: &impl HttpFetcher,
    fs: &impl LocalFs,
    url: &str,
    dest: &Path,
    timeout: Duration,
) -> Result<usize> {
    if let Some(dir) = dest
        .parent()
        .filter(|d| !d.as_os_str().is_empty() && !fs.exists(d))
    {
        fs.create_dir_all(dir)?;
    }

    tracing::info!(url, dest = %dest.display(), timeout_secs = timeout.as_secs(), "downloading");
    let response = http
        .get(url, timeout)
        .await
        .with_context(|| format!("downloading {url}"))?;

    if !response.is_success() {
        return Err(ProvisionError::Http {
            url: url.to_string(),
            status: response.status,
        }
        .into());
    }

    fs.write(dest, &response.body)?;
    tracing::info!(bytes = response.body.len(), dest = %dest.display(), "download saved");
    Ok(response.body.len())
}
