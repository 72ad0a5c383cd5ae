use std::path::Path;

use log::{info, warn};

use crate::errors::FetchError;
use crate::file_utils::FileManager;

// @module: Cache-aside retrieval of the source document

/// Return the source document, fetching it only when no cached copy exists.
///
/// The cache is keyed by file path alone: an existing file is returned as is,
/// however old. A fresh download is written to `cache_file` verbatim before
/// being returned. Any transport or status failure is returned without retry.
pub async fn fetch_and_store<P: AsRef<Path>>(url: &str, cache_file: P) -> Result<String, FetchError> {
    let cache_file = cache_file.as_ref();
    let cache_error = |e: anyhow::Error| FetchError::Cache {
        path: cache_file.display().to_string(),
        message: format!("{:#}", e),
    };

    if FileManager::file_exists(cache_file) {
        warn!("HTML is already stored locally, skipping HTTP fetch: {}", cache_file.display());
        return FileManager::read_to_string(cache_file).map_err(cache_error);
    }

    warn!("Fetching HTML from {}", url);
    let response = reqwest::get(url).await.map_err(|e| FetchError::Request {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status_code: status.as_u16(),
        });
    }

    let html = response.text().await.map_err(|e| FetchError::Request {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    FileManager::write_to_file(cache_file, &html).map_err(cache_error)?;
    info!("Stored {} bytes from {} at {}", html.len(), url, cache_file.display());

    Ok(html)
}
