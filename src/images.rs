//! Image downloads
//!
//! Images are cached by file name: the last path segment of the image URL.
//! A file that already exists in the images directory is never fetched
//! again. Downloads stream into a uniquely named `.part` file that is only
//! renamed into place once complete.

use crate::error::{FetchError, Result};
use crate::fetch::PageFetcher;
use crate::stats::RunStats;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// What happened to one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Fetched and written, with the byte count
    Downloaded(u64),
    /// A file of the same name already existed
    Skipped,
    /// The URL has no usable file name
    Unnamed,
}

/// Local file name for an image URL: its last non-empty path segment
pub fn local_file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Downloads images into one directory
pub struct ImageFetcher<'a> {
    fetcher: &'a PageFetcher,
    base: &'a Url,
    dir: PathBuf,
    stats: &'a RunStats,
}

impl<'a> ImageFetcher<'a> {
    /// Create an image fetcher resolving relative sources against `base`
    pub fn new(
        fetcher: &'a PageFetcher,
        base: &'a Url,
        dir: impl Into<PathBuf>,
        stats: &'a RunStats,
    ) -> Self {
        Self {
            fetcher,
            base,
            dir: dir.into(),
            stats,
        }
    }

    /// Absolute URL for an image `src`
    pub fn resolve(&self, src: &str) -> Result<Url> {
        Ok(self.base.join(src.trim())?)
    }

    /// Local path an image `src` is cached at
    pub fn local_path(&self, src: &str) -> Result<Option<PathBuf>> {
        let url = self.resolve(src)?;
        Ok(local_file_name(&url).map(|name| self.dir.join(name)))
    }

    /// Download one image unless it is already cached
    #[instrument(skip(self))]
    pub async fn fetch(&self, src: &str) -> Result<ImageOutcome> {
        let url = self.resolve(src)?;
        let Some(name) = local_file_name(&url) else {
            warn!("Image URL has no file name: {}", url);
            return Ok(ImageOutcome::Unnamed);
        };
        let path = self.dir.join(&name);

        if tokio::fs::try_exists(&path).await? {
            info!("image already exists: {}", path.display());
            self.stats.record_image_skipped();
            return Ok(ImageOutcome::Skipped);
        }

        info!("fetch image: {}", url);
        let response = self.fetcher.get(url.as_str()).await?;
        let part = self
            .dir
            .join(format!("{}.{}.part", name, uuid::Uuid::new_v4()));

        let written = match self.write_through(response, url.as_str(), &part, &path).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&part).await {
                    debug!("Could not remove {}: {}", part.display(), rm);
                }
                return Err(e);
            }
        };

        info!("finish fetch image: {}", url);
        self.stats.record_image_downloaded(written);
        Ok(ImageOutcome::Downloaded(written))
    }

    /// Stream a response body into `part`, then rename it to `path`
    async fn write_through(
        &self,
        mut response: reqwest::Response,
        url: &str,
        part: &Path,
        path: &Path,
    ) -> Result<u64> {
        let mut file = tokio::fs::File::create(part).await?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::from_reqwest(url, self.fetcher.timeout_secs(), e))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);
        tokio::fs::rename(part, path).await?;
        Ok(written)
    }
}
