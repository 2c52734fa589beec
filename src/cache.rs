use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::Paths;
use crate::error::Error;
use crate::request::Request;

/// Retrieves the body of a URL into an open file.
///
/// A trait so the cache can be exercised without a network: tests plug in
/// counting and failing doubles to verify the single-fetch guarantee.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &mut File) -> Result<(), Error>;
}

/// Production fetcher: a plain GET with the client's default redirect
/// handling, streaming the body to disk chunk by chunk.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Fetch {
                url: String::new(),
                message: err.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &mut File) -> Result<(), Error> {
        let fetch_err = |message: String| Error::Fetch {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| fetch_err(err.to_string()))?;

        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|err| fetch_err(err.to_string()))?;
            dest.write_all(&chunk).await?;
        }
        dest.flush().await?;
        Ok(())
    }
}

/// At-most-once-per-fingerprint download cache for original image bytes.
///
/// All fetch attempts for one fingerprint are serialized by a per-key async
/// mutex; fetches for distinct fingerprints proceed independently. The lock
/// table itself sits behind a plain mutex held only for the lookup-or-create
/// step, never across I/O. Entries are retained for the process lifetime —
/// no eviction, which is acceptable while the fingerprint space is bounded
/// by expected traffic.
pub struct Cache {
    paths: Paths,
    fetcher: Arc<dyn Fetcher>,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Cache {
    pub fn new(paths: Paths, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            paths,
            fetcher,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, fingerprint: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        locks
            .entry(fingerprint.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Make sure the original bytes for `request` exist on disk, fetching
    /// them if needed, and return the file's path.
    ///
    /// Holders of a cache hit always observe a fully written file: downloads
    /// go to a sibling `.part` file that is renamed into place only once the
    /// whole body has landed, and removed on any failure so a later attempt
    /// retries instead of serving corrupt data.
    pub async fn ensure_local(&self, request: &Request) -> Result<PathBuf, Error> {
        let fingerprint = request.fingerprint();
        let path = self.paths.original_path(fingerprint);

        let lock = self.lock_for(fingerprint);
        let _guard = lock.lock().await;

        if !request.options.force_reload && tokio::fs::try_exists(&path).await? {
            debug!(fingerprint, "cache hit");
            return Ok(path);
        }

        self.download(request, &path).await?;
        debug!(fingerprint, "original cached");
        Ok(path)
    }

    async fn download(&self, request: &Request, path: &Path) -> Result<(), Error> {
        let protocol = if request.options.ssl { "https" } else { "http" };
        let url = format!("{protocol}://{}", request.source_url());
        let partial = path.with_extension("part");

        let mut file = File::create(&partial).await?;
        let fetched = self.fetcher.fetch(&url, &mut file).await;
        drop(file);

        let committed = match fetched {
            Ok(()) => tokio::fs::rename(&partial, path).await.map_err(Error::Io),
            Err(err) => Err(err),
        };
        if committed.is_err() {
            let _ = tokio::fs::remove_file(&partial).await;
        }
        committed
    }
}
