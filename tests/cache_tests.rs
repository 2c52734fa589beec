use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use shrinkray::cache::{Cache, Fetcher};
use shrinkray::config::Paths;
use shrinkray::error::Error;
use shrinkray::options::RequestOptions;
use shrinkray::request::Request;

struct CountingFetcher {
    fetches: AtomicUsize,
    body: Vec<u8>,
}

impl CountingFetcher {
    fn new(body: &[u8]) -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            body: body.to_vec(),
        }
    }

    fn count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, _url: &str, dest: &mut File) -> Result<(), Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent callers pile up on the per-key lock.
        tokio::task::yield_now().await;
        dest.write_all(&self.body).await?;
        Ok(())
    }
}

struct FailingFetcher {
    fetches: AtomicUsize,
}

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn fetch(&self, url: &str, dest: &mut File) -> Result<(), Error> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // Leave some bytes behind to prove partial output is discarded.
        dest.write_all(b"partial garbage").await?;
        Err(Error::Fetch {
            url: url.to_string(),
            message: "connection reset".to_string(),
        })
    }
}

fn paths_in(dir: &tempfile::TempDir) -> Paths {
    let paths = Paths::new(dir.path());
    paths.ensure_directories().unwrap();
    paths
}

fn request(url: &str) -> Request {
    Request::new(url, RequestOptions::default())
}

#[tokio::test]
async fn test_second_call_is_a_cache_hit() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = Arc::new(CountingFetcher::new(b"image bytes"));
    let cache = Cache::new(paths_in(&dir), fetcher.clone());

    let first = cache.ensure_local(&request("example.com/a.jpg")).await.unwrap();
    let second = cache.ensure_local(&request("example.com/a.jpg")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.count(), 1);
    assert_eq!(std::fs::read(&first).unwrap(), b"image bytes");
}

#[tokio::test]
async fn test_force_reload_fetches_again() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = Arc::new(CountingFetcher::new(b"image bytes"));
    let cache = Cache::new(paths_in(&dir), fetcher.clone());

    cache.ensure_local(&request("example.com/a.jpg")).await.unwrap();

    let mut options = RequestOptions::default();
    options.force_reload = true;
    cache
        .ensure_local(&Request::new("example.com/a.jpg", options))
        .await
        .unwrap();

    assert_eq!(fetcher.count(), 2);
}

#[tokio::test]
async fn test_distinct_urls_fetch_separately() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = Arc::new(CountingFetcher::new(b"image bytes"));
    let cache = Cache::new(paths_in(&dir), fetcher.clone());

    let a = cache.ensure_local(&request("example.com/a.jpg")).await.unwrap();
    let b = cache.ensure_local(&request("example.com/b.jpg")).await.unwrap();

    assert_ne!(a, b);
    assert_eq!(fetcher.count(), 2);
}

#[tokio::test]
async fn test_concurrent_requests_fetch_once() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = Arc::new(CountingFetcher::new(b"image bytes"));
    let cache = Arc::new(Cache::new(paths_in(&dir), fetcher.clone()));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache.ensure_local(&request("example.com/a.jpg")).await
        }));
    }
    for handle in handles {
        let path = handle.await.unwrap().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"image bytes");
    }

    assert_eq!(fetcher.count(), 1);
}

#[tokio::test]
async fn test_failed_fetch_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let failing = Arc::new(FailingFetcher {
        fetches: AtomicUsize::new(0),
    });
    let paths = paths_in(&dir);
    let cache = Cache::new(paths.clone(), failing.clone());

    let req = request("example.com/a.jpg");
    let err = cache.ensure_local(&req).await.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));

    // Neither the final file nor the partial one survives the failure.
    let final_path = paths.original_path(req.fingerprint());
    assert!(!final_path.exists());
    assert!(!final_path.with_extension("part").exists());

    // A later attempt retries instead of seeing a bogus cache hit.
    cache.ensure_local(&req).await.unwrap_err();
    assert_eq!(failing.fetches.load(Ordering::SeqCst), 2);
}
