use std::sync::OnceLock;

use sha2::{Digest, Sha256};

use crate::error::Error;
use crate::options::{OptionRegistry, RequestOptions};

/// Marker separating option segments from the source URL in a request path.
const URL_MARKER: &str = "/u";

/// A single fetch-and-transform request, immutable after construction.
#[derive(Debug)]
pub struct Request {
    source_url: String,
    fingerprint: OnceLock<String>,
    pub options: RequestOptions,
}

impl Request {
    pub fn new(source_url: impl Into<String>, options: RequestOptions) -> Self {
        Self {
            source_url: source_url.into(),
            fingerprint: OnceLock::new(),
            options,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Content fingerprint of the source URL: the cache key and on-disk file
    /// name for the original bytes. Computed on first access, memoized for
    /// the lifetime of the request.
    pub fn fingerprint(&self) -> &str {
        self.fingerprint
            .get_or_init(|| hex::encode(Sha256::digest(self.source_url.as_bytes())))
    }
}

/// Strip a leading `http:/` or `https:/` scheme marker.
///
/// Single slash: the second one was already consumed as a path separator by
/// the time the URL reaches us. Returns the remaining URL and whether the
/// https form implied the ssl option. Unprefixed input passes through
/// unmodified.
pub fn parse_url(raw: &str) -> (&str, bool) {
    if let Some(rest) = raw.strip_prefix("http:/") {
        (rest, false)
    } else if let Some(rest) = raw.strip_prefix("https:/") {
        (rest, true)
    } else {
        (raw, false)
    }
}

/// Parse a full request path into a [`Request`].
///
/// Everything before the first `/u` is a `/`-delimited list of option
/// segments; everything after is the raw URL. Without the marker the whole
/// path, minus its leading `/`, is the URL and there are no options.
pub fn parse_request(path: &str, registry: &OptionRegistry) -> Result<Request, Error> {
    let (option_part, raw_url) = match path.split_once(URL_MARKER) {
        Some((before, after)) => (Some(before), after),
        None => (None, path.strip_prefix('/').unwrap_or(path)),
    };

    let (url, ssl_implied) = parse_url(raw_url);

    let mut options = match option_part {
        Some(part) => registry.parse_segments(part.split('/').skip(1))?,
        None => RequestOptions::default(),
    };
    if ssl_implied {
        options.ssl = true;
    }

    Ok(Request::new(url, options))
}
