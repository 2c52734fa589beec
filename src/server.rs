use std::process::Stdio;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::process::Command;
use tracing::{error, info};

use crate::cache::{Cache, Fetcher};
use crate::command::{CONVERT_PROGRAM, convert_args};
use crate::config::{DEFAULT_FILE_SIZE, Paths};
use crate::error::Error;
use crate::options::OptionRegistry;
use crate::request::{Request, parse_request};

/// Everything a request handler needs, built once at startup.
pub struct AppState {
    registry: OptionRegistry,
    cache: Cache,
}

impl AppState {
    pub fn new(paths: Paths, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            registry: OptionRegistry::new(),
            cache: Cache::new(paths, fetcher),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handle))
        .route("/{*path}", get(handle))
        .with_state(state)
}

async fn handle(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    match process(&state, uri.path()).await {
        Ok(image) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/jpeg")],
            Body::from(image),
        )
            .into_response(),
        Err(err) => {
            error!(%err, path = uri.path(), "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Fatal error: {err}"),
            )
                .into_response()
        }
    }
}

/// Run one request through the full pipeline: parse, fetch or reuse the
/// original, transform, collect the transformed bytes.
async fn process(state: &AppState, path: &str) -> Result<Vec<u8>, Error> {
    let request = parse_request(path, &state.registry)?;
    log_request(&request);

    let original = state.cache.ensure_local(&request).await?;
    let args = convert_args(&request, &original);

    let output = Command::new(CONVERT_PROGRAM)
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Transform(stderr.trim().to_string()));
    }
    Ok(output.stdout)
}

fn log_request(request: &Request) {
    let options = &request.options;
    info!(
        url = request.source_url(),
        ssl = options.ssl,
        force_reload = options.force_reload,
        grayscale = options.grayscale,
        file_size = %options.file_size.unwrap_or(DEFAULT_FILE_SIZE),
        quality = ?options.quality,
        resize = ?options.resize,
        "handling image request"
    );
}
