pub mod automaton;
pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod options;
pub mod request;
pub mod resize;
pub mod server;

pub use cache::{Cache, Fetcher, HttpFetcher};
pub use config::{DEFAULT_FILE_SIZE, Paths};
pub use error::Error;
pub use options::{FileSize, FileUnit, OptionRegistry, RequestOptions};
pub use request::{Request, parse_request, parse_url};
pub use resize::ResizeSpec;
