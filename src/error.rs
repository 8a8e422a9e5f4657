use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;
use tokio::sync::mpsc;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // -- Fetch
    #[error("Reqwest Error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{status} ({reason}) requesting {url}")]
    Status {
        status: StatusCode,
        reason: String,
        url: String,
    },
    #[error("Page {page} is still rate limited after {attempts} attempts")]
    RateLimitExhausted { page: usize, attempts: u32 },
    #[error("Page body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Batch [{start}; {stop}) returned {got} pages")]
    IncompleteBatch {
        start: usize,
        stop: usize,
        got: usize,
    },

    // -- Validation
    #[error("No result found")]
    NoResultFound,
    #[error("Wrong HTTP request: {0}")]
    WrongRequest(#[source] Box<Error>),
    #[error("Last page doesn't exist: requested {requested}, available {available:?}")]
    LastPageMissing {
        requested: usize,
        available: Option<usize>,
    },

    // -- Query
    #[error("Query must not be empty or whitespace")]
    EmptyQuery,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Page count must be > 0")]
    InvalidPageCount,
    #[error("Invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    // -- Parse
    #[error("The selector you are trying to scrape for is missing. Selector: {0}")]
    ParseMissingSelector(String),
    #[error("Page content container `{0}` not found")]
    ParseMissingContent(&'static str),
    #[error("Unexpected document structure: {0}")]
    ParseInvalid(String),

    // -- Cache
    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Files with data still exist: {0}")]
    CacheExists(PathBuf),
    #[error("Data and config file must exist together: {data} / {meta}")]
    CacheIncomplete { data: PathBuf, meta: PathBuf },
    #[error("Malformed cache file {path}: {reason}")]
    CacheFormat { path: PathBuf, reason: String },
    #[error("There're no data to write")]
    EmptyData,
    #[error("Data still exist, request refused")]
    DataExists,

    // -- Config
    #[error("Configuration error: {0}")]
    Config(String),

    // -- Runtime
    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
    #[error("Couldn't send a page through a channel.")]
    RuntimeSendError,
}

impl Error {
    /// Whether the request itself was fine but cannot be satisfied.
    pub fn is_semantic(&self) -> bool {
        matches!(self, Error::NoResultFound | Error::LastPageMissing { .. })
    }
}

impl<T> From<mpsc::error::SendError<T>> for Error {
    fn from(_value: mpsc::error::SendError<T>) -> Self {
        Error::RuntimeSendError
    }
}
