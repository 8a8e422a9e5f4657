//! Async client for the Russian National Corpus search page.
//!
//! A search is validated with at most two requests (first and last page),
//! the remaining pages are fetched by a small worker pool that waits out
//! `429 Too Many Requests`, and the HTML is parsed into [`Example`]s.

pub mod cache;
pub mod config;
pub mod corpus;
pub mod dispatch;
mod error;
pub mod examples;
pub mod logging;
mod macros;
pub mod parse;
pub mod process;
pub mod query;
pub mod request;
pub mod subcorpus;
pub mod tsv;
pub mod validate;

pub use config::FetchConfig;
pub use corpus::Corpus;
pub use error::{Error, Result};
pub use examples::Example;
pub use process::{fetch_range, search, validate, CorpusClient};
pub use query::{Output, Query, QueryParams, SearchOptions, WordQuery};
pub use subcorpus::Subcorpus;
pub use validate::ValidPages;

/// Search endpoint of the corpus.
pub const RNC_URL: &str = "http://processing.ruscorpora.ru/search.xml";
/// Concurrent requests of one batch. Keeps well under the remote rate limit.
pub const WORKERS: usize = 5;
