use std::sync::Arc;

use log::Level;
use reqwest::{Client, StatusCode};
use tokio::time::sleep;

use crate::config::FetchConfig;
use crate::logging::LogContext;
use crate::query::QueryParams;
use crate::{ctx_log, Error, Result};

/// One page of one search. Only `page` differs between requests of a batch.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub url: Arc<str>,
    pub params: Arc<QueryParams>,
    pub page: usize,
}

impl PageRequest {
    pub fn new(url: Arc<str>, params: Arc<QueryParams>, page: usize) -> Self {
        Self { url, params, page }
    }
}

/// A fetched page, tagged with the index it was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub html: String,
}

/// Result of a single attempt. Transport errors are returned as `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(Page),
    RateLimited,
    Failure { status: StatusCode, reason: String },
}

/// Build the HTTP session shared by every request of a batch.
pub fn build_client(config: &FetchConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Performs one GET, page index sent under `p`.
pub async fn fetch_once(client: &Client, req: &PageRequest) -> Result<FetchOutcome> {
    let res = client
        .get(req.url.as_ref())
        .query(&req.params.with_page(req.page))
        .send()
        .await?;

    let status = res.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Ok(FetchOutcome::RateLimited);
    }
    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("unknown").to_string();
        return Ok(FetchOutcome::Failure { status, reason });
    }

    let bytes = res.bytes().await?;
    let html = String::from_utf8(bytes.to_vec())?;
    Ok(FetchOutcome::Success(Page {
        index: req.page,
        html,
    }))
}

/// Requests a page until it is not rate limited any more.
/// Each 429 is followed by the configured cooldown and the identical request.
pub async fn fetch_page(
    client: &Client,
    req: &PageRequest,
    config: &FetchConfig,
    ctx: &LogContext,
) -> Result<Page> {
    let mut rate_limited: u32 = 0;
    loop {
        let outcome = match fetch_once(client, req).await {
            Ok(outcome) => outcome,
            Err(e) => {
                ctx_log!(ctx, Level::Error, "Cannot get answer for page {}: {e}", req.page);
                return Err(e);
            }
        };

        match outcome {
            FetchOutcome::Success(page) => return Ok(page),
            FetchOutcome::RateLimited => {
                rate_limited += 1;
                if let Some(max) = config.max_rate_limit_retries {
                    if rate_limited > max {
                        ctx_log!(ctx, Level::Error, "page {} still 429 after {rate_limited} attempts", req.page);
                        return Err(Error::RateLimitExhausted {
                            page: req.page,
                            attempts: rate_limited,
                        });
                    }
                }
                ctx_log!(
                    ctx,
                    Level::Debug,
                    "429 Too Many Requests, page {}: wait {}ms",
                    req.page,
                    config.cooldown_ms
                );
                sleep(config.cooldown()).await;
            }
            FetchOutcome::Failure { status, reason } => {
                ctx_log!(ctx, Level::Error, "{status}: {reason} requesting page {} of {}", req.page, req.url);
                return Err(Error::Status {
                    status,
                    reason,
                    url: req.url.to_string(),
                });
            }
        }
    }
}
