use std::sync::Arc;

use chrono::Local;
use reqwest::{Client, Url};

use crate::config::FetchConfig;
use crate::dispatch;
use crate::logging::LogContext;
use crate::query::QueryParams;
use crate::request::{build_client, fetch_page, Page, PageRequest};
use crate::validate::{self, ValidPages};
use crate::{info_time, Error, Result};

/// Fetch pages `[0; p_count)` of a search.
///
/// The validator fetches the first and the last page; only the pages between
/// them are fetched by the dispatcher, so the total is `p_count` requests.
pub async fn search(
    client: &Client,
    url: Arc<str>,
    params: Arc<QueryParams>,
    p_count: usize,
    config: &FetchConfig,
    ctx: &LogContext,
) -> Result<Vec<String>> {
    let start_time = Local::now();
    let ValidPages { first, last } =
        validate::validate(client, url.clone(), params.clone(), p_count, config, ctx).await?;

    if p_count == 1 {
        info_time!(start_time, "Fetched 1 page");
        return Ok(vec![first]);
    }

    let middle = dispatch::fetch_range(client, url, params, 1, p_count - 1, config, ctx).await?;

    let mut pages = Vec::with_capacity(p_count);
    pages.push(first);
    pages.extend(middle);
    pages.push(last);
    info_time!(start_time, "Fetched {} pages", pages.len());
    Ok(pages)
}

/// A session against the search endpoint: one connection pool, one config, one log handle.
#[derive(Debug, Clone)]
pub struct CorpusClient {
    http: Client,
    config: Arc<FetchConfig>,
    url: Arc<str>,
    ctx: LogContext,
}

impl CorpusClient {
    pub fn new(config: FetchConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| Error::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let http = build_client(&config)?;
        Ok(Self {
            http,
            url: config.base_url.as_str().into(),
            config: Arc::new(config),
            ctx: LogContext::default(),
        })
    }

    pub fn with_log_context(mut self, ctx: LogContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.url
    }

    pub fn log_context(&self) -> &LogContext {
        &self.ctx
    }

    pub async fn fetch_page(&self, params: &QueryParams, page: usize) -> Result<Page> {
        let req = PageRequest::new(self.url.clone(), Arc::new(params.clone()), page);
        fetch_page(&self.http, &req, &self.config, &self.ctx).await
    }

    pub async fn fetch_range(
        &self,
        params: &QueryParams,
        start: usize,
        stop: usize,
    ) -> Result<Vec<String>> {
        dispatch::fetch_range(
            &self.http,
            self.url.clone(),
            Arc::new(params.clone()),
            start,
            stop,
            &self.config,
            &self.ctx,
        )
        .await
    }

    pub async fn validate(&self, params: &QueryParams, p_count: usize) -> Result<ValidPages> {
        validate::validate(
            &self.http,
            self.url.clone(),
            Arc::new(params.clone()),
            p_count,
            &self.config,
            &self.ctx,
        )
        .await
    }

    pub async fn search(&self, params: &QueryParams, p_count: usize) -> Result<Vec<String>> {
        search(
            &self.http,
            self.url.clone(),
            Arc::new(params.clone()),
            p_count,
            &self.config,
            &self.ctx,
        )
        .await
    }
}

/// Fetch pages `[start; stop)` from `url` with a one-off session.
pub async fn fetch_range(
    url: &str,
    params: &QueryParams,
    start: usize,
    stop: usize,
) -> Result<Vec<String>> {
    session(url)?.fetch_range(params, start, stop).await
}

/// Validate a search against `url` with a one-off session.
pub async fn validate(url: &str, params: &QueryParams, p_count: usize) -> Result<ValidPages> {
    session(url)?.validate(params, p_count).await
}

fn session(url: &str) -> Result<CorpusClient> {
    CorpusClient::new(FetchConfig::from_env().with_base_url(url))
}
