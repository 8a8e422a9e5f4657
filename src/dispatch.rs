use std::sync::Arc;

use chrono::Local;
use log::Level;
use reqwest::Client;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinSet,
};

use crate::config::FetchConfig;
use crate::logging::LogContext;
use crate::query::QueryParams;
use crate::request::{fetch_page, PageRequest};
use crate::{ctx_log, debug_time, Error, Result, WORKERS};

type WorkQueue = Arc<Mutex<mpsc::Receiver<PageRequest>>>;

/// Fetches pages `[start; stop)` with at most [`WORKERS`] requests in flight.
///
/// The result is ordered by page index whatever order the pages arrive in.
/// The first fatal error aborts every other worker and is returned; partial
/// batches are never returned.
pub async fn fetch_range(
    client: &Client,
    url: Arc<str>,
    params: Arc<QueryParams>,
    start: usize,
    stop: usize,
    config: &FetchConfig,
    ctx: &LogContext,
) -> Result<Vec<String>> {
    if start >= stop {
        return Ok(Vec::new());
    }
    let start_time = Local::now();
    let len = stop - start;
    ctx_log!(ctx, Level::Info, "Requested: [{start}; {stop})");

    // Work queue: every request is pushed before the workers start.
    let (task_tx, task_rx) = mpsc::channel(len);
    for page in start..stop {
        task_tx
            .send(PageRequest::new(url.clone(), params.clone(), page))
            .await?;
    }
    drop(task_tx);
    let queue: WorkQueue = Arc::new(Mutex::new(task_rx));

    // Capacity covers the whole batch, so workers never wait on the collector.
    let (res_tx, mut res_rx) = mpsc::channel::<(usize, String)>(len);

    let mut workers = JoinSet::new();
    for worker_id in 0..WORKERS.min(len) {
        workers.spawn({
            // Client uses Arc so we can clone cheaply
            let client = client.clone();
            let queue = queue.clone();
            let res_tx = res_tx.clone();
            let config = config.clone();
            let ctx = ctx.clone();
            async move { worker_loop(worker_id, client, queue, res_tx, config, ctx).await }
        });
    }
    drop(res_tx);

    while let Some(joined) = workers.join_next().await {
        let outcome = joined.map_err(Error::from).and_then(|res| res);
        if let Err(e) = outcome {
            ctx_log!(ctx, Level::Error, "batch [{start}; {stop}) aborted: {e}");
            workers.abort_all();
            return Err(e);
        }
    }

    let mut pages = Vec::with_capacity(len);
    while let Some(tagged) = res_rx.recv().await {
        pages.push(tagged);
    }
    pages.sort_unstable_by_key(|(page, _)| *page);

    if pages.len() != len {
        return Err(Error::IncompleteBatch {
            start,
            stop,
            got: pages.len(),
        });
    }

    debug_time!(start_time, "Fetched {} pages", len);
    Ok(pages.into_iter().map(|(_, html)| html).collect())
}

/// Pulls one request at a time until the queue is empty or a fetch fails.
async fn worker_loop(
    worker_id: usize,
    client: Client,
    queue: WorkQueue,
    res_tx: mpsc::Sender<(usize, String)>,
    config: FetchConfig,
    ctx: LogContext,
) -> Result<()> {
    loop {
        let next = { queue.lock().await.recv().await };
        let Some(req) = next else {
            ctx_log!(ctx, Level::Trace, "worker {worker_id} done");
            return Ok(());
        };

        let page = fetch_page(&client, &req, &config, &ctx).await?;
        res_tx.send((page.index, page.html)).await?;
    }
}
