#![allow(dead_code)]

use std::time::Duration;

use rnc::query::build_params;
use rnc::{CorpusClient, FetchConfig, Query, QueryParams, SearchOptions, Subcorpus};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const SEARCH_PATH: &str = "/search.xml";
pub const COOLDOWN: Duration = Duration::from_millis(200);

pub fn search_url(server: &MockServer) -> String {
    format!("{}{SEARCH_PATH}", server.uri())
}

pub fn config(server: &MockServer) -> FetchConfig {
    FetchConfig::default()
        .with_base_url(search_url(server))
        .with_cooldown(COOLDOWN)
        .with_timeout(Duration::from_secs(5))
}

pub fn client(server: &MockServer) -> CorpusClient {
    CorpusClient::new(config(server)).expect("failed to create client")
}

pub fn params() -> QueryParams {
    build_params(&Query::word("дом"), &SearchOptions::default(), Subcorpus::Main)
        .expect("valid query")
}

/// A result page with one example and a pager advertising `total` pages.
pub fn results_page(index: usize, total: usize) -> String {
    let links: String = (1..=total)
        .filter(|n| *n != index + 1)
        .map(|n| format!(r#"<a href="search.xml?p={}">{n}</a> "#, n - 1))
        .collect();
    format!(
        r#"<html><body><div class="content">
<p class="pager">страницы: <b>{current}</b> {links}</p>
<ol><li><ul>
  <li>Пример <span class="b-wrd-expl g-em">дом</span> {index}.
    <span class="doc">[Автор. Книга {index}]</span>
    <a href="document-info.xml?docid={index}">←…→</a>
    <span class="on">[омонимия снята]</span>
  </li>
</ul></li></ol>
</div></body></html>"#,
        current = index + 1,
    )
}

/// A result page without pager, as rendered with `expand=full`.
pub fn pagerless_page(label: &str) -> String {
    format!(
        r#"<html><body><div class="content"><ul><li>{label} <span class="doc">[Источник]</span></li></ul></div></body></html>"#
    )
}

pub fn no_results_page(marker: &str) -> String {
    format!(r#"<html><body><div class="content"><p>{marker}</p></div></body></html>"#)
}

pub async fn mount_page(server: &MockServer, page: usize, body: String, expect: u64) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("p", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expect)
        .mount(server)
        .await;
}

/// Page indices of every request the server received, in arrival order.
pub async fn requested_pages(server: &MockServer) -> Vec<usize> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .filter_map(|req| {
            req.url
                .query_pairs()
                .find(|(k, _)| k == "p")
                .and_then(|(_, v)| v.parse().ok())
        })
        .collect()
}
