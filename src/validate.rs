//! Pre-flight check run before the bulk fetch of a search.
//!
//! Two pages at most are fetched here (the first and the last requested one)
//! and both are handed back so the bulk fetch never requests them again.

use std::sync::Arc;

use log::Level;
use reqwest::Client;
use scraper::Html;

use crate::config::FetchConfig;
use crate::logging::LogContext;
use crate::parse::create_selector;
use crate::query::QueryParams;
use crate::request::{fetch_page, PageRequest};
use crate::{ctx_log, Error, Result};

/// "Nothing found" messages, in both languages the endpoint answers in.
pub const NO_RESULTS_MARKERS: [&str; 2] = [
    "По этому запросу ничего не найдено.",
    "No results match the search query.",
];

/// First and last requested pages, already fetched.
/// With a single requested page both hold the same HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPages {
    pub first: String,
    pub last: String,
}

/// Check that the search yields results and that page `p_count - 1` exists.
///
/// Fails with [`Error::WrongRequest`], [`Error::NoResultFound`] or
/// [`Error::LastPageMissing`]. Issues one request when `p_count == 1`, two otherwise.
pub async fn validate(
    client: &Client,
    url: Arc<str>,
    params: Arc<QueryParams>,
    p_count: usize,
    config: &FetchConfig,
    ctx: &LogContext,
) -> Result<ValidPages> {
    if p_count == 0 {
        return Err(Error::InvalidPageCount);
    }

    let first_req = PageRequest::new(url.clone(), params.clone(), 0);
    let first = fetch_page(client, &first_req, config, ctx)
        .await
        .map_err(|e| Error::WrongRequest(Box::new(e)))?
        .html;

    if !has_results(&first)? {
        ctx_log!(ctx, Level::Warn, "No result found");
        return Err(Error::NoResultFound);
    }

    if p_count == 1 {
        return Ok(ValidPages {
            last: first.clone(),
            first,
        });
    }

    let last_req = PageRequest::new(url, params, p_count - 1);
    let last = fetch_page(client, &last_req, config, ctx)
        .await
        .map_err(|e| Error::WrongRequest(Box::new(e)))?
        .html;

    check_last_page(&first, &last, p_count)?;
    ctx_log!(ctx, Level::Debug, "request is valid, {p_count} pages");
    Ok(ValidPages { first, last })
}

/// Whether the main content region lacks the "nothing found" message.
/// Pages without the content container are searched as a whole.
pub fn has_results(html: &str) -> Result<bool> {
    let doc = Html::parse_document(html);
    let content_sel = create_selector("div.content")?;

    let text: String = match doc.select(&content_sel).next() {
        Some(content) => content.text().collect(),
        None => doc.root_element().text().collect(),
    };
    Ok(!NO_RESULTS_MARKERS.iter().any(|m| text.contains(m)))
}

/// The endpoint redirects to the first page when the requested one doesn't exist.
///
/// With a pager, the largest page number it advertises must reach `p_count`.
/// Without one (full expansion, KWIC), the last page must differ from the first.
pub fn check_last_page(first: &str, last: &str, p_count: usize) -> Result<()> {
    match max_advertised_page(last)? {
        Some(Some(max)) if max >= p_count => Ok(()),
        Some(available) => Err(Error::LastPageMissing {
            requested: p_count,
            available,
        }),
        None if first == last => Err(Error::LastPageMissing {
            requested: p_count,
            available: None,
        }),
        None => Ok(()),
    }
}

/// `None` without a pager, `Some(None)` for a pager without page numbers.
fn max_advertised_page(html: &str) -> Result<Option<Option<usize>>> {
    let doc = Html::parse_document(html);
    let pager_sel = create_selector("p.pager")?;
    let num_sel = create_selector("b, a")?;

    let Some(pager) = doc.select(&pager_sel).next() else {
        return Ok(None);
    };
    let max = pager
        .select(&num_sel)
        .filter_map(|el| el.text().collect::<String>().trim().parse::<usize>().ok())
        .max();
    Ok(Some(max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(current: usize, links: &[usize]) -> String {
        let links: String = links
            .iter()
            .map(|n| format!(r#"<a href="?p={}">{n}</a> "#, n - 1))
            .collect();
        format!(r##"<html><body><div class="content"><p class="pager">страницы: <b>{current}</b> {links}<a href="#">следующая</a></p></div></body></html>"##)
    }

    #[test]
    fn detects_both_markers() {
        for marker in NO_RESULTS_MARKERS {
            let html = format!(r#"<div class="content"><p>{marker}</p></div>"#);
            assert!(!has_results(&html).unwrap());
        }
        assert!(has_results(r#"<div class="content"><ul><li>пример</li></ul></div>"#).unwrap());
    }

    #[test]
    fn marker_outside_content_is_ignored() {
        let html = format!(
            r#"<div class="help">{}</div><div class="content"><ul><li>x</li></ul></div>"#,
            NO_RESULTS_MARKERS[1]
        );
        assert!(has_results(&html).unwrap());
    }

    #[test]
    fn pager_max_must_reach_requested_count() {
        let last = pager(3, &[1, 2, 4, 5]);
        assert!(check_last_page("first", &last, 3).is_ok());
        assert!(check_last_page("first", &last, 5).is_ok());

        let err = check_last_page("first", &last, 6).unwrap_err();
        assert!(matches!(
            err,
            Error::LastPageMissing {
                requested: 6,
                available: Some(5)
            }
        ));
    }

    #[test]
    fn pager_without_numbers_means_missing() {
        let last = r##"<p class="pager"><a href="#">следующая</a></p>"##;
        let err = check_last_page("first", last, 2).unwrap_err();
        assert!(matches!(err, Error::LastPageMissing { available: None, .. }));
    }

    #[test]
    fn without_pager_compares_pages() {
        assert!(check_last_page("<p>one</p>", "<p>two</p>", 2).is_ok());
        assert!(matches!(
            check_last_page("<p>one</p>", "<p>one</p>", 2),
            Err(Error::LastPageMissing { .. })
        ));
    }
}
