use std::collections::HashMap;
use std::path::Path;

use chrono::Local;
use reqwest::Url;

use crate::cache::{self, Dataset};
use crate::examples::Example;
use crate::parse::{count_wordforms, parse_pages};
use crate::process::CorpusClient;
use crate::query::{build_params, first_page_url, Output, Query, QueryParams, SearchOptions};
use crate::subcorpus::Subcorpus;
use crate::{info_time, Error, Result};

/// A search and, once requested or loaded, its examples.
#[derive(Debug, Clone)]
pub struct Corpus {
    query: Query,
    p_count: usize,
    subcorpus: Subcorpus,
    params: QueryParams,
    data: Vec<Example>,
    found_wordforms: HashMap<String, usize>,
}

impl Corpus {
    /// Fails on an empty query or a zero page count, before any network call.
    pub fn new(
        query: Query,
        p_count: usize,
        subcorpus: Subcorpus,
        options: &SearchOptions,
    ) -> Result<Self> {
        if p_count == 0 {
            log::error!("Page count must be > 0");
            return Err(Error::InvalidPageCount);
        }
        let params = build_params(&query, options, subcorpus)?;
        Ok(Self {
            query,
            p_count,
            subcorpus,
            params,
            data: Vec::new(),
            found_wordforms: HashMap::new(),
        })
    }

    /// Restore a corpus written with [`Corpus::dump`].
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let dataset = cache::load(path).await?;
        let found_wordforms = count_wordforms(&dataset.examples);
        Ok(Self {
            query: dataset.query,
            p_count: dataset.p_count,
            subcorpus: dataset.subcorpus,
            params: dataset.params,
            data: dataset.examples,
            found_wordforms,
        })
    }

    /// Validate, fetch and parse all pages. Refused while examples are present.
    pub async fn request_examples(&mut self, client: &CorpusClient) -> Result<()> {
        if !self.data.is_empty() {
            log::error!("Tried to request new examples, however data exist");
            return Err(Error::DataExists);
        }

        let start_time = Local::now();
        let pages = client.search(&self.params, self.p_count).await.map_err(|e| {
            log::error!("Query = {:?}, {}, {:?}: {e}", self.query.forms(), self.p_count, self.params);
            e
        })?;
        info_time!(start_time, "Fetched {} pages", pages.len());

        let parse_time = Local::now();
        let base = Url::parse(client.base_url()).map_err(|e| Error::InvalidUrl {
            url: client.base_url().to_string(),
            reason: e.to_string(),
        })?;
        let parsed = parse_pages(pages, self.subcorpus, self.output(), base).await?;
        info_time!(parse_time, "Parsed {} examples", parsed.examples.len());
        info_time!(start_time, "Overall time:");

        self.data = parsed.examples;
        self.found_wordforms = parsed.found_wordforms;
        Ok(())
    }

    /// Write examples and request to `<path>.csv` / `<path>.json`.
    pub async fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        let dataset = Dataset {
            query: self.query.clone(),
            p_count: self.p_count,
            params: self.params.clone(),
            subcorpus: self.subcorpus,
            examples: self.data.clone(),
        };
        cache::dump(&dataset, path).await
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn p_count(&self) -> usize {
        self.p_count
    }

    pub fn subcorpus(&self) -> Subcorpus {
        self.subcorpus
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn output(&self) -> Output {
        self.params
            .get("out")
            .and_then(Output::from_param)
            .unwrap_or_default()
    }

    pub fn data(&self) -> &[Example] {
        &self.data
    }

    pub fn found_wordforms(&self) -> &HashMap<String, usize> {
        &self.found_wordforms
    }

    /// First result page as it opens in a browser.
    pub fn url(&self, base: &str) -> Result<String> {
        first_page_url(base, &self.params)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.data.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Example> {
        self.data.get(idx)
    }

    pub fn pop(&mut self, idx: usize) -> Option<Example> {
        (idx < self.data.len()).then(|| self.data.remove(idx))
    }

    /// Sort examples by a key, e.g. text length.
    pub fn sort_by_key<K, F>(&mut self, f: F)
    where
        F: FnMut(&Example) -> K,
        K: Ord,
    {
        self.data.sort_by_key(f);
    }

    /// Mark found wordforms in every example.
    pub fn mark_found_words<F>(&mut self, marker: F)
    where
        F: Fn(&str) -> String,
    {
        for example in &mut self.data {
            example.mark_found_words(&marker);
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Example;
    type IntoIter = std::slice::Iter<'a, Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pages_are_rejected() {
        let err = Corpus::new(Query::word("дом"), 0, Subcorpus::Main, &SearchOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPageCount));
    }

    #[test]
    fn whitespace_query_is_rejected_before_network() {
        let err = Corpus::new(Query::word("   "), 1, Subcorpus::Main, &SearchOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::EmptyQuery));
    }

    #[test]
    fn subcorpus_sets_mode() {
        let corpus =
            Corpus::new(Query::word("дом"), 2, Subcorpus::Spoken, &SearchOptions::default())
                .unwrap();
        assert_eq!(corpus.params().get("mode"), Some("spoken"));
        assert!(corpus.is_empty());
        assert_eq!(corpus.output(), Output::Normal);
    }
}
