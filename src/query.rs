//! Query building: turns a [`Query`] and [`SearchOptions`] into the flat
//! parameter mapping sent with every page request.
//!
//! Values are stored decoded (`дом кот`, `(S),(acc|gen)`); reqwest form-encodes
//! them on the wire, so spaces travel as `+` and brackets as `%28`/`%29`.

use std::collections::BTreeMap;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::subcorpus::Subcorpus;
use crate::{Error, Result};

/// Reserved key carrying the page index.
pub const PAGE_KEY: &str = "p";

const DEFAULT_DPP: u32 = 5;
const DEFAULT_SPD: u32 = 10;
const DEFAULT_SORT: &str = "i_grtagging";
const DEFAULT_MIN: u32 = 1;
const DEFAULT_MAX: u32 = 3;

/// Flat, already resolved request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter. The page key is ignored: pages are set per request.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        if key != PAGE_KEY {
            self.0.insert(key, value.to_string());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parameter pairs of one page request, `p` last.
    pub fn with_page(&self, page: usize) -> Vec<(&str, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .chain(std::iter::once((PAGE_KEY, page.to_string())))
            .collect()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.set(k, v);
        }
        params
    }
}

/// What to search for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Exact phrase search.
    Lexform(String),
    /// Word list with grammar filters and distances.
    Lexgramm(Vec<WordQuery>),
}

impl Query {
    /// A single lexgramm word without filters.
    pub fn word(word: impl Into<String>) -> Self {
        Query::Lexgramm(vec![WordQuery::new(word)])
    }

    pub fn lexform(phrase: impl Into<String>) -> Self {
        Query::Lexform(phrase.into())
    }

    /// Requested words, in order.
    pub fn forms(&self) -> Vec<&str> {
        match self {
            Query::Lexform(phrase) => vec![phrase.as_str()],
            Query::Lexgramm(words) => words.iter().map(|w| w.word.as_str()).collect(),
        }
    }

    fn text_mode(&self) -> &'static str {
        match self {
            Query::Lexform(_) => "lexform",
            Query::Lexgramm(_) => "lexgramm",
        }
    }
}

/// One word of a lexgramm query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordQuery {
    pub word: String,
    /// Grammar groups: values inside a group are alternatives.
    #[serde(default)]
    pub gramm: Vec<Vec<String>>,
    #[serde(default)]
    pub flags: Vec<Vec<String>>,
    /// Semantic filters. Accepted, not sent: the endpoint has no stable key for them.
    #[serde(default)]
    pub sem: Vec<Vec<String>>,
    /// Distance to the previous word.
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
}

impl WordQuery {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Default::default()
        }
    }

    pub fn gramm<I, S>(mut self, group: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gramm.push(group.into_iter().map(Into::into).collect());
        self
    }

    pub fn flags<I, S>(mut self, group: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.push(group.into_iter().map(Into::into).collect());
        self
    }

    pub fn sem<I, S>(mut self, group: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sem.push(group.into_iter().map(Into::into).collect());
        self
    }

    pub fn distance(mut self, min: u32, max: u32) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }
}

/// Output layout of a result page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    #[default]
    Normal,
    Kwic,
}

impl Output {
    pub fn as_str(&self) -> &'static str {
        match self {
            Output::Normal => "normal",
            Output::Kwic => "kwic",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(Output::Normal),
            "kwic" => Some(Output::Kwic),
            _ => None,
        }
    }
}

/// Request options other than the query itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Documents per page.
    pub dpp: u32,
    /// Sentences per document.
    pub spd: u32,
    pub out: Output,
    /// Words of context, only sent with KWIC output.
    pub kwsz: Option<u32>,
    pub sort: String,
    /// Show accents on words.
    pub accent: bool,
    /// `mycorp` token restricting the search to a user subcorpus.
    pub mycorp: Option<String>,
    /// `full` shows the whole document part.
    pub expand: Option<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            dpp: DEFAULT_DPP,
            spd: DEFAULT_SPD,
            out: Output::Normal,
            kwsz: None,
            sort: DEFAULT_SORT.to_string(),
            accent: false,
            mycorp: None,
            expand: None,
        }
    }
}

/// Build the request parameters. Fails before any network call on an empty query.
pub fn build_params(
    query: &Query,
    options: &SearchOptions,
    subcorpus: Subcorpus,
) -> Result<QueryParams> {
    let mut params = QueryParams::new();
    params
        .set("env", "alpha")
        .set("api", "1.0")
        .set("lang", "en")
        .set("mode", subcorpus.mode())
        .set("dpp", options.dpp)
        .set("spd", options.spd)
        .set("text", query.text_mode())
        .set("out", options.out.as_str())
        .set("sort", &options.sort)
        .set("nodia", u8::from(!options.accent));

    if options.out == Output::Kwic {
        if let Some(kwsz) = options.kwsz {
            params.set("kwsz", kwsz);
        }
    }
    if let Some(mycorp) = &options.mycorp {
        params.set("mycorp", mycorp);
    }
    if let Some(expand) = &options.expand {
        params.set("expand", expand);
    }

    match query {
        Query::Lexform(phrase) => {
            params.set("req", join_words(phrase)?);
        }
        Query::Lexgramm(words) => {
            if words.is_empty() {
                return Err(Error::EmptyQuery);
            }
            for (idx, word) in words.iter().enumerate() {
                add_word(&mut params, idx + 1, word)?;
            }
        }
    }

    Ok(params)
}

fn add_word(params: &mut QueryParams, num: usize, word: &WordQuery) -> Result<()> {
    if num > 1 {
        params.set(format!("min{num}"), word.min.unwrap_or(DEFAULT_MIN));
        params.set(format!("max{num}"), word.max.unwrap_or(DEFAULT_MAX));
    }
    params.set(format!("lex{num}"), join_words(&word.word)?);

    if !word.gramm.is_empty() {
        params.set(format!("gramm{num}"), join_groups(&word.gramm, "|", true)?);
    }
    if !word.flags.is_empty() {
        params.set(format!("flags{num}"), join_groups(&word.flags, " ", false)?);
    }
    // sem groups are still validated
    if !word.sem.is_empty() {
        join_groups(&word.sem, "", false)?;
    }
    Ok(())
}

/// Collapse whitespace. Whitespace-only input is an empty query.
fn join_words(text: &str) -> Result<String> {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        return Err(Error::EmptyQuery);
    }
    Ok(joined)
}

fn join_groups(groups: &[Vec<String>], inside: &str, with_braces: bool) -> Result<String> {
    let mut res = Vec::with_capacity(groups.len());
    for group in groups {
        if group.is_empty() {
            return Err(Error::InvalidQuery("empty tag group".into()));
        }
        if let Some(bad) = group
            .iter()
            .find(|v| v.is_empty() || v.chars().any(char::is_whitespace))
        {
            return Err(Error::InvalidQuery(format!(
                "tag `{bad}` must be non-empty and without spaces"
            )));
        }
        let joined = group.join(inside);
        if with_braces {
            res.push(format!("({joined})"));
        } else {
            res.push(joined);
        }
    }
    Ok(res.join(","))
}

/// Address of the first result page, as it would open in a browser.
pub fn first_page_url(base: &str, params: &QueryParams) -> Result<String> {
    let url = Url::parse_with_params(base, params.iter()).map_err(|e| Error::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })?;
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_params_follow_options() {
        let params = build_params(
            &Query::word("дом"),
            &SearchOptions::default(),
            Subcorpus::Main,
        )
        .expect("valid query");

        assert_eq!(params.get("env"), Some("alpha"));
        assert_eq!(params.get("mode"), Some("main"));
        assert_eq!(params.get("text"), Some("lexgramm"));
        assert_eq!(params.get("dpp"), Some("5"));
        assert_eq!(params.get("spd"), Some("10"));
        assert_eq!(params.get("out"), Some("normal"));
        assert_eq!(params.get("nodia"), Some("1"));
        assert_eq!(params.get("lex1"), Some("дом"));
        assert!(!params.contains_key("min1"));
        assert!(!params.contains_key(PAGE_KEY));
    }

    #[test]
    fn lexgramm_words_get_distances_and_tags() {
        let query = Query::Lexgramm(vec![
            WordQuery::new("красивый").gramm(["A"]).gramm(["nom", "acc"]),
            WordQuery::new("дом").flags(["bmark"]).distance(2, 4),
            WordQuery::new("в"),
        ]);
        let params =
            build_params(&query, &SearchOptions::default(), Subcorpus::Main).expect("valid");

        assert_eq!(params.get("gramm1"), Some("(A),(nom|acc)"));
        assert_eq!(params.get("flags2"), Some("bmark"));
        assert_eq!(params.get("min2"), Some("2"));
        assert_eq!(params.get("max2"), Some("4"));
        assert_eq!(params.get("min3"), Some("1"));
        assert_eq!(params.get("max3"), Some("3"));
        assert_eq!(params.get("lex3"), Some("в"));
    }

    #[test]
    fn lexform_collapses_whitespace() {
        let params = build_params(
            &Query::lexform("  красивый   дом "),
            &SearchOptions::default(),
            Subcorpus::Main,
        )
        .expect("valid");
        assert_eq!(params.get("text"), Some("lexform"));
        assert_eq!(params.get("req"), Some("красивый дом"));
    }

    #[test]
    fn whitespace_query_is_rejected() {
        for query in [Query::lexform("   "), Query::word("\t\n"), Query::Lexgramm(vec![])] {
            let err = build_params(&query, &SearchOptions::default(), Subcorpus::Main)
                .unwrap_err();
            assert!(matches!(err, Error::EmptyQuery), "{query:?}");
        }
    }

    #[test]
    fn tag_with_spaces_is_rejected() {
        let query = Query::Lexgramm(vec![WordQuery::new("дом").gramm(["S acc"])]);
        let err = build_params(&query, &SearchOptions::default(), Subcorpus::Main).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[test]
    fn kwsz_only_with_kwic() {
        let mut options = SearchOptions {
            kwsz: Some(7),
            ..Default::default()
        };
        let normal = build_params(&Query::word("дом"), &options, Subcorpus::Main).unwrap();
        assert!(!normal.contains_key("kwsz"));

        options.out = Output::Kwic;
        let kwic = build_params(&Query::word("дом"), &options, Subcorpus::Main).unwrap();
        assert_eq!(kwic.get("kwsz"), Some("7"));
    }

    #[test]
    fn page_key_is_reserved() {
        let mut params = QueryParams::new();
        params.set("p", 4).set("lex1", "дом");
        assert!(!params.contains_key("p"));
        let pairs = params.with_page(2);
        assert_eq!(pairs.last(), Some(&("p", "2".to_string())));
    }

    #[test]
    fn first_page_url_is_encoded() {
        let params: QueryParams = [("lex1", "красивый дом")].into_iter().collect();
        let url = first_page_url("http://example.org/search.xml", &params).unwrap();
        assert!(url.starts_with("http://example.org/search.xml?lex1="));
        assert!(!url.contains(' '));
    }
}
