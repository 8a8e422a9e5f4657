use std::collections::{BTreeMap, HashMap};

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tokio::task::spawn_blocking;

use crate::examples::{Example, KwicExample, ParallelExample, TextExample, NOT_FOUND};
use crate::query::Output;
use crate::subcorpus::{DocLayout, Subcorpus};
use crate::{Error, Result};

/// Examples of a whole search plus how often each found wordform occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPages {
    pub examples: Vec<Example>,
    pub found_wordforms: HashMap<String, usize>,
}

/// Turns the `li` elements of one result document into examples.
pub trait DocParser {
    fn parse_doc(&self, items: &[ElementRef<'_>], base: &Url) -> Result<Vec<Example>>;
}

/// Every `li` is one example sharing the source of the first one.
pub struct PlainDocParser;

/// `li` elements pair up into original and translation.
pub struct ParallelDocParser;

impl DocParser for PlainDocParser {
    fn parse_doc(&self, items: &[ElementRef<'_>], base: &Url) -> Result<Vec<Example>> {
        let Some(first) = items.first() else {
            log::info!("Empty doc found");
            return Ok(Vec::new());
        };
        // one doc – one source
        let source = get_source(first)?;

        let mut res = Vec::with_capacity(items.len());
        for li in items {
            res.push(Example::Text(TextExample {
                text: get_text(li, &source),
                source: source.clone(),
                ambiguation: get_ambiguation(li)?,
                found_wordforms: find_searched_words(li),
                doc_url: get_doc_url(li, base)?,
            }));
        }
        Ok(res)
    }
}

impl DocParser for ParallelDocParser {
    fn parse_doc(&self, items: &[ElementRef<'_>], base: &Url) -> Result<Vec<Example>> {
        let lang_sel = create_selector("span[l]")?;
        let mut res = Vec::with_capacity(items.len() / 2);

        for pair in items.chunks_exact(2) {
            let mut texts = BTreeMap::new();
            let mut found_wordforms = Vec::new();
            let mut sources = Vec::with_capacity(2);
            for li in pair {
                let lang = li
                    .select(&lang_sel)
                    .next()
                    .and_then(|span| span.value().attr("l"))
                    .map(|l| l.trim().to_string())
                    .ok_or_else(|| Error::ParseMissingSelector("span[l]".into()))?;
                let source = get_source(li)?;
                if texts.insert(lang.clone(), get_text(li, &source)).is_some() {
                    return Err(Error::ParseInvalid(format!("language `{lang}` twice in a pair")));
                }
                found_wordforms.extend(find_searched_words(li));
                sources.push(source);
            }

            // The second source names both translations when it has a `|`.
            let source = match sources.as_slice() {
                [_, second] if second.contains('|') => second.clone(),
                [first, ..] => first.clone(),
                [] => NOT_FOUND.to_string(),
            };

            res.push(Example::Parallel(ParallelExample {
                texts,
                source,
                ambiguation: get_ambiguation(&pair[0])?,
                found_wordforms,
                doc_url: get_doc_url(&pair[0], base)?,
            }));
        }
        Ok(res)
    }
}

/// Parse a page rendered with `out=normal`. Broken documents are logged and skipped.
pub fn parse_page_normal<P: DocParser>(html: &str, parser: &P, base: &Url) -> Result<Vec<Example>> {
    let doc = Html::parse_document(html);
    let ul_sel = create_selector("ul")?;
    let li_sel = create_selector("li")?;

    let mut res = Vec::new();
    for ul in doc.select(&ul_sel) {
        let items: Vec<ElementRef> = ul.select(&li_sel).collect();
        match parser.parse_doc(&items, base) {
            Ok(examples) => res.extend(examples),
            Err(e) => log::warn!("Error while parsing doc: {e}"),
        }
    }
    Ok(res)
}

/// Parse a page rendered with `out=kwic`.
pub fn parse_page_kwic(html: &str, base: &Url) -> Result<Vec<Example>> {
    let doc = Html::parse_document(html);
    let table_sel = create_selector(r#"table[align="left"]"#)?;
    let nobr_sel = create_selector("nobr")?;
    let link_sel = create_selector("a")?;

    let content = doc
        .select(&table_sel)
        .next()
        .ok_or(Error::ParseMissingContent("table[align=left]"))?;

    let nobr: Vec<ElementRef> = content.select(&nobr_sel).collect();
    if nobr.len() % 3 != 0 {
        log::warn!("Len of nobr tags list % 3 != 0: {}", nobr.len());
    }

    let mut res = Vec::with_capacity(nobr.len() / 3);
    for cells in nobr.chunks_exact(3) {
        let (left, center, right) = (&cells[0], &cells[1], &cells[2]);

        let mut found_wordforms = find_searched_words(left);
        found_wordforms.extend(find_searched_words(center));
        found_wordforms.extend(find_searched_words(right));

        let link = right.select(&link_sel).next();
        let (Some(source), Some(href)) = (
            link.and_then(|a| a.value().attr("msg")),
            link.and_then(|a| a.value().attr("href")),
        ) else {
            log::warn!("Source or url not found");
            continue;
        };

        // the right context ends with the 4-char `←…→` link
        let right_txt = clean_text_up(&element_text(right));
        let keep = right_txt.chars().count().saturating_sub(4);
        let right_txt: String = right_txt.chars().take(keep).collect();

        res.push(Example::Kwic(KwicExample {
            left: clean_text_up(&element_text(left)),
            center: clean_text_up(&element_text(center)),
            right: right_txt.trim_end().to_string(),
            source: source.trim().to_string(),
            found_wordforms,
            doc_url: join_url(base, href),
        }));
    }
    Ok(res)
}

/// Parse one page with the layout implied by the subcorpus and output mode.
pub fn parse_page(html: &str, subcorpus: Subcorpus, out: Output, base: &Url) -> Result<Vec<Example>> {
    match (out, subcorpus.layout()) {
        (Output::Kwic, _) => parse_page_kwic(html, base),
        (Output::Normal, DocLayout::Plain) => parse_page_normal(html, &PlainDocParser, base),
        (Output::Normal, DocLayout::Parallel) => parse_page_normal(html, &ParallelDocParser, base),
    }
}

/// Parse all pages off the async runtime and count the found wordforms.
pub async fn parse_pages(
    pages: Vec<String>,
    subcorpus: Subcorpus,
    out: Output,
    base: Url,
) -> Result<ParsedPages> {
    spawn_blocking(move || parse_pages_blocking(&pages, subcorpus, out, &base)).await?
}

pub fn parse_pages_blocking(
    pages: &[String],
    subcorpus: Subcorpus,
    out: Output,
    base: &Url,
) -> Result<ParsedPages> {
    let mut examples = Vec::new();
    for page in pages {
        examples.extend(parse_page(page, subcorpus, out, base)?);
    }
    let found_wordforms = count_wordforms(&examples);
    Ok(ParsedPages {
        examples,
        found_wordforms,
    })
}

/// Wordform frequencies, lower-cased with whitespace collapsed.
pub fn count_wordforms(examples: &[Example]) -> HashMap<String, usize> {
    let mut counter = HashMap::new();
    for form in examples.iter().flat_map(Example::found_wordforms) {
        let form = clean_text_up(form).to_lowercase();
        if !form.is_empty() {
            *counter.entry(form).or_insert(0) += 1;
        }
    }
    counter
}

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}

/// Collapse runs of whitespace into one space and trim.
pub fn clean_text_up(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect()
}

/// `[ ... ]` → `...`
fn strip_brackets(text: &str) -> String {
    text.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .to_string()
}

fn get_source(li: &ElementRef) -> Result<String> {
    let sel = create_selector("span.doc")?;
    Ok(li
        .select(&sel)
        .next()
        .map(|src| strip_brackets(&clean_text_up(&element_text(&src))))
        .unwrap_or_else(|| NOT_FOUND.to_string()))
}

fn get_ambiguation(li: &ElementRef) -> Result<String> {
    let on = create_selector("span.on")?;
    let off = create_selector("span.off")?;
    Ok(li
        .select(&on)
        .next()
        .or_else(|| li.select(&off).next())
        .map(|span| strip_brackets(&element_text(&span)))
        .unwrap_or_else(|| NOT_FOUND.to_string()))
}

fn get_doc_url(li: &ElementRef, base: &Url) -> Result<String> {
    let sel = create_selector("a[href]")?;
    Ok(li
        .select(&sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| join_url(base, href))
        .unwrap_or_else(|| NOT_FOUND.to_string()))
}

/// Example text without the trailing `[source]` block.
fn get_text(li: &ElementRef, source: &str) -> String {
    let mut txt = clean_text_up(&element_text(li));
    if let Some(idx) = txt.find(source) {
        txt.truncate(idx);
    }
    if let Some(idx) = txt.rfind('[') {
        txt.truncate(idx);
    }
    txt.trim().to_string()
}

/// Searched words are the direct children carrying the `g-em` class.
fn find_searched_words(tag: &ElementRef) -> Vec<String> {
    tag.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().classes().any(|c| c == "g-em"))
        .map(|el| element_text(&el).trim().to_string())
        .collect()
}

fn join_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
