use std::collections::BTreeMap;

use regex::{NoExpand, Regex};

/// Placeholder stored when a field is absent from the page.
pub const NOT_FOUND: &str = "Not found";

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Example {
    /// Sentence with its source: main, paper, dialect, spoken and most other corpora.
    Text(TextExample),
    /// Keyword in context.
    Kwic(KwicExample),
    /// Original and translation.
    Parallel(ParallelExample),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextExample {
    pub text: String,
    pub source: String,
    pub ambiguation: String,
    pub found_wordforms: Vec<String>,
    pub doc_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KwicExample {
    pub left: String,
    pub center: String,
    pub right: String,
    pub source: String,
    pub found_wordforms: Vec<String>,
    pub doc_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelExample {
    /// Language tag to text, sorted by tag.
    pub texts: BTreeMap<String, String>,
    pub source: String,
    pub ambiguation: String,
    pub found_wordforms: Vec<String>,
    pub doc_url: String,
}

impl ParallelExample {
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.texts.get(lang).map(String::as_str)
    }
}

impl Example {
    /// Full text. KWIC contexts are joined with spaces, translations with newlines.
    pub fn text(&self) -> String {
        match self {
            Example::Text(ex) => ex.text.clone(),
            Example::Kwic(ex) => format!("{} {} {}", ex.left, ex.center, ex.right),
            Example::Parallel(ex) => ex
                .texts
                .iter()
                .map(|(lang, txt)| format!("{lang}: {txt}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Example::Text(ex) => &ex.source,
            Example::Kwic(ex) => &ex.source,
            Example::Parallel(ex) => &ex.source,
        }
    }

    pub fn doc_url(&self) -> &str {
        match self {
            Example::Text(ex) => &ex.doc_url,
            Example::Kwic(ex) => &ex.doc_url,
            Example::Parallel(ex) => &ex.doc_url,
        }
    }

    pub fn found_wordforms(&self) -> &[String] {
        match self {
            Example::Text(ex) => &ex.found_wordforms,
            Example::Kwic(ex) => &ex.found_wordforms,
            Example::Parallel(ex) => &ex.found_wordforms,
        }
    }

    /// Header of the tabular cache. Matches [`Example::items`].
    pub fn columns(&self) -> Vec<String> {
        let mut cols: Vec<String> = match self {
            Example::Text(_) => vec!["text".into(), "source".into(), "ambiguation".into()],
            Example::Kwic(_) => vec![
                "left".into(),
                "center".into(),
                "right".into(),
                "source".into(),
            ],
            // each row carries its own language tags, pairs may differ between rows
            Example::Parallel(ex) => {
                let mut cols: Vec<String> = (1..=ex.texts.len())
                    .flat_map(|n| [format!("lang{n}"), format!("text{n}")])
                    .collect();
                cols.push("source".into());
                cols.push("ambiguation".into());
                cols
            }
        };
        cols.push("found wordforms".into());
        cols.push("URL".into());
        cols
    }

    /// One row of the tabular cache.
    pub fn items(&self) -> Vec<String> {
        let wordforms = self.found_wordforms().join(", ");
        let mut row = match self {
            Example::Text(ex) => vec![ex.text.clone(), ex.source.clone(), ex.ambiguation.clone()],
            Example::Kwic(ex) => vec![
                ex.left.clone(),
                ex.center.clone(),
                ex.right.clone(),
                ex.source.clone(),
            ],
            Example::Parallel(ex) => {
                let mut row: Vec<String> = ex
                    .texts
                    .iter()
                    .flat_map(|(lang, txt)| [lang.clone(), txt.clone()])
                    .collect();
                row.push(ex.source.clone());
                row.push(ex.ambiguation.clone());
                row
            }
        };
        row.push(wordforms);
        row.push(self.doc_url().to_string());
        row
    }

    /// Wrap every found wordform in the text with `marker`.
    pub fn mark_found_words<F>(&mut self, marker: F)
    where
        F: Fn(&str) -> String,
    {
        match self {
            Example::Text(ex) => {
                ex.text = mark_found_words(&ex.text, &ex.found_wordforms, &marker);
            }
            Example::Kwic(ex) => {
                let words = &ex.found_wordforms;
                ex.left = mark_found_words(&ex.left, words, &marker);
                ex.center = mark_found_words(&ex.center, words, &marker);
                ex.right = mark_found_words(&ex.right, words, &marker);
            }
            Example::Parallel(ex) => {
                for txt in ex.texts.values_mut() {
                    *txt = mark_found_words(txt, &ex.found_wordforms, &marker);
                }
            }
        }
    }

    /// Case-insensitive substring search over the text.
    pub fn contains(&self, needle: &str) -> bool {
        self.text().to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Replace whole-word occurrences of `words` in `txt` with `marker(word)`.
pub fn mark_found_words<F>(txt: &str, words: &[String], marker: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut res = txt.to_string();
    for word in words.iter().filter(|w| !w.is_empty()) {
        let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(word))) else {
            continue;
        };
        let marked = marker(word);
        res = re.replace_all(&res, NoExpand(&marked)).into_owned();
    }
    res
}
