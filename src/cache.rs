//! Local copy of a search: `<name>.csv` holds the examples (tab-separated,
//! header row first), `<name>.json` holds the request that produced them.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt};

use crate::examples::{Example, KwicExample, ParallelExample, TextExample};
use crate::query::{Output, Query, QueryParams};
use crate::subcorpus::{DocLayout, Subcorpus};
use crate::{info_time, tsv, Error, Result};

pub const DATA_EXT: &str = "csv";
pub const META_EXT: &str = "json";

/// Examples together with the request that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub query: Query,
    pub p_count: usize,
    pub params: QueryParams,
    pub subcorpus: Subcorpus,
    pub examples: Vec<Example>,
}

impl Dataset {
    pub fn output(&self) -> Output {
        output_of(&self.params)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    query: Query,
    p_count: usize,
    params: QueryParams,
    #[serde(default)]
    subcorpus: Subcorpus,
}

fn output_of(params: &QueryParams) -> Output {
    params
        .get("out")
        .and_then(Output::from_param)
        .unwrap_or_default()
}

/// Data and metadata paths sharing the stem of `path`.
/// Only a `.csv`/`.json` suffix is replaced, other dots stay in the name.
pub fn file_pair(path: impl AsRef<Path>) -> (PathBuf, PathBuf) {
    let path = path.as_ref();
    let stem = match path.extension().and_then(|ext| ext.to_str()) {
        Some(DATA_EXT | META_EXT) => path.with_extension(""),
        _ => path.to_path_buf(),
    };
    (with_suffix(&stem, DATA_EXT), with_suffix(&stem, META_EXT))
}

fn with_suffix(stem: &Path, ext: &str) -> PathBuf {
    let mut name = stem.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// A data file name under `dir` that doesn't exist yet.
pub fn unique_path(dir: impl AsRef<Path>) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
    let mut path = dir.as_ref().join(format!("rnc_{stamp}.{DATA_EXT}"));
    let mut n = 1;
    while path.exists() || path.with_extension(META_EXT).exists() {
        path = dir.as_ref().join(format!("rnc_{stamp}_{n}.{DATA_EXT}"));
        n += 1;
    }
    path
}

/// Write both files. Never overwrites: fails if either file is already there.
pub async fn dump(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let start_time = Local::now();
    let Some(first) = dataset.examples.first() else {
        log::error!("Tried to write empty data to file");
        return Err(Error::EmptyData);
    };
    let (data_path, meta_path) = file_pair(path);
    for p in [&data_path, &meta_path] {
        if fs::try_exists(p).await? {
            log::error!("Tried to write data, however {} exists", p.display());
            return Err(Error::CacheExists(p.clone()));
        }
    }

    let mut table = Vec::new();
    tsv::write_row(&mut table, &first.columns())?;
    for example in &dataset.examples {
        tsv::write_row(&mut table, &example.items())?;
    }

    let meta = Metadata {
        query: dataset.query.clone(),
        p_count: dataset.p_count,
        params: dataset.params.clone(),
        subcorpus: dataset.subcorpus,
    };
    let meta = serde_json::to_vec_pretty(&meta)?;

    write_new(&data_path, &table).await?;
    if let Err(e) = write_new(&meta_path, &meta).await {
        // a lone data file would block both load and dump of this stem
        log::error!("Cannot write {}: {e}", meta_path.display());
        if let Err(rm) = fs::remove_file(&data_path).await {
            log::error!("Cannot remove {}: {rm}", data_path.display());
        }
        return Err(e);
    }
    info_time!(
        start_time,
        "Data was written to files: {} and {}",
        data_path.display(),
        meta_path.display()
    );
    Ok(())
}

async fn write_new(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(contents).await?;
    file.flush().await?;
    Ok(())
}

/// Read both files back. Either one missing is an error.
pub async fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    let (data_path, meta_path) = file_pair(path);
    if !(fs::try_exists(&data_path).await? && fs::try_exists(&meta_path).await?) {
        log::error!("Data and config file must exist together");
        return Err(Error::CacheIncomplete {
            data: data_path,
            meta: meta_path,
        });
    }

    let meta: Metadata = serde_json::from_slice(&fs::read(&meta_path).await?)?;
    let table = fs::read_to_string(&data_path).await?;
    let mut rows = tsv::read_rows(&table).into_iter();
    let header = rows.next().ok_or_else(|| Error::CacheFormat {
        path: data_path.clone(),
        reason: "missing header row".into(),
    })?;

    let output = output_of(&meta.params);
    let examples = rows
        .map(|row| example_from_row(&header, row, meta.subcorpus, output))
        .collect::<std::result::Result<Vec<_>, String>>()
        .map_err(|reason| Error::CacheFormat {
            path: data_path.clone(),
            reason,
        })?;

    Ok(Dataset {
        query: meta.query,
        p_count: meta.p_count,
        params: meta.params,
        subcorpus: meta.subcorpus,
        examples,
    })
}

fn example_from_row(
    header: &[String],
    row: Vec<String>,
    subcorpus: Subcorpus,
    output: Output,
) -> std::result::Result<Example, String> {
    let expected = match (output, subcorpus.layout()) {
        (Output::Kwic, _) => Some(6),
        (Output::Normal, DocLayout::Plain) => Some(5),
        (Output::Normal, DocLayout::Parallel) => None,
    };
    match expected {
        Some(n) if row.len() != header.len() || row.len() != n => {
            return Err(format!(
                "expected {n} cells, got {} (header has {})",
                row.len(),
                header.len()
            ));
        }
        // language/text pairs, then source, ambiguation, wordforms and URL
        None if row.len() < 6 || row.len() % 2 != 0 => {
            return Err(format!("parallel row has {} cells", row.len()));
        }
        _ => {}
    }

    // Trailing cells are shared by every layout: ..., found wordforms, URL.
    let mut cells = row;
    let doc_url = cells.pop().unwrap_or_default();
    let found_wordforms = split_wordforms(&cells.pop().unwrap_or_default());
    let text_count = cells.len().saturating_sub(2) / 2;
    let mut cells = cells.into_iter();
    let mut next = || cells.next().unwrap_or_default();

    let example = match (output, subcorpus.layout()) {
        (Output::Kwic, _) => Example::Kwic(KwicExample {
            left: next(),
            center: next(),
            right: next(),
            source: next(),
            found_wordforms,
            doc_url,
        }),
        (Output::Normal, DocLayout::Plain) => Example::Text(TextExample {
            text: next(),
            source: next(),
            ambiguation: next(),
            found_wordforms,
            doc_url,
        }),
        (Output::Normal, DocLayout::Parallel) => {
            let mut texts = BTreeMap::new();
            for _ in 0..text_count {
                let lang = next();
                if lang.is_empty() {
                    return Err("empty language tag".into());
                }
                if texts.insert(lang.clone(), next()).is_some() {
                    return Err(format!("language `{lang}` twice in a row"));
                }
            }
            Example::Parallel(ParallelExample {
                texts,
                source: next(),
                ambiguation: next(),
                found_wordforms,
                doc_url,
            })
        }
    };
    Ok(example)
}

fn split_wordforms(cell: &str) -> Vec<String> {
    cell.split(", ")
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
