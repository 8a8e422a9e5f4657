use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use rnc::subcorpus::{parallel, person};
use rnc::{
    info_time, logging, Corpus, CorpusClient, FetchConfig, Output, Query, Result, SearchOptions,
    Subcorpus,
};

/// Search the Russian National Corpus and print or save the examples.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Word to search for (lexgramm), or a phrase with --lexform
    query: String,

    /// Number of result pages to request
    #[arg(short, long, default_value_t = 1)]
    pages: usize,

    /// Search the exact phrase instead of a word
    #[arg(long)]
    lexform: bool,

    /// Subcorpus mode, e.g. main, para, spoken
    #[arg(short, long, default_value = "main")]
    mode: String,

    /// Keyword-in-context output
    #[arg(long)]
    kwic: bool,

    /// Only texts by this author: pushkin, dostoyevsky, tolstoy, chekhov, gogol, turgenev
    #[arg(short, long)]
    author: Option<String>,

    /// Parallel corpora only: texts paired with this language, e.g. english, german
    #[arg(short, long, conflicts_with = "author")]
    lang: Option<String>,

    /// JSON file with fetch settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save the examples to <FILE>.csv and <FILE>.json
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let start_time = Local::now();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => FetchConfig::from_file(path)?,
        None => FetchConfig::from_env(),
    };
    let subcorpus = Subcorpus::from_mode(&args.mode)
        .ok_or_else(|| rnc::Error::Config(format!("unknown subcorpus mode `{}`", args.mode)))?;
    let query = if args.lexform {
        Query::lexform(args.query.as_str())
    } else {
        Query::word(args.query.as_str())
    };
    let mycorp = match (&args.author, &args.lang) {
        (Some(name), _) => Some(
            person::by_name(name)
                .ok_or_else(|| rnc::Error::Config(format!("no subcorpus token for `{name}`")))?
                .to_string(),
        ),
        (None, Some(lang)) => Some(
            parallel::by_name(lang)
                .ok_or_else(|| rnc::Error::Config(format!("no parallel subcorpus for `{lang}`")))?
                .to_string(),
        ),
        (None, None) => None,
    };
    let options = SearchOptions {
        out: if args.kwic { Output::Kwic } else { Output::Normal },
        mycorp,
        ..Default::default()
    };

    let client = CorpusClient::new(config)?;
    let mut corpus = Corpus::new(query, args.pages, subcorpus, &options)?;
    match corpus.request_examples(&client).await {
        Ok(()) => {}
        Err(e) if e.is_semantic() => {
            log::warn!("{e}");
            eprintln!("{e}");
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    match &args.out {
        Some(path) => corpus.dump(path).await?,
        None => {
            for (num, example) in corpus.iter().enumerate() {
                println!("{}.\n{}\n[{}]\n", num + 1, example.text(), example.source());
            }
        }
    }

    info_time!(start_time, "Full program time:");
    Ok(())
}
