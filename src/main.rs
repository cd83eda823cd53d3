use std::{fs, io::{self, BufRead, Write}, path::PathBuf, time::Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tf_idf_recommender::{catalog, initialize, IndexData, Recommendation, SimilarityIndex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const EMPTY_QUERY_MESSAGE: &str = "Please enter a movie title.";

/// Recommend titles with similar descriptions
#[derive(Parser, Debug)]
#[command(name = "tf-idf-recommender")]
#[command(about = "Content-based title recommendations over a TF-IDF similarity index")]
#[command(version)]
struct Cli {
    /// JSON corpus file: [{"title": .., "description": ..}]. Built-in catalog when omitted
    #[arg(short, long, env = "RECOMMENDER_CORPUS")]
    corpus: Option<PathBuf>,

    /// Number of recommendations per query
    #[arg(short = 'n', long, env = "RECOMMENDER_TOP_N", default_value_t = tf_idf_recommender::DEFAULT_TOP_N,
          value_parser = parse_top_n)]
    top_n: usize,

    /// Query once and exit; interactive prompt otherwise
    #[arg(short, long)]
    query: Option<String>,

    /// Serve from an index snapshot instead of building one
    #[arg(long, conflicts_with = "corpus")]
    load_snapshot: Option<PathBuf>,

    /// Write the built index as a CBOR snapshot and exit
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Query title given without --query
    title: Vec<String>,
}

fn parse_top_n(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("`{s}` is not a positive integer")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let program_start = Instant::now();

    let index = load_index(&cli)?;

    if let Some(path) = &cli.snapshot {
        let bytes = index.to_cbor().context("failed to encode snapshot")?;
        fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "snapshot written");
        return Ok(());
    }

    let positional = cli.title.join(" ");
    let query = cli.query.clone().or_else(|| (!positional.is_empty()).then_some(positional));
    match query {
        Some(q) => run_single_query(&index, &q, cli.top_n)?,
        None => run_interactive(&index, cli.top_n)?,
    }

    info!(elapsed_ms = program_start.elapsed().as_secs_f64() * 1000.0, "program finished");
    Ok(())
}

fn load_index(cli: &Cli) -> Result<SimilarityIndex> {
    let load_start = Instant::now();
    let index = if let Some(path) = &cli.load_snapshot {
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        IndexData::<f64>::from_cbor(&bytes)
            .and_then(IndexData::into_index)
            .with_context(|| format!("invalid snapshot {}", path.display()))?
    } else {
        let documents = match &cli.corpus {
            Some(path) => catalog::load_json(path)
                .with_context(|| format!("failed to load corpus {}", path.display()))?,
            None => catalog::reference_corpus(),
        };
        initialize(documents).context("failed to build index")?
    };
    if index.is_empty() {
        bail!("no documents loaded");
    }
    info!(
        doc_num = index.len(),
        vocab_size = index.vocabulary().len(),
        elapsed_ms = load_start.elapsed().as_secs_f64() * 1000.0,
        "index loaded"
    );
    Ok(index)
}

/// Render one query's result, blank queries included
fn print_recommendation(out: &mut impl Write, index: &SimilarityIndex, query: &str, top_n: usize) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        writeln!(out, "{}", EMPTY_QUERY_MESSAGE)?;
        return Ok(());
    }
    let start = Instant::now();
    let rec = index.recommend(query, top_n)?;
    tracing::debug!(query, elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "query scored");
    match &rec {
        Recommendation::NotFound { .. } => writeln!(out, "{}", rec)?,
        Recommendation::Found(hits) if hits.is_empty() => writeln!(out, "(no other titles in corpus)")?,
        Recommendation::Found(hits) => {
            writeln!(out, "Top Recommendations:")?;
            writeln!(out, "{}", hits)?;
        }
    }
    Ok(())
}

fn run_single_query(index: &SimilarityIndex, query: &str, top_n: usize) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_recommendation(&mut out, index, query, top_n)
}

fn run_interactive(index: &SimilarityIndex, top_n: usize) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    prompt_loop(stdin.lock(), stdout.lock(), index, top_n)?;
    info!("bye");
    Ok(())
}

/// Answer one title per line until end of input, `exit` or `quit`.
/// Blank lines get the empty-query message and the prompt again.
fn prompt_loop(mut input: impl BufRead, mut out: impl Write, index: &SimilarityIndex, top_n: usize) -> Result<()> {
    loop {
        write!(out, "Title> ")?;
        out.flush()?;
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "read error");
                break;
            }
        }
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        print_recommendation(&mut out, index, trimmed, top_n)?;
    }
    Ok(())
}
