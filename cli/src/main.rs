mod ingest;
mod render;
mod repl;

use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use client::config::{ClientConfig, DEFAULT_BASE_URL, SuggestMode};
use client::net::api::{ApiError, HttpSearchApi, SearchApi};
use client::state::bible::BibleSearchSettings;
use client::state::chat::ExportError;
use client::state::testimony::TestimonySearch;
use serde::Serialize;
use tracing::Level;
use wire::{ContentType, ModelType, ResultCount, term_key};

use crate::ingest::IngestError;
use crate::repl::{ChatSurface, Repl};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
    #[error("ingest failed: {0}")]
    Ingest(#[from] IngestError),
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("no search terms left to send")]
    NoTerms,
}

#[derive(Parser, Debug)]
#[command(name = "bible-search", about = "Bible passage and testimony search CLI")]
struct Cli {
    #[arg(long, env = "BIBLE_SEARCH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// `eager` loads suggestions as soon as a query is typed, `submit` only
    /// when searching.
    #[arg(long, env = "BIBLE_SEARCH_SUGGEST_MODE", default_value = "submit")]
    suggest_mode: SuggestMode,

    #[arg(long, env = "BIBLE_SEARCH_EXPORT_DIR", default_value = ".")]
    export_dir: PathBuf,

    /// Log client activity to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the service is up.
    Ping,
    /// Find passages for a free-text query.
    Bible {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        #[command(flatten)]
        settings: BibleArgs,
    },
    /// Show the enriched user terms and AI-suggested related terms.
    Suggest {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Rank testimonies by hits on the assembled term list.
    Testimonies {
        /// Comma-separated terms.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Search only the typed terms.
        #[arg(long)]
        no_ai: bool,
        /// Include plural and tense forms of every term.
        #[arg(long)]
        derivatives: bool,
        /// Leave out a suggested term. Repeatable.
        #[arg(long, value_name = "TERM")]
        exclude: Vec<String>,
    },
    /// Interactive chat session.
    Chat {
        #[arg(value_enum)]
        surface: SurfaceArg,
        #[command(flatten)]
        settings: BibleArgs,
    },
    /// Build the testimony corpus file from a folder of `.docx` documents.
    Ingest {
        dir: PathBuf,
        #[arg(long, default_value = "testimonies.jsonl")]
        output: PathBuf,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct BibleArgs {
    #[arg(long, default_value = "few")]
    result_count: ResultCount,
    #[arg(long, default_value = "verses")]
    content_type: ContentType,
    #[arg(long, default_value = "fast")]
    model_type: ModelType,
}

impl From<BibleArgs> for BibleSearchSettings {
    fn from(args: BibleArgs) -> Self {
        Self { result_count: args.result_count, content_type: args.content_type, model_type: args.model_type }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SurfaceArg {
    Bible,
    Testimony,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();

    let config = ClientConfig::new(&cli.base_url).with_suggest_mode(cli.suggest_mode);
    let api = HttpSearchApi::new(&config)?;

    match cli.command {
        Command::Ping => run_ping(&api).await,
        Command::Bible { query, settings } => {
            let response = api.search_passages(&query.join(" "), &settings.into()).await?;
            print_json(&response)
        }
        Command::Suggest { query } => {
            let result = api.suggest_terms(&query.join(" ")).await?;
            print_json(&result)
        }
        Command::Testimonies { query, no_ai, derivatives, exclude } => {
            run_testimonies(&api, &query.join(" "), !no_ai, derivatives, &exclude).await
        }
        Command::Chat { surface, settings } => {
            let surface = match surface {
                SurfaceArg::Bible => ChatSurface::bible(settings.into()),
                SurfaceArg::Testimony => ChatSurface::testimony(&config),
            };
            let mut repl = Repl::new(surface, cli.export_dir);
            repl.run(&api, io::stdin().lock(), &mut io::stdout().lock()).await
        }
        Command::Ingest { dir, output } => run_ingest(&dir, &output),
    }
}

fn run_ingest(dir: &Path, output: &Path) -> Result<(), CliError> {
    let summary = ingest::ingest_dir(dir, output)?;
    println!("wrote {} testimonies to {}", summary.files, output.display());
    println!("  with links: {}", summary.with_links);
    println!("  total links: {}", summary.links);
    if summary.failed > 0 {
        println!("  unreadable: {}", summary.failed);
    }
    Ok(())
}

async fn run_ping<A: SearchApi + ?Sized>(api: &A) -> Result<(), CliError> {
    api.health().await?;
    println!("ok");
    Ok(())
}

/// Assemble the term list the testimony surface would send, then search.
async fn run_testimonies<A: SearchApi + ?Sized>(
    api: &A,
    query: &str,
    ai_suggestions: bool,
    derivatives: bool,
    exclude: &[String],
) -> Result<(), CliError> {
    let mut search = TestimonySearch::new(SuggestMode::Eager);
    search.set_ai_enabled(ai_suggestions);
    search.set_include_derivatives(derivatives);
    search.set_input(query);
    if ai_suggestions || derivatives {
        search.refresh_suggestions(api).await;
    }
    if let Some(notice) = search.session.notice() {
        eprintln!("{notice}");
    }

    let excluded: Vec<String> = exclude.iter().map(|term| term_key(term)).collect();
    let dropped: Vec<String> = search
        .suggestions()
        .iter()
        .filter(|s| excluded.contains(&term_key(&s.term)))
        .map(|s| s.term.clone())
        .collect();
    for term in &dropped {
        search.remove_suggestion(term);
    }

    let terms = search.assembled_terms();
    if terms.is_empty() {
        return Err(CliError::NoTerms);
    }
    let response = api.search_testimonies(&terms).await?;
    print_json(&response)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
