use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing::Level;

use seo_guard::{Article, Config, ContentItem, Engine, Keyword};

#[derive(Parser)]
#[command(
    name = "seo-guard",
    about = "Check generated articles for SEO readiness and originality before export",
    version
)]
struct Cli {
    /// Log per-component results to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an article and print the gate decision with all reports
    Evaluate {
        /// Article JSON file
        #[arg(long)]
        article: PathBuf,
        /// Reference corpus: JSON array of content items
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Config JSON file; missing fields take their defaults
        #[arg(long)]
        config: Option<PathBuf>,
        /// Evaluate against this keyword instead of the article's own
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Extract and cluster keywords from a corpus
    Keywords {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        seed: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration, including the check catalog
    Catalog,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Command::Evaluate {
            article,
            corpus,
            config,
            keyword,
        } => {
            let engine = Engine::new(load_config(config.as_deref())?)?;
            let article: Article = read_json(&article)?;
            let corpus: Vec<ContentItem> = match corpus {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let evaluation = match keyword {
                Some(term) => engine.evaluate_with_keyword(&article, &Keyword::target(term), &corpus),
                None => engine.evaluate(&article, &corpus),
            }?;
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
            if evaluation.approved() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(2))
            }
        }
        Command::Keywords {
            corpus,
            seed,
            config,
        } => {
            let engine = Engine::new(load_config(config.as_deref())?)?;
            let corpus: Vec<ContentItem> = read_json(&corpus)?;
            let keywords = engine.extract_keywords(&corpus, &seed);
            println!("{}", serde_json::to_string_pretty(&keywords)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Catalog => {
            println!("{}", serde_json::to_string_pretty(&Config::default())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
