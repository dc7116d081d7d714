//! Twentyq CLI
//!
//! Plays twenty questions against a knowledge file, or inspects it.
//!
//! # Commands
//!
//! - `play` (default): interactive menu to guess, describe, compare, or print
//! - `dump`: write the tree in prefix, infix, or postfix order
//! - `dot`: write the tree as Graphviz DOT
//! - `check`: read and verify the knowledge file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};
use twentyq::config::Config;
use twentyq::dot::to_dot;
use twentyq::knowledge_base::KnowledgeBase;
use twentyq::lisp::{LispWriter, Traversal};
use twentyq::session::{self, IoConsole};

const DEFAULT_DATA_FILE: &str = "data.txt";

/// Twenty questions with a knowledge base that learns from its mistakes
#[derive(Parser)]
#[command(name = "twentyq")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Knowledge file, created on first save
    #[arg(default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu: guess, describe, compare, print, quit
    Play,

    /// Write the tree to stdout
    Dump {
        #[arg(long, value_enum, default_value_t = TraversalArg::Prefix)]
        traversal: TraversalArg,

        /// Write leaves as ("label") instead of ("label" nil nil)
        #[arg(long)]
        compact: bool,
    },

    /// Write the tree as Graphviz DOT
    Dot {
        /// Output file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Read and verify the knowledge file
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum TraversalArg {
    Prefix,
    Infix,
    Postfix,
}

impl From<TraversalArg> for Traversal {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::Prefix => Traversal::Prefix,
            TraversalArg::Infix => Traversal::Infix,
            TraversalArg::Postfix => Traversal::Postfix,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => session::play(&cli.data_file, &config, &mut IoConsole::stdio())
            .with_context(|| format!("Failed to play on {}", cli.data_file.display())),
        Commands::Dump { traversal, compact } => {
            let kb = open(&cli.data_file, &config)?;
            let writer = LispWriter::new(traversal.into()).with_compact_leaves(compact);
            writer
                .write_to(std::io::stdout().lock(), kb.tree())
                .context("Failed to write tree")
        }
        Commands::Dot { output } => {
            let kb = open(&cli.data_file, &config)?;
            let dot = to_dot(kb.tree());
            match output {
                Some(path) => fs::write(&path, dot)
                    .with_context(|| format!("Failed to write {}", path.display())),
                None => {
                    print!("{dot}");
                    Ok(())
                }
            }
        }
        Commands::Check => {
            let kb = open(&cli.data_file, &config)?;
            let tree = kb.tree();
            println!(
                "{}: {} objects, {} questions, height {}",
                cli.data_file.display(),
                tree.num_leaves(),
                tree.num_internal(),
                tree.height()
            );
            Ok(())
        }
    }
}

fn open(path: &Path, config: &Config) -> Result<KnowledgeBase> {
    KnowledgeBase::open(path, config.clone())
        .with_context(|| format!("Failed to load knowledge file {}", path.display()))
}
