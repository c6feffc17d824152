//! CLI module for Triangulate
//!
//! Provides command-line interface parsing for the triangulate-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use crate::types::{ResearchDepth, SourceType};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Triangulate - multi-source research with cited answers
///
/// Fans a question out to Wikipedia, arXiv and NewsAPI, merges the results and
/// asks an LLM for an answer that cites them.
#[derive(Parser, Debug)]
#[command(
    name = "triangulate-server",
    version,
    about = "Triangulate - multi-source research with cited answers",
    long_about = "A research assistant server that queries Wikipedia, arXiv and NewsAPI\n\
                  concurrently and synthesizes a cited answer with an LLM.\n\n\
                  Run without arguments to start the server, or use 'ask' for a one-off query.",
    after_help = "EXAMPLES:\n    \
                  triangulate-server                                # Start the server\n    \
                  triangulate-server serve --port 9000              # Start on another port\n    \
                  triangulate-server ask \"What is CRISPR?\"          # One-off research query\n    \
                  triangulate-server ask \"LLM agents\" -d deep -s arxiv,news\n    \
                  triangulate-server config --validate              # Check triangulate.toml"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "triangulate.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Override the configured host address
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run a single research query and print the answer
    Ask {
        /// The research question
        query: String,

        /// Research depth preset
        #[arg(short, long, value_enum, default_value_t = DepthArg::Balanced)]
        depth: DepthArg,

        /// Sources to query, comma separated (wikipedia, arxiv, news)
        #[arg(short, long, value_delimiter = ',')]
        sources: Option<Vec<SourceType>>,

        /// Maximum number of sources in the answer
        #[arg(short, long)]
        max_sources: Option<i64>,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

/// Depth preset as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthArg {
    Quick,
    Balanced,
    Deep,
}

impl From<DepthArg> for ResearchDepth {
    fn from(depth: DepthArg) -> Self {
        match depth {
            DepthArg::Quick => ResearchDepth::Quick,
            DepthArg::Balanced => ResearchDepth::Balanced,
            DepthArg::Deep => ResearchDepth::Deep,
        }
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
