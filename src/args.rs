use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quick-snippet")]
#[command(about = "Search and expand text snippets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snippet library, overriding the config's `snippet_file`
    #[arg(long, global = true)]
    pub snippets: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fuzzy-search snippets, most used first
    #[command(alias = "s")]
    Search {
        /// Search text
        query: String,

        /// Minimum score, 0-100 (default: config `fuzzy_threshold`)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Maximum results (default: config `max_results`)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List snippets, most used first
    #[command(alias = "ls")]
    List {
        /// Maximum results (default: all)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the variables a snippet declares
    Vars {
        /// Snippet id
        id: String,
    },

    /// Fill in a snippet's variables and print the result
    #[command(alias = "x")]
    Expand {
        /// Snippet id
        id: String,

        /// Variable value as name=value (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Don't count this use
        #[arg(long)]
        no_track: bool,
    },

    /// Add a snippet to the library
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        content: String,

        /// Defaults to the name
        #[arg(long)]
        description: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete one or more snippets
    #[command(alias = "rm")]
    Delete {
        /// Snippet ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Suggest tags for a partial (comma-separated) entry
    Tags {
        /// Tag text typed so far
        partial: Option<String>,
    },

    /// Show the resolved configuration
    Config {
        /// Only check the config and report problems
        #[arg(long)]
        validate: bool,
    },
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
