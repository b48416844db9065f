//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse TMDB movie listings from the terminal
#[derive(Parser, Debug)]
#[command(name = "tmdb-browse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// TMDB API key (overrides config file and environment)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Movies now in theatres
    NowPlaying {
        /// Number of pages to load
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Popular movies
    Popular {
        /// Number of pages to load
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Now playing and popular side by side
    Browse {
        /// Number of pages to load per list
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// Search movies by title
    Search {
        /// Title to search for
        query: String,
    },

    /// Show a single movie
    Details {
        /// TMDB movie id
        id: u64,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one movie per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::parse_from(["tmdb-browse", "popular", "--pages", "3", "-f", "json"]);
        assert!(matches!(cli.command, Commands::Popular { pages: 3 }));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "tmdb-browse",
            "search",
            "blade runner",
            "--api-key",
            "k",
            "-v",
        ]);
        match cli.command {
            Commands::Search { query } => assert_eq!(query, "blade runner"),
            other => panic!("Expected Search, got {other:?}"),
        }
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_zero_pages_rejected() {
        for command in ["now-playing", "popular", "browse"] {
            let err = Cli::try_parse_from(["tmdb-browse", command, "--pages", "0"]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        }
        let cli = Cli::try_parse_from(["tmdb-browse", "browse"]).unwrap();
        assert!(matches!(cli.command, Commands::Browse { pages: 1 }));
    }

    #[test]
    fn test_parse_details() {
        let cli = Cli::parse_from(["tmdb-browse", "details", "550"]);
        assert!(matches!(cli.command, Commands::Details { id: 550 }));
    }
}
