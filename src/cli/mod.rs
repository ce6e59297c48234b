use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rwclean",
    about = "Readwise Cleaner - Rewrite messy podcast highlights with an LLM via OpenRouter",
    version,
    long_about = "A CLI tool that fetches podcast transcript highlights from Readwise, cleans \
them up with an LLM (paragraph breaks, filler-word removal, speaker annotation stripping), and \
writes the results back. Also cleans arbitrary text snippets or files outside the sync workflow."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean all eligible Readwise podcast highlights and write them back
    Sync {
        /// Process highlights and print cleaned text without updating Readwise
        #[arg(long)]
        dry_run: bool,

        /// Limit the number of highlights to process
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Override the OpenRouter model specified in the environment
        #[arg(long, value_name = "NAME")]
        model: Option<String>,
    },

    /// Clean a single text snippet or file without touching Readwise
    #[command(group(
        ArgGroup::new("input")
            .required(true)
            .args(["text", "file"]),
    ))]
    Clean {
        /// Text snippet to clean (for short, single-line text)
        #[arg(long, value_name = "STRING")]
        text: Option<String>,

        /// Path to a text file to clean (recommended for multi-line text)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Override the OpenRouter model specified in the environment
        #[arg(long, value_name = "NAME")]
        model: Option<String>,

        /// Optional output file path to save the cleaned text
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
