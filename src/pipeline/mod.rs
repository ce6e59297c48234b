use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::cleaner::TextCleaner;
use crate::filter::filter_podcast_highlights;
use crate::readwise::HighlightStore;
use crate::Result;

/// Options for a batch sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Print cleaned text instead of writing it back
    pub dry_run: bool,

    /// Cap on the number of highlights to process
    pub limit: Option<usize>,
}

/// Counters from a completed sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Books fetched from Readwise
    pub books: usize,

    /// Highlights fetched from Readwise
    pub highlights: usize,

    /// Highlights that passed the podcast-transcript filter
    pub matched: usize,

    /// Highlights actually cleaned (after `--limit`)
    pub processed: usize,
}

/// Where the single-text entry point gets its input
#[derive(Debug, Clone)]
pub enum TextSource {
    /// Literal text passed on the command line
    Literal(String),

    /// Path to a text file
    File(PathBuf),
}

impl TextSource {
    /// Resolve the input text, reading the file variant from disk
    pub fn read(&self) -> Result<String> {
        match self {
            TextSource::Literal(text) => {
                println!("Processing {} characters from command line", text.chars().count());
                Ok(text.clone())
            }
            TextSource::File(path) => {
                let text = fs_err::read_to_string(path)
                    .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
                println!("Read {} characters from {}", text.chars().count(), path.display());
                Ok(text)
            }
        }
    }
}

/// Run the batch pipeline: fetch, filter, optionally limit, then clean each
/// highlight and either print it (dry run) or patch it back to Readwise.
///
/// Any client error aborts the whole run. There is no partial-failure
/// recovery; the operator re-runs after fixing the cause.
pub async fn run_sync(
    store: &dyn HighlightStore,
    cleaner: &dyn TextCleaner,
    options: &SyncOptions,
) -> Result<SyncReport> {
    let books = store
        .list_books()
        .await
        .context("Failed to fetch books from Readwise")?;
    println!("Found {} books.", books.len());

    let highlights = store
        .list_highlights()
        .await
        .context("Failed to fetch highlights from Readwise")?;
    println!("Found {} highlights.", highlights.len());

    let mut eligible = filter_podcast_highlights(&books, &highlights);
    let matched = eligible.len();
    println!("Total highlights to process: {matched}");

    if let Some(limit) = options.limit {
        eligible.truncate(limit);
        println!("Processing a limited number of {} highlights.", eligible.len());
    }

    let total = eligible.len();
    for (index, highlight) in eligible.iter().enumerate() {
        println!("Processing highlight {} of {}", index + 1, total);
        let cleaned = cleaner
            .clean(&highlight.text)
            .await
            .with_context(|| format!("Failed to clean highlight {}", highlight.id))?;

        if options.dry_run {
            println!("\n--- Cleaned Text (Dry Run) ---");
            println!("{cleaned}");
            println!("----------------------------\n");
        } else {
            store
                .update_highlight(highlight.id, &cleaned)
                .await
                .with_context(|| format!("Failed to update highlight {}", highlight.id))?;
        }
    }

    if options.dry_run {
        println!("Dry run complete. No highlights were updated.");
    } else {
        println!("All highlights updated successfully.");
    }

    Ok(SyncReport {
        books: books.len(),
        highlights: highlights.len(),
        matched,
        processed: total,
    })
}

/// Run the single-text pipeline: resolve the input, clean it once, print the
/// result, and optionally save it to a file. Readwise is never contacted.
pub async fn run_single(
    cleaner: &dyn TextCleaner,
    source: &TextSource,
    output: Option<&Path>,
) -> Result<String> {
    let input = source.read()?;

    println!("Sending to LLM for cleaning...");
    let cleaned = cleaner
        .clean(&input)
        .await
        .context("Failed to clean text with LLM")?;

    println!("\n--- Cleaned Text ---");
    println!("{cleaned}");
    println!("-------------------\n");

    if let Some(path) = output {
        fs_err::write(path, &cleaned)
            .with_context(|| format!("Failed to save cleaned text to '{}'", path.display()))?;
        println!("Cleaned text saved to: {}", path.display());
    }

    Ok(cleaned)
}
