use std::collections::HashSet;

use crate::readwise::{Book, Highlight};

/// The literal substring that marks a podcast-derived transcript highlight
pub const TRANSCRIPT_MARKER: &str = "Transcript:";

/// Select the highlights that belong to books categorized as "podcasts" and
/// contain the transcript marker. Input order is preserved.
pub fn filter_podcast_highlights(books: &[Book], highlights: &[Highlight]) -> Vec<Highlight> {
    let podcast_book_ids: HashSet<i64> = books
        .iter()
        .filter(|book| book.category.as_deref() == Some("podcasts"))
        .map(|book| book.id)
        .collect();

    highlights
        .iter()
        .filter(|h| podcast_book_ids.contains(&h.book_id) && h.text.contains(TRANSCRIPT_MARKER))
        .cloned()
        .collect()
}
