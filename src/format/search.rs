//! Condensed digest of search results.

use super::fields::{
    creator_summary, non_empty, note_text_preview, note_title, note_to_markdown, tag_summary,
    truncate_preview,
};
use crate::types::{Item, ItemData, NoteData, RegularData};

/// Returned verbatim when a search matches nothing.
pub const NO_RESULTS: &str = "No items found matching your query.";

/// Hint appended to every search header.
pub const USAGE_HINT: &str =
    "Use item keys with zotero_item_metadata or zotero_item_fulltext for more details.\n";

/// Render search results as a markdown digest.
///
/// `tag` is the tag filter the search ran with, echoed in the header.
pub fn render_search_results(query: &str, tag: Option<&str>, items: &[Item]) -> String {
    if items.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut found = format!("Found {} items.", items.len());
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        found.push_str(&format!(" Using tag filter: {}", tag));
    }

    let mut blocks = vec![
        format!("# Search Results for: '{}'", query),
        found,
        USAGE_HINT.to_string(),
    ];
    blocks.extend(
        items
            .iter()
            .enumerate()
            .map(|(i, item)| render_entry(i + 1, item)),
    );

    blocks.join("\n\n")
}

/// One numbered entry of the digest.
pub fn render_entry(number: usize, item: &Item) -> String {
    match &item.data {
        ItemData::Note(note) => note_entry(number, &item.key, note),
        ItemData::Regular(data) => regular_entry(number, &item.key, data),
    }
}

/// Where a record was published: journal, containing book, or publisher.
pub fn source_line(data: &RegularData) -> Option<String> {
    if let Some(publication) = non_empty(&data.publication_title) {
        Some(publication.to_string())
    } else if let Some(book) = non_empty(&data.book_title) {
        Some(format!("In: {}", book))
    } else {
        non_empty(&data.publisher).map(String::from)
    }
}

fn note_entry(number: usize, key: &str, note: &NoteData) -> String {
    let markdown = note_to_markdown(note.note.as_deref().unwrap_or_default());

    let mut lines = vec![
        format!("## {}. 📝 {}", number, note_title(&markdown)),
        format!("**Type**: Note | **Key**: `{}`", key),
    ];
    if let Some(parent) = non_empty(&note.parent_item) {
        lines.push(format!("**Parent Item**: `{}`", parent));
    }
    lines.push(format!("\n{}", note_text_preview(&markdown)));
    if !note.tags.is_empty() {
        lines.push(format!("\n**Tags**: {}", tag_summary(&note.tags)));
    }

    lines.join("\n")
}

fn regular_entry(number: usize, key: &str, data: &RegularData) -> String {
    let mut lines = vec![
        format!(
            "## {}. {}",
            number,
            data.title.as_deref().unwrap_or("Untitled")
        ),
        format!(
            "**Type**: {} | **Date**: {} | **Key**: `{}`",
            data.item_type,
            data.date.as_deref().unwrap_or_default(),
            key
        ),
        format!("**Authors**: {}", creator_summary(&data.creators)),
    ];

    if let Some(source) = source_line(data) {
        lines.push(format!("**Source**: {}", source));
    }
    if let Some(abstract_note) = non_empty(&data.abstract_note) {
        lines.push(format!("\n{}", truncate_preview(abstract_note)));
    }
    if !data.tags.is_empty() {
        lines.push(format!("\n**Tags**: {}", tag_summary(&data.tags)));
    }

    lines.join("\n")
}
