//! Full markdown view of a single item.

use super::fields::{creator_lines, non_empty, note_to_markdown, tag_list};
use crate::types::{Attachment, FullText, Item, ItemData, NoteData, RegularData};

/// Shown in place of document text when the attachment has no indexed content.
pub const EXTRACTION_UNAVAILABLE: &str = "[⚠️ Attachment is available but text extraction is not possible. The document may be scanned as images or have other restrictions that prevent text extraction.]";

/// Shown when no attachment could serve as a full-text source.
pub const NO_ATTACHMENT: &str = "[❌ No suitable attachment found for full text extraction. This item may not have any attached files or they may not be in a supported format.]";

/// Render an item as a markdown document.
///
/// Missing optional fields drop their line or section; nothing here fails.
pub fn render_item(item: &Item) -> String {
    match &item.data {
        ItemData::Note(note) => render_note(&item.key, note),
        ItemData::Regular(data) => render_regular(item, data),
    }
}

/// Render an item followed by its attachment and extracted text.
///
/// `attachment` is the resolved full-text source, if any; `text` is what the
/// server returned for it.
pub fn render_fulltext(
    item: &Item,
    attachment: Option<&Attachment>,
    text: Option<&FullText>,
) -> String {
    let mut out = render_item(item);

    let Some(attachment) = attachment else {
        out.push_str("\n\n## Attachment Information\n");
        out.push_str(NO_ATTACHMENT);
        return out;
    };

    out.push_str(&format!(
        "\n## Attachment Information\n- **Key**: `{}`\n- **Type**: {}",
        attachment.key, attachment.content_type
    ));

    match text.filter(|t| t.has_content()) {
        Some(text) => {
            out.push_str(&format!("\n- **Word Count**: ~{}", text.word_count()));
            if let (Some(indexed), Some(total)) = (text.indexed_pages, text.total_pages) {
                out.push_str(&format!("\n- **Indexed Pages**: {} of {}", indexed, total));
            }
            out.push_str("\n\n## Document Content\n\n");
            out.push_str(&text.content);
        }
        None => {
            out.push_str("\n\n## Document Content\n\n");
            out.push_str(EXTRACTION_UNAVAILABLE);
        }
    }

    out
}

fn render_note(key: &str, note: &NoteData) -> String {
    let mut lines = vec!["## 📝 Note".to_string(), format!("Item Key: `{}`", key)];

    if let Some(parent) = non_empty(&note.parent_item) {
        lines.push(format!("Parent Item: `{}`", parent));
    }
    if let Some(date) = non_empty(&note.date_modified) {
        lines.push(format!("Last Modified: {}", date));
    }
    if !note.tags.is_empty() {
        lines.push(format!("\n### Tags\n{}", tag_list(&note.tags)));
    }

    let content = note_to_markdown(note.note.as_deref().unwrap_or_default());
    lines.push(format!("\n### Note Content\n{}", content));

    lines.join("\n")
}

fn render_regular(item: &Item, data: &RegularData) -> String {
    let mut lines = vec![
        format!("## {}", data.title.as_deref().unwrap_or("Untitled")),
        format!("Item Key: `{}`", item.key),
        format!("Type: {}", data.item_type),
        format!("Date: {}", data.date.as_deref().unwrap_or("No date")),
    ];

    for (label, names) in creator_lines(&data.creators) {
        lines.push(format!("{}: {}", label, names));
    }

    if let Some(publication) = non_empty(&data.publication_title) {
        lines.push(format!("Publication: {}", publication));
    }
    if let Some(volume) = non_empty(&data.volume) {
        let mut volume_info = format!("Volume: {}", volume);
        if let Some(issue) = non_empty(&data.issue) {
            volume_info.push_str(&format!(", Issue: {}", issue));
        }
        if let Some(pages) = non_empty(&data.pages) {
            volume_info.push_str(&format!(", Pages: {}", pages));
        }
        lines.push(volume_info);
    }

    if let Some(abstract_note) = non_empty(&data.abstract_note) {
        lines.push(format!("\n### Abstract\n{}", abstract_note));
    }

    if !data.tags.is_empty() {
        lines.push(format!("\n### Tags\n{}", tag_list(&data.tags)));
    }

    let identifiers: Vec<String> = [
        ("URL", &data.url),
        ("DOI", &data.doi),
        ("ISBN", &data.isbn),
        ("ISSN", &data.issn),
    ]
    .into_iter()
    .filter_map(|(label, value)| non_empty(value).map(|v| format!("{}: {}", label, v)))
    .collect();

    if !identifiers.is_empty() {
        lines.push(format!("\n### Identifiers\n{}", identifiers.join("\n")));
    }

    if item.num_children > 0 {
        lines.push(format!(
            "\n### Additional Information\nNumber of notes/attachments: {}",
            item.num_children
        ));
    }

    lines.join("\n")
}
