//! Field extractors shared by the item and search renderers.

use crate::types::{Creator, Tag};
use indexmap::IndexMap;

/// Longest abstract or note preview shown in search results, in characters.
pub const PREVIEW_MAX_CHARS: usize = 150;

/// Creators listed per search result before `et al.`.
pub const SEARCH_MAX_CREATORS: usize = 3;

/// Tags listed per search result before `...`.
pub const SEARCH_MAX_TAGS: usize = 5;

/// Longest first line used verbatim as a note title.
pub const NOTE_TITLE_MAX_CHARS: usize = 50;

/// Words kept from an over-long first line of a note.
pub const NOTE_TITLE_WORDS: usize = 5;

/// Literal replacements turning Zotero note HTML into markdown, applied in order.
const NOTE_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("<p>", ""),
    ("</p>", "\n"),
    ("<br>", "\n"),
    ("<strong>", "**"),
    ("</strong>", "**"),
    ("<em>", "*"),
    ("</em>", "*"),
];

/// Convert note HTML to markdown with a fixed substitution list.
///
/// This is not an HTML parser: attributes, nesting and unknown tags are left
/// untouched.
pub fn note_to_markdown(html: &str) -> String {
    NOTE_SUBSTITUTIONS
        .iter()
        .fold(html.to_string(), |text, (from, to)| text.replace(from, to))
}

/// Creator lines for the full record view, one per role in first-seen order.
///
/// Returns `(label, names)` pairs such as `("Authors", "Doe, John; Smith, Jane")`.
pub fn creator_lines(creators: &[Creator]) -> Vec<(String, String)> {
    let mut by_role: IndexMap<&str, Vec<String>> = IndexMap::new();
    for creator in creators {
        let Some(name) = creator.display_name().filter(|n| !n.is_empty()) else {
            continue;
        };
        by_role.entry(creator.role()).or_default().push(name);
    }

    by_role
        .into_iter()
        .map(|(role, names)| {
            let mut label = capitalize(role);
            if names.len() > 1 {
                label.push('s');
            }
            (label, names.join("; "))
        })
        .collect()
}

/// Abbreviated creator list for search results.
pub fn creator_summary(creators: &[Creator]) -> String {
    let mut names: Vec<String> = creators
        .iter()
        .take(SEARCH_MAX_CREATORS)
        .filter_map(Creator::display_name)
        .collect();

    if creators.len() > SEARCH_MAX_CREATORS {
        names.push("et al.".to_string());
    }

    if names.is_empty() {
        "No authors".to_string()
    } else {
        names.join("; ")
    }
}

/// All tags as inline code, comma separated.
pub fn tag_list(tags: &[Tag]) -> String {
    tags.iter()
        .map(code_span)
        .collect::<Vec<_>>()
        .join(", ")
}

/// The first few tags as inline code, space separated, with `...` when cut.
pub fn tag_summary(tags: &[Tag]) -> String {
    let mut parts: Vec<String> = tags.iter().take(SEARCH_MAX_TAGS).map(code_span).collect();
    if tags.len() > SEARCH_MAX_TAGS {
        parts.push("...".to_string());
    }
    parts.join(" ")
}

/// Shorten text longer than [`PREVIEW_MAX_CHARS`] to exactly that many
/// characters, the last three being `...`.
pub fn truncate_preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_MAX_CHARS {
        let kept: String = text.chars().take(PREVIEW_MAX_CHARS - 3).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

/// Title for a note in search results, taken from its first line.
///
/// `markdown` is the already converted note text.
pub fn note_title(markdown: &str) -> String {
    let first_line = markdown.trim().split('\n').next().unwrap_or("").trim();

    if first_line.is_empty() {
        "Note".to_string()
    } else if first_line.chars().count() <= NOTE_TITLE_MAX_CHARS {
        first_line.to_string()
    } else {
        let words: Vec<&str> = first_line.split_whitespace().take(NOTE_TITLE_WORDS).collect();
        format!("{}...", words.join(" "))
    }
}

/// Body preview for a note in search results.
pub fn note_text_preview(markdown: &str) -> String {
    truncate_preview(markdown.trim())
}

/// `Some` only for present, non-empty values.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn code_span(tag: &Tag) -> String {
    format!("`{}`", tag.tag)
}

/// Upper-case the first character and lower-case the rest (`bookAuthor` -> `Bookauthor`).
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CreatorName;

    fn person(role: Option<&str>, first: &str, last: &str) -> Creator {
        Creator {
            creator_type: role.map(String::from),
            name: CreatorName::Split {
                first: first.into(),
                last: last.into(),
            },
        }
    }

    fn org(role: Option<&str>, name: &str) -> Creator {
        Creator {
            creator_type: role.map(String::from),
            name: CreatorName::Single(name.into()),
        }
    }

    fn tags(n: usize) -> Vec<Tag> {
        (1..=n).map(|i| Tag::new(format!("t{}", i))).collect()
    }

    #[test]
    fn test_note_paragraphs() {
        assert_eq!(note_to_markdown("<p>Hello</p><p>World</p>"), "Hello\nWorld\n");
    }

    #[test]
    fn test_note_inline_markup() {
        assert_eq!(
            note_to_markdown("<p><strong>Bold</strong> and <em>it</em><br>next</p>"),
            "**Bold** and *it*\nnext\n"
        );
    }

    #[test]
    fn test_note_unknown_tags_pass_through() {
        assert_eq!(
            note_to_markdown("<h1>Title</h1><p class=\"x\">body</p>"),
            "<h1>Title</h1><p class=\"x\">body\n"
        );
    }

    #[test]
    fn test_creator_lines_grouped_and_pluralised() {
        let creators = vec![
            person(Some("author"), "John", "Doe"),
            person(Some("editor"), "Ed", "Itor"),
            person(Some("author"), "Jane", "Smith"),
        ];
        assert_eq!(
            creator_lines(&creators),
            vec![
                ("Authors".to_string(), "Doe, John; Smith, Jane".to_string()),
                ("Editor".to_string(), "Itor, Ed".to_string()),
            ]
        );
    }

    #[test]
    fn test_creator_lines_default_role_and_unnamed() {
        let creators = vec![
            org(None, "CERN"),
            Creator {
                creator_type: Some("author".into()),
                name: CreatorName::Unnamed,
            },
            org(Some("bookAuthor"), ""),
        ];
        assert_eq!(
            creator_lines(&creators),
            vec![("Contributor".to_string(), "CERN".to_string())]
        );
    }

    #[test]
    fn test_capitalize_lowercases_tail() {
        let creators = vec![person(Some("seriesEditor"), "A", "B")];
        assert_eq!(creator_lines(&creators)[0].0, "Serieseditor");
    }

    #[test]
    fn test_creator_summary_limits_to_three() {
        let creators = vec![
            person(Some("author"), "A", "One"),
            org(Some("editor"), "Two Org"),
            person(None, "C", "Three"),
            person(None, "D", "Four"),
        ];
        assert_eq!(
            creator_summary(&creators),
            "One, A; Two Org; Three, C; et al."
        );
        assert_eq!(creator_summary(&creators[..2]), "One, A; Two Org");
    }

    #[test]
    fn test_creator_summary_empty() {
        assert_eq!(creator_summary(&[]), "No authors");
    }

    #[test]
    fn test_tag_list_all_tags() {
        assert_eq!(
            tag_list(&tags(7)),
            "`t1`, `t2`, `t3`, `t4`, `t5`, `t6`, `t7`"
        );
    }

    #[test]
    fn test_tag_summary_truncates() {
        assert_eq!(tag_summary(&tags(7)), "`t1` `t2` `t3` `t4` `t5` ...");
        assert_eq!(tag_summary(&tags(5)), "`t1` `t2` `t3` `t4` `t5`");
    }

    #[test]
    fn test_tag_duplicates_kept() {
        let dup = vec![Tag::new("a"), Tag::new("a")];
        assert_eq!(tag_list(&dup), "`a`, `a`");
    }

    #[test]
    fn test_truncate_preview() {
        let long = "x".repeat(200);
        let cut = truncate_preview(&long);
        assert_eq!(cut.chars().count(), 150);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..147], &long[..147]);

        let exact = "y".repeat(150);
        assert_eq!(truncate_preview(&exact), exact);
    }

    #[test]
    fn test_truncate_preview_counts_characters() {
        let long = "é".repeat(151);
        let cut = truncate_preview(&long);
        assert_eq!(cut.chars().count(), 150);
        assert!(cut.starts_with(&"é".repeat(147)));
    }

    #[test]
    fn test_note_title_short_first_line() {
        assert_eq!(note_title("  Reading notes\nMore text\n"), "Reading notes");
    }

    #[test]
    fn test_note_title_long_first_line() {
        let line = "This first line of the note is definitely longer than fifty characters";
        assert_eq!(note_title(line), "This first line of the...");
    }

    #[test]
    fn test_note_title_empty() {
        assert_eq!(note_title(""), "Note");
        assert_eq!(note_title("  \n "), "Note");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&Some("x".into())), Some("x"));
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&None), None);
    }
}
