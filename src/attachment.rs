//! Choosing which attachment supplies an item's full text.

use crate::api::ZoteroApi;
use crate::types::{Attachment, Item};

/// Preference rank of an attachment MIME type; lower is better.
fn rank(content_type: &str) -> u8 {
    match content_type {
        "application/pdf" => 0,
        "text/html" => 1,
        _ => 2,
    }
}

/// Pick the best attachment among an item's children.
///
/// PDFs beat HTML snapshots, which beat anything else; ties go to the
/// first child the server listed.
pub fn pick_attachment(children: &[Item]) -> Option<Attachment> {
    children
        .iter()
        .filter_map(Item::as_attachment)
        .min_by_key(|a| rank(&a.content_type))
}

/// Resolve the full-text source for `item`.
///
/// An attachment is its own source. For other items the children are
/// fetched; a failure there is logged and treated as "no attachment".
pub async fn resolve_attachment<A: ZoteroApi>(api: &A, item: &Item) -> Option<Attachment> {
    if let Some(own) = item.as_attachment() {
        return Some(own);
    }

    match api.children(&item.key).await {
        Ok(children) => pick_attachment(&children),
        Err(e) => {
            tracing::warn!(key = %item.key, error = %e, "could not list item children");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::item_from_value;
    use serde_json::json;

    fn attachment(key: &str, content_type: &str) -> Item {
        item_from_value(json!({"key": key, "data": {
            "itemType": "attachment", "contentType": content_type, "parentItem": "P"
        }}))
        .unwrap()
    }

    fn note(key: &str) -> Item {
        item_from_value(json!({"key": key, "data": {"itemType": "note", "parentItem": "P"}}))
            .unwrap()
    }

    #[test]
    fn test_pdf_preferred_over_html() {
        let children = vec![
            note("N1"),
            attachment("H1", "text/html"),
            attachment("O1", "application/epub+zip"),
            attachment("P1", "application/pdf"),
            attachment("P2", "application/pdf"),
        ];
        assert_eq!(pick_attachment(&children).unwrap().key, "P1");
    }

    #[test]
    fn test_html_before_other() {
        let children = vec![attachment("O1", "image/png"), attachment("H1", "text/html")];
        assert_eq!(pick_attachment(&children).unwrap().key, "H1");
    }

    #[test]
    fn test_other_types_still_eligible() {
        let children = vec![attachment("O1", "image/png")];
        assert_eq!(
            pick_attachment(&children),
            Some(Attachment {
                key: "O1".into(),
                content_type: "image/png".into()
            })
        );
    }

    #[test]
    fn test_no_attachments() {
        assert_eq!(pick_attachment(&[note("N1")]), None);
        assert_eq!(pick_attachment(&[]), None);
    }
}
