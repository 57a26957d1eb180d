//! Tool handlers: fetch from the library, render markdown.
//!
//! Every handler returns text. Failures become a readable message at this
//! boundary instead of propagating to the caller.

use crate::api::ZoteroApi;
use crate::attachment::resolve_attachment;
use crate::error::{Result, ZoteroError};
use crate::format::{render_collections, render_fulltext, render_item, render_search_results};
use crate::types::{SearchParams, Tag};

/// Render a failed tool call as a message for the model.
///
/// `action` completes the sentence "Error ...", e.g. `retrieving item metadata`.
pub fn boundary_error(action: &str, err: &ZoteroError) -> String {
    format!("⚠️ Error {}: {}", action, err)
}

/// Message for an unknown item key.
pub fn not_found(item_key: &str) -> String {
    format!("No item found with key: {}", item_key)
}

fn at_boundary(action: &str, result: Result<String>) -> String {
    result.unwrap_or_else(|e| {
        tracing::warn!(action, error = %e, "tool call failed");
        boundary_error(action, &e)
    })
}

/// Metadata view of one item.
pub async fn item_metadata<A: ZoteroApi>(api: &A, item_key: &str) -> String {
    at_boundary(
        "retrieving item metadata",
        fetch_item_metadata(api, item_key).await,
    )
}

/// Metadata view plus the extracted text of the item's best attachment.
pub async fn item_fulltext<A: ZoteroApi>(api: &A, item_key: &str) -> String {
    at_boundary(
        "retrieving item full text",
        fetch_item_fulltext(api, item_key).await,
    )
}

/// Search digest.
pub async fn search_items<A: ZoteroApi>(api: &A, params: &SearchParams) -> String {
    at_boundary(
        "retrieving search results",
        fetch_search_results(api, params).await,
    )
}

/// Collection tree.
pub async fn list_collections<A: ZoteroApi>(api: &A) -> String {
    let result = api.collections().await.map(|c| render_collections(&c));
    at_boundary("retrieving collections", result)
}

/// Add tags to an item, keeping its existing ones.
pub async fn add_tags<A: ZoteroApi>(api: &A, item_key: &str, new_tags: &[String]) -> String {
    at_boundary(
        "updating item tags",
        apply_tags(api, item_key, new_tags).await,
    )
}

/// Move an item out of the trash.
pub async fn restore_from_trash<A: ZoteroApi>(api: &A, item_key: &str) -> String {
    at_boundary(
        "updating item trash state",
        apply_restore(api, item_key).await,
    )
}

async fn fetch_item_metadata<A: ZoteroApi>(api: &A, item_key: &str) -> Result<String> {
    Ok(match api.item(item_key).await? {
        Some(item) => render_item(&item),
        None => not_found(item_key),
    })
}

async fn fetch_item_fulltext<A: ZoteroApi>(api: &A, item_key: &str) -> Result<String> {
    let Some(item) = api.item(item_key).await? else {
        return Ok(not_found(item_key));
    };

    let attachment = resolve_attachment(api, &item).await;
    let text = match &attachment {
        Some(attachment) => api.fulltext(&attachment.key).await?,
        None => None,
    };

    Ok(render_fulltext(&item, attachment.as_ref(), text.as_ref()))
}

async fn fetch_search_results<A: ZoteroApi>(api: &A, params: &SearchParams) -> Result<String> {
    let items = api.search(params).await?;
    Ok(render_search_results(
        &params.query,
        params.tag.as_deref(),
        &items,
    ))
}

async fn apply_tags<A: ZoteroApi>(api: &A, item_key: &str, new_tags: &[String]) -> Result<String> {
    let Some(item) = api.item(item_key).await? else {
        return Ok(not_found(item_key));
    };

    let (merged, added) = merge_tags(item.tags(), new_tags);
    if added.is_empty() {
        return Ok(format!(
            "No new tags to add; item `{}` already has all of them.",
            item_key
        ));
    }

    let body = serde_json::json!({ "tags": merged });
    api.patch_item(item_key, item.version, &body).await?;

    let listed: Vec<String> = added.iter().map(|t| format!("`{}`", t)).collect();
    Ok(format!(
        "Added {} tag{} to item `{}`: {}",
        added.len(),
        if added.len() == 1 { "" } else { "s" },
        item_key,
        listed.join(", ")
    ))
}

async fn apply_restore<A: ZoteroApi>(api: &A, item_key: &str) -> Result<String> {
    let Some(item) = api.item(item_key).await? else {
        return Ok(not_found(item_key));
    };

    api.patch_item(item_key, item.version, &serde_json::json!({ "deleted": 0 }))
        .await?;
    Ok(format!("Restored item `{}` from the trash.", item_key))
}

/// Append `requested` to `existing`, skipping blanks and anything already present.
///
/// Returns the full tag list to store and the tags that were actually new.
pub fn merge_tags(existing: &[Tag], requested: &[String]) -> (Vec<Tag>, Vec<String>) {
    let mut merged = existing.to_vec();
    let mut added = Vec::new();

    for tag in requested.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if merged.iter().any(|t| t.tag == tag) {
            continue;
        }
        merged.push(Tag::new(tag));
        added.push(tag.to_string());
    }

    (merged, added)
}
