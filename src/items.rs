//! Item, child, and full-text endpoints.

use crate::client::ZoteroClient;
use crate::error::{Result, ZoteroError};
use crate::parse::{parse_fulltext, parse_item, parse_items};
use crate::types::{FullText, Item};

impl ZoteroClient {
    /// Fetch a single item. Returns `None` when the key does not exist.
    pub async fn item(&self, key: &str) -> Result<Option<Item>> {
        match self.get(&item_path(key, "")?, &[]).await {
            Ok(body) => parse_item(&body).map(Some),
            Err(ZoteroError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch the child notes and attachments of an item.
    pub async fn children(&self, key: &str) -> Result<Vec<Item>> {
        let body = self
            .get(&item_path(key, "/children")?, &[])
            .await?;
        parse_items(&body)
    }

    /// Fetch the indexed full text of an attachment.
    ///
    /// Returns `None` when the attachment has not been indexed.
    pub async fn fulltext(&self, attachment_key: &str) -> Result<Option<FullText>> {
        match self
            .get(&item_path(attachment_key, "/fulltext")?, &[])
            .await
        {
            Ok(body) if body.trim().is_empty() => Ok(None),
            Ok(body) => parse_fulltext(&body).map(Some),
            Err(ZoteroError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Partially update an item.
    ///
    /// `version` must be the item version the change is based on; the server
    /// rejects the write if the item changed since.
    pub async fn patch_item(
        &self,
        key: &str,
        version: u64,
        body: &serde_json::Value,
    ) -> Result<()> {
        self.patch_json(&item_path(key, "")?, version, body)
            .await?;
        Ok(())
    }
}

/// Longest key accepted. Zotero issues 8-character keys.
const MAX_KEY_LEN: usize = 32;

/// Library-relative path of an item endpoint.
///
/// Keys are joined into the URL unescaped, so only ASCII alphanumerics
/// are accepted.
fn item_path(key: &str, suffix: &str) -> Result<String> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key.bytes().all(|b| b.is_ascii_alphanumeric());
    if !valid {
        return Err(ZoteroError::InvalidArgs(format!(
            "'{}' is not a valid item key",
            key
        )));
    }
    Ok(format!("/items/{}{}", key, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_path() {
        assert_eq!(item_path("ABCD1234", "").unwrap(), "/items/ABCD1234");
        assert_eq!(
            item_path("ABCD1234", "/fulltext").unwrap(),
            "/items/ABCD1234/fulltext"
        );
    }

    #[test]
    fn test_item_path_rejects_traversal() {
        for key in ["", "../../groups/9/items/X", "AB/CD", "ABCD%2F12", "ABCD 1234", "ABCD?x=1"] {
            let err = item_path(key, "").unwrap_err();
            assert!(matches!(err, ZoteroError::InvalidArgs(_)), "{key:?}");
        }
        assert!(item_path(&"A".repeat(33), "").is_err());
    }
}
