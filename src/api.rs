//! The capability surface tool handlers depend on.
//!
//! [`ZoteroClient`] is the production implementation; tests substitute an
//! in-memory library.

use crate::client::ZoteroClient;
use crate::error::Result;
use crate::types::{Collection, FullText, Item, SearchParams};

/// Operations a Zotero library backend must offer.
#[allow(async_fn_in_trait)]
pub trait ZoteroApi {
    /// Fetch one item; `None` if the key is unknown.
    async fn item(&self, key: &str) -> Result<Option<Item>>;

    /// Child notes and attachments of an item, in server order.
    async fn children(&self, key: &str) -> Result<Vec<Item>>;

    /// Indexed text of an attachment; `None` if nothing was indexed.
    async fn fulltext(&self, attachment_key: &str) -> Result<Option<FullText>>;

    /// Quick search.
    async fn search(&self, params: &SearchParams) -> Result<Vec<Item>>;

    /// All collections in the library.
    async fn collections(&self) -> Result<Vec<Collection>>;

    /// Partial update conditional on `version`.
    async fn patch_item(&self, key: &str, version: u64, body: &serde_json::Value) -> Result<()>;
}

impl ZoteroApi for ZoteroClient {
    async fn item(&self, key: &str) -> Result<Option<Item>> {
        ZoteroClient::item(self, key).await
    }

    async fn children(&self, key: &str) -> Result<Vec<Item>> {
        ZoteroClient::children(self, key).await
    }

    async fn fulltext(&self, attachment_key: &str) -> Result<Option<FullText>> {
        ZoteroClient::fulltext(self, attachment_key).await
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Item>> {
        ZoteroClient::search(self, params).await
    }

    async fn collections(&self) -> Result<Vec<Collection>> {
        ZoteroClient::collections(self).await
    }

    async fn patch_item(&self, key: &str, version: u64, body: &serde_json::Value) -> Result<()> {
        ZoteroClient::patch_item(self, key, version, body).await
    }
}
