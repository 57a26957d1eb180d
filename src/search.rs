//! Item search endpoint.

use crate::client::ZoteroClient;
use crate::error::Result;
use crate::parse::parse_items;
use crate::types::{Item, SearchParams};

impl ZoteroClient {
    /// Quick-search the library.
    ///
    /// `params.mode` selects title/creator/year or all-field matching;
    /// `params.tag` accepts Zotero tag syntax (`a || b`, `-excluded`).
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Item>> {
        let limit = params.limit.to_string();
        let mut query = vec![
            ("q", params.query.as_str()),
            ("qmode", params.mode.as_api_str()),
            ("limit", limit.as_str()),
        ];
        if let Some(tag) = params.tag.as_deref().filter(|t| !t.is_empty()) {
            query.push(("tag", tag));
        }

        let body = self.get("/items", &query).await?;
        parse_items(&body)
    }
}
