//! Collection listing endpoint.

use crate::client::ZoteroClient;
use crate::error::Result;
use crate::parse::parse_collections;
use crate::types::Collection;

/// Largest page the API serves.
const MAX_PAGE: &str = "100";

impl ZoteroClient {
    /// List collections in the library, sorted by name.
    pub async fn collections(&self) -> Result<Vec<Collection>> {
        let body = self.get("/collections", &[("limit", MAX_PAGE)]).await?;
        let mut collections = parse_collections(&body)?;
        collections.sort_by_key(|c| c.name.to_lowercase());
        Ok(collections)
    }
}
