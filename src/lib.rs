//! # zotero-mcp
//!
//! Zotero library access for language models.
//!
//! Provides:
//! - **Library**: Async client for the Zotero Web API and the local desktop API
//! - **Rendering**: Markdown views of items, full text, search results and collections
//! - **MCP**: A stdio JSON-RPC server exposing the library as tools
//! - **CLI**: `zotero-mcp` binary for terminal use (includes `zotero-mcp serve`)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> zotero_mcp::error::Result<()> {
//! use zotero_mcp::{format, ZoteroClient};
//!
//! // Create client from ZOTERO_LIBRARY_ID / ZOTERO_API_KEY (or ZOTERO_LOCAL=true)
//! let client = ZoteroClient::from_env()?;
//!
//! if let Some(item) = client.item("ABCD1234").await? {
//!     println!("{}", format::render_item(&item));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Tool Handlers
//!
//! Handlers in [`tools`] work against any [`ZoteroApi`] and always return
//! text, turning failures into a readable message.
//!
//! ```no_run
//! # async fn example() -> zotero_mcp::error::Result<()> {
//! use zotero_mcp::{tools, SearchParams, QueryMode, ZoteroClient};
//!
//! let client = ZoteroClient::from_env()?;
//! let params = SearchParams::new("transformers").mode(QueryMode::Everything).tag("ml");
//! println!("{}", tools::search_items(&client, &params).await);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod attachment;
pub mod backoff;
pub mod client;
pub mod collections;
pub mod config;
pub mod error;
pub mod format;
pub mod items;
pub mod mcp;
pub mod parse;
pub mod search;
pub mod tools;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export key types at the crate root.
pub use api::ZoteroApi;
pub use client::ZoteroClient;
pub use config::{LibraryType, ZoteroConfig};
pub use error::ZoteroError;
pub use types::*;
