//! Markdown rendering of Zotero records for language models.
//!
//! Everything here is pure: records in, strings out.

pub mod collections;
pub mod fields;
pub mod item;
pub mod search;

pub use collections::render_collections;
pub use item::{render_fulltext, render_item};
pub use search::render_search_results;
