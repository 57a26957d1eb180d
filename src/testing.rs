//! In-memory library used by handler and server tests.

use crate::api::ZoteroApi;
use crate::error::{Result, ZoteroError};
use crate::parse::item_from_value;
use crate::types::{Collection, FullText, Item, SearchParams};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct FakeLibrary {
    pub items: HashMap<String, Item>,
    pub children: HashMap<String, Vec<Item>>,
    pub fulltext: HashMap<String, FullText>,
    pub search_results: Vec<Item>,
    pub collections: Vec<Collection>,
    /// When set, every call fails with this message.
    pub failure: Option<String>,
    pub patches: RefCell<Vec<(String, u64, serde_json::Value)>>,
    pub searches: RefCell<Vec<SearchParams>>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, value: serde_json::Value) -> Self {
        let item = item_from_value(value).unwrap();
        self.items.insert(item.key.clone(), item);
        self
    }

    pub fn with_child(mut self, parent: &str, value: serde_json::Value) -> Self {
        let item = item_from_value(value).unwrap();
        self.children.entry(parent.to_string()).or_default().push(item);
        self
    }

    pub fn with_fulltext(mut self, key: &str, content: &str) -> Self {
        self.fulltext.insert(
            key.to_string(),
            FullText {
                content: content.to_string(),
                ..FullText::default()
            },
        );
        self
    }

    pub fn with_search_result(mut self, value: serde_json::Value) -> Self {
        self.search_results.push(item_from_value(value).unwrap());
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(ZoteroError::Api {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl ZoteroApi for FakeLibrary {
    async fn item(&self, key: &str) -> Result<Option<Item>> {
        self.check()?;
        Ok(self.items.get(key).cloned())
    }

    async fn children(&self, key: &str) -> Result<Vec<Item>> {
        self.check()?;
        Ok(self.children.get(key).cloned().unwrap_or_default())
    }

    async fn fulltext(&self, attachment_key: &str) -> Result<Option<FullText>> {
        self.check()?;
        Ok(self.fulltext.get(attachment_key).cloned())
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<Item>> {
        self.check()?;
        self.searches.borrow_mut().push(params.clone());
        Ok(self.search_results.clone())
    }

    async fn collections(&self) -> Result<Vec<Collection>> {
        self.check()?;
        Ok(self.collections.clone())
    }

    async fn patch_item(&self, key: &str, version: u64, body: &serde_json::Value) -> Result<()> {
        self.check()?;
        self.patches
            .borrow_mut()
            .push((key.to_string(), version, body.clone()));
        Ok(())
    }
}
