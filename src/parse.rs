//! Zotero API response parsing.
//!
//! The API returns items as `{key, version, data: {...}, meta: {...}}`.
//! Raw shapes are deserialized here and converted into [`crate::types`].

use crate::error::{Result, ZoteroError};
use crate::types::{
    Collection, Creator, CreatorName, FullText, Item, ItemData, NoteData, RegularData, Tag,
};
use serde::Deserialize;

/// Item type used when the API omits one.
const UNKNOWN_ITEM_TYPE: &str = "unknown";

/// Deserialize a loosely typed text field.
///
/// Zotero stores most fields as strings, but some endpoints report numbers
/// (`volume: 12`) or `false` for "no value" (`parentCollection: false`).
fn deserialize_text_option<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, boolean, or null")
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(TextVisitor)
        }

        fn visit_bool<E>(self, v: bool) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(if v { Some("true".to_string()) } else { None })
        }

        fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v.to_string()))
        }

        fn visit_string<E>(self, v: String) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v.to_string()))
        }

        fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v.to_string()))
        }

        fn visit_f64<E>(self, v: f64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v.to_string()))
        }
    }

    deserializer.deserialize_option(TextVisitor)
}

/// A single item as returned by `/items` endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiItem {
    pub key: Option<String>,
    #[serde(default)]
    pub version: u64,
    pub data: ApiItemData,
    #[serde(default)]
    pub meta: ApiItemMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiItemMeta {
    pub num_children: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiItemData {
    pub key: Option<String>,
    pub item_type: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_text_option", default)]
    pub date: Option<String>,
    pub publication_title: Option<String>,
    pub book_title: Option<String>,
    pub publisher: Option<String>,
    #[serde(deserialize_with = "deserialize_text_option", default)]
    pub volume: Option<String>,
    #[serde(deserialize_with = "deserialize_text_option", default)]
    pub issue: Option<String>,
    #[serde(deserialize_with = "deserialize_text_option", default)]
    pub pages: Option<String>,
    pub abstract_note: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    #[serde(rename = "ISBN")]
    pub isbn: Option<String>,
    #[serde(rename = "ISSN")]
    pub issn: Option<String>,
    #[serde(deserialize_with = "deserialize_text_option", default)]
    pub parent_item: Option<String>,
    pub note: Option<String>,
    pub content_type: Option<String>,
    pub date_modified: Option<String>,
    #[serde(default)]
    pub creators: Vec<ApiCreator>,
    #[serde(default)]
    pub tags: Vec<ApiTag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCreator {
    pub creator_type: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTag {
    pub tag: String,
    #[serde(default, rename = "type")]
    pub kind: Option<u8>,
}

/// Full-text response for an attachment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiFullText {
    #[serde(default)]
    pub content: Option<String>,
    pub indexed_pages: Option<u32>,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCollection {
    pub key: String,
    pub data: ApiCollectionData,
    #[serde(default)]
    pub meta: ApiCollectionMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCollectionData {
    pub name: String,
    #[serde(deserialize_with = "deserialize_text_option", default)]
    pub parent_collection: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiCollectionMeta {
    pub num_items: Option<u32>,
}

/// Parse a single-item response.
pub fn parse_item(json: &str) -> Result<Item> {
    let item: ApiItem = serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid item JSON: {}", e)))?;
    api_item_to_item(item)
}

/// Parse a multi-item response (search results, children).
pub fn parse_items(json: &str) -> Result<Vec<Item>> {
    let items: Vec<ApiItem> = serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid items JSON: {}", e)))?;
    items.into_iter().map(api_item_to_item).collect()
}

/// Convert an already-decoded JSON value into an [`Item`].
pub fn item_from_value(value: serde_json::Value) -> Result<Item> {
    let item: ApiItem = serde_json::from_value(value)
        .map_err(|e| ZoteroError::Parse(format!("Invalid item JSON: {}", e)))?;
    api_item_to_item(item)
}

/// Parse an attachment full-text response.
pub fn parse_fulltext(json: &str) -> Result<FullText> {
    let raw: ApiFullText = serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid full-text JSON: {}", e)))?;
    Ok(FullText {
        content: raw.content.unwrap_or_default(),
        indexed_pages: raw.indexed_pages,
        total_pages: raw.total_pages,
    })
}

/// Parse a collections listing.
pub fn parse_collections(json: &str) -> Result<Vec<Collection>> {
    let raw: Vec<ApiCollection> = serde_json::from_str(json)
        .map_err(|e| ZoteroError::Parse(format!("Invalid collections JSON: {}", e)))?;
    Ok(raw
        .into_iter()
        .map(|c| Collection {
            key: c.key,
            name: c.data.name,
            parent_collection: c.data.parent_collection,
            num_items: c.meta.num_items.unwrap_or(0),
        })
        .collect())
}

fn api_item_to_item(item: ApiItem) -> Result<Item> {
    let data = item.data;
    let key = item
        .key
        .or_else(|| data.key.clone())
        .ok_or_else(|| ZoteroError::Parse("Item without a key".to_string()))?;
    let num_children = item.meta.num_children.unwrap_or(0);
    let tags = data
        .tags
        .into_iter()
        .map(|t| Tag {
            tag: t.tag,
            kind: t.kind,
        })
        .collect();

    let item_type = data
        .item_type
        .unwrap_or_else(|| UNKNOWN_ITEM_TYPE.to_string());

    let data = if item_type == "note" {
        ItemData::Note(NoteData {
            note: data.note,
            parent_item: data.parent_item,
            date_modified: data.date_modified,
            tags,
        })
    } else {
        ItemData::Regular(RegularData {
            item_type,
            title: data.title,
            date: data.date,
            publication_title: data.publication_title,
            book_title: data.book_title,
            publisher: data.publisher,
            volume: data.volume,
            issue: data.issue,
            pages: data.pages,
            abstract_note: data.abstract_note,
            url: data.url,
            doi: data.doi,
            isbn: data.isbn,
            issn: data.issn,
            parent_item: data.parent_item,
            content_type: data.content_type,
            date_modified: data.date_modified,
            creators: data.creators.into_iter().map(api_creator_to_creator).collect(),
            tags,
        })
    };

    Ok(Item {
        key,
        version: item.version,
        num_children,
        data,
    })
}

fn api_creator_to_creator(creator: ApiCreator) -> Creator {
    let name = match (creator.first_name, creator.last_name, creator.name) {
        (Some(first), Some(last), _) => CreatorName::Split { first, last },
        (_, _, Some(name)) => CreatorName::Single(name),
        _ => CreatorName::Unnamed,
    };
    Creator {
        creator_type: creator.creator_type,
        name,
    }
}
