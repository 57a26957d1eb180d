//! Public types for the Zotero client.
//!
//! Records are parsed from API JSON in [`crate::parse`] and are read-only
//! input for the renderers in [`crate::format`].

use serde::{Deserialize, Serialize};

/// A Zotero item: a bibliographic record, a standalone or child note,
/// or an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque item key (e.g. `ABCD1234`).
    pub key: String,
    /// Library version at which the item was last modified.
    pub version: u64,
    /// Number of child notes and attachments.
    pub num_children: u32,
    /// Type-specific fields.
    pub data: ItemData,
}

/// Fields of an item, split on whether it is a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemData {
    Note(NoteData),
    Regular(RegularData),
}

/// Fields of a note item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteData {
    /// Note body as an HTML fragment.
    pub note: Option<String>,
    pub parent_item: Option<String>,
    pub date_modified: Option<String>,
    pub tags: Vec<Tag>,
}

/// Fields of any non-note item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegularData {
    /// Zotero item type (`journalArticle`, `book`, `attachment`, ...).
    pub item_type: String,
    pub title: Option<String>,
    pub date: Option<String>,
    pub publication_title: Option<String>,
    pub book_title: Option<String>,
    pub publisher: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub abstract_note: Option<String>,
    pub url: Option<String>,
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub issn: Option<String>,
    pub parent_item: Option<String>,
    /// MIME type, set on attachments.
    pub content_type: Option<String>,
    pub date_modified: Option<String>,
    pub creators: Vec<Creator>,
    pub tags: Vec<Tag>,
}

impl Item {
    /// The item type string as Zotero reports it.
    pub fn item_type(&self) -> &str {
        match &self.data {
            ItemData::Note(_) => "note",
            ItemData::Regular(data) => &data.item_type,
        }
    }

    /// Tags attached to the item, in server order.
    pub fn tags(&self) -> &[Tag] {
        match &self.data {
            ItemData::Note(note) => &note.tags,
            ItemData::Regular(data) => &data.tags,
        }
    }

    /// Whether this item is a file or link attachment.
    pub fn is_attachment(&self) -> bool {
        self.item_type() == "attachment"
    }

    /// The attachment descriptor for this item, if it is an attachment.
    pub fn as_attachment(&self) -> Option<Attachment> {
        match &self.data {
            ItemData::Regular(data) if data.item_type == "attachment" => Some(Attachment {
                key: self.key.clone(),
                content_type: data.content_type.clone().unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

/// A person or organisation credited on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    /// Role such as `author` or `editor`; `None` means contributor.
    pub creator_type: Option<String>,
    pub name: CreatorName,
}

/// How a creator's name was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CreatorName {
    /// Two-field name (`firstName` + `lastName`).
    Split { first: String, last: String },
    /// Single-field name, typically an organisation.
    Single(String),
    /// Neither form present.
    Unnamed,
}

impl Creator {
    /// Default role when none is recorded.
    pub const DEFAULT_ROLE: &'static str = "contributor";

    pub fn role(&self) -> &str {
        self.creator_type.as_deref().unwrap_or(Self::DEFAULT_ROLE)
    }

    /// Format as "Last, First", or the single-field name.
    pub fn display_name(&self) -> Option<String> {
        match &self.name {
            CreatorName::Split { first, last } => Some(format!("{}, {}", last, first)),
            CreatorName::Single(name) => Some(name.clone()),
            CreatorName::Unnamed => None,
        }
    }
}

/// A tag on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
    /// `1` for tags Zotero added automatically; absent for manual tags.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<u8>,
}

impl Tag {
    /// A manual tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            kind: None,
        }
    }

    /// A tag with an explicit Zotero tag type.
    pub fn with_kind(tag: impl Into<String>, kind: u8) -> Self {
        Self {
            tag: tag.into(),
            kind: Some(kind),
        }
    }
}

/// The child item chosen as a full-text source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub key: String,
    pub content_type: String,
}

/// Indexed full text of an attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullText {
    pub content: String,
    pub indexed_pages: Option<u32>,
    pub total_pages: Option<u32>,
}

impl FullText {
    /// Approximate word count (whitespace-separated runs).
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// A collection in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub key: String,
    pub name: String,
    pub parent_collection: Option<String>,
    pub num_items: u32,
}

/// Which fields a quick search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryMode {
    /// Title, creator and year fields only.
    #[default]
    TitleCreatorYear,
    /// All fields, including full text.
    Everything,
}

impl QueryMode {
    /// API parameter value.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Self::TitleCreatorYear => "titleCreatorYear",
            Self::Everything => "everything",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "titlecreatoryear" => Some(Self::TitleCreatorYear),
            "everything" => Some(Self::Everything),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// Parameters of an item search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub mode: QueryMode,
    /// Tag filter; supports Zotero's `||` and leading `-` syntax.
    pub tag: Option<String>,
    pub limit: u32,
}

impl SearchParams {
    /// Default number of results.
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode: QueryMode::default(),
            tag: None,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    pub fn mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}
