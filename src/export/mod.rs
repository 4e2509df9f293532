use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;

pub mod wxr_parser;

/// Sort key for pages without an explicit menu order, so they come last.
pub const MENU_ORDER_UNSET: i64 = i64::MAX;

const PUBLISHED: &str = "publish";

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct ItemId(pub u64);

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Page,
    Post,
    Attachment,
}

impl ItemKind {
    /// Maps a `wp:post_type` value. Menu entries, revisions and custom types are not content.
    pub fn from_post_type(post_type: &str) -> Option<ItemKind> {
        match post_type {
            "page" => Some(ItemKind::Page),
            "post" => Some(ItemKind::Post),
            "attachment" => Some(ItemKind::Attachment),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Page => "Page",
            ItemKind::Post => "Post",
            ItemKind::Attachment => "Attachment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    Published,
    Other(String),
}

impl ItemStatus {
    pub fn from_wxr(status: &str) -> ItemStatus {
        if status == PUBLISHED {
            ItemStatus::Published
        } else {
            ItemStatus::Other(status.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub title: String,
    /// `wp:post_name` as exported, possibly empty or percent-encoded.
    pub slug: String,
    pub body: String,
    pub date: Option<NaiveDateTime>,
    pub parent_id: Option<ItemId>,
    pub menu_order: i64,
    pub categories: Vec<String>,
}

impl ContentItem {
    pub fn is_published(&self) -> bool {
        self.status == ItemStatus::Published
    }
}

pub struct ExportDocument {
    pub site_title: String,
    pub items: Vec<ContentItem>,
    /// Items dropped while parsing, one message each.
    pub warnings: Vec<String>,
}

impl ExportDocument {
    pub fn published(&self, kind: ItemKind) -> impl Iterator<Item=&ContentItem> {
        self.items.iter().filter(move |item| item.kind == kind && item.is_published())
    }
}
