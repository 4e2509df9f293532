use std::collections::HashSet;
use std::io::ErrorKind;
use std::mem;
use std::path::Path;
use std::{fs, io};

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use spdlog::{debug, warn};

use crate::export::{ContentItem, ExportDocument, ItemId, ItemKind, ItemStatus, MENU_ORDER_UNSET};
use crate::text_utils::parse_date_time;

/* Shape of the parts we read
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/"
     xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
  <title>My Site</title>
  <item>
    <title>About</title>
    <category domain="category" nicename="news"><![CDATA[News]]></category>
    <content:encoded><![CDATA[<p>Hello</p>]]></content:encoded>
    <wp:post_id>2</wp:post_id>
    <wp:post_date>2024-01-02 10:11:12</wp:post_date>
    <wp:post_name>about</wp:post_name>
    <wp:status>publish</wp:status>
    <wp:post_parent>0</wp:post_parent>
    <wp:menu_order>1</wp:menu_order>
    <wp:post_type>page</wp:post_type>
  </item>
</channel>
</rss>
*/

// Covers export versions 1.0, 1.1 and 1.2
const WP_NS_PREFIX: &[u8] = b"http://wordpress.org/export/";
const CONTENT_NS: &[u8] = b"http://purl.org/rss/1.0/modules/content/";

const CHANNEL_DEPTH: usize = 1;
const ITEM_DEPTH: usize = 2;
const ITEM_FIELD_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    WordPress,
    Content,
    Plain,
    Other,
}

impl Scope {
    fn of(ns: &ResolveResult) -> Scope {
        match ns {
            ResolveResult::Bound(Namespace(uri)) if uri.starts_with(WP_NS_PREFIX) => Scope::WordPress,
            ResolveResult::Bound(Namespace(uri)) if *uri == CONTENT_NS => Scope::Content,
            ResolveResult::Bound(_) => Scope::Other,
            _ => Scope::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ChannelTitle,
    Title,
    Category,
    Body,
    PostId,
    PostDate,
    PostName,
    Status,
    PostParent,
    MenuOrder,
    PostType,
}

impl Field {
    fn of_item_child(scope: Scope, local_name: &[u8]) -> Option<Field> {
        match (scope, local_name) {
            (Scope::Plain, b"title") => Some(Field::Title),
            (Scope::Plain, b"category") => Some(Field::Category),
            (Scope::Content, b"encoded") => Some(Field::Body),
            (Scope::WordPress, b"post_id") => Some(Field::PostId),
            (Scope::WordPress, b"post_date") => Some(Field::PostDate),
            (Scope::WordPress, b"post_name") => Some(Field::PostName),
            (Scope::WordPress, b"status") => Some(Field::Status),
            (Scope::WordPress, b"post_parent") => Some(Field::PostParent),
            (Scope::WordPress, b"menu_order") => Some(Field::MenuOrder),
            (Scope::WordPress, b"post_type") => Some(Field::PostType),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PartialItem {
    title: String,
    categories: Vec<String>,
    body: String,
    post_id: String,
    post_date: String,
    post_name: String,
    status: String,
    post_parent: String,
    menu_order: Option<String>,
    post_type: String,
}

impl PartialItem {
    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Title => self.title = value,
            Field::Category => self.categories.push(value),
            Field::Body => self.body = value,
            Field::PostId => self.post_id = value,
            Field::PostDate => self.post_date = value,
            Field::PostName => self.post_name = value,
            Field::Status => self.status = value,
            Field::PostParent => self.post_parent = value,
            Field::MenuOrder => self.menu_order = Some(value),
            Field::PostType => self.post_type = value,
            Field::ChannelTitle => {}
        }
    }
}

/// Outcome of turning one `<item>` into a content item.
enum ItemResult {
    Item(ContentItem),
    /// Not a content type (menu entry, revision, ...)
    Ignored,
    Skipped(String),
}

pub fn read_export(path: &Path) -> io::Result<ExportDocument> {
    let xml = match fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error reading export file {}: {}", path.display(), e))),
    };
    parse_export(&xml)
}

/// Parses a whole WXR document. Any XML syntax error, an unbalanced element or
/// a missing `<channel>` is fatal; problems local to one item only skip that item.
pub fn parse_export(xml: &str) -> io::Result<ExportDocument> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<Vec<u8>> = vec![];
    let mut saw_channel = false;
    let mut site_title = String::new();
    let mut current_item: Option<PartialItem> = None;
    let mut field: Option<(Field, usize)> = None;
    let mut text = String::new();

    let mut items: Vec<ContentItem> = vec![];
    let mut seen_ids: HashSet<ItemId> = HashSet::new();
    let mut warnings: Vec<String> = vec![];

    loop {
        let (ns, event) = match reader.read_resolved_event() {
            Ok(res) => res,
            Err(e) => return Err(malformed(format!("{} (at byte {})", e, reader.buffer_position()))),
        };
        let scope = Scope::of(&ns);

        match event {
            Event::Start(ref e) => {
                let local = e.local_name().as_ref().to_vec();
                let depth = stack.len();
                let in_channel = stack.get(CHANNEL_DEPTH).is_some_and(|n| n == b"channel");

                if depth == CHANNEL_DEPTH && scope == Scope::Plain && local == b"channel" {
                    saw_channel = true;
                } else if depth == ITEM_DEPTH && in_channel && scope == Scope::Plain {
                    match local.as_slice() {
                        b"title" if field.is_none() => field = Some((Field::ChannelTitle, depth)),
                        b"item" => current_item = Some(PartialItem::default()),
                        _ => {}
                    }
                } else if depth == ITEM_FIELD_DEPTH && current_item.is_some() {
                    if let Some(f) = Field::of_item_child(scope, &local) {
                        field = Some((f, depth));
                    }
                }

                if field.is_some_and(|(_, d)| d == depth) {
                    text.clear();
                }
                stack.push(local);
            }
            Event::Text(ref e) => {
                if field.is_some() {
                    match e.unescape() {
                        Ok(t) => text.push_str(&t),
                        Err(_) => text.push_str(&String::from_utf8_lossy(&e.to_vec())),
                    }
                }
            }
            Event::CData(ref e) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e.to_vec()));
                }
            }
            Event::End(_) => {
                let Some(local) = stack.pop() else {
                    return Err(malformed("closing tag without an open element".to_string()));
                };
                let depth = stack.len();

                if let Some((f, field_depth)) = field {
                    if field_depth == depth {
                        let value = mem::take(&mut text);
                        if f == Field::ChannelTitle {
                            site_title = value.trim().to_string();
                        } else if let Some(ref mut item) = current_item {
                            item.set(f, value);
                        }
                        field = None;
                    }
                }

                if depth == ITEM_DEPTH && local == b"item" {
                    if let Some(partial) = current_item.take() {
                        match finish_item(partial, &mut seen_ids) {
                            ItemResult::Item(item) => items.push(item),
                            ItemResult::Ignored => {}
                            ItemResult::Skipped(msg) => {
                                warn!("{}", msg);
                                warnings.push(msg);
                            }
                        }
                    }
                }
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(malformed(format!("unexpected end of document, <{}> is not closed", String::from_utf8_lossy(open))));
                }
                break;
            }
            _ => {}
        }
    }

    if !saw_channel {
        return Err(malformed("missing <channel>".to_string()));
    }

    debug!("Parsed {} content items from export '{}'", items.len(), site_title);

    Ok(ExportDocument {
        site_title,
        items,
        warnings,
    })
}

fn malformed(desc: String) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, format!("Invalid WXR export: {}", desc))
}

fn finish_item(partial: PartialItem, seen_ids: &mut HashSet<ItemId>) -> ItemResult {
    let post_type = partial.post_type.trim();
    let Some(kind) = ItemKind::from_post_type(post_type) else {
        debug!("Ignoring item of type '{}'", post_type);
        return ItemResult::Ignored;
    };

    let raw_title = partial.title.trim();
    let id = match partial.post_id.trim().parse::<u64>() {
        Ok(id) => ItemId(id),
        Err(_) => {
            return ItemResult::Skipped(format!("Skipping {} '{}': unusable identifier '{}'",
                                               post_type, raw_title, partial.post_id.trim()));
        }
    };

    if !seen_ids.insert(id) {
        return ItemResult::Skipped(format!("Skipping {} '{}': identifier {} already used", post_type, raw_title, id));
    }

    let title = if raw_title.is_empty() {
        format!("{} {}", kind.label(), id)
    } else {
        raw_title.to_string()
    };

    let parent_id = match partial.post_parent.trim().parse::<u64>() {
        Ok(parent) if parent > 0 => Some(ItemId(parent)),
        _ => None,
    };

    let menu_order = partial.menu_order
        .and_then(|order| order.trim().parse::<i64>().ok())
        .unwrap_or(MENU_ORDER_UNSET);

    let date = match partial.post_date.trim() {
        "" => None,
        raw => match parse_date_time(raw) {
            Ok(date) => Some(date),
            Err(e) => {
                debug!("{} {} has no usable date: {}", kind.label(), id, e);
                None
            }
        },
    };

    let mut categories: Vec<String> = vec![];
    for category in partial.categories {
        let category = category.trim();
        if !category.is_empty() && !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }

    ItemResult::Item(ContentItem {
        id,
        kind,
        status: ItemStatus::from_wxr(partial.status.trim()),
        title,
        slug: partial.post_name.trim().to_string(),
        body: partial.body,
        date,
        parent_id,
        menu_order,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    use crate::test_data::{SAMPLE_WXR, TRUNCATED_WXR};

    use super::*;

    fn find(doc: &ExportDocument, id: u64) -> &ContentItem {
        doc.items.iter().find(|i| i.id == ItemId(id)).unwrap()
    }

    #[test]
    fn test_parse_sample() {
        let doc = parse_export(SAMPLE_WXR).unwrap();
        assert_eq!(doc.site_title, "Caf\u{e9} & Code");

        let about = find(&doc, 2);
        assert_eq!(about.kind, ItemKind::Page);
        assert_eq!(about.status, ItemStatus::Published);
        assert_eq!(about.title, "About");
        assert_eq!(about.slug, "about");
        assert_eq!(about.menu_order, 1);
        assert_eq!(about.parent_id, None);
        assert_eq!(about.body, "<p>We write about <em>caf\u{e9}</em> &amp; code.</p>");

        let team = find(&doc, 3);
        assert_eq!(team.parent_id, Some(ItemId(2)));

        let post = find(&doc, 10);
        assert_eq!(post.kind, ItemKind::Post);
        let expected = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveTime::from_hms_opt(10, 11, 12).unwrap(),
        );
        assert_eq!(post.date, Some(expected));
        assert_eq!(post.categories, vec!["News".to_string(), "rust".to_string()]);
    }

    #[test]
    fn test_parse_defaults_for_missing_fields() {
        let doc = parse_export(SAMPLE_WXR).unwrap();

        let undated = find(&doc, 12);
        assert_eq!(undated.date, None);
        assert_eq!(undated.menu_order, MENU_ORDER_UNSET);
        assert_eq!(undated.title, "Post 12");

        let draft = find(&doc, 5);
        assert_eq!(draft.status, ItemStatus::Other("draft".to_string()));
        assert_eq!(draft.date, None);
    }

    #[test]
    fn test_parse_skips_non_content_and_bad_ids() {
        let doc = parse_export(SAMPLE_WXR).unwrap();
        assert!(doc.items.iter().all(|i| i.id != ItemId(30)));
        assert_eq!(find(&doc, 20).kind, ItemKind::Attachment);
        assert_eq!(doc.warnings.len(), 2);
        assert!(doc.warnings[0].contains("unusable identifier 'abc'"));
        assert!(doc.warnings[1].contains("identifier 10 already used"));
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let doc = parse_export(SAMPLE_WXR).unwrap();
        let ids: Vec<u64> = doc.items.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 20]);
    }

    #[test]
    fn test_parse_truncated_is_fatal() {
        let err = parse_export(TRUNCATED_WXR).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn test_parse_mismatched_tags_is_fatal() {
        let xml = "<rss><channel><title>x</wrong></channel></rss>";
        assert!(parse_export(xml).is_err());
    }

    #[test]
    fn test_parse_requires_channel() {
        let err = parse_export("<rss><item></item></rss>").err().unwrap();
        assert!(err.to_string().contains("missing <channel>"));
    }

    #[test]
    fn test_parse_older_export_namespace() {
        let xml = r#"<rss xmlns:wp="http://wordpress.org/export/1.0/"><channel><title>Old</title>
<item><title>Hi</title><wp:post_id>1</wp:post_id><wp:post_type>post</wp:post_type><wp:status>publish</wp:status></item>
</channel></rss>"#;
        let doc = parse_export(xml).unwrap();
        assert_eq!(doc.site_title, "Old");
        assert_eq!(doc.items.len(), 1);
        assert!(doc.items[0].is_published());
    }
}
