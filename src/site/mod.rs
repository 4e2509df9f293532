use std::collections::HashMap;

use crate::export::{ContentItem, ExportDocument, ItemId, ItemKind};
use crate::site::hierarchy::{build_hierarchy, PageTree};
use crate::site::paths::{base_slug, OutputPath, SlugScope, SlugTable, ASSETS_DIR, STATIC_DIR};

pub mod hierarchy;
pub mod paths;

pub struct PostRecord<'a> {
    pub item: &'a ContentItem,
    pub slug: String,
    pub path: OutputPath,
}

/// Everything known about the site before a single file is written.
pub struct SitePlan<'a> {
    pub pages: PageTree<'a>,
    /// Indexed like the page tree nodes.
    pub page_paths: Vec<OutputPath>,
    /// Listing order.
    pub posts: Vec<PostRecord<'a>>,
    pub posts_root: String,
    pub warnings: Vec<String>,
}

impl<'a> SitePlan<'a> {
    pub fn posts_index(&self) -> OutputPath {
        OutputPath::from_segments(vec![self.posts_root.clone()])
    }
}

pub fn plan_site<'a>(doc: &'a ExportDocument, posts_root: &str) -> SitePlan<'a> {
    let hierarchy = build_hierarchy(doc);
    let pages = hierarchy.pages;

    let mut slugs = SlugTable::new(&[posts_root, ASSETS_DIR, STATIC_DIR]);

    // Slugs are claimed in document order so renumbering is stable across runs.
    let page_slugs: Vec<String> = pages.nodes().iter()
        .map(|node| {
            let scope = match node.parent {
                Some(parent) => SlugScope::ChildrenOf(parent),
                None => SlugScope::Root,
            };
            slugs.claim(scope, &base_slug(node.item))
        })
        .collect();

    let page_paths = (0..pages.len())
        .map(|idx| {
            let mut segments: Vec<String> = pages.ancestors(idx).into_iter()
                .map(|ancestor| page_slugs[ancestor].clone())
                .collect();
            segments.push(page_slugs[idx].clone());
            OutputPath::from_segments(segments)
        })
        .collect();

    let post_slugs: HashMap<ItemId, String> = doc.published(ItemKind::Post)
        .map(|item| (item.id, slugs.claim(SlugScope::Posts, &base_slug(item))))
        .collect();

    let posts = hierarchy.posts.into_iter()
        .map(|item| {
            let slug = post_slugs.get(&item.id).cloned().unwrap_or_else(|| item.id.to_string());
            let path = OutputPath::from_segments(vec![posts_root.to_string(), slug.clone()]);
            PostRecord { item, slug, path }
        })
        .collect();

    SitePlan {
        pages,
        page_paths,
        posts,
        posts_root: posts_root.to_string(),
        warnings: hierarchy.warnings,
    }
}
