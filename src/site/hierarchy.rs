use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use spdlog::warn;

use crate::export::{ContentItem, ExportDocument, ItemId, ItemKind};

pub struct PageNode<'a> {
    pub item: &'a ContentItem,
    pub parent: Option<usize>,
    /// Navigation order: menu order, then title ignoring case.
    pub children: Vec<usize>,
}

/// Arena of published pages. Node indices follow document order.
pub struct PageTree<'a> {
    nodes: Vec<PageNode<'a>>,
    roots: Vec<usize>,
}

impl<'a> PageTree<'a> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &PageNode<'a> {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[PageNode<'a>] {
        &self.nodes
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Ancestors of `idx`, root first, without `idx` itself.
    pub fn ancestors(&self, idx: usize) -> Vec<usize> {
        let mut chain = vec![];
        let mut cursor = self.nodes[idx].parent;
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.nodes[parent].parent;
        }
        chain.reverse();
        chain
    }
}

pub struct Hierarchy<'a> {
    pub pages: PageTree<'a>,
    /// Newest first, undated posts last in document order.
    pub posts: Vec<&'a ContentItem>,
    pub warnings: Vec<String>,
}

pub fn build_hierarchy(doc: &ExportDocument) -> Hierarchy {
    let mut warnings = vec![];

    let pages: Vec<&ContentItem> = doc.published(ItemKind::Page).collect();
    let index_by_id: HashMap<ItemId, usize> = pages.iter()
        .enumerate()
        .map(|(idx, page)| (page.id, idx))
        .collect();

    let mut parents: Vec<Option<usize>> = pages.iter()
        .map(|page| page.parent_id.and_then(|id| index_by_id.get(&id).copied()))
        .collect();

    // A page whose ancestry leads back to itself is cut loose and becomes a root.
    // Pages are visited in document order so the first page of a loop is the one demoted.
    for idx in 0..pages.len() {
        let mut visited = HashSet::new();
        let mut cursor = parents[idx];
        while let Some(parent) = cursor {
            if parent == idx {
                let msg = format!("Page {} '{}' is part of a parent cycle, treating it as top level",
                                  pages[idx].id, pages[idx].title);
                warn!("{}", msg);
                warnings.push(msg);
                parents[idx] = None;
                break;
            }
            if !visited.insert(parent) {
                break;
            }
            cursor = parents[parent];
        }
    }

    let mut nodes: Vec<PageNode> = pages.iter()
        .zip(parents.iter())
        .map(|(item, parent)| PageNode { item: *item, parent: *parent, children: vec![] })
        .collect();

    let mut roots = vec![];
    for idx in 0..nodes.len() {
        match nodes[idx].parent {
            Some(parent) => nodes[parent].children.push(idx),
            None => roots.push(idx),
        }
    }

    sort_siblings(&nodes, &mut roots);
    for idx in 0..nodes.len() {
        let mut children = std::mem::take(&mut nodes[idx].children);
        sort_siblings(&nodes, &mut children);
        nodes[idx].children = children;
    }

    let mut posts: Vec<&ContentItem> = doc.published(ItemKind::Post).collect();
    sort_posts(&mut posts);

    Hierarchy {
        pages: PageTree { nodes, roots },
        posts,
        warnings,
    }
}

fn sort_siblings(nodes: &[PageNode], siblings: &mut [usize]) {
    siblings.sort_by(|&a, &b| {
        let (a, b) = (nodes[a].item, nodes[b].item);
        a.menu_order.cmp(&b.menu_order)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
}

/// Stable sort, so posts with equal or missing dates keep document order.
pub fn sort_posts(posts: &mut [&ContentItem]) {
    posts.sort_by(|a, b| {
        match (a.date, b.date) {
            (Some(da), Some(db)) => db.cmp(&da),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
