use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::export::ContentItem;
use crate::text_utils::slugify;

pub const INDEX_FILE: &str = "index.html";
pub const ASSETS_DIR: &str = "assets";
pub const STATIC_DIR: &str = "static";

/// Directory level inside which slugs must be unique.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum SlugScope {
    Root,
    ChildrenOf(usize),
    Posts,
}

/// First-seen wins: later items asking for a taken slug get `-2`, `-3`, ...
pub struct SlugTable {
    taken: HashMap<SlugScope, HashSet<String>>,
}

impl SlugTable {
    /// `reserved` names are never handed out at the root level.
    pub fn new(reserved: &[&str]) -> SlugTable {
        let mut taken = HashMap::new();
        taken.insert(SlugScope::Root, reserved.iter().map(|s| s.to_string()).collect());
        SlugTable { taken }
    }

    pub fn claim(&mut self, scope: SlugScope, base: &str) -> String {
        let taken = self.taken.entry(scope).or_default();
        if taken.insert(base.to_string()) {
            return base.to_string();
        }

        let mut counter = 2;
        loop {
            let candidate = format!("{}-{}", base, counter);
            if taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// The explicit slug when it survives normalisation, then the title, then the id.
pub fn base_slug(item: &ContentItem) -> String {
    let explicit = percent_decode_str(&item.slug).decode_utf8_lossy();
    let slug = slugify(&explicit);
    if !slug.is_empty() {
        return slug;
    }

    let slug = slugify(&item.title);
    if !slug.is_empty() {
        return slug;
    }

    item.id.to_string()
}

/// Location of one generated document: a chain of directory names ending in
/// `index.html`. The empty chain is the site home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPath {
    segments: Vec<String>,
}

impl OutputPath {
    pub fn home() -> OutputPath {
        OutputPath { segments: vec![] }
    }

    pub fn from_segments(segments: Vec<String>) -> OutputPath {
        OutputPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// `about/team/index.html`
    pub fn url_path(&self) -> String {
        let mut url = String::new();
        for segment in &self.segments {
            url.push_str(segment);
            url.push('/');
        }
        url.push_str(INDEX_FILE);
        url
    }

    /// Prefix leading from this document back to the site root, e.g. `../../`.
    pub fn base_path(&self) -> String {
        base_path_for_depth(self.depth())
    }

    pub fn file_path(&self, output_dir: &Path) -> PathBuf {
        let mut path = output_dir.to_path_buf();
        for segment in &self.segments {
            path.push(segment);
        }
        path.join(INDEX_FILE)
    }
}

pub fn base_path_for_depth(depth: usize) -> String {
    "../".repeat(depth)
}
