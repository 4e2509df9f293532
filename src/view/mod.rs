use std::fs;
use std::io;
use std::path::Path;

use spdlog::{debug, info};

pub mod layout_renderer;
pub mod list_renderer;
pub mod page_renderer;
pub mod post_renderer;
pub mod rss_renderer;

pub const BASE_TPL: &str = "base.tpl";
pub const PAGE_TPL: &str = "page.tpl";
pub const POST_TPL: &str = "post.tpl";
pub const LIST_TPL: &str = "list.tpl";
pub const HOME_TPL: &str = "home.tpl";
pub const HEAD_INCLUDES: &str = "_head_includes.html";
pub const FOOTER_INCLUDES: &str = "_footer_includes.html";

const BUILTIN_BASE: &str = include_str!("../../res/template/base.tpl");
const BUILTIN_PAGE: &str = include_str!("../../res/template/page.tpl");
const BUILTIN_POST: &str = include_str!("../../res/template/post.tpl");
const BUILTIN_LIST: &str = include_str!("../../res/template/list.tpl");
const BUILTIN_HOME: &str = include_str!("../../res/template/home.tpl");
pub const BUILTIN_STYLESHEET: &str = include_str!("../../res/static/styles.css");

/// A link inside a navigation section. `href` is already relative to the
/// document being rendered.
#[derive(ramhorns::Content)]
pub struct ViewLink {
    pub href: String,
    pub title: String,
}

/// Template sources for one run. Files found in the template directory win
/// over the built-in copies.
pub struct TemplateSources {
    pub base: String,
    pub page: String,
    pub post: String,
    pub list: String,
    pub home: String,
    pub head_includes: Option<String>,
    pub footer_includes: Option<String>,
}

impl TemplateSources {
    pub fn builtin() -> TemplateSources {
        TemplateSources {
            base: BUILTIN_BASE.to_string(),
            page: BUILTIN_PAGE.to_string(),
            post: BUILTIN_POST.to_string(),
            list: BUILTIN_LIST.to_string(),
            home: BUILTIN_HOME.to_string(),
            head_includes: None,
            footer_includes: None,
        }
    }

    pub fn load(template_dir: &Path) -> io::Result<TemplateSources> {
        Ok(TemplateSources {
            base: read_or_builtin(template_dir, BASE_TPL, BUILTIN_BASE)?,
            page: read_or_builtin(template_dir, PAGE_TPL, BUILTIN_PAGE)?,
            post: read_or_builtin(template_dir, POST_TPL, BUILTIN_POST)?,
            list: read_or_builtin(template_dir, LIST_TPL, BUILTIN_LIST)?,
            home: read_or_builtin(template_dir, HOME_TPL, BUILTIN_HOME)?,
            head_includes: read_partial(template_dir, HEAD_INCLUDES)?,
            footer_includes: read_partial(template_dir, FOOTER_INCLUDES)?,
        })
    }
}

fn read_or_builtin(template_dir: &Path, name: &str, builtin: &str) -> io::Result<String> {
    let path = template_dir.join(name);
    if !path.is_file() {
        debug!("Using built-in {}", name);
        return Ok(builtin.to_string());
    }

    info!("Using template {}", path.display());
    fs::read_to_string(&path)
        .map_err(|e| io::Error::new(e.kind(), format!("Error reading template {}: {}", path.display(), e)))
}

/// A missing or blank partial is the same as no partial.
fn read_partial(template_dir: &Path, name: &str) -> io::Result<Option<String>> {
    let path = template_dir.join(name);
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| io::Error::new(e.kind(), format!("Error reading partial {}: {}", path.display(), e)))?;
    if content.trim().is_empty() {
        return Ok(None);
    }

    info!("Including {}", path.display());
    Ok(Some(content))
}
