use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::view::{TemplateSources, ViewLink};

/// Parts of the outer page shared by every document of the site.
pub struct SiteChrome {
    pub site_title: String,
    pub posts_root: String,
    pub posts_heading: String,
    pub has_feed: bool,
    pub current_year: i32,
    /// Root-level pages in navigation order, as paths from the site root.
    pub nav: Vec<(String, String)>,
}

#[derive(ramhorns::Content)]
struct LayoutView<'a> {
    page_title: &'a str,
    site_title: &'a str,
    base_path: &'a str,
    has_head_includes: bool,
    head_includes: String,
    has_feed: bool,
    posts_root: &'a str,
    posts_heading: &'a str,
    nav_pages: Vec<ViewLink>,
    content: &'a str,
    current_year: i32,
    has_footer_includes: bool,
    footer_includes: String,
}

#[derive(ramhorns::Content)]
struct IncludeView<'a> {
    base_path: &'a str,
}

/// Wraps rendered bodies into `base.tpl`, with the theme partials resolved
/// for the depth of each document.
pub struct LayoutRenderer<'a> {
    template: Template<'a>,
    head_includes: Option<Template<'a>>,
    footer_includes: Option<Template<'a>>,
    chrome: SiteChrome,
}

fn parse_template<'a>(src: &'a str, name: &str) -> io::Result<Template<'a>> {
    match Template::new(src) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {}: {}", name, e))),
    }
}

impl<'a> LayoutRenderer<'a> {
    pub fn new(sources: &'a TemplateSources, chrome: SiteChrome) -> io::Result<LayoutRenderer<'a>> {
        let template = parse_template(&sources.base, "base template")?;
        let head_includes = match sources.head_includes {
            Some(ref src) => Some(parse_template(src, "head includes")?),
            None => None,
        };
        let footer_includes = match sources.footer_includes {
            Some(ref src) => Some(parse_template(src, "footer includes")?),
            None => None,
        };

        Ok(LayoutRenderer {
            template,
            head_includes,
            footer_includes,
            chrome,
        })
    }

    pub fn site_title(&self) -> &str {
        &self.chrome.site_title
    }

    pub fn render(&self, page_title: &str, base_path: &str, content: &str) -> String {
        let include_view = IncludeView { base_path };
        let head_includes = self.head_includes.as_ref()
            .map(|tpl| tpl.render(&include_view))
            .unwrap_or_default();
        let footer_includes = self.footer_includes.as_ref()
            .map(|tpl| tpl.render(&include_view))
            .unwrap_or_default();

        let nav_pages = self.chrome.nav.iter()
            .map(|(url_path, title)| ViewLink {
                href: format!("{}{}", base_path, url_path),
                title: title.clone(),
            })
            .collect();

        self.template.render(&LayoutView {
            page_title,
            site_title: &self.chrome.site_title,
            base_path,
            has_head_includes: self.head_includes.is_some(),
            head_includes,
            has_feed: self.chrome.has_feed,
            posts_root: &self.chrome.posts_root,
            posts_heading: &self.chrome.posts_heading,
            nav_pages,
            content,
            current_year: self.chrome.current_year,
            has_footer_includes: self.footer_includes.is_some(),
            footer_includes,
        })
    }
}
