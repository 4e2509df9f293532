use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

/// One entry of a listing. `href` is relative to the listing document.
#[derive(ramhorns::Content, Debug, Clone, PartialEq)]
pub struct ViewCard {
    pub href: String,
    pub title: String,
    pub has_subtitle: bool,
    pub subtitle: String,
}

impl ViewCard {
    pub fn new(href: String, title: String, subtitle: Option<String>) -> ViewCard {
        ViewCard {
            href,
            title,
            has_subtitle: subtitle.is_some(),
            subtitle: subtitle.unwrap_or_default(),
        }
    }
}

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    heading: &'a str,
    has_items: bool,
    items: Vec<ViewCard>,
}

#[derive(ramhorns::Content)]
struct HomePage {
    has_pages: bool,
    pages: Vec<ViewCard>,
    has_posts: bool,
    posts: Vec<ViewCard>,
}

fn parse_template<'a>(src: &'a str, name: &str) -> io::Result<Template<'a>> {
    match Template::new(src) {
        Ok(x) => Ok(x),
        Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", name, e))),
    }
}

/// The posts listing.
pub struct ListRenderer<'a> {
    pub template: Template<'a>,
}

impl ListRenderer<'_> {
    pub fn new(list_tpl_src: &str) -> io::Result<ListRenderer> {
        Ok(ListRenderer {
            template: parse_template(list_tpl_src, "list")?,
        })
    }

    pub fn render(&self, heading: &str, items: Vec<ViewCard>) -> String {
        self.template.render(&ListPage {
            heading,
            has_items: !items.is_empty(),
            items,
        })
    }
}

/// The site home: root pages with a preview, then the latest posts.
pub struct HomeRenderer<'a> {
    pub template: Template<'a>,
}

impl HomeRenderer<'_> {
    pub fn new(home_tpl_src: &str) -> io::Result<HomeRenderer> {
        Ok(HomeRenderer {
            template: parse_template(home_tpl_src, "home")?,
        })
    }

    pub fn render(&self, pages: Vec<ViewCard>, posts: Vec<ViewCard>) -> String {
        self.template.render(&HomePage {
            has_pages: !pages.is_empty(),
            pages,
            has_posts: !posts.is_empty(),
            posts,
        })
    }
}
