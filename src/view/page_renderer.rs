use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::view::ViewLink;

#[derive(ramhorns::Content)]
struct PageView<'a> {
    title: &'a str,
    has_breadcrumbs: bool,
    breadcrumbs: Vec<ViewLink>,
    body: &'a str,
    has_children: bool,
    children: Vec<ViewLink>,
}

pub struct PageRenderer<'a> {
    pub template: Template<'a>,
}

impl PageRenderer<'_> {
    pub fn new(page_tpl_src: &str) -> io::Result<PageRenderer> {
        let template = match Template::new(page_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing page template: {}", e)));
            }
        };

        Ok(PageRenderer {
            template,
        })
    }

    /// `breadcrumbs` run from the root down to the parent of this page.
    pub fn render(&self, title: &str, body: &str, breadcrumbs: Vec<ViewLink>, children: Vec<ViewLink>) -> String {
        self.template.render(&PageView {
            title,
            has_breadcrumbs: !breadcrumbs.is_empty(),
            breadcrumbs,
            body,
            has_children: !children.is_empty(),
            children,
        })
    }
}
