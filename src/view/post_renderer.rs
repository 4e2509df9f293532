use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::export::ContentItem;
use crate::text_utils::{format_date_human, format_date_iso};

#[derive(ramhorns::Content)]
struct ViewCategory<'a> {
    name: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    title: &'a str,
    has_date: bool,
    date_iso: String,
    date_human: String,
    has_categories: bool,
    categories: Vec<ViewCategory<'a>>,
    body: &'a str,
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer> {
        let template = match Template::new(view_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing post template: {}", e)));
            }
        };

        Ok(PostRenderer {
            template,
        })
    }

    /// `body` is the content after media rewriting.
    pub fn render(&self, post: &ContentItem, body: &str) -> String {
        let categories: Vec<ViewCategory> = post.categories.iter().map(|c| ViewCategory { name: c.as_str() }).collect();
        let (date_iso, date_human) = match post.date {
            Some(ref date) => (format_date_iso(date), format_date_human(date)),
            None => (String::new(), String::new()),
        };

        self.template.render(&ViewItem {
            title: post.title.as_str(),
            has_date: post.date.is_some(),
            date_iso,
            date_human,
            has_categories: !categories.is_empty(),
            categories,
            body,
        })
    }
}
