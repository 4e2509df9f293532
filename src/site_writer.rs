use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local};
use spdlog::{debug, info};

use crate::export::wxr_parser::read_export;
use crate::media::{MediaFetcher, MediaRewriter};
use crate::site::paths::{OutputPath, ASSETS_DIR, STATIC_DIR};
use crate::site::{plan_site, SitePlan};
use crate::text_utils::{format_date_human, slugify, summarize_html};
use crate::util::fs_helper::{copy_dir, list_files, write_file};
use crate::view::layout_renderer::{LayoutRenderer, SiteChrome};
use crate::view::list_renderer::{HomeRenderer, ListRenderer, ViewCard};
use crate::view::page_renderer::PageRenderer;
use crate::view::post_renderer::PostRenderer;
use crate::view::rss_renderer::{FeedEntry, RssChannel};
use crate::view::{TemplateSources, ViewLink, BUILTIN_STYLESHEET};

pub const FEED_FILE: &str = "feed.xml";
const UNTITLED_SITE: &str = "Untitled site";

pub struct FeedOptions {
    pub site_url: String,
    pub description: String,
    pub size: usize,
}

pub struct SiteOptions {
    pub output_dir: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub theme_assets_dir: Option<PathBuf>,
    /// Replaces the title declared by the export
    pub site_title: Option<String>,
    /// Must be a slug, see `slugify`
    pub posts_root: String,
    pub posts_heading: String,
    pub latest_posts: usize,
    pub summary_length: usize,
    pub feed: Option<FeedOptions>,
}

#[derive(Debug, Default)]
pub struct SiteReport {
    pub pages_written: usize,
    pub posts_written: usize,
    pub media_downloaded: usize,
    pub warnings: Vec<String>,
}

struct Renderers<'a> {
    layout: LayoutRenderer<'a>,
    page: PageRenderer<'a>,
    post: PostRenderer<'a>,
    list: ListRenderer<'a>,
    home: HomeRenderer<'a>,
}

/// Converts the export at `input` into a static site. Media is downloaded only
/// when a fetcher is given. Nothing is written when the export or the
/// templates cannot be read.
pub fn generate_site(input: &Path, options: &SiteOptions, fetcher: Option<&dyn MediaFetcher>) -> Result<SiteReport> {
    if options.posts_root.is_empty() || slugify(&options.posts_root) != options.posts_root {
        bail!("Invalid posts root '{}': expected a lowercase slug such as 'blog'", options.posts_root);
    }

    let doc = read_export(input)
        .with_context(|| format!("Could not read export {}", input.display()))?;
    let sources = TemplateSources::load(&options.template_dir)
        .context("Could not load templates")?;

    let plan = plan_site(&doc, &options.posts_root);
    let site_title = match options.site_title {
        Some(ref title) => title.clone(),
        None if doc.site_title.trim().is_empty() => UNTITLED_SITE.to_string(),
        None => doc.site_title.clone(),
    };
    info!("Site '{}': {} pages, {} posts", site_title, plan.pages.len(), plan.posts.len());

    let chrome = SiteChrome {
        site_title,
        posts_root: plan.posts_root.clone(),
        posts_heading: options.posts_heading.clone(),
        has_feed: options.feed.is_some(),
        current_year: Local::now().year(),
        nav: plan.pages.roots().iter()
            .map(|&idx| (plan.page_paths[idx].url_path(), plan.pages.node(idx).item.title.clone()))
            .collect(),
    };
    let renderers = Renderers {
        layout: LayoutRenderer::new(&sources, chrome)?,
        page: PageRenderer::new(&sources.page)?,
        post: PostRenderer::new(&sources.post)?,
        list: ListRenderer::new(&sources.list)?,
        home: HomeRenderer::new(&sources.home)?,
    };

    let output_dir = options.output_dir.as_path();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Could not create output directory {}", output_dir.display()))?;
    let theme_assets = copy_static_files(options)?;

    let mut rewriter = fetcher.map(|f| {
        let mut rewriter = MediaRewriter::new(f, output_dir);
        rewriter.reserve(&theme_assets);
        rewriter
    });

    let mut report = SiteReport::default();
    report.pages_written = write_pages(&plan, &renderers, &mut rewriter, output_dir)?;
    report.posts_written = write_posts(&plan, &renderers, &mut rewriter, output_dir)?;
    write_posts_index(&plan, &renderers, &options.posts_heading, output_dir)?;
    write_home(&plan, &renderers, options, output_dir)?;
    if let Some(ref feed) = options.feed {
        write_feed(&plan, feed, &renderers, options, output_dir)?;
    }

    report.warnings.extend(doc.warnings.iter().cloned());
    report.warnings.extend(plan.warnings.iter().cloned());
    if let Some(rewriter) = rewriter {
        report.media_downloaded = rewriter.assets().len();
        report.warnings.extend(rewriter.into_warnings());
    }

    info!("Wrote {} pages, {} posts and {} media files to {}",
        report.pages_written, report.posts_written, report.media_downloaded, output_dir.display());

    Ok(report)
}

/// Returns the theme files copied into the assets directory.
fn copy_static_files(options: &SiteOptions) -> Result<Vec<PathBuf>> {
    let static_out = options.output_dir.join(STATIC_DIR);
    match options.static_dir {
        Some(ref static_dir) => {
            let count = copy_dir(static_dir, &static_out)
                .with_context(|| format!("Could not copy static files from {}", static_dir.display()))?;
            debug!("Copied {} static files", count);
        }
        None => write_file(&static_out.join("styles.css"), BUILTIN_STYLESHEET.as_bytes())?,
    }

    let Some(ref assets_dir) = options.theme_assets_dir else {
        return Ok(vec![]);
    };
    let count = copy_dir(assets_dir, &options.output_dir.join(ASSETS_DIR))
        .with_context(|| format!("Could not copy theme assets from {}", assets_dir.display()))?;
    debug!("Copied {} theme assets", count);

    list_files(assets_dir)
        .with_context(|| format!("Could not list theme assets in {}", assets_dir.display()))
}

fn rewrite_body(rewriter: &mut Option<MediaRewriter>, body: &str, base_path: &str) -> String {
    match rewriter {
        Some(rewriter) => rewriter.rewrite(body, base_path),
        None => body.to_string(),
    }
}

fn write_pages(plan: &SitePlan, renderers: &Renderers, rewriter: &mut Option<MediaRewriter>, output_dir: &Path) -> Result<usize> {
    let link_to = |idx: usize, base_path: &str| ViewLink {
        href: format!("{}{}", base_path, plan.page_paths[idx].url_path()),
        title: plan.pages.node(idx).item.title.clone(),
    };

    for (idx, node) in plan.pages.nodes().iter().enumerate() {
        let path = &plan.page_paths[idx];
        let base_path = path.base_path();

        let body = rewrite_body(rewriter, &node.item.body, &base_path);
        let breadcrumbs = plan.pages.ancestors(idx).into_iter()
            .map(|ancestor| link_to(ancestor, &base_path))
            .collect();
        let children = node.children.iter()
            .map(|&child| link_to(child, &base_path))
            .collect();

        let content = renderers.page.render(&node.item.title, &body, breadcrumbs, children);
        let html = renderers.layout.render(&node.item.title, &base_path, &content);
        write_file(&path.file_path(output_dir), html.as_bytes())?;
        debug!("Page {} -> {}", node.item.id, path.url_path());
    }

    Ok(plan.pages.len())
}

fn write_posts(plan: &SitePlan, renderers: &Renderers, rewriter: &mut Option<MediaRewriter>, output_dir: &Path) -> Result<usize> {
    for post in &plan.posts {
        let base_path = post.path.base_path();
        let body = rewrite_body(rewriter, &post.item.body, &base_path);

        let content = renderers.post.render(post.item, &body);
        let html = renderers.layout.render(&post.item.title, &base_path, &content);
        write_file(&post.path.file_path(output_dir), html.as_bytes())?;
        debug!("Post {} -> {}", post.item.id, post.path.url_path());
    }

    Ok(plan.posts.len())
}

fn post_cards(plan: &SitePlan, base_path: &str, limit: usize) -> Vec<ViewCard> {
    plan.posts.iter()
        .take(limit)
        .map(|post| ViewCard::new(
            format!("{}{}", base_path, post.path.url_path()),
            post.item.title.clone(),
            post.item.date.as_ref().map(format_date_human),
        ))
        .collect()
}

fn write_posts_index(plan: &SitePlan, renderers: &Renderers, heading: &str, output_dir: &Path) -> Result<()> {
    let path = plan.posts_index();
    let base_path = path.base_path();

    let content = renderers.list.render(heading, post_cards(plan, &base_path, plan.posts.len()));
    let html = renderers.layout.render(heading, &base_path, &content);
    write_file(&path.file_path(output_dir), html.as_bytes())?;
    Ok(())
}

fn write_home(plan: &SitePlan, renderers: &Renderers, options: &SiteOptions, output_dir: &Path) -> Result<()> {
    let pages = plan.pages.roots().iter()
        .map(|&idx| {
            let item = plan.pages.node(idx).item;
            let summary = summarize_html(&item.body, options.summary_length);
            let summary = if summary.is_empty() { None } else { Some(summary) };
            ViewCard::new(plan.page_paths[idx].url_path(), item.title.clone(), summary)
        })
        .collect();
    let posts = post_cards(plan, "", options.latest_posts);

    let home = OutputPath::home();
    let content = renderers.home.render(pages, posts);
    let html = renderers.layout.render("Home", &home.base_path(), &content);
    write_file(&home.file_path(output_dir), html.as_bytes())?;
    Ok(())
}

fn write_feed(plan: &SitePlan, feed: &FeedOptions, renderers: &Renderers, options: &SiteOptions, output_dir: &Path) -> Result<()> {
    let entries: Vec<FeedEntry> = plan.posts.iter()
        .take(feed.size)
        .map(|post| FeedEntry {
            title: &post.item.title,
            link_path: post.path.segments().join("/"),
            guid: post.item.id.to_string(),
            description: summarize_html(&post.item.body, options.summary_length),
            date: post.item.date,
        })
        .collect();

    let channel = RssChannel {
        ch_title: renderers.layout.site_title(),
        ch_link: &feed.site_url,
        ch_desc: &feed.description,
    };
    let xml = channel.render(&entries).context("Could not render RSS feed")?;

    let feed_path = output_dir.join(&plan.posts_root).join(FEED_FILE);
    write_file(&feed_path, &xml)?;
    info!("Feed with {} entries written to {}", entries.len(), feed_path.display());
    Ok(())
}
