use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;

use crate::site_writer::{FeedOptions, SiteOptions};
use crate::text_utils::slugify;

pub const DEFAULT_OUTPUT_DIR: &str = "site";
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";
pub const DEFAULT_POSTS_ROOT: &str = "blog";
pub const DEFAULT_POSTS_HEADING: &str = "Blog";

#[derive(Deserialize)]
#[serde(default)]
pub struct Paths {
    pub output_dir: PathBuf,
    pub template_dir: PathBuf,
    /// Copied to `<output>/static` instead of the built-in stylesheet
    pub static_dir: Option<PathBuf>,
    /// Mirrored theme files, copied to `<output>/assets`
    pub theme_assets_dir: Option<PathBuf>,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            static_dir: None,
            theme_assets_dir: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Site {
    pub title: Option<String>,
    /// Folder of the posts. Normalized to a slug when loaded.
    pub posts_root: String,
    /// Label of the posts listing, in its heading and in the navigation
    pub posts_heading: String,
    pub latest_posts: usize,
    pub summary_length: usize,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            title: None,
            posts_root: DEFAULT_POSTS_ROOT.to_string(),
            posts_heading: DEFAULT_POSTS_HEADING.to_string(),
            latest_posts: 6,
            summary_length: 140,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct Media {
    pub download: bool,
    pub timeout_secs: u64,
    pub max_size_mb: u64,
}

impl Default for Media {
    fn default() -> Self {
        Media {
            download: false,
            timeout_secs: 20,
            max_size_mb: 32,
        }
    }
}

impl Media {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Deserialize)]
pub struct RssFeed {
    pub site_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_feed_size")]
    pub size: usize,
}

fn default_feed_size() -> usize {
    20
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub site: Site,
    pub media: Media,
    pub feed: Option<RssFeed>,
    pub log: Option<Log>,
}

impl Config {
    /// Generator options before command-line overrides are applied.
    pub fn site_options(&self) -> SiteOptions {
        SiteOptions {
            output_dir: self.paths.output_dir.clone(),
            template_dir: self.paths.template_dir.clone(),
            static_dir: self.paths.static_dir.clone(),
            theme_assets_dir: self.paths.theme_assets_dir.clone(),
            site_title: self.site.title.clone(),
            posts_root: self.site.posts_root.clone(),
            posts_heading: self.site.posts_heading.clone(),
            latest_posts: self.site.latest_posts,
            summary_length: self.site.summary_length,
            feed: self.feed.as_ref().map(|feed| FeedOptions {
                site_url: feed.site_url.clone(),
                description: feed.description.clone(),
                size: feed.size,
            }),
        }
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    match (exe_dir, path.to_str()) {
        (Some(exe_dir), Some(str_path)) => {
            PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy()))
        }
        _ => path,
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    let posts_root = slugify(&cfg.site.posts_root);
    if posts_root.is_empty() {
        return Err(io::Error::new(ErrorKind::InvalidData, "site.posts_root cannot be empty"));
    }
    cfg.site.posts_root = posts_root;

    cfg.paths = Paths {
        output_dir: parse_path(cfg.paths.output_dir),
        template_dir: parse_path(cfg.paths.template_dir),
        static_dir: cfg.paths.static_dir.map(parse_path),
        theme_assets_dir: cfg.paths.theme_assets_dir.map(parse_path),
    };
    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
