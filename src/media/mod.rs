use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use regex::{Captures, Regex};
use spdlog::{info, warn};
use ureq::http::Uri;

use crate::site::paths::ASSETS_DIR;
use crate::text_utils::slugify;

pub mod http_fetcher;

const LINKED_MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico", "avif",
    "mp3", "ogg", "wav", "m4a", "mp4", "webm", "mov",
    "pdf", "zip", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
];

lazy_static! {
    static ref ATTR_REGEX: Regex = Regex::new(
        r#"(?i)(?P<attr>\s(?:src|href))=(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#
    ).unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Network(String),
    Status(u16),
    Io(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(desc) => write!(f, "network error: {}", desc),
            FetchError::Status(code) => write!(f, "HTTP status {}", code),
            FetchError::Io(desc) => write!(f, "I/O error: {}", desc),
        }
    }
}

/// One attempt, no retries.
pub trait MediaFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// A downloaded file, named relative to the assets directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub url: String,
    pub file_name: String,
}

/// Downloads remote media referenced from content and points the references
/// at the local copies. Every URL is attempted at most once per run; a failed
/// URL stays remote everywhere it appears.
pub struct MediaRewriter<'f> {
    fetcher: &'f dyn MediaFetcher,
    assets_dir: PathBuf,
    fetched: HashMap<String, Option<String>>,
    claimed_names: HashSet<String>,
    assets: Vec<MediaAsset>,
    warnings: Vec<String>,
}

impl<'f> MediaRewriter<'f> {
    pub fn new(fetcher: &'f dyn MediaFetcher, output_dir: &Path) -> MediaRewriter<'f> {
        MediaRewriter {
            fetcher,
            assets_dir: output_dir.join(ASSETS_DIR),
            fetched: HashMap::new(),
            claimed_names: HashSet::new(),
            assets: vec![],
            warnings: vec![],
        }
    }

    /// Keeps downloads away from files already placed in the assets directory.
    /// Paths are relative to that directory; only their first component can
    /// clash with a downloaded name. Download names are lowercase, so the
    /// reserved ones are compared lowercase too.
    pub fn reserve(&mut self, files: &[PathBuf]) {
        for file in files {
            if let Some(first) = file.components().next() {
                let name = first.as_os_str().to_string_lossy().to_lowercase();
                self.claimed_names.insert(name);
            }
        }
    }

    /// Downloaded files in the order they were first referenced.
    pub fn assets(&self) -> &[MediaAsset] {
        &self.assets
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    /// `base_path` leads from the document holding `html` back to the site root.
    pub fn rewrite(&mut self, html: &str, base_path: &str) -> String {
        let result = ATTR_REGEX.replace_all(html, |caps: &Captures| {
            let original = caps[0].to_string();
            let attr = &caps["attr"];
            let (url, quote) = match (caps.name("dq"), caps.name("sq")) {
                (Some(url), _) => (url.as_str(), '"'),
                (_, Some(url)) => (url.as_str(), '\''),
                _ => return original,
            };

            let is_src = attr.trim().eq_ignore_ascii_case("src");
            let Some(file_name) = self.local_file_for(url.trim(), is_src) else {
                return original;
            };
            format!("{}={}{}{}/{}{}", attr, quote, base_path, ASSETS_DIR, file_name, quote)
        });
        result.to_string()
    }

    fn local_file_for(&mut self, url: &str, is_src: bool) -> Option<String> {
        if let Some(known) = self.fetched.get(url) {
            return known.clone();
        }

        let candidate = media_file_name(url, is_src)?;
        let outcome = match self.download(url, &candidate) {
            Ok(asset) => {
                info!("Downloaded {} to {}/{}", url, ASSETS_DIR, asset.file_name);
                let file_name = asset.file_name.clone();
                self.assets.push(asset);
                Some(file_name)
            }
            Err(e) => {
                let msg = format!("Could not download {}: {}. Keeping the remote URL", url, e);
                warn!("{}", msg);
                self.warnings.push(msg);
                None
            }
        };

        self.fetched.insert(url.to_string(), outcome.clone());
        outcome
    }

    fn download(&mut self, url: &str, candidate: &str) -> Result<MediaAsset, FetchError> {
        let bytes = self.fetcher.fetch(url)?;

        let file_name = self.claim_name(candidate);
        let io_err = |e: std::io::Error| FetchError::Io(e.to_string());
        fs::create_dir_all(&self.assets_dir).map_err(io_err)?;
        if let Err(e) = fs::write(self.assets_dir.join(&file_name), bytes) {
            self.claimed_names.remove(&file_name);
            return Err(io_err(e));
        }

        Ok(MediaAsset {
            url: url.to_string(),
            file_name,
        })
    }

    fn claim_name(&mut self, candidate: &str) -> String {
        if self.claimed_names.insert(candidate.to_string()) {
            return candidate.to_string();
        }

        let (stem, ext) = match candidate.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (candidate, String::new()),
        };
        let mut counter = 2;
        loop {
            let name = format!("{}-{}{}", stem, counter, ext);
            if self.claimed_names.insert(name.clone()) {
                return name;
            }
            counter += 1;
        }
    }
}

/// Local file name for a downloadable URL, or `None` when the reference is
/// not remote media. `href` targets need a known media extension; `src`
/// targets are always media.
pub fn media_file_name(url: &str, is_src: bool) -> Option<String> {
    // Exports often carry raw spaces in upload paths
    let uri = url.replace(' ', "%20").parse::<Uri>().ok()?;
    match uri.scheme_str() {
        Some(scheme) if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") => {}
        _ => return None,
    }
    if uri.host().map_or(true, |host| host.is_empty()) {
        return None;
    }

    let last_segment = uri.path().rsplit('/').next().unwrap_or_default();
    let last_segment = percent_decode_str(last_segment).decode_utf8_lossy();
    if last_segment.is_empty() {
        return None;
    }

    let (stem, ext) = match last_segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            (stem, Some(ext.to_ascii_lowercase()))
        }
        _ => (last_segment.as_ref(), None),
    };

    if !is_src {
        match ext {
            Some(ref ext) if LINKED_MEDIA_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => return None,
        }
    }

    let stem = match slugify(stem) {
        s if s.is_empty() => "asset".to_string(),
        s => s,
    };

    Some(match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    })
}
