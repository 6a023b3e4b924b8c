//! Blog index generation.
//!
//! Posts are hand-written HTML pages in one flat directory. The site's blog
//! listing reads a JSON index with one entry per page:
//!
//! ```text
//! blog/
//! ├── 2024-kiln.html      ─┐      blogs.json
//! ├── notes.htm            ├─▶   [ { "url": "blog/2024-kiln.html",
//! └── draft.md (ignored)  ─┘         "title": "Firing the Kiln",
//!                                    "excerpt": "First paragraph, tags stripped…" }, ... ]
//! ```
//!
//! ## Extraction
//!
//! Each field tries a list of patterns in order and takes the first non-empty
//! capture:
//!
//! - **title**: a heading with class `page-title`, then any element with that
//!   class, then `<title>`, then the file name.
//! - **excerpt**: the first `<p>` after a `<section>`, then the first `<p>`
//!   after an element with class `blog-article`, then any first `<p>`, then
//!   empty.
//!
//! Tags are stripped and whitespace runs collapse to one space. An excerpt
//! longer than the configured limit is cut three characters short of it and
//! ends with `…`.
//!
//! A post that cannot be read is reported and left out; the index is still
//! written. An unreadable blog directory stops the run before anything is
//! written.

use crate::config::BlogsConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions treated as posts (compared case-insensitively).
pub const BLOG_EXTENSIONS: &[&str] = &["html", "htm"];

const TITLE_PATTERNS: &[&str] = &[
    r#"(?i)<h[1-6][^>]*class=["'][^"']*page-title[^"']*["'][^>]*>([\s\S]*?)</h[1-6]>"#,
    r#"(?i)class=["'][^"']*page-title[^"']*["'][^>]*>([\s\S]*?)</[^>]+>"#,
    r#"(?i)<title[^>]*>([\s\S]*?)</title>"#,
];

const EXCERPT_PATTERNS: &[&str] = &[
    r#"(?i)<section[^>]*>[\s\S]*?<p[^>]*>([\s\S]*?)</p>"#,
    r#"(?i)class=["'][^"']*blog-article[^"']*["'][\s\S]*?<p[^>]*>([\s\S]*?)</p>"#,
    r#"(?i)<p[^>]*>([\s\S]*?)</p>"#,
];

#[derive(Error, Debug)]
pub enum BlogsError {
    #[error("Failed to read blog directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// One post as written to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub url: String,
    pub title: String,
    pub excerpt: String,
}

/// What happened to one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostResult {
    Indexed { source: PathBuf, title: String },
    Failed { source: PathBuf, error: String },
}

#[derive(Debug)]
pub struct BlogsReport {
    pub output: PathBuf,
    pub posts: Vec<BlogPost>,
    /// One per candidate file, in index order.
    pub results: Vec<PostResult>,
}

/// Compiled extraction patterns.
pub struct PostParser {
    titles: Vec<Regex>,
    excerpts: Vec<Regex>,
    tags: Regex,
    spaces: Regex,
}

impl PostParser {
    pub fn new() -> Result<Self, regex::Error> {
        let compile = |patterns: &[&str]| -> Result<Vec<Regex>, regex::Error> {
            patterns.iter().map(|p| Regex::new(p)).collect()
        };
        Ok(Self {
            titles: compile(TITLE_PATTERNS)?,
            excerpts: compile(EXCERPT_PATTERNS)?,
            tags: Regex::new(r"</?[^>]+(>|$)")?,
            spaces: Regex::new(r"\s+")?,
        })
    }

    /// Post title, falling back to `file_name`.
    pub fn title(&self, html: &str, file_name: &str) -> String {
        let raw = first_capture(&self.titles, html).unwrap_or(file_name);
        self.strip_tags(raw)
    }

    /// Plain-text excerpt of at most `limit` characters (ellipsis included).
    pub fn excerpt(&self, html: &str, limit: usize) -> String {
        let raw = first_capture(&self.excerpts, html).unwrap_or("");
        truncate_excerpt(&self.strip_tags(raw), limit)
    }

    /// Remove tags and collapse whitespace.
    pub fn strip_tags(&self, html: &str) -> String {
        let text = self.tags.replace_all(html, "");
        self.spaces.replace_all(&text, " ").trim().to_string()
    }
}

/// Capture group 1 of the first pattern that matches with non-blank content.
fn first_capture<'h>(patterns: &[Regex], html: &'h str) -> Option<&'h str> {
    patterns.iter().find_map(|re| {
        re.captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    })
}

/// Cut text longer than `limit` characters to `limit - 3` and append `…`.
pub fn truncate_excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(3)).collect();
    format!("{}\u{2026}", kept.trim_end())
}

/// Whether the path has one of the [`BLOG_EXTENSIONS`].
pub fn is_blog_post(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            BLOG_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Candidate post files directly inside `dir`, sorted by name.
pub fn list_posts(dir: &Path) -> Result<Vec<PathBuf>, BlogsError> {
    let read_dir_error = |source| BlogsError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut posts = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if is_blog_post(&path) {
            posts.push(path);
        }
    }
    posts.sort();
    Ok(posts)
}

/// `<prefix>/<file name>`, without a doubled or leading slash.
pub fn post_url(prefix: &str, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", prefix, file_name)
    }
}

/// Build one index entry from a post on disk.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_post(
    parser: &PostParser,
    path: &Path,
    url_prefix: &str,
    excerpt_chars: usize,
) -> io::Result<BlogPost> {
    let bytes = fs::read(path)?;
    let html = String::from_utf8_lossy(&bytes);
    let file_name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(BlogPost {
        url: post_url(url_prefix, &file_name),
        title: parser.title(&html, &file_name),
        excerpt: parser.excerpt(&html, excerpt_chars),
    })
}

/// Index every post in `config.blog_dir` and overwrite `config.output`.
pub fn build_index(config: &BlogsConfig) -> Result<BlogsReport, BlogsError> {
    let parser = PostParser::new()?;
    let mut posts = Vec::new();
    let mut results = Vec::new();

    for source in list_posts(&config.blog_dir)? {
        match read_post(&parser, &source, &config.url_prefix, config.excerpt_chars) {
            Ok(post) => {
                results.push(PostResult::Indexed {
                    source,
                    title: post.title.clone(),
                });
                posts.push(post);
            }
            Err(e) => results.push(PostResult::Failed {
                source,
                error: e.to_string(),
            }),
        }
    }

    write_index(&config.output, &posts)?;
    Ok(BlogsReport {
        output: config.output.clone(),
        posts,
        results,
    })
}

/// Overwrite the index with `posts` as 2-space indented JSON.
pub fn write_index(path: &Path, posts: &[BlogPost]) -> Result<(), BlogsError> {
    let json = serde_json::to_string_pretty(posts)?;
    fs::write(path, json)?;
    Ok(())
}
