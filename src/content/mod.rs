//! Post metadata consumed by the feed pipeline.
//!
//! The pipeline never reads post bodies. It asks a [`ContentSource`] for the
//! metadata of one locale and trusts the source's ordering contract.
//!
//! # Module Structure
//!
//! ```text
//! content/
//! ├── frontmatter   # `---` / `+++` metadata block parsing
//! ├── store         # FsContentStore: {content_dir}/{locale}/*.md(x)
//! └── mod.rs        # ContentRecord, ContentSource (this file)
//! ```

mod frontmatter;
mod store;

pub use store::FsContentStore;

use anyhow::Result;

/// Metadata of one published post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRecord {
    pub title: String,
    /// ISO 8601 date as written by the author.
    pub date: String,
    pub description: String,
    /// Tags in author order. Empty when the post has none.
    pub tags: Vec<String>,
    /// Cover image path or URL.
    pub image: Option<String>,
    pub slug: String,
    pub locale: String,
    /// `Some(false)` hides the post; absent means visible.
    pub visible: Option<bool>,
    pub draft: bool,
}

impl ContentRecord {
    /// Whether the post may appear in any feed.
    pub fn is_published(&self) -> bool {
        self.visible != Some(false) && !self.draft
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Supplier of post metadata, one locale at a time.
///
/// # Contract
///
/// Records returned by [`fetch`](Self::fetch) are:
/// - published only (no drafts, nothing with `visible: false`)
/// - unique by slug
/// - sorted by date, newest first
///
/// Consumers rely on this order and never re-sort; ties may come back in any
/// order.
pub trait ContentSource: Sync {
    fn fetch(&self, locale: &str) -> Result<Vec<ContentRecord>>;
}
