//! Configuration sections of `feedsmith.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MAX_ITEMS: usize = 20;
pub const DEFAULT_TAG_DESCRIPTION: &str = "{description} - {tag}";

/// `[site]`: channel metadata shared by every feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteSection {
    /// Base URL (e.g. `https://example.com`). Trailing slashes are ignored.
    pub url: Option<String>,
    /// Channel title; tag feeds append ` - {tag}`.
    pub name: String,
    /// Channel description.
    pub description: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            url: None,
            name: "Blog".into(),
            description: String::new(),
        }
    }
}

/// `[feed]`: what gets generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedSection {
    /// Maximum items per feed, newest first.
    pub max_items: usize,
    /// Locales to build, in order.
    pub locales: Vec<String>,
    /// Tag feed channel description. `{description}` is replaced by
    /// `[site].description`, `{tag}` by the tag.
    pub tag_description: String,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            locales: vec!["ko".into(), "en".into()],
            tag_description: DEFAULT_TAG_DESCRIPTION.into(),
        }
    }
}

/// `[build]`: where posts are read from and feeds are written to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BuildSection {
    /// Post directory containing one subdirectory per locale.
    pub content: PathBuf,
    /// Output root; feeds land in `{output}/{locale}/...`.
    pub output: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            content: "content/posts".into(),
            output: "public".into(),
        }
    }
}
