//! Filesystem content store.
//!
//! Reads post metadata from `{root}/{locale}/*.md` and `*.mdx` and hands it
//! to the feed pipeline in the order [`ContentSource`] promises.

use super::{ContentRecord, ContentSource, frontmatter};
use crate::{debug, log, utils::date::DateTimeUtc};
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

const POST_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Content source backed by a directory of posts, one subdirectory per locale.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn post_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries =
            fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to read entry in {}", dir.display()))?
                .path();
            let is_post = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| POST_EXTENSIONS.contains(&e));
            if is_post && path.is_file() {
                files.push(path);
            }
        }

        // Stable input order: slug collisions resolve by file name
        files.sort();
        Ok(files)
    }
}

impl ContentSource for FsContentStore {
    fn fetch(&self, locale: &str) -> Result<Vec<ContentRecord>> {
        let dir = self.root.join(locale);
        if !dir.is_dir() {
            debug!("content"; "no content directory for {} ({})", locale, dir.display());
            return Ok(Vec::new());
        }

        let mut seen = FxHashSet::default();
        let mut records = Vec::new();

        for path in Self::post_files(&dir)? {
            let record = match read_record(&path, locale) {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    log!("warning"; "skipping {}: {:#}", path.display(), e);
                    continue;
                }
            };

            if !record.is_published() {
                debug!("content"; "hidden: {}", path.display());
                continue;
            }
            if !seen.insert(record.slug.clone()) {
                log!(
                    "warning";
                    "duplicate slug `{}` in {}, keeping the first",
                    record.slug,
                    path.display()
                );
                continue;
            }
            records.push(record);
        }

        sort_newest_first(&mut records);
        Ok(records)
    }
}

/// Read one post's metadata. `Ok(None)` means the file is not a feed candidate.
fn read_record(path: &Path, locale: &str) -> Result<Option<ContentRecord>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let Some(meta) = frontmatter::extract(&source)? else {
        debug!("content"; "no frontmatter: {}", path.display());
        return Ok(None);
    };

    // Title and date are required
    let (Some(title), Some(date)) = (meta.title, meta.date) else {
        debug!("content"; "missing title or date: {}", path.display());
        return Ok(None);
    };

    let slug = match meta.slug {
        Some(slug) => slug,
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };

    Ok(Some(ContentRecord {
        title,
        date,
        description: meta.description.unwrap_or_default(),
        tags: meta.tags,
        image: meta.image,
        slug,
        locale: meta.locale.unwrap_or_else(|| locale.to_string()),
        visible: meta.visible,
        draft: meta.draft,
    }))
}

/// Sort by date, newest first. Unparseable dates sink to the end, where the
/// feed builder reports them.
fn sort_newest_first(records: &mut [ContentRecord]) {
    records.sort_by_cached_key(|r| Reverse(DateTimeUtc::parse(&r.date).ok()));
}
