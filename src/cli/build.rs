//! `feedsmith build`: write every feed.

use crate::{config::SiteConfig, content::FsContentStore, debug, generator};
use anyhow::Result;

/// Build all feeds from the configured content directory.
///
/// Per-feed failures are already logged and summarized by the generator and
/// do not make this fail.
pub fn build_all(config: &SiteConfig) -> Result<()> {
    debug!(
        "build";
        "{} -> {}",
        config.content_dir().display(),
        config.output_dir().display()
    );
    let store = FsContentStore::new(config.content_dir());
    generator::build_feeds(config, &store)?;
    Ok(())
}
