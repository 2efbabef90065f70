//! Errors local to a single feed.
//!
//! None of these abort a run: the generator logs them against the feed they
//! belong to, counts them and moves on. Run-level failures are
//! [`ConfigError`](crate::config::ConfigError)s.

use crate::utils::date::DateFormatError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// A post (or the build timestamp) carries a date we cannot normalize.
    #[error("post `{slug}` has an invalid date")]
    Date {
        slug: String,
        #[source]
        source: DateFormatError,
    },

    /// Writing one output file failed.
    #[error("failed to write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content source could not list a locale.
    #[error("failed to load content for locale `{locale}`")]
    Content {
        locale: String,
        #[source]
        source: anyhow::Error,
    },

    /// The tag cannot be used as a directory name.
    #[error("tag `{0}` cannot be used as a path segment")]
    InvalidTag(String),
}

impl FeedError {
    /// This error and its causes, outermost first, joined by `: `.
    pub fn chain(&self) -> String {
        std::iter::successors(Some(self as &dyn std::error::Error), |e| e.source())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ")
    }
}
