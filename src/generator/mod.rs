//! Feed generation for every configured locale.
//!
//! One run walks `Start → PerLocale → [MainFeed, PerTag*] → Done`:
//!
//! - **Main feed**: `{output}/{locale}/rss.xml`
//! - **Tag feeds**: `{output}/{locale}/tag/{tag}/rss.xml`, built in parallel
//!
//! A locale's records are fetched once and shared by all of its feeds.
//! Failures stay local to the feed they happen in: they are logged, counted
//! in the [`RunSummary`] and the run continues. Only an inaccessible output
//! root stops the run.

mod error;
pub mod feed;

pub use error::FeedError;

use crate::{
    config::{ConfigError, SiteConfig, is_path_segment},
    content::ContentSource,
    debug, log,
    utils::plural_count,
};
use feed::{Feed, FeedComposer};
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

/// File name of every generated feed.
pub const FEED_FILE: &str = "rss.xml";

// ============================================================================
// targets
// ============================================================================

/// One output of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedTarget {
    Main { locale: String },
    Tag { locale: String, tag: String },
}

impl FeedTarget {
    pub fn main(locale: &str) -> Self {
        Self::Main {
            locale: locale.to_string(),
        }
    }

    pub fn tag(locale: &str, tag: &str) -> Self {
        Self::Tag {
            locale: locale.to_string(),
            tag: tag.to_string(),
        }
    }

    /// Where this feed lives under `output`.
    pub fn output_path(&self, output: &Path) -> PathBuf {
        match self {
            Self::Main { locale } => output.join(locale).join(FEED_FILE),
            Self::Tag { locale, tag } => output.join(locale).join("tag").join(tag).join(FEED_FILE),
        }
    }
}

impl fmt::Display for FeedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main { locale } => write!(f, "{locale}"),
            Self::Tag { locale, tag } => write!(f, "{locale} #{tag}"),
        }
    }
}

// ============================================================================
// summary
// ============================================================================

/// A feed that could not be produced.
#[derive(Debug)]
pub struct FeedFailure {
    pub target: FeedTarget,
    pub error: FeedError,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
    pub failures: Vec<FeedFailure>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn errors(&self) -> usize {
        self.failures.len()
    }

    fn log(&self) {
        log!(
            "done";
            "{} written, {} skipped in {:.2?}",
            plural_count(self.written, "feed"),
            self.skipped,
            self.elapsed
        );
        if !self.failures.is_empty() {
            let failed: Vec<_> = self
                .failures
                .iter()
                .map(|f| format!("{} ({})", f.target, f.error))
                .collect();
            log!(
                "warning";
                "{} failed: {}",
                plural_count(self.errors(), "feed"),
                failed.join(", ")
            );
        }
    }
}

// ============================================================================
// run
// ============================================================================

/// Build and write every feed `config` describes.
///
/// Returns `Err` only when the output root cannot be created; everything
/// else ends up in the summary.
pub fn build_feeds<S>(config: &SiteConfig, source: &S) -> Result<RunSummary, ConfigError>
where
    S: ContentSource + ?Sized,
{
    let feed_config = config.feed_config();
    let composer = FeedComposer::new(&feed_config, source);
    let summary = Run::new(&composer, config.output_dir()).execute(&config.feed.locales)?;
    summary.log();
    Ok(summary)
}

/// Counters shared by the parallel tag feeds of a run.
///
/// A dry run composes every feed exactly like a real one but records it in
/// `planned` instead of writing it, and logs nothing.
struct Run<'a, S: ?Sized> {
    composer: &'a FeedComposer<'a, S>,
    output: &'a Path,
    dry_run: bool,
    written: AtomicUsize,
    skipped: AtomicUsize,
    failures: Mutex<Vec<FeedFailure>>,
    planned: Mutex<Vec<PlannedFeed>>,
}

impl<'a, S: ContentSource + ?Sized> Run<'a, S> {
    fn new(composer: &'a FeedComposer<'a, S>, output: &'a Path) -> Self {
        Self {
            composer,
            output,
            dry_run: false,
            written: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            failures: Mutex::new(Vec::new()),
            planned: Mutex::new(Vec::new()),
        }
    }

    fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    fn execute(self, locales: &[String]) -> Result<RunSummary, ConfigError> {
        let start = Instant::now();
        fs::create_dir_all(self.output)
            .map_err(|err| ConfigError::OutputRoot(self.output.to_path_buf(), err))?;

        for locale in locales {
            self.locale(locale);
        }

        Ok(RunSummary {
            written: self.written.into_inner(),
            skipped: self.skipped.into_inner(),
            failures: self.failures.into_inner(),
            elapsed: start.elapsed(),
        })
    }

    /// Walk every locale without touching the filesystem.
    fn plan(self, locales: &[String]) -> FeedPlan {
        let run = self.dry_run();
        for locale in locales {
            run.locale(locale);
        }

        // Tag feeds finish in any order: main feed first, then tags by name
        let mut feeds = run.planned.into_inner();
        feeds.sort_by_cached_key(|f| {
            let position = locales.iter().position(|l| *l == f.locale);
            (position, f.tag.clone())
        });
        FeedPlan {
            feeds,
            failures: run.failures.into_inner(),
        }
    }

    /// Main feed first; tag feeds only once it succeeded or was skipped.
    fn locale(&self, locale: &str) {
        let main = FeedTarget::main(locale);
        let records = match self.composer.fetch(locale) {
            Ok(records) => records,
            Err(err) => return self.fail(main, err),
        };
        debug!("feed"; "{}: {}", locale, plural_count(records.len(), "post"));

        if !self.emit(main, || self.composer.main_feed(locale, &records)) {
            return;
        }

        let tags = feed::compose::unique_tags(&records);
        tags.par_iter().for_each(|tag| {
            self.emit(FeedTarget::tag(locale, tag), || {
                if !is_path_segment(tag) {
                    return Err(FeedError::InvalidTag(tag.clone()));
                }
                self.composer.tag_feed(locale, tag, &records)
            });
        });
    }

    /// Compose and publish one feed. Returns `false` if it failed.
    fn emit(
        &self,
        target: FeedTarget,
        compose: impl FnOnce() -> Result<Option<Feed>, FeedError>,
    ) -> bool {
        let result =
            compose().and_then(|feed| feed.map(|feed| self.publish(&target, &feed)).transpose());
        match result {
            Ok(Some(())) => {
                self.written.fetch_add(1, Ordering::Relaxed);
                true
            }
            Ok(None) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                if !self.dry_run {
                    log!("skip"; "{}: no posts", target);
                }
                true
            }
            Err(err) => {
                self.fail(target, err);
                false
            }
        }
    }

    fn publish(&self, target: &FeedTarget, feed: &Feed) -> Result<(), FeedError> {
        let path = target.output_path(self.output);
        if self.dry_run {
            self.planned.lock().push(PlannedFeed::new(target, path, feed.items.len()));
            return Ok(());
        }

        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, feed.to_xml())
        };
        match write() {
            Ok(()) => {
                log!("feed"; "{}", path.display());
                Ok(())
            }
            Err(source) => Err(FeedError::Write { path, source }),
        }
    }

    fn fail(&self, target: FeedTarget, error: FeedError) {
        if !self.dry_run {
            log!("error"; "{}: {}", target, error.chain());
        }
        self.failures.lock().push(FeedFailure { target, error });
    }
}

// ============================================================================
// plan
// ============================================================================

/// A feed a build would write, with its item count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFeed {
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub path: PathBuf,
    pub items: usize,
}

impl PlannedFeed {
    fn new(target: &FeedTarget, path: PathBuf, items: usize) -> Self {
        let (locale, tag) = match target {
            FeedTarget::Main { locale } => (locale.clone(), None),
            FeedTarget::Tag { locale, tag } => (locale.clone(), Some(tag.clone())),
        };
        Self {
            locale,
            tag,
            path,
            items,
        }
    }
}

/// What a build would do: the feeds it would write and the ones that fail.
#[derive(Debug)]
pub struct FeedPlan {
    pub feeds: Vec<PlannedFeed>,
    pub failures: Vec<FeedFailure>,
}

/// Compose every feed `config` describes without writing anything.
///
/// Follows the same rules as [`build_feeds`]: records are fetched once per
/// locale, a failing main feed drops that locale's tag feeds, invalid tags
/// fail, and one locale's failure never stops the others.
pub fn plan_feeds<S>(config: &SiteConfig, source: &S) -> FeedPlan
where
    S: ContentSource + ?Sized,
{
    let feed_config = config.feed_config();
    let composer = FeedComposer::new(&feed_config, source);
    Run::new(&composer, config.output_dir()).plan(&config.feed.locales)
}

// ============================================================================
// tests
// ============================================================================
