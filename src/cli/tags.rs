//! `feedsmith tags`: list the feeds a build would write.

use crate::{
    config::SiteConfig,
    content::FsContentStore,
    generator::{self, FeedPlan, PlannedFeed},
    log,
    utils::plural_count,
};
use anyhow::Result;
use serde::Serialize;
use std::io::{Write, stdout};

/// JSON shape of `tags --json`.
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    feeds: &'a [PlannedFeed],
    failures: Vec<FailureRow>,
}

#[derive(Debug, Serialize)]
struct FailureRow {
    feed: String,
    error: String,
}

impl<'a> From<&'a FeedPlan> for PlanReport<'a> {
    fn from(plan: &'a FeedPlan) -> Self {
        Self {
            feeds: &plan.feeds,
            failures: plan
                .failures
                .iter()
                .map(|f| FailureRow {
                    feed: f.target.to_string(),
                    error: f.error.chain(),
                })
                .collect(),
        }
    }
}

pub fn list_feeds(config: &SiteConfig, json: bool) -> Result<()> {
    let store = FsContentStore::new(config.content_dir());
    let plan = generator::plan_feeds(config, &store);

    if json {
        let mut out = stdout().lock();
        serde_json::to_writer_pretty(&mut out, &PlanReport::from(&plan))?;
        writeln!(out)?;
        return Ok(());
    }

    for failure in &plan.failures {
        log!("error"; "{}: {}", failure.target, failure.error.chain());
    }
    if plan.feeds.is_empty() {
        log!("tags"; "no feeds to write");
        return Ok(());
    }
    for feed in &plan.feeds {
        print_row(feed);
    }
    let tags = plan.feeds.iter().filter(|f| f.tag.is_some()).count();
    log!("tags"; "{}", plural_count(tags, "tag feed"));
    Ok(())
}

fn print_row(feed: &PlannedFeed) {
    let name = match &feed.tag {
        Some(tag) => format!("{} #{}", feed.locale, tag),
        None => feed.locale.clone(),
    };
    log!("feed"; "{:<24} {:>3}  {}", name, feed.items, feed.path.display());
}
