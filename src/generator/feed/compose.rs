//! Feed composition: which posts go into which feed.
//!
//! Selection works on the record list exactly as the [`ContentSource`]
//! returned it. The source already sorted it newest first, so selection only
//! filters and truncates; it never reorders.

use super::{
    Feed,
    rss::{Enclosure, FeedChannel, FeedItem},
};
use crate::{
    config::FeedConfig,
    content::{ContentRecord, ContentSource},
    generator::FeedError,
    utils::{
        date::{self, DateTimeUtc},
        mime,
    },
};
use std::collections::BTreeSet;

/// The first `max` records, in input order.
pub fn select_main(records: &[ContentRecord], max: usize) -> &[ContentRecord] {
    &records[..records.len().min(max)]
}

/// The first `max` records tagged `tag` (exact, case-sensitive), in input order.
pub fn select_tag<'r>(
    records: &'r [ContentRecord],
    tag: &str,
    max: usize,
) -> Vec<&'r ContentRecord> {
    records.iter().filter(|r| r.has_tag(tag)).take(max).collect()
}

/// Every tag used by `records`, deduplicated and sorted by code point.
pub fn unique_tags(records: &[ContentRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.tags.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Builds channels and items for one site configuration.
pub struct FeedComposer<'a, S: ?Sized> {
    config: &'a FeedConfig,
    source: &'a S,
    clock: fn() -> DateTimeUtc,
}

impl<'a, S: ContentSource + ?Sized> FeedComposer<'a, S> {
    pub fn new(config: &'a FeedConfig, source: &'a S) -> Self {
        Self {
            config,
            source,
            clock: DateTimeUtc::now,
        }
    }

    /// Replace the clock used for `lastBuildDate`.
    pub fn with_clock(mut self, clock: fn() -> DateTimeUtc) -> Self {
        self.clock = clock;
        self
    }

    /// Fetch a locale's records once, for reuse across all of its feeds.
    pub fn fetch(&self, locale: &str) -> Result<Vec<ContentRecord>, FeedError> {
        self.source
            .fetch(locale)
            .map_err(|source| FeedError::Content {
                locale: locale.to_string(),
                source,
            })
    }

    /// Compose the locale's main feed. `None` when there is nothing to publish.
    pub fn main_feed(
        &self,
        locale: &str,
        records: &[ContentRecord],
    ) -> Result<Option<Feed>, FeedError> {
        let selected = select_main(records, self.max_items());
        if selected.is_empty() {
            return Ok(None);
        }

        let channel = FeedChannel {
            title: self.config.site_name.clone(),
            link: format!("{}/{}/", self.config.base_url, locale),
            description: self.config.site_description.clone(),
            language: locale.to_string(),
            last_build_date: self.build_date(),
        };
        self.compose(channel, locale, selected.iter()).map(Some)
    }

    /// Compose the feed of one tag. `None` when no post carries the tag.
    pub fn tag_feed(
        &self,
        locale: &str,
        tag: &str,
        records: &[ContentRecord],
    ) -> Result<Option<Feed>, FeedError> {
        let selected = select_tag(records, tag, self.max_items());
        if selected.is_empty() {
            return Ok(None);
        }

        let channel = FeedChannel {
            title: format!("{} - {}", self.config.site_name, tag),
            link: format!("{}/{}/tag/{}/", self.config.base_url, locale, tag),
            description: self.tag_description(tag),
            language: locale.to_string(),
            last_build_date: self.build_date(),
        };
        self.compose(channel, locale, selected.into_iter()).map(Some)
    }

    fn compose<'r>(
        &self,
        channel: FeedChannel,
        locale: &str,
        records: impl Iterator<Item = &'r ContentRecord>,
    ) -> Result<Feed, FeedError> {
        let items = records
            .map(|record| self.item(locale, record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Feed { channel, items })
    }

    /// Map one record to its feed item.
    pub fn item(&self, locale: &str, record: &ContentRecord) -> Result<FeedItem, FeedError> {
        let pub_date = date::format_date(&record.date).map_err(|source| FeedError::Date {
            slug: record.slug.clone(),
            source,
        })?;

        let link = format!("{}/{}/blog/{}/", self.config.base_url, locale, record.slug);
        let enclosure = record.image.as_deref().map(|image| Enclosure {
            url: self.absolute_url(image),
            mime_type: mime::image_from_url(image).to_string(),
        });

        Ok(FeedItem {
            title: record.title.clone(),
            guid: link.clone(),
            link,
            description: record.description.clone(),
            pub_date,
            categories: record.tags.clone(),
            enclosure,
        })
    }

    /// Root-relative paths (`/images/a.png`) are joined to the base URL;
    /// anything else is passed through.
    fn absolute_url(&self, path: &str) -> String {
        if path.starts_with('/') && !path.starts_with("//") {
            format!("{}{}", self.config.base_url, path)
        } else {
            path.to_string()
        }
    }

    /// Fill `{description}` and `{tag}` in the configured template.
    fn tag_description(&self, tag: &str) -> String {
        self.config
            .tag_description
            .replace("{description}", &self.config.site_description)
            .replace("{tag}", tag)
    }

    fn build_date(&self) -> String {
        (self.clock)().to_rfc2822()
    }

    fn max_items(&self) -> usize {
        self.config.max_items.get()
    }
}
