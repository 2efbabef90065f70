//! RSS 2.0 feed generation.
//!
//! - **xml**: escaping, CDATA and the element tree
//! - **rss**: channel/item types and the renderer
//! - **compose**: selecting posts and mapping them to items

pub mod compose;
pub mod rss;
pub mod xml;

pub use compose::FeedComposer;
pub use rss::{FeedChannel, FeedItem};

/// A composed feed, ready to render.
#[derive(Debug, Clone)]
pub struct Feed {
    pub channel: FeedChannel,
    pub items: Vec<FeedItem>,
}

impl Feed {
    pub fn to_xml(&self) -> String {
        rss::render(&self.channel, &self.items)
    }
}
