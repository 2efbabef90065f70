//! RSS 2.0 rendering.
//!
//! Pure transformation from a [`FeedChannel`] and an ordered list of
//! [`FeedItem`]s to an RSS 2.0 document. Items are written in the order
//! given; choosing and ordering them is the composer's job.
//!
//! Titles and descriptions are CDATA-wrapped (they may carry markup), every
//! other value is entity-escaped.

use super::xml::{Document, Element};

/// Channel-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedChannel {
    pub title: String,
    /// Absolute URL of the page this feed mirrors.
    pub link: String,
    pub description: String,
    /// Language code (e.g. `ko`, `en`).
    pub language: String,
    /// RFC 822 timestamp.
    pub last_build_date: String,
}

/// Media attached to an item (cover image).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
}

/// One feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// RFC 822 timestamp.
    pub pub_date: String,
    /// Always equal to `link`.
    pub guid: String,
    pub categories: Vec<String>,
    pub enclosure: Option<Enclosure>,
}

/// Render a complete RSS 2.0 document.
pub fn render(channel: &FeedChannel, items: &[FeedItem]) -> String {
    let channel = channel_element(channel).children(items.iter().map(item_element));
    let rss = Element::new("rss").attr("version", "2.0").child(channel);
    Document::new(rss).to_xml()
}

fn channel_element(channel: &FeedChannel) -> Element {
    Element::new("channel").children([
        Element::new("title").cdata(&channel.title),
        Element::new("link").text(&channel.link),
        Element::new("description").cdata(&channel.description),
        Element::new("language").text(&channel.language),
        Element::new("lastBuildDate").text(&channel.last_build_date),
    ])
}

fn item_element(item: &FeedItem) -> Element {
    let fields = [
        Element::new("title").cdata(&item.title),
        Element::new("link").text(&item.link),
        Element::new("description").cdata(&item.description),
        Element::new("pubDate").text(&item.pub_date),
        Element::new("guid").text(&item.guid),
    ];
    let categories = item
        .categories
        .iter()
        .map(|category| Element::new("category").text(category));
    let enclosure = item.enclosure.as_ref().map(|enclosure| {
        Element::new("enclosure")
            .attr("url", &enclosure.url)
            .attr("type", &enclosure.mime_type)
    });

    Element::new("item")
        .children(fields)
        .children(categories)
        .children(enclosure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> FeedChannel {
        FeedChannel {
            title: "Test Blog".to_string(),
            link: "https://example.com".to_string(),
            description: "Test Description".to_string(),
            language: "ko".to_string(),
            last_build_date: "Mon, 17 Feb 2025 00:00:00 GMT".to_string(),
        }
    }

    fn item(title: &str) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            link: "https://example.com/post".to_string(),
            description: "Post Description".to_string(),
            pub_date: "Mon, 17 Feb 2025 00:00:00 GMT".to_string(),
            guid: "https://example.com/post".to_string(),
            categories: Vec::new(),
            enclosure: None,
        }
    }

    #[test]
    fn test_render_exact_layout() {
        let mut post = item("Test Post");
        post.categories = vec!["aws".to_string(), "kiro".to_string()];
        post.enclosure = Some(Enclosure {
            url: "https://example.com/image.webp".to_string(),
            mime_type: "image/webp".to_string(),
        });

        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title><![CDATA[Test Blog]]></title>
    <link>https://example.com</link>
    <description><![CDATA[Test Description]]></description>
    <language>ko</language>
    <lastBuildDate>Mon, 17 Feb 2025 00:00:00 GMT</lastBuildDate>
    <item>
      <title><![CDATA[Test Post]]></title>
      <link>https://example.com/post</link>
      <description><![CDATA[Post Description]]></description>
      <pubDate>Mon, 17 Feb 2025 00:00:00 GMT</pubDate>
      <guid>https://example.com/post</guid>
      <category>aws</category>
      <category>kiro</category>
      <enclosure url="https://example.com/image.webp" type="image/webp"/>
    </item>
  </channel>
</rss>"#;

        assert_eq!(render(&channel(), &[post]), expected);
    }

    #[test]
    fn test_render_zero_items() {
        let xml = render(&channel(), &[]);
        assert!(xml.contains("<channel>"));
        assert!(xml.contains("</channel>"));
        assert!(!xml.contains("<item>"));
        assert!(xml.ends_with("</lastBuildDate>\n  </channel>\n</rss>"));
    }

    #[test]
    fn test_enclosure_only_when_present() {
        let mut with_image = item("With image");
        with_image.enclosure = Some(Enclosure {
            url: "https://example.com/photo.webp".to_string(),
            mime_type: "image/webp".to_string(),
        });

        let xml = render(&channel(), &[with_image]);
        assert_eq!(xml.matches("<enclosure").count(), 1);
        assert!(
            xml.contains(r#"<enclosure url="https://example.com/photo.webp" type="image/webp"/>"#)
        );

        let xml = render(&channel(), &[item("No image")]);
        assert!(!xml.contains("<enclosure"));
    }

    #[test]
    fn test_items_keep_input_order() {
        let xml = render(&channel(), &[item("Zeta"), item("Alpha"), item("Mu")]);
        let zeta = xml.find("Zeta").unwrap();
        let alpha = xml.find("Alpha").unwrap();
        let mu = xml.find("Mu").unwrap();
        assert!(zeta < alpha && alpha < mu);
    }

    #[test]
    fn test_escaping_rules() {
        let mut post = item("Rust & <Go>");
        post.link = "https://example.com/?a=1&b=2".to_string();
        post.guid = post.link.clone();
        post.categories = vec!["c++ & \"rust\"".to_string()];

        let xml = render(&channel(), &[post]);
        // Titles keep markup inside CDATA
        assert!(xml.contains("<title><![CDATA[Rust & <Go>]]></title>"));
        assert!(xml.contains("<link>https://example.com/?a=1&amp;b=2</link>"));
        assert!(xml.contains("<guid>https://example.com/?a=1&amp;b=2</guid>"));
        assert!(xml.contains("<category>c++ &amp; &quot;rust&quot;</category>"));
    }

    #[test]
    fn test_enclosure_attributes_escaped() {
        let mut post = item("Post");
        post.enclosure = Some(Enclosure {
            url: "https://example.com/img.png?w=1&h=2".to_string(),
            mime_type: "image/png".to_string(),
        });
        let xml = render(&channel(), &[post]);
        assert!(xml.contains(r#"url="https://example.com/img.png?w=1&amp;h=2""#));
    }
}
