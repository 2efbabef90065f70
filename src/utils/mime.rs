//! MIME type detection for feed enclosures.
//!
//! Covers the image types used for item enclosures; anything else is
//! reported as JPEG.

use std::path::Path;

/// Image MIME type constants.
pub mod types {
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";
}

/// Guess an image MIME type from a file extension (case-insensitive).
pub fn from_extension(ext: Option<&str>) -> &'static str {
    let Some(ext) = ext else {
        return types::JPEG;
    };

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => types::JPEG,
        "png" => types::PNG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "svg" => types::SVG,
        _ => types::JPEG,
    }
}

/// Guess an image MIME type from a path or URL.
///
/// Query strings and fragments are ignored, so
/// `https://cdn.example.com/cover.png?w=800` resolves to `image/png`.
pub fn image_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let file_name = path.rsplit('/').next().unwrap_or_default();
    from_extension(Path::new(file_name).extension().and_then(|e| e.to_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(image_from_url("photo.jpg"), "image/jpeg");
        assert_eq!(image_from_url("photo.jpeg"), "image/jpeg");
        assert_eq!(image_from_url("photo.png"), "image/png");
        assert_eq!(image_from_url("photo.gif"), "image/gif");
        assert_eq!(image_from_url("photo.webp"), "image/webp");
        assert_eq!(image_from_url("photo.svg"), "image/svg+xml");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(image_from_url("/images/COVER.PNG"), "image/png");
        assert_eq!(image_from_url("Banner.WebP"), "image/webp");
    }

    #[test]
    fn test_unknown_or_missing_falls_back_to_jpeg() {
        assert_eq!(image_from_url("photo.avif"), "image/jpeg");
        assert_eq!(image_from_url("photo"), "image/jpeg");
        assert_eq!(image_from_url(""), "image/jpeg");
        assert_eq!(image_from_url(".webp"), "image/jpeg");
        assert_eq!(from_extension(None), "image/jpeg");
    }

    #[test]
    fn test_url_suffixes_ignored() {
        assert_eq!(
            image_from_url("https://cdn.example.com/a.b/cover.png?w=800&fmt=jpg"),
            "image/png"
        );
        assert_eq!(image_from_url("https://example.com/x.gif#top"), "image/gif");
        // Dot in a directory name is not an extension
        assert_eq!(image_from_url("https://example.com/v1.2/cover"), "image/jpeg");
    }
}
