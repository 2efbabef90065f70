//! Site configuration management for `feedsmith.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section    # [site], [feed], [build]
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── util       # config lookup, URL/path helpers
//! └── mod.rs     # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section   | Purpose                                        |
//! |-----------|------------------------------------------------|
//! | `[site]`  | Base URL, channel title and description        |
//! | `[feed]`  | Locales to build, items per feed               |
//! | `[build]` | Content and output directories                 |
//!
//! # Precedence
//!
//! CLI flags > environment (`FEEDSMITH_BASE_URL`, base URL only) > config
//! file > built-in defaults. The result is validated once and never mutated
//! afterwards.

mod error;
mod section;
mod util;

pub use error::{ConfigDiagnostics, ConfigError};
pub use section::{BuildSection, DEFAULT_MAX_ITEMS, FeedSection, SiteSection};
pub use util::is_path_segment;

use crate::{debug, log};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
use util::{find_config_file, normalize_base_url};

/// Config file looked up (upward from cwd) when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "feedsmith.toml";

/// Environment variable overriding `[site].url`.
pub const BASE_URL_ENV: &str = "FEEDSMITH_BASE_URL";

/// Base URL used when none is configured anywhere.
pub const DEFAULT_BASE_URL: &str = "https://example.com";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing feedsmith.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory relative paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub feed: FeedSection,

    #[serde(default)]
    pub build: BuildSection,
}

/// Values that take precedence over the config file (from CLI flags).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub content: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub max_items: Option<usize>,
    pub locales: Vec<String>,
}

/// Settings the feed composer needs, resolved from [`SiteConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// Absolute URL without trailing slash.
    pub base_url: String,
    pub site_name: String,
    pub site_description: String,
    /// Template with `{description}` and `{tag}` placeholders.
    pub tag_description: String,
    pub max_items: NonZeroUsize,
}

impl SiteConfig {
    /// Load configuration for this process.
    ///
    /// `config_path` must exist when given; otherwise `feedsmith.toml` is
    /// searched upward from cwd and defaults are used if none is found.
    pub fn load(
        config_path: Option<&Path>,
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|err| ConfigError::Io(PathBuf::from("."), err))?;
        Self::load_in(&cwd, config_path, overrides, env)
    }

    fn load_in(
        cwd: &Path,
        config_path: Option<&Path>,
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => Some(cwd.join(path)),
            None => find_config_file(cwd, Path::new(DEFAULT_CONFIG_FILE)),
        };

        let mut config = match &path {
            Some(path) => Self::from_path(path)?,
            None => {
                debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };

        config.root = path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
        config.apply_overrides(overrides, env);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        debug!("config"; "loaded {}", path.display());
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored): {}", display_path, fields.join(", "));
    }

    /// Apply CLI/environment overrides and resolve relative paths.
    fn apply_overrides(&mut self, overrides: &Overrides, env: impl Fn(&str) -> Option<String>) {
        let url = overrides
            .base_url
            .clone()
            .or_else(|| env(BASE_URL_ENV))
            .filter(|url| !url.trim().is_empty());
        if url.is_some() {
            self.site.url = url;
        }
        if self.site.url.is_none() {
            log!(
                "warning";
                "site.url is not set (use --base-url or {}), using default: {}",
                BASE_URL_ENV,
                DEFAULT_BASE_URL
            );
            self.site.url = Some(DEFAULT_BASE_URL.to_string());
        }

        Self::update_option(&mut self.build.content, overrides.content.as_ref());
        Self::update_option(&mut self.build.output, overrides.output.as_ref());
        Self::update_option(&mut self.feed.max_items, overrides.max_items.as_ref());
        if !overrides.locales.is_empty() {
            self.feed.locales = overrides.locales.clone();
        }

        self.build.content = self.root.join(&self.build.content);
        self.build.output = self.root.join(&self.build.output);
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate the resolved configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        match self.site.url.as_deref().map(url::Url::parse) {
            Some(Ok(parsed)) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        "site.url",
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        "site.url",
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Some(Err(e)) => diag.error_with_hint(
                "site.url",
                format!("invalid URL: {e}"),
                "use format like https://example.com",
            ),
            None => diag.error("site.url", "base URL is not set"),
        }

        if self.site.name.trim().is_empty() {
            diag.error("site.name", "site name must not be empty");
        }

        if self.feed.max_items == 0 {
            diag.error_with_hint(
                "feed.max_items",
                "must be at least 1",
                format!("the default is {DEFAULT_MAX_ITEMS}"),
            );
        }

        if self.feed.locales.is_empty() {
            diag.error_with_hint(
                "feed.locales",
                "no locales configured",
                "e.g. locales = [\"en\"]",
            );
        }
        for locale in &self.feed.locales {
            if !is_path_segment(locale) {
                diag.error("feed.locales", format!("`{locale}` is not a valid directory name"));
            }
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> String {
        normalize_base_url(self.site.url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    }

    /// The subset of settings the feed composer works with.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            base_url: self.base_url(),
            site_name: self.site.name.clone(),
            site_description: self.site.description.clone(),
            tag_description: self.feed.tag_description.clone(),
            max_items: NonZeroUsize::new(self.feed.max_items).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.build.content
    }

    pub fn output_dir(&self) -> &Path {
        &self.build.output
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let config = format!("[site]\nname = \"Test\"\ndescription = \"Test\"\n{extra}");
    let (parsed, ignored) = SiteConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.site.url, None);
        assert_eq!(config.feed.max_items, 20);
        assert_eq!(config.feed.locales, vec!["ko", "en"]);
        assert_eq!(config.build.content, PathBuf::from("content/posts"));
        assert_eq!(config.build.output, PathBuf::from("public"));
    }

    #[test]
    fn test_custom_config() {
        let config = test_parse_config(concat!(
            "url = \"https://blog.example.com/\"\n",
            "[feed]\nmax_items = 5\nlocales = [\"en\"]\n",
            "[build]\noutput = \"dist\"",
        ));
        assert_eq!(config.site.url.as_deref(), Some("https://blog.example.com/"));
        assert_eq!(config.base_url(), "https://blog.example.com");
        assert_eq!(config.feed.max_items, 5);
        assert_eq!(config.feed.locales, vec!["en"]);
        assert_eq!(config.build.output, PathBuf::from("dist"));
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(matches!(
            SiteConfig::parse_with_ignored("[site\nname = 1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let (_, ignored) =
            SiteConfig::parse_with_ignored("[site]\nname = \"x\"\ntitle = \"y\"\n[extra]\nk = 1")
                .unwrap();
        assert!(ignored.contains(&"site.title".to_string()));
        assert!(ignored.iter().any(|f| f.starts_with("extra")));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::load_in(dir.path(), None, &Overrides::default(), no_env).unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.root, dir.path());
        assert_eq!(config.output_dir(), dir.path().join("public"));
        assert_eq!(config.content_dir(), dir.path().join("content/posts"));
    }

    #[test]
    fn test_load_file_relative_to_config_dir() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("site");
        fs::create_dir_all(site.join("nested")).unwrap();
        fs::write(
            site.join(DEFAULT_CONFIG_FILE),
            concat!(
                "[site]\nurl = \"https://blog.example.com/\"\nname = \"Blog\"\n",
                "[build]\noutput = \"out\"",
            ),
        )
        .unwrap();

        // Found by walking up from a nested cwd
        let config =
            SiteConfig::load_in(&site.join("nested"), None, &Overrides::default(), no_env).unwrap();
        assert_eq!(config.base_url(), "https://blog.example.com");
        assert_eq!(config.output_dir(), site.join("out"));
    }

    #[test]
    fn test_load_explicit_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = SiteConfig::load_in(
            dir.path(),
            Some(Path::new("missing.toml")),
            &Overrides::default(),
            no_env,
        );
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_base_url_precedence() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[site]\nurl = \"https://file.example.com\"",
        )
        .unwrap();
        let env =
            |key: &str| (key == BASE_URL_ENV).then(|| "https://env.example.com/".to_string());

        let config = SiteConfig::load_in(dir.path(), None, &Overrides::default(), env).unwrap();
        assert_eq!(config.base_url(), "https://env.example.com");

        let overrides = Overrides {
            base_url: Some("https://cli.example.com".to_string()),
            ..Default::default()
        };
        let config = SiteConfig::load_in(dir.path(), None, &overrides, env).unwrap();
        assert_eq!(config.base_url(), "https://cli.example.com");

        let config = SiteConfig::load_in(dir.path(), None, &Overrides::default(), no_env).unwrap();
        assert_eq!(config.base_url(), "https://file.example.com");

        // Empty environment value counts as unset
        let empty = |_: &str| Some(String::new());
        let config = SiteConfig::load_in(dir.path(), None, &Overrides::default(), empty).unwrap();
        assert_eq!(config.base_url(), "https://file.example.com");
    }

    #[test]
    fn test_cli_overrides() {
        let dir = TempDir::new().unwrap();
        let overrides = Overrides {
            content: Some(PathBuf::from("posts")),
            output: Some(PathBuf::from("/tmp/feeds-out")),
            max_items: Some(3),
            locales: vec!["ja".to_string()],
            ..Default::default()
        };
        let config = SiteConfig::load_in(dir.path(), None, &overrides, no_env).unwrap();
        assert_eq!(config.content_dir(), dir.path().join("posts"));
        assert_eq!(config.output_dir(), Path::new("/tmp/feeds-out"));
        assert_eq!(config.feed.max_items, 3);
        assert_eq!(config.feed.locales, vec!["ja"]);
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = test_parse_config("[feed]\nmax_items = 0\nlocales = [\"../x\"]");
        config.site.url = Some("ftp://example.com".to_string());
        config.site.name = " ".to_string();

        let Err(ConfigError::Diagnostics(diag)) = config.validate() else {
            panic!("expected diagnostics");
        };
        let fields: Vec<_> = diag.errors().iter().map(|d| d.field).collect();
        assert_eq!(fields, vec!["site.url", "site.name", "feed.max_items", "feed.locales"]);
    }

    #[test]
    fn test_validation_rejects_bad_urls() {
        for url in ["not a url", "https://", "mailto:me@example.com"] {
            let mut config = test_parse_config("");
            config.site.url = Some(url.to_string());
            assert!(config.validate().is_err(), "accepted {url}");
        }
    }

    #[test]
    fn test_feed_config() {
        let mut config =
            test_parse_config("url = \"https://example.com/blog/\"\n[feed]\nmax_items = 7");
        config.site.name = "Blog".to_string();
        config.site.description = "Notes".to_string();

        let feed = config.feed_config();
        assert_eq!(feed.base_url, "https://example.com/blog");
        assert_eq!(feed.site_name, "Blog");
        assert_eq!(feed.site_description, "Notes");
        assert_eq!(feed.max_items.get(), 7);
        assert_eq!(feed.tag_description, "{description} - {tag}");
    }

    #[test]
    fn test_tag_description_template() {
        let template = "{description} - {tag} 태그의 글";
        let config = test_parse_config(&format!("[feed]\ntag_description = \"{template}\""));
        assert_eq!(config.feed.tag_description, template);
        assert_eq!(config.feed_config().tag_description, template);
    }
}
