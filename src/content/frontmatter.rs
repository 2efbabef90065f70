//! Frontmatter extraction.
//!
//! Two fences are recognized at the very top of a post:
//!
//! - `---` … `---`: YAML-like `key: value` lines (no YAML dependency; nested
//!   mappings are ignored)
//! - `+++` … `+++`: TOML, parsed with `toml`
//!
//! Only the metadata block is read; the body is never touched.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, de::Error as _};

/// Raw metadata as written in a post file. Every field is optional here;
/// the store decides what is required.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Frontmatter {
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: Option<String>,
    #[serde(alias = "summary")]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub slug: Option<String>,
    pub locale: Option<String>,
    pub visible: Option<bool>,
    pub draft: bool,
}

/// Deserialize tags, treating `null` as empty vec
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Accept both `date = "2025-02-17"` and a bare TOML date `date = 2025-02-17`.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<toml::Value>::deserialize(deserializer)? {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s)),
        Some(toml::Value::Datetime(dt)) => Ok(Some(dt.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "date must be a string or datetime, found {}",
            other.type_str()
        ))),
    }
}

/// Extract frontmatter from a post source.
///
/// Returns `Ok(None)` when the file has no frontmatter fence.
pub fn extract(source: &str) -> Result<Option<Frontmatter>> {
    match detect(source) {
        Some((block, true)) => toml::from_str(block)
            .map(Some)
            .context("invalid TOML frontmatter"),
        Some((block, false)) => Ok(Some(parse_yaml_like(block))),
        None => Ok(None),
    }
}

/// Locate the frontmatter block. Returns `(block, is_toml)`.
fn detect(source: &str) -> Option<(&str, bool)> {
    let trimmed = source.trim_start_matches('\u{feff}').trim_start();

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        if let Some(rest) = trimmed.strip_prefix(fence)
            && rest.starts_with(['\n', '\r'])
            && let Some(end) = rest.find(&format!("\n{fence}"))
        {
            return Some((rest[..end].trim(), is_toml));
        }
    }

    None
}

/// Parse simple YAML-like frontmatter (`key: value`).
///
/// Tags may be written inline (`tags: [aws, "cloud"]`), as a comma list
/// (`tags: aws, cloud`) or as a block list of `- item` lines.
fn parse_yaml_like(content: &str) -> Frontmatter {
    let mut meta = Frontmatter::default();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "title" => meta.title = Some(scalar(value)),
            "date" => meta.date = non_empty(scalar(value)),
            "description" | "summary" => meta.description = Some(scalar(value)),
            "image" => meta.image = non_empty(scalar(value)),
            "slug" => meta.slug = non_empty(scalar(value)),
            "locale" => meta.locale = non_empty(scalar(value)),
            "visible" => meta.visible = parse_bool(&scalar(value)),
            "draft" => meta.draft = parse_bool(&scalar(value)).unwrap_or(false),
            "tags" if value.is_empty() => {
                let mut tags = Vec::new();
                while let Some(&next) = lines.peek() {
                    let next = next.trim();
                    if let Some(item) = next.strip_prefix('-') {
                        tags.push(scalar(item.trim()));
                    } else if !next.is_empty() {
                        break;
                    }
                    lines.next();
                }
                meta.tags = tags.into_iter().filter(|t| !t.is_empty()).collect();
            }
            "tags" => meta.tags = inline_list(value),
            _ => {}
        }
    }

    meta
}

/// Unquote a scalar; strip trailing ` # comment` from unquoted values.
fn scalar(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 {
        if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
            return inner.replace("\\\"", "\"");
        }
        if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
            return inner.replace("''", "'");
        }
    }
    match value.find(" #") {
        Some(pos) => value[..pos].trim_end().to_string(),
        None => value.to_string(),
    }
}

fn inline_list(value: &str) -> Vec<String> {
    let value = value.trim();
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);

    inner
        .split(',')
        .map(scalar)
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
