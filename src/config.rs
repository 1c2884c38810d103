use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Site-wide settings, read once from `folio.yaml` and passed to every render.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Config {
    pub site_url: String,
    #[serde(default = "default_essays_path")]
    pub essays_path: String,
    pub author: Author,
    /// `@id` of the `WebPage` the structured data points at. Falls back to `site_url`.
    pub main_entity: Option<String>,
    pub twitter: Option<TwitterConfig>,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default = "default_breakpoint")]
    pub breakpoint: u32,
    #[serde(default)]
    pub header: HeaderConfig,
    pub series: Option<SeriesConfig>,
    pub call_to_action: Option<CallToAction>,
    pub rss: Option<RSSConfig>,
    #[serde(default = "default_true")]
    pub sitemap: bool,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Author {
    pub name: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct TwitterConfig {
    pub site: Option<String>,
    pub creator: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Palette {
    pub blue: String,
    pub black: String,
    pub grey: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            blue: "#0076ff".into(),
            black: "#000000".into(),
            grey: "#999999".into(),
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct HeaderConfig {
    pub href: String,
    #[serde(default)]
    pub sticky: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            href: "/".into(),
            sticky: false,
        }
    }
}

/// A numbered run of essays, e.g. "Aprende React" over 100 days.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct SeriesConfig {
    /// Used in the document title.
    pub title: String,
    /// Used under the heading.
    pub name: String,
    pub length: u32,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct CallToAction {
    pub text: String,
    pub href: String,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct RSSConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: Option<String>,
    pub copyright: Option<String>,
    pub managing_editor: Option<String>,
    pub webmaster: Option<String>,
    pub categories: Option<Vec<Category>>,
    pub ttl: Option<u32>,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Category {
    pub name: String,
    pub domain: Option<String>,
}

fn default_essays_path() -> String {
    "essays".into()
}

fn default_breakpoint() -> u32 {
    767
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config {:?}", path))?;

        Self::parse(&raw).with_context(|| format!("Invalid config {:?}", path))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut config: Config = serde_yaml::from_str(raw)?;
        config.site_url = config.site_url.trim_end_matches('/').to_owned();
        config.essays_path = config.essays_path.trim_matches('/').to_owned();

        Ok(config)
    }

    pub fn main_entity(&self) -> &str {
        self.main_entity.as_deref().unwrap_or(&self.site_url)
    }
}

#[cfg(test)]
pub(crate) fn sample() -> Config {
    Config::parse(
        r#"
site_url: https://example.com
author: { name: Jane Doe, url: "https://example.com" }
twitter: { site: "@example", creator: "@janedoe" }
header: { href: /react }
series: { title: Aprende React, name: Aprendiendo React, length: 100 }
call_to_action: { text: Support me on Patreon, href: "https://patreon.com/janedoe" }
"#,
    )
    .unwrap()
}

#[cfg(test)]
mod test {
    use crate::config::{Config, Palette};

    #[test]
    fn minimal() {
        let config = Config::parse(
            r#"
site_url: https://example.com/
author:
  name: Jane Doe
  url: https://example.com
"#,
        )
        .unwrap();

        assert_eq!(config.site_url, "https://example.com");
        assert_eq!(config.essays_path, "essays");
        assert_eq!(config.main_entity(), "https://example.com");
        assert_eq!(config.palette, Palette::default());
        assert_eq!(config.breakpoint, 767);
        assert_eq!(config.header.href, "/");
        assert!(!config.header.sticky);
        assert!(config.sitemap);
        assert!(config.series.is_none());
    }

    #[test]
    fn series_and_overrides() {
        let config = Config::parse(
            r#"
site_url: https://example.com
essays_path: /posts/
main_entity: https://example.com/about
author: { name: Jane Doe, url: "https://example.com" }
header: { href: /react, sticky: true }
series: { title: Aprende React, name: Aprendiendo React, length: 100 }
sitemap: false
"#,
        )
        .unwrap();

        assert_eq!(config.essays_path, "posts");
        assert_eq!(config.main_entity(), "https://example.com/about");
        assert!(config.header.sticky);
        assert_eq!(config.series.unwrap().length, 100);
        assert!(!config.sitemap);
    }

    #[test]
    fn missing_author() {
        assert!(Config::parse("site_url: https://example.com").is_err());
    }
}
