//! schema.org `Article` JSON-LD for the essay head.

use serde::{Deserialize, Serialize};

use crate::{config::Config, metadata::ArticleMetadata};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Article {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub author: Person,
    #[serde(rename = "inLanguage")]
    pub in_language: String,
    pub keywords: String,
    pub headline: String,
    pub url: String,
    #[serde(rename = "datePublished")]
    pub date_published: chrono::NaiveDate,
    pub description: String,
    #[serde(rename = "mainEntityOfPage")]
    pub main_entity_of_page: WebPage,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Person {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct WebPage {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
}

impl Article {
    pub fn new(config: &Config, meta: &ArticleMetadata, url: &str) -> Self {
        Self {
            context: "https://schema.org".into(),
            kind: "Article".into(),
            author: Person {
                kind: "Person".into(),
                name: config.author.name.clone(),
                url: config.author.url.clone(),
            },
            in_language: meta.lang().to_owned(),
            keywords: meta.tags.join(", "),
            headline: meta.title.clone(),
            url: url.to_owned(),
            date_published: meta.date,
            description: meta.description.clone(),
            main_entity_of_page: WebPage {
                kind: "WebPage".into(),
                id: config.main_entity().to_owned(),
            },
        }
    }

    /// Minified JSON safe to place verbatim inside a `<script>` element.
    ///
    /// `<`, `>` and `&` only occur inside JSON strings, where their `\u` escapes
    /// are equivalent, so no markup the HTML tokenizer reacts to survives.
    pub fn to_script(&self) -> anyhow::Result<String> {
        let json = serde_json::to_string(self)?;
        let mut script = String::with_capacity(json.len());

        for ch in json.chars() {
            match ch {
                '<' => script.push_str("\\u003c"),
                '>' => script.push_str("\\u003e"),
                '&' => script.push_str("\\u0026"),
                _ => script.push(ch),
            }
        }

        Ok(script)
    }
}
