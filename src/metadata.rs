// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_LANG: &str = "en";
pub const MAX_DESCRIPTION: usize = 140;

/// Frontmatter of a single essay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    pub title: String,
    pub description: String,
    pub slug: Option<String>,
    pub lang: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: chrono::NaiveDate,
    pub day: Option<u32>,
    pub canonical_url: Option<String>,
    pub translate_from: Option<TranslateFrom>,
}

/// The article this one is a translation of.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranslateFrom {
    pub lang: String,
    pub url: String,
    pub title: String,
}

impl ArticleMetadata {
    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }

    /// Rejects metadata that would otherwise render a broken page.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.title.trim().is_empty() {
            anyhow::bail!("Article is missing a title.");
        }

        let length = self.description.graphemes(true).count();
        if length > MAX_DESCRIPTION {
            anyhow::bail!(
                "Description of {:?} is {} characters long, the limit is {}.",
                self.title,
                length,
                MAX_DESCRIPTION
            );
        }

        Ok(())
    }
}

/// An essay after its URL has been resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Published {
    pub url: String,
    pub meta: ArticleMetadata,
}

#[cfg(test)]
pub(crate) fn sample() -> ArticleMetadata {
    ArticleMetadata {
        title: "Hello World".into(),
        description: "desc".into(),
        slug: None,
        lang: Some("es".into()),
        tags: vec!["react".into()],
        date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        day: Some(3),
        canonical_url: None,
        translate_from: None,
    }
}
