// SPDX-FileCopyrightText: 2024 Ohin "Kazani" Taylor <kazani@kazani.dev>
// SPDX-License-Identifier: MIT

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use build_html::escape_html;
use tera::{Context, Tera, Value};

use crate::layout::Page;

pub const ESSAY_TEMPLATE: &str = "essay.html";
const DEFAULT_ESSAY: &str = include_str!("../templates/essay.html");

#[derive(Clone, Debug)]
pub struct Templates {
    dir: PathBuf,
}

/// `{{ value | html }}`. Tera's `escape` also rewrites `/` as `&#x2F;`;
/// this one escapes `& < > " '` only, so URLs in attributes stay as written.
fn html_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::String(text) => text.to_owned(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    Ok(Value::String(escape_html(&text)))
}

impl Templates {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.to_owned(),
        }
    }

    /// Creates a Tera instance with the built-in essay template, replaced by
    /// `custom` when one is given. Autoescape is off; templates escape with `html`.
    fn create_tera(custom: Option<&Path>) -> anyhow::Result<Tera> {
        let mut tera: Tera = Tera::default();

        tera.add_raw_template(ESSAY_TEMPLATE, DEFAULT_ESSAY)?;
        if let Some(path) = custom {
            tera.add_template_file(path, Some(ESSAY_TEMPLATE))
                .with_context(|| format!("Invalid template {:?}", path))?;
        }

        tera.autoescape_on(vec![]);
        tera.register_filter("html", html_filter);

        Ok(tera)
    }

    /// Render the page for `file`, using the closest `essay.html` at or above
    /// its directory within the source tree.
    pub fn render(&self, file: &Path, page: &Page) -> anyhow::Result<String> {
        let dir = file.parent().unwrap_or(&self.dir);
        let found = Self::find_upwards(dir, ESSAY_TEMPLATE, &self.dir);

        let tera = Self::create_tera(found.last().map(PathBuf::as_path))?;
        let context = Context::from_serialize(page)?;

        Ok(tera.render(ESSAY_TEMPLATE, &context)?)
    }

    /// Find every instance of a file upwards in the directory tree, stopping at `until`.
    /// Outermost first.
    fn find_upwards(dir: &Path, entry_name: &str, until: &Path) -> Vec<PathBuf> {
        if !dir.starts_with(until) {
            return vec![];
        }

        let mut found: Vec<PathBuf> = vec![];

        for ancestor in dir.ancestors() {
            let candidate = ancestor.join(entry_name);
            if candidate.is_file() {
                found.push(candidate);
            }

            if ancestor == until {
                break;
            }
        }

        found.reverse();
        found
    }
}
