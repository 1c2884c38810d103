use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;

use crate::config::Config;
use crate::handler::{writeable, CopyHandler, EssayHandler, FileContext, FileHandler};
use crate::metadata::Published;
use crate::template::{Templates, ESSAY_TEMPLATE};

pub const CONFIG_FILE: &str = "folio.yaml";

fn filter_file(file: &Path) -> bool {
    let filename = file.file_name().and_then(OsStr::to_str).unwrap_or("");

    let is_backup = filename.ends_with('~');
    let is_buffer = filename.ends_with('#') && filename.starts_with('#');
    let is_template = filename == ESSAY_TEMPLATE;
    let is_config = filename == CONFIG_FILE;

    file.is_file() && !is_buffer && !is_backup && !is_template && !is_config
}

fn is_essay(file: &Path) -> bool {
    matches!(
        file.extension().and_then(OsStr::to_str),
        Some("mdx") | Some("md")
    )
}

pub struct FileDispatcher {
    config: Config,
}

impl FileDispatcher {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds the whole site. Returns the published essays, newest first.
    pub fn handle_files(&self, source: &Path, dest: &Path) -> anyhow::Result<Vec<Published>> {
        std::fs::create_dir_all(dest)?;
        let root_path = source
            .canonicalize()
            .with_context(|| format!("Source directory {:?} not found", source))?;
        let data_path = dest.canonicalize()?;

        // Template overrides are looked up no higher than the source root.
        let templates = Templates::new(&root_path);
        let essays_handler = EssayHandler::new(&self.config, &templates);

        let mut essays: Vec<FileContext> = vec![];
        let mut assets: Vec<FileContext> = vec![];

        // Output nested inside the source tree is not source.
        let nested = data_path != root_path && data_path.starts_with(&root_path);

        for entry in walkdir::WalkDir::new(&root_path)
            .into_iter()
            .filter_entry(|entry| !(nested && entry.path().starts_with(&data_path)))
        {
            let file = entry?.into_path();
            if !filter_file(&file) {
                continue;
            }

            let relative = file.strip_prefix(&root_path)?.to_path_buf();
            let ctx = FileContext::new(&relative, &file, &data_path);

            if is_essay(&file) {
                essays.push(ctx);
            } else {
                assets.push(ctx);
            }
        }

        let extracted = essays
            .par_iter()
            .map(|ctx| -> anyhow::Result<Option<(PathBuf, Published)>> {
                let published = essays_handler
                    .extract_metadata(ctx)
                    .with_context(|| format!("In {:?}", ctx.relative_path))?;
                Ok(published.map(|published| (ctx.relative_path.clone(), published)))
            })
            .collect::<anyhow::Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<(PathBuf, Published)>>();

        check_duplicates(&extracted)?;
        let mut published = extracted
            .into_iter()
            .map(|(_, published)| published)
            .collect::<Vec<_>>();

        essays.par_iter().try_for_each(|ctx| {
            essays_handler
                .handle_file(ctx)
                .with_context(|| format!("In {:?}", ctx.relative_path))
        })?;

        assets.par_iter().try_for_each(|ctx| CopyHandler.handle_file(ctx))?;

        published.sort_by(|a, b| b.meta.date.cmp(&a.meta.date).then_with(|| a.url.cmp(&b.url)));

        if let Some(rss) = &self.config.rss {
            let path = data_path.join("feed.xml");
            let channel = crate::feed::channel(rss, &published);
            writeable(&path)?.write_all(channel.to_string().as_bytes())?;
            log::info!("Wrote feed with {} essays", published.len());
        }

        if self.config.sitemap {
            let path = data_path.join("sitemap.xml");
            writeable(&path)?.write_all(&crate::sitemap::sitemap(&published)?)?;
            log::info!("Wrote sitemap");
        }

        Ok(published)
    }
}

/// Two essays resolving to the same URL would overwrite each other.
fn check_duplicates(extracted: &[(PathBuf, Published)]) -> anyhow::Result<()> {
    let mut seen: HashMap<&str, &PathBuf> = HashMap::new();

    for (path, entry) in extracted {
        if let Some(previous) = seen.insert(&entry.url, path) {
            anyhow::bail!(
                "{:?} and {:?} are both published at {}",
                previous,
                path,
                entry.url
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use crate::{
        files::{check_duplicates, filter_file, is_essay},
        metadata::{self, Published},
    };

    #[test]
    fn filters() {
        assert!(filter_file(Path::new("data/essays/hello-world.mdx")));
        assert!(!filter_file(Path::new("data/folio.yaml")));
        assert!(!filter_file(Path::new("data/legacy/essay.html")));
        assert!(!filter_file(Path::new("data/essays")));
        assert!(!filter_file(Path::new("data/essays/draft.mdx~")));
        assert!(!filter_file(Path::new("data/essays/#draft.mdx#")));

        assert!(is_essay(Path::new("a/b.mdx")));
        assert!(is_essay(Path::new("a/b.md")));
        assert!(!is_essay(Path::new("a/b.svg")));
    }

    #[test]
    fn duplicates() {
        let entry = |path: &str, url: &str| {
            (
                PathBuf::from(path),
                Published {
                    url: url.into(),
                    meta: metadata::sample(),
                },
            )
        };

        assert!(check_duplicates(&[entry("a.mdx", "/x/"), entry("b.mdx", "/y/")]).is_ok());

        let err = check_duplicates(&[
            entry("a.mdx", "/x/"),
            entry("b.mdx", "/y/"),
            entry("c.mdx", "/x/"),
        ])
        .unwrap_err()
        .to_string();
        assert!(err.contains("a.mdx") && err.contains("c.mdx"), "{}", err);
    }
}
