use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    body::render_body,
    config::Config,
    frontmatter,
    layout::compose,
    metadata::{ArticleMetadata, Published},
    registry::Registry,
    slug::{resolve_slug, resolve_url},
    template::Templates,
};

const ASSET_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "webm", "svg", "ico", "css", "js", "pdf", "woff", "woff2",
    "txt", "xml", "html",
];

pub(crate) fn file_changed(old: &Path, new: &Path) -> std::io::Result<bool> {
    Ok(!new.exists() || new.metadata()?.modified()? < old.metadata()?.modified()?)
}

pub(crate) fn writeable(path: &Path) -> std::io::Result<std::fs::File> {
    use std::fs::{create_dir_all, File};

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    File::create(path)
}

#[derive(Clone, Debug)]
pub struct FileContext {
    pub relative_path: PathBuf,
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
}

impl FileContext {
    pub fn new(relative: &Path, source: &Path, output: &Path) -> Self {
        Self {
            relative_path: relative.to_owned(),
            source_path: source.to_owned(),
            output_dir: output.to_owned(),
        }
    }
}

pub trait FileHandler: Sync {
    fn handle_file(&self, ctx: &FileContext) -> anyhow::Result<()>;
    fn extract_metadata(&self, ctx: &FileContext) -> anyhow::Result<Option<Published>>;
}

/// Renders `.mdx`/`.md` essays to `<dest>/<essays_path>/<slug>/index.html`.
pub struct EssayHandler<'a> {
    config: &'a Config,
    templates: &'a Templates,
    registry: Registry,
}

impl<'a> EssayHandler<'a> {
    pub fn new(config: &'a Config, templates: &'a Templates) -> Self {
        Self {
            config,
            templates,
            registry: Registry::default(),
        }
    }

    fn output_path(&self, ctx: &FileContext, meta: &ArticleMetadata) -> anyhow::Result<PathBuf> {
        let slug = resolve_slug(&meta.title, meta.slug.as_deref());

        if slug.is_empty() || slug == "." || slug == ".." || slug.contains(['/', '\\']) {
            anyhow::bail!("{:?} cannot be published under the slug {:?}.", meta.title, slug);
        }

        Ok(ctx
            .output_dir
            .join(&self.config.essays_path)
            .join(slug)
            .join("index.html"))
    }

    fn url(&self, meta: &ArticleMetadata) -> String {
        resolve_url(self.config, &meta.title, meta.slug.as_deref())
    }
}

impl FileHandler for EssayHandler<'_> {
    fn handle_file(&self, ctx: &FileContext) -> anyhow::Result<()> {
        let raw = std::fs::read_to_string(&ctx.source_path)?;
        let source = frontmatter::parse(&raw)?;
        let output = self.output_path(ctx, &source.meta)?;

        match ctx
            .source_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("")
        {
            "index" => log::info!(
                "Rendering index of {:?}",
                ctx.relative_path.parent().unwrap_or(Path::new("<root>"))
            ),
            _ => log::info!("Rendering essay {:?}", ctx.relative_path),
        }

        let html = render_body(source.body, &self.registry)?;
        let page = compose(self.config, &source.meta, &self.url(&source.meta), &html)?;
        let out = self.templates.render(&ctx.source_path, &page)?;

        writeable(&output)?.write_all(out.as_bytes())?;

        Ok(())
    }

    fn extract_metadata(&self, ctx: &FileContext) -> anyhow::Result<Option<Published>> {
        let raw = std::fs::read_to_string(&ctx.source_path)?;
        let meta = frontmatter::parse(&raw)?.meta;
        self.output_path(ctx, &meta)?;

        Ok(Some(Published {
            url: self.url(&meta),
            meta,
        }))
    }
}

/// Copies anything that is not an essay to the same relative path.
pub struct CopyHandler;

impl FileHandler for CopyHandler {
    fn handle_file(&self, ctx: &FileContext) -> anyhow::Result<()> {
        let output = ctx.output_dir.join(&ctx.relative_path);

        if !file_changed(&ctx.source_path, &output)? {
            log::debug!("{:?} is unchanged, skipping.", ctx.relative_path);
            return Ok(());
        }

        let known = ctx
            .source_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ASSET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

        if known {
            log::debug!("Copying {:?}", ctx.relative_path);
        } else {
            log::warn!(
                "File {:?} not recognized. Copying as-is...",
                ctx.relative_path
            );
        }

        writeable(&output)?
            .write_all(std::fs::read(&ctx.source_path)?.as_slice())
            .with_context(|| format!("Could not copy {:?}", ctx.relative_path))?;

        Ok(())
    }

    fn extract_metadata(&self, _ctx: &FileContext) -> anyhow::Result<Option<Published>> {
        Ok(None)
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::{
        config,
        handler::{CopyHandler, EssayHandler, FileContext, FileHandler},
        template::Templates,
    };

    #[test]
    fn extracts_essay() {
        let config = config::sample();
        let templates = Templates::new(Path::new("data"));
        let handler = EssayHandler::new(&config, &templates);
        let ctx = FileContext::new(
            Path::new("essays/hello-world.mdx"),
            Path::new("data/essays/hello-world.mdx"),
            Path::new("unused"),
        );

        let published = handler.extract_metadata(&ctx).unwrap().unwrap();
        assert_eq!(published.url, "https://example.com/essays/hello-world/");
        assert_eq!(published.meta.day, Some(3));
    }

    #[test]
    fn rejects_unsafe_slugs() {
        let config = config::sample();
        let templates = Templates::new(Path::new("data"));
        let handler = EssayHandler::new(&config, &templates);
        let ctx = FileContext::new(Path::new("a.mdx"), Path::new("a.mdx"), Path::new("out"));

        let mut meta = crate::metadata::sample();
        assert!(handler.output_path(&ctx, &meta).is_ok());

        for slug in ["../escape", "a/b", ".."] {
            meta.slug = Some(slug.into());
            assert!(handler.output_path(&ctx, &meta).is_err(), "{}", slug);
        }

        meta.slug = None;
        meta.title = "?!".into();
        assert!(handler.output_path(&ctx, &meta).is_err());
    }

    #[test]
    fn assets_have_no_metadata() {
        let ctx = FileContext::new(
            Path::new("static/logo.svg"),
            Path::new("data/static/logo.svg"),
            Path::new("unused"),
        );
        assert!(CopyHandler.extract_metadata(&ctx).unwrap().is_none());
    }
}
