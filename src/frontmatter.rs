use crate::metadata::ArticleMetadata;

/// An essay file split into its metadata and its MDX body.
#[derive(Debug)]
pub struct Source<'a> {
    pub meta: ArticleMetadata,
    pub body: &'a str,
}

/// Splits a leading `---` fenced YAML block off `input`.
///
/// Returns the raw YAML and the body that follows the closing fence.
fn split(input: &str) -> anyhow::Result<Option<(&str, &str)>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let start = input.len() - input.trim_start().len();
    let mut lines = input[start..].split_inclusive('\n');

    let yaml_start = match lines.next() {
        Some(line) if is_fence(line) => start + line.len(),
        _ => return Ok(None),
    };
    let mut offset = yaml_start;

    for line in lines {
        if is_fence(line) {
            let yaml = &input[yaml_start..offset];
            let body = &input[offset + line.len()..];
            return Ok(Some((yaml, body)));
        }
        offset += line.len();
    }

    anyhow::bail!("Unterminated frontmatter: expected a closing '---'.")
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == "---"
}

/// Reads and validates the metadata of an essay.
pub fn parse(input: &str) -> anyhow::Result<Source<'_>> {
    let Some((yaml, body)) = split(input)? else {
        anyhow::bail!("Essay has no frontmatter, a title and description are required.");
    };

    let meta: ArticleMetadata = serde_yaml::from_str(yaml)?;
    meta.validate()?;

    Ok(Source { meta, body })
}

#[cfg(test)]
mod test {
    use crate::frontmatter::{parse, split};

    const ESSAY: &str = "---
title: Hello World
description: desc
date: 2020-01-01
day: 3
lang: es
tags:
  - react
---
# Body
";

    #[test]
    fn splits() {
        let source = parse(ESSAY).unwrap();

        assert_eq!(source.meta.title, "Hello World");
        assert_eq!(source.meta.day, Some(3));
        assert_eq!(source.meta.tags, vec!["react".to_owned()]);
        assert_eq!(source.body, "# Body\n");
    }

    #[test]
    fn bom_and_blank_lines() {
        let input = format!("\u{feff}\n  \n{}", ESSAY);
        assert_eq!(parse(&input).unwrap().body, "# Body\n");
    }

    #[test]
    fn crlf() {
        let input = ESSAY.replace('\n', "\r\n");
        let source = parse(&input).unwrap();
        assert_eq!(source.meta.title, "Hello World");
        assert_eq!(source.body, "# Body\r\n");
    }

    #[test]
    fn stray_carriage_returns_on_fence() {
        let input = ESSAY.replacen("---\n", "---\r\r\n", 1);
        let (yaml, body) = split(&input).unwrap().unwrap();

        assert!(yaml.starts_with("title: Hello World\n"));
        assert_eq!(body, "# Body\n");
        assert_eq!(parse(&input).unwrap().meta.title, "Hello World");
    }

    #[test]
    fn missing() {
        assert!(split("# Just a body").unwrap().is_none());
        assert!(parse("# Just a body").is_err());
    }

    #[test]
    fn unterminated() {
        assert!(split("---\ntitle: x\n").is_err());
    }

    #[test]
    fn invalid_metadata() {
        assert!(parse("---\ntitle: Hello\n---\nbody").is_err());
        let long = format!("description: {}", "x".repeat(141));
        assert!(parse(&ESSAY.replace("description: desc", &long)).is_err());
    }
}
