use crate::config::Config;

/// Transliterates `text` to ASCII, lowercases it and collapses every run of
/// non-alphanumeric characters into a single hyphen. Leading and trailing
/// separators are dropped.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// The slug an essay is published under: the explicit one verbatim, else the title's.
pub fn resolve_slug(title: &str, slug: Option<&str>) -> String {
    match slug {
        Some(slug) => slug.to_owned(),
        None => slugify(title),
    }
}

/// Canonical absolute URL of an essay, always with a trailing slash.
pub fn resolve_url(config: &Config, title: &str, slug: Option<&str>) -> String {
    format!(
        "{}/{}/{}/",
        config.site_url,
        config.essays_path,
        resolve_slug(title, slug)
    )
}

/// Host part of an absolute URL, or `""` when there is none.
pub fn hostname(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(index) => &url[index + 3..],
        None => match url.strip_prefix("//") {
            Some(rest) => rest,
            None => return "",
        },
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = authority.rsplit('@').next().unwrap_or("");

    // [::1]:8080
    if let Some(inner) = host.strip_prefix('[') {
        return inner.split(']').next().unwrap_or("");
    }

    host.split(':').next().unwrap_or("")
}

#[cfg(test)]
mod test {
    use crate::slug::{hostname, resolve_slug, resolve_url, slugify};

    #[test]
    fn basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Bye Platzi, hi ZEIT!"), "bye-platzi-hi-zeit");
        assert_eq!(slugify("  a -- b  "), "a-b");
        assert_eq!(slugify("React.js: the (good) parts"), "react-js-the-good-parts");
    }

    #[test]
    fn transliterated() {
        assert_eq!(slugify("Día 3 de 100"), "dia-3-de-100");
        assert_eq!(slugify("¿Qué es JSX? Introducción"), "que-es-jsx-introduccion");
        assert_eq!(slugify("Straße Ñandú"), "strasse-nandu");
        assert!(slugify("多言語 ガイド").is_ascii());
    }

    #[test]
    fn idempotent() {
        for title in ["Hello World", "¿Qué es JSX?", "  ", "a_b-c d", ""] {
            assert_eq!(slugify(title), slugify(title));
            assert_eq!(slugify(&slugify(title)), slugify(title));
        }
    }

    #[test]
    fn empty_title() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("?!"), "");
    }

    #[test]
    fn explicit_slug_verbatim() {
        assert_eq!(resolve_slug("Hello World", Some("My_Custom.Slug")), "My_Custom.Slug");
        assert_eq!(resolve_slug("Hello World", None), "hello-world");
    }

    #[test]
    fn url() {
        let config = crate::config::sample();

        assert_eq!(
            resolve_url(&config, "Hello World", None),
            "https://example.com/essays/hello-world/"
        );
        assert_eq!(
            resolve_url(&config, "Hello World", Some("bye-platzi-hi-zeit")),
            "https://example.com/essays/bye-platzi-hi-zeit/"
        );

        let url = resolve_url(&config, "¿Qué es JSX? Introducción", None);
        assert_eq!(url, "https://example.com/essays/que-es-jsx-introduccion/");
        assert!(url.is_ascii());
    }

    #[test]
    fn hostnames() {
        assert_eq!(hostname("https://medium.com/@someone/post"), "medium.com");
        assert_eq!(hostname("http://user:pw@dev.to:8080/x?y#z"), "dev.to");
        assert_eq!(hostname("//cdn.example.com/a"), "cdn.example.com");
        assert_eq!(hostname("https://[::1]:3000/"), "::1");
        assert_eq!(hostname("not a url"), "");
    }
}
