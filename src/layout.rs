//! Composes an essay page from its metadata and rendered body.
//!
//! [`compose`] is pure: the returned [`Page`] describes every head tag and
//! body section in document order, and the template layer only prints it.

use serde::Serialize;

use crate::{
    config::{CallToAction, Config},
    locale,
    metadata::ArticleMetadata,
    schema,
    slug::hostname,
    social::{self, Card, MetaTag},
};

#[derive(Serialize, Debug)]
pub struct Page {
    pub lang: String,
    pub head: Head,
    pub body: Body,
    pub style: String,
}

#[derive(Serialize, Debug)]
pub struct Head {
    pub title: String,
    pub description: String,
    pub meta: Vec<MetaTag>,
    pub canonical: Option<String>,
    pub alternate: Option<Alternate>,
    /// Minified JSON-LD, safe to print unescaped.
    pub schema: String,
    pub social: Vec<MetaTag>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Alternate {
    pub hreflang: String,
    pub href: String,
}

#[derive(Serialize, Debug)]
pub struct Body {
    pub header: Header,
    pub heading: Heading,
    pub canonical_notice: Option<CanonicalNotice>,
    pub translation_notice: Option<TranslationNotice>,
    pub article: Article,
    pub call_to_action: Option<CallToAction>,
}

#[derive(Serialize, Debug)]
pub struct Header {
    pub href: String,
    pub label: String,
    pub sticky: bool,
}

#[derive(Serialize, Debug)]
pub struct Heading {
    pub title: String,
    pub lang: String,
    pub counter: Option<Counter>,
}

/// `Aprendiendo React (día 3 de 100)`
#[derive(Serialize, Debug, PartialEq)]
pub struct Counter {
    pub series: String,
    pub text: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct CanonicalNotice {
    pub label: String,
    pub url: String,
    pub hostname: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct TranslationNotice {
    pub label: String,
    pub lang: String,
    pub url: String,
    pub title: String,
}

#[derive(Serialize, Debug)]
pub struct Article {
    pub lang: String,
    pub html: String,
}

pub fn compose(
    config: &Config,
    meta: &ArticleMetadata,
    url: &str,
    html: &str,
) -> anyhow::Result<Page> {
    let lang = meta.lang();
    let strings = locale::strings(lang);
    let card = Card {
        title: &meta.title,
        description: &meta.description,
        url,
    };

    let series = config.series.as_ref().zip(meta.day);

    let title = match series {
        Some((series, day)) => format!(
            "{} - {}: {}",
            meta.title,
            series.title,
            locale::fill(strings.title_counter, day, series.length)
        ),
        None => meta.title.clone(),
    };

    let mut cards = social::twitter_card(card, config.twitter.as_ref());
    cards.extend(social::open_graph(card));

    let head = Head {
        title,
        description: meta.description.clone(),
        meta: social::twitter_widgets(&config.palette),
        canonical: meta.canonical_url.clone(),
        alternate: meta.translate_from.as_ref().map(|from| Alternate {
            hreflang: from.lang.clone(),
            href: from.url.clone(),
        }),
        schema: schema::Article::new(config, meta, url).to_script()?,
        social: cards,
    };

    let body = Body {
        header: Header {
            href: config.header.href.clone(),
            label: config.author.name.clone(),
            sticky: config.header.sticky,
        },
        heading: Heading {
            title: meta.title.clone(),
            lang: lang.to_owned(),
            counter: series.map(|(series, day)| Counter {
                series: series.name.clone(),
                text: locale::fill(strings.counter, day, series.length),
            }),
        },
        canonical_notice: meta.canonical_url.as_ref().map(|url| CanonicalNotice {
            label: strings.originally_published.to_owned(),
            url: url.clone(),
            hostname: hostname(url).to_owned(),
        }),
        translation_notice: meta.translate_from.as_ref().map(|from| TranslationNotice {
            label: strings.translated_from.to_owned(),
            lang: from.lang.clone(),
            url: from.url.clone(),
            title: from.title.clone(),
        }),
        article: Article {
            lang: lang.to_owned(),
            html: html.to_owned(),
        },
        call_to_action: config.call_to_action.clone(),
    };

    Ok(Page {
        lang: lang.to_owned(),
        head,
        body,
        style: stylesheet(config),
    })
}

fn stylesheet(config: &Config) -> String {
    let palette = &config.palette;

    format!(
        r#".content {{ font-size: 1.25rem; margin: 0 auto 10vh; max-width: 36em; width: 100%; }}
.main-title {{ text-align: center; padding-left: 0.5em; padding-right: 0.5em; }}
.main-title small small {{ color: {grey}; }}
article {{ box-sizing: border-box; font-weight: normal; line-height: 1.4; outline: 0; padding-left: 1em; padding-right: 1em; word-break: break-word; word-wrap: break-word; }}
.content h2, .content h3, .content h4, .content h5, .content h6 {{ font-weight: lighter; letter-spacing: -0.02em; margin: 1em 0 0; position: relative; }}
.content h2 {{ border-bottom: 1px solid {black}; box-sizing: border-box; margin-left: calc(-1em + 2px); margin-right: calc(-1em + 2px); padding: 0 1em 0.25em; }}
.content hr {{ margin: 2em auto; width: 33%; }}
.content a {{ color: {blue}; }}
.header {{ padding: 1em; }}
.header.sticky {{ position: sticky; top: 0; background: #fff; }}
.notice {{ color: {grey}; font-size: 0.9rem; text-align: center; }}
.image {{ max-width: 100%; vertical-align: top; }}
.figure {{ font-size: 0; text-align: center; margin: 0; width: 100%; }}
.caption {{ color: {grey}; font-size: 0.9rem; }}
.call-to-action {{ border-top: 1px solid {black}; margin-top: 2em; padding: 1em; text-align: center; }}
@media (max-width: {breakpoint}px) {{
  .main-title {{ font-size: 2em; margin-left: -2px; line-height: 1.04; letter-spacing: -0.028em; text-align: left; }}
  .content *:hover > .anchor::before {{ display: none; }}
  .content h2 {{ font-size: 1.75em; margin-top: 1.75rem; padding-left: 0.5714285714em; padding-right: 0.5714285714em; margin-left: -0.5714285714em; margin-right: -0.5714285714em; }}
  .content h3 {{ font-size: 1.5em; }}
  .content h4 {{ font-size: 1.25em; }}
  .content h5 {{ font-size: 1.125em; }}
  .content h6 {{ font-size: 1em; }}
  .content blockquote, .content p {{ font-size: 1.125rem; line-height: 1.58; letter-spacing: -0.004em; }}
  .content pre {{ border-left: none; border-right: none; padding: 1rem 1.25rem; margin: 1rem -1.25rem; }}
  .content ul, .content ol {{ margin-left: 0; padding-left: 2rem; }}
}}
"#,
        blue = palette.blue,
        black = palette.black,
        grey = palette.grey,
        breakpoint = config.breakpoint,
    )
}
