use serde::Serialize;

use crate::config::{Palette, TwitterConfig};

/// A `<meta>` element. `attribute` is `"property"` for OpenGraph and `"name"` otherwise.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MetaTag {
    pub attribute: &'static str,
    pub key: String,
    pub content: String,
}

impl MetaTag {
    pub fn name(key: &str, content: &str) -> Self {
        Self {
            attribute: "name",
            key: key.to_owned(),
            content: content.to_owned(),
        }
    }

    pub fn property(key: &str, content: &str) -> Self {
        Self {
            attribute: "property",
            key: key.to_owned(),
            content: content.to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Card<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
}

pub fn open_graph(card: Card) -> Vec<MetaTag> {
    vec![
        MetaTag::property("og:type", "article"),
        MetaTag::property("og:title", card.title),
        MetaTag::property("og:description", card.description),
        MetaTag::property("og:url", card.url),
    ]
}

pub fn twitter_card(card: Card, handles: Option<&TwitterConfig>) -> Vec<MetaTag> {
    let mut tags = vec![
        MetaTag::name("twitter:card", "summary"),
        MetaTag::name("twitter:title", card.title),
        MetaTag::name("twitter:description", card.description),
        MetaTag::name("twitter:url", card.url),
    ];

    if let Some(handles) = handles {
        if let Some(site) = &handles.site {
            tags.push(MetaTag::name("twitter:site", site));
        }
        if let Some(creator) = &handles.creator {
            tags.push(MetaTag::name("twitter:creator", creator));
        }
    }

    tags
}

/// Styling for embedded tweets.
pub fn twitter_widgets(palette: &Palette) -> Vec<MetaTag> {
    vec![
        MetaTag::name("twitter:widgets:theme", "light"),
        MetaTag::name("twitter:widgets:link-color", &palette.blue),
        MetaTag::name("twitter:widgets:border-color", &palette.blue),
    ]
}

#[cfg(test)]
mod test {
    use crate::{
        config::{Palette, TwitterConfig},
        social::{open_graph, twitter_card, twitter_widgets, Card, MetaTag},
    };

    const CARD: Card = Card {
        title: "Hello World",
        description: "desc",
        url: "https://example.com/essays/hello-world/",
    };

    #[test]
    fn og() {
        let tags = open_graph(CARD);

        assert!(tags.iter().all(|tag| tag.attribute == "property"));
        assert_eq!(tags[0], MetaTag::property("og:type", "article"));
        assert!(tags.contains(&MetaTag::property("og:title", "Hello World")));
        assert!(tags.contains(&MetaTag::property(
            "og:url",
            "https://example.com/essays/hello-world/"
        )));
    }

    #[test]
    fn twitter_without_handles() {
        let tags = twitter_card(CARD, None);

        assert_eq!(tags.len(), 4);
        assert!(tags.iter().all(|tag| tag.attribute == "name"));
        assert!(tags.contains(&MetaTag::name("twitter:description", "desc")));
    }

    #[test]
    fn twitter_handles() {
        let handles = TwitterConfig {
            site: None,
            creator: Some("@janedoe".into()),
        };
        let tags = twitter_card(CARD, Some(&handles));

        assert!(tags.contains(&MetaTag::name("twitter:creator", "@janedoe")));
        assert!(!tags.iter().any(|tag| tag.key == "twitter:site"));
    }

    #[test]
    fn widgets_use_palette() {
        let palette = Palette::default();
        let tags = twitter_widgets(&palette);

        assert!(tags.contains(&MetaTag::name("twitter:widgets:link-color", &palette.blue)));
    }
}
