use chrono::{TimeZone, Utc};
use rss::{CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};

use crate::{config::RSSConfig, metadata::Published};

fn item(published: &Published) -> Item {
    let meta = &published.meta;
    let midnight = meta.date.and_hms_opt(0, 0, 0).unwrap_or_default();

    ItemBuilder::default()
        .title(Some(meta.title.clone()))
        .link(Some(published.url.clone()))
        .description(Some(meta.description.clone()))
        .guid(Some(
            GuidBuilder::default()
                .value(published.url.clone())
                .permalink(true)
                .build(),
        ))
        .pub_date(Some(Utc.from_utc_datetime(&midnight).to_rfc2822()))
        .categories(
            meta.tags
                .iter()
                .map(|tag| CategoryBuilder::default().name(tag.clone()).build())
                .collect::<Vec<_>>(),
        )
        .build()
}

/// RSS channel over every essay, newest first.
pub fn channel(config: &RSSConfig, published: &[Published]) -> Channel {
    let mut sorted: Vec<&Published> = published.iter().collect();
    sorted.sort_by(|a, b| b.meta.date.cmp(&a.meta.date));

    let categories = config
        .categories
        .iter()
        .flatten()
        .map(|category| {
            CategoryBuilder::default()
                .name(category.name.clone())
                .domain(category.domain.clone())
                .build()
        })
        .collect::<Vec<_>>();

    ChannelBuilder::default()
        .title(config.title.clone())
        .link(config.link.clone())
        .description(config.description.clone())
        .language(config.language.clone())
        .copyright(config.copyright.clone())
        .managing_editor(config.managing_editor.clone())
        .webmaster(config.webmaster.clone())
        .ttl(config.ttl.map(|ttl| ttl.to_string()))
        .categories(categories)
        .items(sorted.into_iter().map(item).collect::<Vec<_>>())
        .build()
}
