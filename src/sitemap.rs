use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use sitemap_rs::{url::Url, url_set::UrlSet};

use crate::metadata::Published;

/// `sitemap.xml` with one entry per essay.
pub fn sitemap(published: &[Published]) -> anyhow::Result<Vec<u8>> {
    let mut urls: Vec<Url> = vec![];

    for entry in published {
        let midnight = entry.meta.date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let modified: DateTime<FixedOffset> = Utc.from_utc_datetime(&midnight).into();

        urls.push(
            Url::builder(entry.url.clone())
                .last_modified(modified)
                .build()
                .map_err(|err| anyhow::anyhow!("Invalid sitemap entry {}: {:?}", entry.url, err))?,
        );
    }

    let url_set = UrlSet::new(urls).map_err(|err| anyhow::anyhow!("Invalid sitemap: {:?}", err))?;

    let mut buffer = Vec::<u8>::new();
    url_set
        .write(&mut buffer)
        .map_err(|err| anyhow::anyhow!("Could not write sitemap: {:?}", err))?;

    Ok(buffer)
}
