// src/fetch/mod.rs
//
// Loads the JTAC recommended-release article and locates each family's table
// by its fixed `summary` attribute. The portal renders the tables
// client-side, so the page is polled on a fixed interval until the EX table
// shows up; once it does, the rest of the tables are assumed loaded too.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::jtac::{Family, Table};

/// Default location of the recommended-release article.
pub static RELEASE_ARTICLE_URL: &str = "https://supportportal.juniper.net/s/article/Junos-Software-Versions-Suggested-Releases-to-Consider-and-Evaluate?language=en_US";

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_POLL_ATTEMPTS: u32 = 10;

static ROW_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tr").expect("tr selector should be valid"));
static CELL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("td selector should be valid"));

/// The `summary` attribute each family's table carries on the article page.
/// MX and PTX share one table, whose summary is (incorrectly, but stably)
/// "J Series Service Routers".
fn table_summary(family: Family) -> &'static str {
    match family {
        Family::Ex => "EX Series Ethernet Switches",
        Family::Acx => "ACX Series Service Routers",
        Family::Ptx | Family::Mx => "J Series Service Routers",
        Family::Nfx => "NFX Series Network Services Platform",
        Family::Qfx => "QFX Series Service Routers",
        Family::Srx => "SRX Series Services Gateways",
    }
}

/// The per-family tables located on one rendering of the article. A family
/// whose table could not be found is simply absent; the extractor never
/// retries fetching.
#[derive(Debug, Default)]
pub struct ReleaseTables {
    tables: BTreeMap<Family, Table>,
}

impl ReleaseTables {
    /// Locate every family table in an already-fetched document.
    pub fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let mut tables = BTreeMap::new();

        for family in Family::ALL {
            let selector = Selector::parse(&format!(
                r#"table[summary="{}"]"#,
                table_summary(family)
            ))
            .expect("summary selector should be valid");
            if let Some(element) = doc.select(&selector).next() {
                tables.insert(family, table_from_element(element));
            }
        }

        ReleaseTables { tables }
    }

    pub fn get(&self, family: Family) -> Option<&Table> {
        self.tables.get(&family)
    }

    /// Present families with their tables, in `Family::ALL` order.
    pub fn families(&self) -> impl Iterator<Item = (Family, &Table)> {
        Family::ALL
            .into_iter()
            .filter_map(move |family| self.tables.get(&family).map(|t| (family, t)))
    }
}

/// Convert a located `<table>` into rows of trimmed cell text. Header rows
/// hold only `<th>` cells and therefore convert to empty rows, which the
/// extractor skips.
fn table_from_element(table: ElementRef) -> Table {
    let rows = table
        .select(&ROW_SELECTOR)
        .map(|tr| {
            tr.select(&CELL_SELECTOR)
                .map(|td| td.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect();
    Table { rows }
}

/// Fetch the article and wait for the client-side rendering to produce the
/// release tables: poll every 2 seconds, at most 10 attempts, keyed on the
/// EX table. Fails with a descriptive error when the tables never appear.
pub async fn load_release_tables(client: &Client, url: &str) -> Result<ReleaseTables> {
    for attempt in 1..=MAX_POLL_ATTEMPTS {
        let html = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let tables = ReleaseTables::parse(&html);
        if tables.get(Family::Ex).is_some() {
            info!(attempt, "release tables located");
            return Ok(tables);
        }

        debug!(attempt, "release tables not rendered yet; waiting");
        sleep(POLL_INTERVAL).await;
    }

    bail!(
        "unable to locate the release tables at {} after {} attempts",
        url,
        MAX_POLL_ATTEMPTS
    )
}
