// src/bin/jtac_versions.rs
//
// Scrape the JTAC recommended-release article and print the normalized
// per-family records.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use junosops::config::ToolConfig;
use junosops::fetch;
use junosops::jtac::{self, Family, Record};
use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Print the recommended Junos releases for Juniper devices.
#[derive(Parser)]
#[command(name = "jtac-versions")]
struct Args {
    /// Article URL to scrape
    #[arg(long, default_value = fetch::RELEASE_ARTICLE_URL)]
    url: String,

    /// Restrict output to these families (ex, acx, ptx, mx, nfx, qfx, srx);
    /// repeat the flag for more than one
    #[arg(long = "family", value_name = "FAMILY")]
    families: Vec<Family>,

    /// Emit the records as JSON instead of human-readable lines
    #[arg(long)]
    json: bool,

    /// Optional YAML tool config (may override the article URL)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let selected: Vec<Family> = if args.families.is_empty() {
        Family::ALL.to_vec()
    } else {
        args.families.clone()
    };

    let tool_config = args
        .config
        .as_deref()
        .map(ToolConfig::load)
        .transpose()?
        .unwrap_or_default();
    let url = tool_config.article_url.unwrap_or(args.url);

    let client = Client::new();
    info!(%url, "loading the recommended-release article");
    let tables = fetch::load_release_tables(&client, &url).await?;

    let mut results: BTreeMap<String, Vec<Record>> = BTreeMap::new();
    for family in &selected {
        match tables.get(*family) {
            Some(table) => {
                let records = jtac::extract(*family, table)?;
                results.insert(family.tag().to_string(), records);
            }
            None => warn!(family = %family, "table not found on the page"),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for family in &selected {
        let Some(records) = results.get(family.tag()) else {
            continue;
        };
        println!("\nGetting {} series", family);
        for record in records {
            println!("Model: {}", record.model);
            println!("Recommended: {}", record.recommended);
            if let Some(updated) = record.updated {
                println!("Updated: {}", updated);
            }
            println!();
        }
    }

    Ok(())
}
