// src/ops/template.rs
//
// Template push: validate the config document's URL, then have each device
// load it, report the candidate diff, and commit or commit-check it.

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use url::Url;

use crate::session::{CommitAction, DeviceSession};

/// How the push should treat the candidate config.
#[derive(Debug, Clone, Copy)]
pub struct PushOptions {
    /// Commit the changes; without this the config is checked and rolled back.
    pub commit: bool,
    /// Show the full diff instead of a summary line.
    pub verbose: bool,
}

/// What happened on one host.
#[derive(Debug)]
pub enum HostReport {
    /// Someone left uncommitted config on the box; nothing was touched.
    SkippedUncommitted,
    /// The document added nothing to the active config.
    NoChanges,
    /// The diff passed `commit check` and was rolled back.
    Checked { diff: String },
    /// The diff was committed.
    Committed { diff: String },
}

/// The document must be a `.json` file reachable over HTTP; the devices load
/// it straight from the URL, so a bad link should fail here, once, before
/// any device is touched.
pub fn validate_config_url(client: &reqwest::blocking::Client, url: &str) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("invalid config URL {}", url))?;
    if !parsed.path().ends_with(".json") {
        bail!("this needs to be a .json file: {}", url);
    }

    let response = client
        .head(url)
        .send()
        .with_context(|| format!("webserver error for {}", url))?;
    if !response.status().is_success() {
        bail!(
            "config document {} does not exist (HTTP {})",
            url,
            response.status()
        );
    }
    Ok(())
}

/// Push the document to one device. A host with uncommitted candidate config
/// is skipped untouched; an empty diff reports `NoChanges`; otherwise the
/// candidate is committed or checked-and-rolled-back per `options`.
pub fn push_to_host(
    session: &mut dyn DeviceSession,
    url: &str,
    options: PushOptions,
) -> Result<HostReport> {
    let hostname = session.hostname().to_string();

    if session.candidate_diff()?.is_some() {
        warn!(host = %hostname, "uncommitted config found, skipping");
        return Ok(HostReport::SkippedUncommitted);
    }

    let action = if options.commit {
        CommitAction::Commit
    } else {
        CommitAction::Check
    };
    let outcome = session.push_config(url, action)?;

    match outcome.diff {
        None => {
            info!(host = %hostname, "no changes to commit");
            Ok(HostReport::NoChanges)
        }
        Some(diff) => {
            if options.commit {
                info!(host = %hostname, "configuration committed");
                Ok(HostReport::Committed { diff })
            } else {
                info!(host = %hostname, "configuration checked and rolled back; use --commit to apply");
                Ok(HostReport::Checked { diff })
            }
        }
    }
}
