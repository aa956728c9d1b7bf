// src/config.rs
//
// Runtime inputs for the binaries. Credentials and host lists are explicit
// values threaded through calls; nothing here is process-global.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Login credentials for a device or an FTP server. `Debug` never shows the
/// password.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"*****")
            .finish()
    }
}

impl Credentials {
    /// Fill in whatever the command line and environment did not provide:
    /// username from stdin, password from a no-echo prompt. Blank values are
    /// rejected rather than passed on to the device.
    pub fn resolve(
        label: &str,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Credentials> {
        let username = match username {
            Some(name) => name,
            None => {
                print!("{} username: ", label);
                io::stdout().flush()?;
                let mut line = String::new();
                io::stdin().read_line(&mut line)?;
                line.trim().to_string()
            }
        };
        if username.is_empty() {
            bail!("you can't have a blank username");
        }

        let password = match password {
            Some(pass) => pass,
            None => rpassword::prompt_password(format!("{} password: ", label))
                .context("failed to read password")?,
        };
        if password.is_empty() {
            bail!("you can't have a blank password");
        }

        Ok(Credentials { username, password })
    }
}

/// Load a host list from a CSV file, one device per line, host in the first
/// column. Blank lines are skipped.
pub fn load_host_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening host list {}", path.display()))?;

    let mut hosts = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading host list {}", path.display()))?;
        if let Some(host) = record.get(0) {
            let host = host.trim();
            if !host.is_empty() {
                hosts.push(host.to_string());
            }
        }
    }
    if hosts.is_empty() {
        bail!("host list {} contains no hosts", path.display());
    }
    Ok(hosts)
}

/// Optional YAML tool configuration, for values that rarely change per run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Default device username.
    pub username: Option<String>,
    /// Override for the recommended-release article URL.
    pub article_url: Option<String>,
    /// Default FTP target for support archives, e.g. `10.10.20.1/backups`.
    pub ftp_server: Option<String>,
}

impl ToolConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<ToolConfig> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))
    }
}
