// src/bin/srx_template.rs
//
// Push a templated config document (served over HTTP) to one SRX or a CSV
// list of SRXs. Changes are checked and rolled back unless --commit is
// given. Everything is also logged to a monthly srx-template log file.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{ArgGroup, Parser};
use junosops::config::{load_host_list, Credentials};
use junosops::ops::template::{push_to_host, validate_config_url, HostReport, PushOptions};
use junosops::session::{connect_guidance, DeviceSession, SessionError, SshSession};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Push templates to SRX firewalls.
#[derive(Parser)]
#[command(name = "srx-template")]
#[command(group = ArgGroup::new("target").required(true).args(["host", "file"]))]
struct Args {
    /// URL of the config document to apply
    /// (e.g. http://10.16.162.44/proxy/web-filtering.json)
    #[arg(value_name = "URL")]
    config_url: String,

    /// Host name or IP of the SRX
    host: Option<String>,

    /// CSV file containing a list of hosts, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Show all configuration changes
    #[arg(short, long)]
    verbose: bool,

    /// Commit the changes (otherwise they are checked and rolled back)
    #[arg(short, long)]
    commit: bool,

    /// Device username (prompted for when omitted)
    #[arg(short, long)]
    user: Option<String>,

    /// Device password (falls back to a no-echo prompt)
    #[arg(long, env = "JUNOSOPS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// SSH port
    #[arg(long, default_value_t = 22)]
    port: u16,
}

fn main() -> Result<()> {
    // One log file per calendar month, alongside console output.
    let log_name = format!("srx-template-{}.log", Local::now().format("%Y-%B"));
    let file_appender = tracing_appender::rolling::never(".", &log_name);
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();
    info!("begin logging");

    let args = Args::parse();

    // Fail on a bad document once, before any device is touched.
    let client = reqwest::blocking::Client::new();
    validate_config_url(&client, &args.config_url)?;

    let hosts = match (&args.host, &args.file) {
        (Some(host), None) => vec![host.clone()],
        (None, Some(file)) => load_host_list(file)?,
        _ => unreachable!("clap enforces the target group"),
    };

    let credentials = Credentials::resolve("Device", args.user, args.password)?;
    let options = PushOptions {
        commit: args.commit,
        verbose: args.verbose,
    };

    for host in &hosts {
        info!(%host, "connecting");
        let mut session = match SshSession::connect(host, args.port, &credentials) {
            Ok(session) => session,
            Err(err) => {
                error!(%host, "{}", err);
                if let Some(hint) = connect_guidance(&err) {
                    warn!("{}", hint);
                }
                continue;
            }
        };
        info!(hostname = session.hostname(), "connected");

        match push_to_host(&mut session, &args.config_url, options) {
            Ok(HostReport::SkippedUncommitted) | Ok(HostReport::NoChanges) => {}
            Ok(HostReport::Checked { diff }) | Ok(HostReport::Committed { diff }) => {
                if options.verbose {
                    println!("{}", diff);
                }
            }
            Err(err) => {
                let commit_error = matches!(
                    err.downcast_ref::<SessionError>(),
                    Some(SessionError::Commit { .. })
                );
                if commit_error {
                    // The rejected commit was already rolled back on the
                    // device; carry on with the remaining hosts.
                    error!(%host, "commit failed, changes rolled back: {}", err);
                } else {
                    // A document the device cannot load will fail everywhere.
                    error!(%host, "{:#}", err);
                    return Err(err);
                }
            }
        }
    }

    info!("finishing script gracefully");
    Ok(())
}
