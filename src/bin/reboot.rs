// src/bin/reboot.rs
//
// Reboot a Junos device: now, at a given time, or in a given number of
// minutes. Requires NETCONF over SSH to be enabled on the target.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use junosops::config::Credentials;
use junosops::ops;
use junosops::session::{connect_guidance, DeviceSession, RebootWhen, SshSession};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Reboot a Junos device.
#[derive(Parser)]
#[command(name = "reboot")]
struct Args {
    /// Host name or IP of the Junos device
    host: String,

    /// Device username (prompted for when omitted)
    #[arg(short, long)]
    user: Option<String>,

    /// Device password (falls back to a no-echo prompt)
    #[arg(long, env = "JUNOSOPS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// SSH port
    #[arg(long, default_value_t = 22)]
    port: u16,

    /// Reboot at this time, e.g. "2023-03-24 03:00"
    #[arg(long, value_name = "TIME", conflicts_with = "in_minutes")]
    at: Option<String>,

    /// Reboot in this many minutes
    #[arg(long = "in", value_name = "MINUTES")]
    in_minutes: Option<u32>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let when = match (&args.at, args.in_minutes) {
        (Some(at), None) => RebootWhen::At(
            NaiveDateTime::parse_from_str(at, "%Y-%m-%d %H:%M")
                .context("the reboot time needs to look like \"2023-03-24 03:00\"")?,
        ),
        (None, Some(minutes)) => RebootWhen::In(minutes),
        (None, None) => RebootWhen::Now,
        (Some(_), Some(_)) => unreachable!("clap enforces the conflict"),
    };

    let credentials = Credentials::resolve("Device", args.user, args.password)?;

    info!(host = %args.host, "connecting");
    let mut session = match SshSession::connect(&args.host, args.port, &credentials) {
        Ok(session) => session,
        Err(err) => {
            error!("{}", err);
            if let Some(hint) = connect_guidance(&err) {
                eprintln!("{}", hint);
            }
            std::process::exit(1);
        }
    };
    println!("Hostname: {}", session.hostname());

    let message = ops::reboot::reboot(&mut session, when, Local::now().naive_local())?;
    println!("{}", message);
    Ok(())
}
