// src/bin/junos_support.rs
//
// Generate support files on a Junos device and optionally upload them to an
// FTP server.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use junosops::config::{Credentials, ToolConfig};
use junosops::ops::support::{generate_support_bundle, upload_archive, FtpTarget};
use junosops::session::{connect_guidance, DeviceSession, SshSession};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Junos support tool. Generate support files for a Junos device.
#[derive(Parser)]
#[command(name = "junos-support")]
struct Args {
    /// Host name or IP of the Junos device
    host: String,

    /// Destination FTP server and directory (e.g. 10.16.162.125/backups)
    ftp: Option<String>,

    /// Device username (prompted for when omitted)
    #[arg(short, long)]
    user: Option<String>,

    /// Device password (falls back to a no-echo prompt)
    #[arg(long, env = "JUNOSOPS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// SSH port
    #[arg(long, default_value_t = 22)]
    port: u16,

    /// Optional YAML tool config (default username, FTP target)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let tool_config = args
        .config
        .as_deref()
        .map(ToolConfig::load)
        .transpose()?
        .unwrap_or_default();

    println!("Please provide Junos device credentials");
    let user = args.user.or(tool_config.username);
    let credentials = Credentials::resolve("Device", user, args.password)?;

    let ftp_target = args
        .ftp
        .or(tool_config.ftp_server)
        .map(|server_path| -> Result<FtpTarget> {
            println!("Please provide FTP server credentials");
            let credentials = Credentials::resolve("FTP", None, None)?;
            Ok(FtpTarget {
                server_path,
                credentials,
            })
        })
        .transpose()?;

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

    let bundle = generate_support_bundle(&mut session, Local::now().date_naive())?;
    println!("RSI saved to {}", bundle.rsi_path);
    println!("Archive saved to {}", bundle.archive_path);

    if let Some(target) = ftp_target {
        upload_archive(&mut session, &target)?;
        println!("Archive uploaded to {}", target.redacted());
    }

    Ok(())
}
