// src/bin/restart_process.rs
//
// Restart a named Junos daemon, gracefully (SIGTERM) or immediately
// (SIGKILL).

use anyhow::Result;
use clap::Parser;
use junosops::config::Credentials;
use junosops::ops::restart::{restart_process, RestartOutcome};
use junosops::session::{connect_guidance, DeviceSession, SshSession};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Restart a process on a Junos device.
#[derive(Parser)]
#[command(name = "restart-process")]
struct Args {
    /// Host name or IP of the Junos device
    host: String,

    /// Daemon to restart, e.g. firewall, snmp, forwarding
    process: String,

    /// Kill the process outright (SIGKILL) instead of restarting gracefully
    #[arg(long)]
    immediately: bool,

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
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
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

    let signal = if args.immediately { "SIGKILL" } else { "SIGTERM" };
    println!("Restart initiated ({})", signal);

    match restart_process(&mut session, &args.process, args.immediately)? {
        RestartOutcome::Completed(output) => {
            if output.is_empty() {
                println!("Restart complete");
            } else {
                println!("{}", output);
            }
        }
        RestartOutcome::ExpectedDisconnect => {
            println!("Disconnected from {}", args.host);
            println!("This is normal when restarting the forwarding process");
        }
    }

    Ok(())
}
