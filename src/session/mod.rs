// src/session/mod.rs
//
// Abstracted access to a Junos device over NETCONF-capable SSH. Callers only
// ever see the `DeviceSession` trait and the closed `SessionError` set; all
// classification of transport and device failures happens at this boundary,
// so nothing above it matches on library error types or message text.

pub mod classify;
pub mod ssh;

use std::time::Duration;

use chrono::NaiveDateTime;
use thiserror::Error;

pub use ssh::SshSession;

/// Timeout for ordinary operational commands.
pub const DEFAULT_CLI_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for configuration scripts; commits on chassis platforms are slow.
pub const CONFIG_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything that can go wrong talking to a device. The set is closed on
/// purpose: binaries match on variants to print operator guidance and the
/// ops layer branches on them, never on error text.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection refused by {host}")]
    ConnectRefused { host: String },
    #[error("connection to {host} timed out")]
    ConnectTimeout { host: String },
    #[error("authentication failed for {user}@{host}")]
    AuthFailed { host: String, user: String },
    #[error("unknown host {host}")]
    UnknownHost { host: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("RPC timed out after {0:?}")]
    RpcTimeout(Duration),
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("shell error: {0}")]
    Shell(String),
    #[error("another shutdown or reboot is already scheduled")]
    ShutdownInProgress,
    #[error("the {daemon} process is not in use on this system")]
    SubsystemNotRunning { daemon: String },
    #[error("the {daemon} process does not exist on this system")]
    InvalidDaemon { daemon: String },
    #[error("configuration load failed: {message}")]
    ConfigLoad {
        bad_element: Option<String>,
        message: String,
    },
    #[error("configuration database locked: {message}")]
    Lock { message: String },
    #[error("commit failed: {message}")]
    Commit { message: String },
    #[error("archive not present on the device for upload")]
    MissingFile,
    #[error("the FTP server rejected the login")]
    FtpAuthFailed,
}

/// Operator hint printed alongside connect failures.
pub fn connect_guidance(err: &SessionError) -> Option<&'static str> {
    match err {
        SessionError::ConnectRefused { .. } => Some(
            "Check SSH settings, including acceptable ciphers, and that NETCONF over SSH is enabled",
        ),
        SessionError::ConnectTimeout { .. } => Some(
            "Check that the hostname or IP address is correct and that the firewall is responding",
        ),
        SessionError::AuthFailed { .. } => Some("Check the username and password"),
        SessionError::UnknownHost { .. } => Some("This host is unknown. Check your spelling"),
        _ => None,
    }
}

/// When a reboot should happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebootWhen {
    Now,
    /// At a wall-clock time, sent to Junos as `%y%m%d%H%M`.
    At(NaiveDateTime),
    /// In a number of minutes.
    In(u32),
}

impl RebootWhen {
    pub fn command(&self) -> String {
        match self {
            RebootWhen::Now => "request system reboot".to_string(),
            RebootWhen::At(time) => {
                format!("request system reboot at {}", time.format("%y%m%d%H%M"))
            }
            RebootWhen::In(minutes) => format!("request system reboot in {}", minutes),
        }
    }
}

/// Whether a config push commits or only validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitAction {
    Commit,
    Check,
}

/// Result of a config push: the candidate diff the load produced, if any.
#[derive(Debug, Clone)]
pub struct PushOutcome {
    pub diff: Option<String>,
}

/// A live session to one device. `run_cli` executes a single operational
/// command; `run_cli_script` feeds a command sequence to one CLI process so
/// that configure-mode state survives between commands.
pub trait DeviceSession {
    /// Hostname as configured on the device.
    fn hostname(&self) -> &str;

    fn run_cli(&mut self, command: &str, timeout: Duration) -> Result<String, SessionError>;

    fn run_cli_script(
        &mut self,
        commands: &[String],
        timeout: Duration,
    ) -> Result<String, SessionError>;

    fn reboot(&mut self, when: &RebootWhen) -> Result<String, SessionError> {
        let output = self.run_cli(&when.command(), DEFAULT_CLI_TIMEOUT)?;
        match classify::reboot_failure(&output) {
            Some(err) => Err(err),
            None => Ok(output.trim().to_string()),
        }
    }

    /// Restart a daemon, gracefully (SIGTERM) or immediately (SIGKILL).
    fn restart_daemon(
        &mut self,
        daemon: &str,
        immediately: bool,
    ) -> Result<String, SessionError> {
        let command = if immediately {
            format!("restart {} immediately", daemon)
        } else {
            format!("restart {}", daemon)
        };
        let output = self.run_cli(&command, DEFAULT_CLI_TIMEOUT)?;
        match classify::restart_failure(daemon, &output) {
            Some(err) => Err(err),
            None => Ok(output.trim().to_string()),
        }
    }

    /// The uncommitted candidate diff, if someone left one behind.
    fn candidate_diff(&mut self) -> Result<Option<String>, SessionError> {
        let commands = vec![
            "configure".to_string(),
            "show | compare".to_string(),
            "quit".to_string(),
        ];
        let output = self.run_cli_script(&commands, DEFAULT_CLI_TIMEOUT)?;
        if let Some(err) = classify::config_failure(&output) {
            return Err(err);
        }
        Ok(classify::extract_compare_block(&output))
    }

    /// Load configuration from `source_url` on the device side, report the
    /// resulting diff, and commit or commit-check it. The script always ends
    /// with `rollback 0`, so a failed load or commit never leaves a dirty
    /// candidate behind (after a successful commit it is a no-op).
    fn push_config(
        &mut self,
        source_url: &str,
        action: CommitAction,
    ) -> Result<PushOutcome, SessionError> {
        let mut commands = vec![
            "configure".to_string(),
            format!("load merge {}", source_url),
            "show | compare".to_string(),
        ];
        match action {
            CommitAction::Commit => commands.push("commit".to_string()),
            CommitAction::Check => commands.push("commit check".to_string()),
        }
        commands.push("rollback 0".to_string());
        commands.push("quit".to_string());

        let output = self.run_cli_script(&commands, CONFIG_TIMEOUT)?;
        if let Some(err) = classify::config_failure(&output) {
            return Err(err);
        }
        Ok(PushOutcome {
            diff: classify::extract_compare_block(&output),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted session double: pops one canned reply per call and records
    /// everything that was sent.
    pub struct ScriptedSession {
        pub hostname: String,
        pub replies: VecDeque<Result<String, SessionError>>,
        pub commands: Vec<String>,
    }

    impl ScriptedSession {
        pub fn new(hostname: &str, replies: Vec<Result<String, SessionError>>) -> Self {
            ScriptedSession {
                hostname: hostname.to_string(),
                replies: replies.into(),
                commands: Vec::new(),
            }
        }

        fn next_reply(&mut self) -> Result<String, SessionError> {
            self.replies
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    impl DeviceSession for ScriptedSession {
        fn hostname(&self) -> &str {
            &self.hostname
        }

        fn run_cli(&mut self, command: &str, _timeout: Duration) -> Result<String, SessionError> {
            self.commands.push(command.to_string());
            self.next_reply()
        }

        fn run_cli_script(
            &mut self,
            commands: &[String],
            _timeout: Duration,
        ) -> Result<String, SessionError> {
            self.commands.push(commands.join("; "));
            self.next_reply()
        }
    }
}
