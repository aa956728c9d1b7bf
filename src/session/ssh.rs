// src/session/ssh.rs
//
// Concrete `DeviceSession` over the ssh2 crate. Junos runs the CLI as the
// login shell for operator accounts, so a single exec channel carries one
// CLI command and a shell channel fed over stdin carries a command script.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use ssh2::{ErrorCode, KeyboardInteractivePrompt, Prompt, Session};
use tracing::debug;

use super::{DeviceSession, SessionError, DEFAULT_CLI_TIMEOUT};
use crate::config::Credentials;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// libssh2's LIBSSH2_ERROR_TIMEOUT
const SSH_TIMEOUT_CODE: i32 = -9;

static HOSTNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Hostname:\s*(\S+)").expect("hostname regex should be valid"));

/// Keyboard-interactive handler that answers every prompt with the password.
struct PasswordPrompt {
    password: String,
}

impl KeyboardInteractivePrompt for PasswordPrompt {
    fn prompt<'a>(
        &mut self,
        _username: &str,
        _instructions: &str,
        prompts: &[Prompt<'a>],
    ) -> Vec<String> {
        prompts.iter().map(|_| self.password.clone()).collect()
    }
}

pub struct SshSession {
    session: Session,
    host: String,
    hostname: String,
}

impl SshSession {
    /// Connect and authenticate, then learn the device's configured
    /// hostname from `show version`.
    pub fn connect(
        host: &str,
        port: u16,
        credentials: &Credentials,
    ) -> Result<Self, SessionError> {
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|_| SessionError::UnknownHost {
                host: host.to_string(),
            })?
            .next()
            .ok_or_else(|| SessionError::UnknownHost {
                host: host.to_string(),
            })?;

        let tcp = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(|err| {
            match err.kind() {
                io::ErrorKind::ConnectionRefused => SessionError::ConnectRefused {
                    host: host.to_string(),
                },
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                    SessionError::ConnectTimeout {
                        host: host.to_string(),
                    }
                }
                _ => SessionError::Transport(err.to_string()),
            }
        })?;

        let mut session =
            Session::new().map_err(|err| SessionError::Transport(err.to_string()))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(CONNECT_TIMEOUT.as_millis() as u32);
        session
            .handshake()
            .map_err(|err| SessionError::Transport(err.to_string()))?;

        let password_auth =
            session.userauth_password(&credentials.username, &credentials.password);
        if password_auth.is_err() || !session.authenticated() {
            // Some platforms only offer keyboard-interactive.
            let mut prompter = PasswordPrompt {
                password: credentials.password.clone(),
            };
            let _ = session.userauth_keyboard_interactive(&credentials.username, &mut prompter);
        }
        if !session.authenticated() {
            return Err(SessionError::AuthFailed {
                host: host.to_string(),
                user: credentials.username.clone(),
            });
        }
        debug!(host, "authenticated");

        let mut connected = SshSession {
            session,
            host: host.to_string(),
            hostname: host.to_string(),
        };
        let version = connected.run_cli("show version", DEFAULT_CLI_TIMEOUT)?;
        if let Some(captures) = HOSTNAME_RE.captures(&version) {
            connected.hostname = captures[1].to_string();
        }
        Ok(connected)
    }

    fn map_ssh_error(&self, err: ssh2::Error, timeout: Duration) -> SessionError {
        match err.code() {
            ErrorCode::Session(SSH_TIMEOUT_CODE) => SessionError::RpcTimeout(timeout),
            _ => SessionError::Transport(err.to_string()),
        }
    }

    fn map_io_error(&self, err: io::Error, timeout: Duration) -> SessionError {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                SessionError::RpcTimeout(timeout)
            }
            _ => SessionError::Transport(err.to_string()),
        }
    }
}

impl DeviceSession for SshSession {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn run_cli(&mut self, command: &str, timeout: Duration) -> Result<String, SessionError> {
        self.session.set_timeout(timeout.as_millis() as u32);
        let mut channel = self
            .session
            .channel_session()
            .map_err(|err| self.map_ssh_error(err, timeout))?;
        channel
            .exec(command)
            .map_err(|err| self.map_ssh_error(err, timeout))?;

        let mut output = String::new();
        channel
            .read_to_string(&mut output)
            .map_err(|err| self.map_io_error(err, timeout))?;
        let mut stderr = String::new();
        let _ = channel.stderr().read_to_string(&mut stderr);
        let _ = channel.wait_close();
        if !stderr.trim().is_empty() {
            output.push('\n');
            output.push_str(&stderr);
        }
        debug!(host = %self.host, command, "cli command finished");
        Ok(clean_output(command, &output))
    }

    fn run_cli_script(
        &mut self,
        commands: &[String],
        timeout: Duration,
    ) -> Result<String, SessionError> {
        self.session.set_timeout(timeout.as_millis() as u32);
        let mut channel = self
            .session
            .channel_session()
            .map_err(|err| self.map_ssh_error(err, timeout))?;
        channel
            .shell()
            .map_err(|err| self.map_ssh_error(err, timeout))?;

        let mut script = commands.join("\n");
        script.push_str("\nexit\n");
        channel
            .write_all(script.as_bytes())
            .map_err(|err| self.map_io_error(err, timeout))?;
        channel
            .send_eof()
            .map_err(|err| self.map_ssh_error(err, timeout))?;

        let mut output = String::new();
        channel
            .read_to_string(&mut output)
            .map_err(|err| self.map_io_error(err, timeout))?;
        let _ = channel.wait_close();
        debug!(host = %self.host, steps = commands.len(), "cli script finished");

        let mut cleaned = output;
        for command in commands {
            cleaned = clean_output(command, &cleaned);
        }
        Ok(cleaned)
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        let _ = self
            .session
            .disconnect(None, "closing session", None);
    }
}

/// The CLI echoes the command back and pads responses with `\r\r\n` runs;
/// strip both before anyone looks at the output.
pub(crate) fn clean_output(command: &str, raw: &str) -> String {
    raw.replace(command, "").replace("\r\r\n", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoed_commands_and_padding_are_stripped() {
        let raw = "show version\r\r\nHostname: fw01\r\r\nModel: srx340\n";
        assert_eq!(
            clean_output("show version", raw),
            "Hostname: fw01Model: srx340\n"
        );
    }

    #[test]
    fn hostname_is_parsed_from_show_version() {
        let output = "Hostname: win-net-sw01\nModel: ex4300-48t\nJunos: 21.4R3.15\n";
        let captures = HOSTNAME_RE.captures(output).unwrap();
        assert_eq!(&captures[1], "win-net-sw01");
    }
}
