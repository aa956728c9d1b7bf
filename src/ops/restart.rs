// src/ops/restart.rs

use anyhow::Result;
use tracing::{info, warn};

use crate::session::{DeviceSession, SessionError};

/// What a daemon restart came back with.
#[derive(Debug)]
pub enum RestartOutcome {
    /// The device answered; the cleaned response text is included.
    Completed(String),
    /// The session dropped mid-restart. Normal when restarting the
    /// forwarding process, which cuts the management path out from under us.
    ExpectedDisconnect,
}

/// Restart a Junos daemon, gracefully (SIGTERM) or immediately (SIGKILL).
pub fn restart_process(
    session: &mut dyn DeviceSession,
    daemon: &str,
    immediately: bool,
) -> Result<RestartOutcome> {
    if daemon == "forwarding" {
        warn!("restarting the forwarding process drops access to the device temporarily (5+ minutes on small devices)");
    }
    info!(host = session.hostname(), daemon, immediately, "restarting");

    match session.restart_daemon(daemon, immediately) {
        Ok(output) => Ok(RestartOutcome::Completed(output)),
        Err(
            err @ (SessionError::Transport(_)
            | SessionError::Rpc(_)
            | SessionError::RpcTimeout(_)),
        ) if daemon == "forwarding" => {
            info!("disconnected while restarting forwarding; this is expected: {}", err);
            Ok(RestartOutcome::ExpectedDisconnect)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::ScriptedSession;
    use std::time::Duration;

    #[test]
    fn graceful_restart_returns_the_device_output() {
        let mut session = ScriptedSession::new(
            "sw01",
            vec![Ok("Firewall process started, pid 9001".to_string())],
        );
        match restart_process(&mut session, "firewall", false).unwrap() {
            RestartOutcome::Completed(output) => assert!(output.contains("pid 9001")),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(session.commands, vec!["restart firewall"]);
    }

    #[test]
    fn forwarding_disconnects_are_expected() {
        let mut session = ScriptedSession::new(
            "sw01",
            vec![Err(SessionError::RpcTimeout(Duration::from_secs(60)))],
        );
        match restart_process(&mut session, "forwarding", false).unwrap() {
            RestartOutcome::ExpectedDisconnect => {}
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn disconnects_on_other_daemons_still_fail() {
        let mut session = ScriptedSession::new(
            "sw01",
            vec![Err(SessionError::Transport("broken pipe".to_string()))],
        );
        assert!(restart_process(&mut session, "firewall", false).is_err());
    }

    #[test]
    fn missing_daemons_propagate_their_variant() {
        let mut session = ScriptedSession::new(
            "sw01",
            vec![Err(SessionError::SubsystemNotRunning {
                daemon: "idp-policy".to_string(),
            })],
        );
        let err = restart_process(&mut session, "idp-policy", true).unwrap_err();
        let session_err = err.downcast_ref::<SessionError>().unwrap();
        assert!(matches!(
            session_err,
            SessionError::SubsystemNotRunning { .. }
        ));
    }
}
