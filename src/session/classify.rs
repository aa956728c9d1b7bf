// src/session/classify.rs
//
// Junos reports failures as free text on the CLI. Everything that inspects
// that text lives here, behind functions returning `SessionError` variants;
// message formats changing only ever breaks this one file.

use super::SessionError;

/// First line of the output that mentions an error, for variant payloads.
fn error_line(output: &str) -> String {
    output
        .lines()
        .find(|line| line.to_lowercase().contains("error"))
        .unwrap_or_else(|| output.trim())
        .trim()
        .to_string()
}

pub(crate) fn reboot_failure(output: &str) -> Option<SessionError> {
    if output.contains("another shutdown is running") {
        return Some(SessionError::ShutdownInProgress);
    }
    if output.contains("error:") {
        return Some(SessionError::Rpc(error_line(output)));
    }
    None
}

pub(crate) fn restart_failure(daemon: &str, output: &str) -> Option<SessionError> {
    if output.contains("subsystem not running") {
        return Some(SessionError::SubsystemNotRunning {
            daemon: daemon.to_string(),
        });
    }
    if output.contains("invalid daemon") {
        return Some(SessionError::InvalidDaemon {
            daemon: daemon.to_string(),
        });
    }
    if output.contains("error:") {
        return Some(SessionError::Rpc(error_line(output)));
    }
    None
}

pub(crate) fn config_failure(output: &str) -> Option<SessionError> {
    if output.contains("database locked") || output.contains("exclusive lock") {
        return Some(SessionError::Lock {
            message: error_line(output),
        });
    }
    if output.contains("syntax error") || output.contains("unknown command") {
        let message = error_line(output);
        // Junos names the offending element after the final colon.
        let bad_element = message
            .rsplit_once(": ")
            .map(|(_, element)| element.trim().to_string())
            .filter(|element| !element.is_empty());
        return Some(SessionError::ConfigLoad {
            bad_element,
            message,
        });
    }
    if output.contains("commit failed") || output.contains("check-out failed") {
        return Some(SessionError::Commit {
            message: error_line(output),
        });
    }
    if output.contains("error:") {
        return Some(SessionError::Rpc(error_line(output)));
    }
    None
}

pub(crate) fn file_copy_failure(output: &str) -> Option<SessionError> {
    if output.contains("could not fetch local copy of file") {
        return Some(SessionError::MissingFile);
    }
    if output.contains("Not logged in") {
        return Some(SessionError::FtpAuthFailed);
    }
    if output.contains("error:") {
        return Some(SessionError::Shell(error_line(output)));
    }
    None
}

/// Pull the `show | compare` block out of a config script's output: the
/// lines from the first `[edit` marker up to the next command's chatter.
/// No `[edit` marker means the candidate matches the active config.
pub(crate) fn extract_compare_block(output: &str) -> Option<String> {
    let mut in_block = false;
    let mut lines = Vec::new();

    for line in output.lines() {
        let trimmed = line.trim_end();
        let head = trimmed.trim_start();
        if !in_block {
            if head.starts_with("[edit") {
                in_block = true;
                lines.push(trimmed.to_string());
            }
            continue;
        }
        if head.starts_with("commit ")
            || head == "commit"
            || head.starts_with("configuration check")
            || head.starts_with("load complete")
            || head.starts_with("error:")
            || head.starts_with("warning:")
        {
            break;
        }
        lines.push(trimmed.to_string());
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reboot_conflicts_and_generic_errors() {
        assert!(matches!(
            reboot_failure("error: another shutdown is running"),
            Some(SessionError::ShutdownInProgress)
        ));
        assert!(matches!(
            reboot_failure("error: unexpected failure"),
            Some(SessionError::Rpc(_))
        ));
        assert!(reboot_failure("Shutdown at Fri Mar 24 03:00:00 2023.").is_none());
    }

    #[test]
    fn restart_failures_name_the_daemon() {
        match restart_failure("idp-policy", "error: subsystem not running") {
            Some(SessionError::SubsystemNotRunning { daemon }) => {
                assert_eq!(daemon, "idp-policy")
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            restart_failure("frwrd", "error: invalid daemon: frwrd"),
            Some(SessionError::InvalidDaemon { .. })
        ));
    }

    #[test]
    fn config_failures_are_ranked() {
        assert!(matches!(
            config_failure("error: configuration database locked by user bob"),
            Some(SessionError::Lock { .. })
        ));
        match config_failure("error: syntax error: wbe-filtering") {
            Some(SessionError::ConfigLoad { bad_element, .. }) => {
                assert_eq!(bad_element.as_deref(), Some("wbe-filtering"))
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(
            config_failure("error: commit failed: (statements constraint check failed)"),
            Some(SessionError::Commit { .. })
        ));
        assert!(config_failure("commit complete").is_none());
    }

    #[test]
    fn file_copy_failures_become_variants() {
        assert!(matches!(
            file_copy_failure("could not fetch local copy of file /var/tmp/Support-x.tgz"),
            Some(SessionError::MissingFile)
        ));
        assert!(matches!(
            file_copy_failure("530 Not logged in"),
            Some(SessionError::FtpAuthFailed)
        ));
        assert!(file_copy_failure("copied 1 file").is_none());
    }

    #[test]
    fn compare_block_extraction() {
        let output = "\
load complete
[edit security]
+  utm { }
[edit system]
-  host-name old;
commit check succeeds";
        assert_eq!(
            extract_compare_block(output).unwrap(),
            "[edit security]\n+  utm { }\n[edit system]\n-  host-name old;"
        );
        assert!(extract_compare_block("commit complete").is_none());
    }
}
