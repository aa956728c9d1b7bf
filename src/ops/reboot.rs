// src/ops/reboot.rs

use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use tracing::info;

use crate::session::{DeviceSession, RebootWhen};

/// Request a reboot now, at a wall-clock time, or in a number of minutes.
/// Bad schedules are rejected before anything is sent to the device; `now`
/// is passed in so callers control the clock.
pub fn reboot(
    session: &mut dyn DeviceSession,
    when: RebootWhen,
    now: NaiveDateTime,
) -> Result<String> {
    match &when {
        RebootWhen::At(time) if *time <= now => {
            bail!("the requested reboot time {} is in the past", time)
        }
        RebootWhen::In(0) => {
            bail!("the reboot delay needs to be a positive number of minutes")
        }
        _ => {}
    }

    info!(host = session.hostname(), command = %when.command(), "requesting reboot");
    let message = session.reboot(&when)?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::ScriptedSession;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap()
    }

    #[test]
    fn past_times_are_rejected_before_connecting_matters() {
        let mut session = ScriptedSession::new("sw01", vec![]);
        let err = reboot(
            &mut session,
            RebootWhen::At(at(2023, 3, 24)),
            at(2023, 3, 25),
        )
        .unwrap_err();
        assert!(err.to_string().contains("in the past"));
        assert!(session.commands.is_empty());
    }

    #[test]
    fn zero_minute_delays_are_rejected() {
        let mut session = ScriptedSession::new("sw01", vec![]);
        assert!(reboot(&mut session, RebootWhen::In(0), at(2023, 3, 24)).is_err());
        assert!(session.commands.is_empty());
    }

    #[test]
    fn valid_requests_reach_the_device() {
        let mut session = ScriptedSession::new(
            "sw01",
            vec![Ok("Shutdown at Sat Mar 25 03:00:00 2023.".to_string())],
        );
        let message = reboot(
            &mut session,
            RebootWhen::At(at(2023, 3, 25)),
            at(2023, 3, 24),
        )
        .unwrap();
        assert!(message.contains("Shutdown"));
        assert_eq!(session.commands, vec!["request system reboot at 2303250300"]);
    }
}
