use super::flight_core::FlightCore;
use super::schedule::TickSchedule;
use crate::flight_control::{AscentSettings, ServiceError, TargetOrbit};
use crate::flight_recorder::EventLevel;
use crate::http_handler::common::SasMode;
use crate::{info, log, warn};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use strum_macros::Display;
use tokio_util::sync::CancellationToken;

/// How a launch sequence ended.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SequenceOutcome {
    OrbitReached,
    Cancelled,
    /// The game left the flight scene while a command had to be issued.
    NotInFlight,
}

/// Countdown, autopilot hand-off and orbit insertion of one launch.
pub struct LaunchSequence {
    core: Arc<FlightCore>,
    launch_date: DateTime<Utc>,
    target: TargetOrbit,
    poll_interval: Duration,
}

impl LaunchSequence {
    /// Seconds before launch from which the countdown is announced.
    pub const LAUNCH_WARNING_THRESHOLD: i64 = -5;
    const SAS_SETTLE_TIME: Duration = Duration::from_secs(2);

    pub fn new(core: Arc<FlightCore>, launch_date: DateTime<Utc>, target: TargetOrbit) -> Self {
        Self { core, launch_date, target, poll_interval: Duration::from_secs(1) }
    }

    #[cfg(test)]
    pub(crate) fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Event text for a countdown second, if that second is announced.
    pub fn countdown_message(launch_relative_time: i64) -> Option<String> {
        if (Self::LAUNCH_WARNING_THRESHOLD..=0).contains(&launch_relative_time) {
            Some(format!("Launch in T{launch_relative_time} seconds"))
        } else if launch_relative_time > 0 {
            Some(format!("Launch countdown complete: T+{launch_relative_time} seconds"))
        } else {
            None
        }
    }

    /// Runs the sequence until orbit, cancellation or an unrecoverable error.
    pub async fn run(self, token: CancellationToken) -> Result<SequenceOutcome, ServiceError> {
        info!("Launch sequence armed for {}", self.launch_date);
        self.core.arm(self.launch_date, self.target).await;

        tokio::select! {
            () = token.cancelled() => {
                warn!("Launch sequence cancelled");
                Ok(SequenceOutcome::Cancelled)
            }
            res = self.fly() => {
                if let Err(e) = &res {
                    self.core.record_event(&format!("Launch sequence aborted - {e}"), EventLevel::Error).await;
                }
                res
            }
        }
    }

    async fn fly(&self) -> Result<SequenceOutcome, ServiceError> {
        self.countdown().await;

        let settings = AscentSettings::for_target(&self.target);
        let configured = self
            .core
            .supervisor()
            .execute_with_reconnect(|svc| {
                let settings = settings.clone();
                async move { svc.configure_autopilot(&settings).await }
            })
            .await?;
        let Some(autopilot) = configured else {
            return Ok(self.not_in_flight().await);
        };
        log!(
            "Ascent autopilot engaged: orbit {} m, apoapsis {} m, inclination {} deg",
            autopilot.desired_orbit_altitude(),
            autopilot.desired_apoapsis(),
            autopilot.desired_inclination()
        );

        if self.stage().await?.is_none() {
            return Ok(self.not_in_flight().await);
        }
        self.core.record_event("Lift off", EventLevel::Important).await;

        let mut schedule = TickSchedule::starting_now(self.poll_interval);
        loop {
            let state = self
                .core
                .supervisor()
                .execute_with_reconnect(|svc| async move { svc.ascent_autopilot().await })
                .await?;
            match state {
                Some(autopilot) if autopilot.is_enabled() => schedule.wait().await,
                Some(_) => break,
                None => return Ok(self.not_in_flight().await),
            }
        }

        if self.stage().await?.is_none() {
            return Ok(self.not_in_flight().await);
        }
        tokio::time::sleep(Self::SAS_SETTLE_TIME).await;
        let sas = self
            .core
            .supervisor()
            .execute_with_reconnect(|svc| async move { svc.set_sas(true, SasMode::AntiRadial).await })
            .await?;
        if sas.is_none() {
            return Ok(self.not_in_flight().await);
        }
        self.core
            .record_event(
                "Launch successful - The rocket has reached the target orbit",
                EventLevel::Important,
            )
            .await;
        Ok(SequenceOutcome::OrbitReached)
    }

    /// Announces T-5 … T0 and returns on the first second after launch.
    async fn countdown(&self) {
        let mut schedule = TickSchedule::starting_now(self.poll_interval);
        loop {
            let t = self.core.launch_relative_time().await.unwrap_or(i64::MIN);
            if let Some(message) = Self::countdown_message(t) {
                self.core.record_event(&message, EventLevel::Normal).await;
            }
            if t > 0 {
                return;
            }
            schedule.wait().await;
        }
    }

    async fn stage(&self) -> Result<Option<()>, ServiceError> {
        self.core
            .supervisor()
            .execute_with_reconnect(|svc| async move { svc.activate_next_stage().await })
            .await
    }

    async fn not_in_flight(&self) -> SequenceOutcome {
        self.core
            .record_event("Launch sequence halted - vessel is not in flight", EventLevel::Error)
            .await;
        SequenceOutcome::NotInFlight
    }
}
