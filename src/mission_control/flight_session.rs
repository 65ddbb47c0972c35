use super::flight_core::{FlightCore, TickOutcome};
use super::launch_command::LaunchCommand;
use super::launch_sequence::LaunchSequence;
use super::schedule::TickSchedule;
use super::signal::{CloseCode, SessionExit};
use crate::console_communication::{ConsoleMessenger, DownstreamMessage, read_frame};
use crate::flight_control::ServiceError;
use crate::{error, info, log, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

/// One subscriber connection.
///
/// Telemetry push, command intake and recording run as one task group: the
/// first to finish decides the close code and cancels the others. A running
/// launch sequence is bound to the same token.
pub struct FlightSession {
    core: Arc<FlightCore>,
    interval: Duration,
}

impl FlightSession {
    pub fn new(core: Arc<FlightCore>, interval: Duration) -> Self { Self { core, interval } }

    pub async fn run(self, socket: TcpStream, token: CancellationToken) {
        let peer = socket.peer_addr().map_or_else(|_| "unknown".to_string(), |a| a.to_string());
        let (mut reader, writer) = socket.into_split();
        let messenger = ConsoleMessenger::new(writer);

        let exit = tokio::select! {
            exit = self.push_telemetry(&messenger) => exit,
            exit = self.take_commands(&mut reader, &token) => exit,
            exit = self.record() => exit,
            () = token.cancelled() => SessionExit::Close(CloseCode::Normal),
        };
        token.cancel();

        match exit {
            SessionExit::Close(code) => {
                if let Err(e) = messenger.close(code).await {
                    warn!("Could not send close frame to {peer}: {e}");
                }
                log!("Session with {peer} closed with {}", code.code());
            }
            SessionExit::SubscriberGone => log!("Subscriber {peer} went away"),
        }
    }

    /// Sends a frame every interval. Frames are built from the last captured
    /// state, so during a reconnect the subscriber keeps seeing the last known
    /// values with `connected` false.
    async fn push_telemetry(&self, messenger: &ConsoleMessenger) -> SessionExit {
        let mut schedule = TickSchedule::starting_now(self.interval);
        loop {
            if self.core.connection_lost() && !self.core.supervisor().is_connected() {
                return SessionExit::Close(CloseCode::InternalError);
            }
            let frame = self.core.telemetry_frame().await;
            if let Err(e) = messenger.send(&DownstreamMessage::Telemetry(Box::new(frame))).await {
                log!("Telemetry push stopped: {e}");
                return SessionExit::SubscriberGone;
            }
            schedule.wait().await;
        }
    }

    async fn take_commands<R: AsyncRead + Unpin>(
        &self,
        reader: &mut R,
        token: &CancellationToken,
    ) -> SessionExit {
        loop {
            let raw = match read_frame(reader).await {
                Ok(raw) => raw,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    warn!("Rejecting inbound frame: {e}");
                    return SessionExit::Close(CloseCode::MalformedMessage);
                }
                Err(_) => return SessionExit::SubscriberGone,
            };
            match LaunchCommand::decode(&raw) {
                Ok(LaunchCommand::Disconnect) => {
                    info!("Disconnect requested by subscriber");
                    return SessionExit::Close(CloseCode::Normal);
                }
                Ok(LaunchCommand::Sequence { launch_date, target_orbit }) => {
                    let Some(lease) = self.core.try_sequence_lease() else {
                        warn!("Launch sequence already running, ignoring sequence command");
                        continue;
                    };
                    info!("Received sequence command for {launch_date}");
                    let sequence =
                        LaunchSequence::new(Arc::clone(&self.core), launch_date, target_orbit);
                    let seq_token = token.child_token();
                    tokio::spawn(async move {
                        let _lease = lease;
                        match sequence.run(seq_token).await {
                            Ok(outcome) => info!("Launch sequence ended: {outcome}"),
                            Err(e) => error!("Launch sequence failed: {e}"),
                        }
                    });
                }
                Err(code) => {
                    warn!("Closing session: {}", code.reason());
                    return SessionExit::Close(code);
                }
            }
        }
    }

    /// Drift-corrected recording loop. Only the session holding the recording
    /// lease ticks; the others wait for it.
    async fn record(&self) -> SessionExit {
        let _lease = self.core.recording_lease().await;
        log!("Session took over flight recording");
        let mut schedule = TickSchedule::starting_now(self.interval);
        loop {
            match self.core.tick().await {
                Ok(TickOutcome::Recorded { .. } | TickOutcome::Skipped) => {}
                Err(ServiceError::ConnectionExhausted) => {
                    error!("Vehicle-control service unreachable, ending session");
                    return SessionExit::Close(CloseCode::InternalError);
                }
                Err(e) => error!("Tick failed: {e}"),
            }
            schedule.wait().await;
        }
    }
}
