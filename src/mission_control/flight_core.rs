use crate::flight_control::{
    MilestoneTracker, ServiceError, Supervisor, TargetOrbit, TelemetryAggregator,
    TelemetrySnapshot, UnitKind, UnitRegistry, UnitStateMachine, UnitStatus, VehicleSchema,
    VesselFrame,
};
use crate::flight_recorder::{EventLevel, EventLog, EventRecord, FlightSample};
use crate::{error, event, flight, info, warn};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// What a subscriber receives once per second.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    pub time: DateTime<Utc>,
    pub launch_relative_time: Option<i64>,
    pub connected: bool,
    pub event_records: Vec<EventRecord>,
    pub flight_records: Vec<Value>,
    pub rocket_status: Value,
    pub vessel_telemetry: Value,
}

/// Result of one recording tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not in flight; nothing was recorded.
    Skipped,
    Recorded { events: usize },
}

/// Mutable vehicle state, advanced only by [`FlightCore::tick`] and the
/// launch sequence.
struct FlightState {
    registry: UnitRegistry,
    frame: Option<VesselFrame>,
    milestones: MilestoneTracker,
    launch_date: Option<DateTime<Utc>>,
    duplicates_reported: bool,
}

impl FlightState {
    fn launch_relative_time(&self, now: DateTime<Utc>) -> Option<i64> {
        self.launch_date.map(|date| launch_relative_seconds(now, date))
    }

    fn sample(&self, now: DateTime<Utc>) -> FlightSample {
        let lrt = self.launch_relative_time(now);
        match &self.frame {
            Some(frame) => FlightSample::capture(now, lrt, &frame.flight, &frame.orbit),
            None => FlightSample::bare(now, lrt),
        }
    }
}

/// Whole seconds between `launch_date` and `now`, rounded towards negative infinity.
pub fn launch_relative_seconds(now: DateTime<Utc>, launch_date: DateTime<Utc>) -> i64 {
    let millis = (now - launch_date).num_milliseconds();
    millis.div_euclid(1000)
}

/// The one vehicle everybody looks at: unit lifecycle, last captured frame and
/// the flight log, shared by all subscriber sessions.
pub struct FlightCore {
    supervisor: Arc<Supervisor>,
    recorder: Arc<EventLog>,
    aggregator: TelemetryAggregator,
    state: RwLock<FlightState>,
    recording_lease: Arc<Mutex<()>>,
    sequence_lease: Arc<Mutex<()>>,
    connection_lost: AtomicBool,
}

impl FlightCore {
    /// Number of flight samples included in a telemetry frame.
    pub const FLIGHT_RECORD_TAIL: usize = 100;

    pub fn new(
        supervisor: Arc<Supervisor>,
        recorder: Arc<EventLog>,
        schema: Arc<VehicleSchema>,
        max_q_altitude: f64,
    ) -> Self {
        let registry = UnitRegistry::initialize(schema.units());
        Self {
            supervisor,
            recorder,
            aggregator: TelemetryAggregator::new(schema),
            state: RwLock::new(FlightState {
                registry,
                frame: None,
                milestones: MilestoneTracker::new(max_q_altitude),
                launch_date: None,
                duplicates_reported: false,
            }),
            recording_lease: Arc::new(Mutex::new(())),
            sequence_lease: Arc::new(Mutex::new(())),
            connection_lost: AtomicBool::new(false),
        }
    }

    pub fn supervisor(&self) -> &Arc<Supervisor> { &self.supervisor }

    pub fn recorder(&self) -> &Arc<EventLog> { &self.recorder }

    /// Waits until this caller is the one session that records ticks.
    pub async fn recording_lease(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.recording_lease).lock_owned().await
    }

    /// Lease for running a launch sequence; `None` while one is running.
    pub fn try_sequence_lease(&self) -> Option<OwnedMutexGuard<()>> {
        Arc::clone(&self.sequence_lease).try_lock_owned().ok()
    }

    /// Set when a tick gave up on the connection, cleared by the next good tick.
    pub fn connection_lost(&self) -> bool { self.connection_lost.load(Ordering::Acquire) }

    /// One recording tick: fetch, refresh, observe, milestones, then persist
    /// the events followed by the sample.
    pub async fn tick(&self) -> Result<TickOutcome, ServiceError> {
        let fetched = self
            .supervisor
            .execute_with_reconnect(|svc| async move { VesselFrame::fetch(svc.as_ref()).await })
            .await;
        let frame = match fetched {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(TickOutcome::Skipped),
            Err(e) => {
                if matches!(e, ServiceError::ConnectionExhausted) {
                    self.connection_lost.store(true, Ordering::Release);
                }
                return Err(e);
            }
        };
        self.connection_lost.store(false, Ordering::Release);

        let now = Utc::now();
        let (records, sample) = {
            let mut state = self.state.write().await;
            if !state.duplicates_reported {
                let duplicates = UnitRegistry::duplicate_tags(&frame.parts);
                if !duplicates.is_empty() {
                    warn!("Parts share tags {duplicates:?}; the first match is used");
                }
                state.duplicates_reported = true;
            }
            state.registry.refresh_all(&frame.parts);
            let unit_events = UnitStateMachine::observe(&mut state.registry);
            let milestones = state.milestones.check(&frame.flight, &frame.orbit);
            state.frame = Some(frame);
            let sample = state.sample(now);

            let records: Vec<EventRecord> = unit_events
                .into_iter()
                .map(|e| (e.text, e.level))
                .chain(milestones.into_iter().map(|m| (m.text, m.level)))
                .map(|(text, level)| EventRecord::new(text, level, sample.clone()))
                .collect();
            (records, sample)
        };

        for record in &records {
            flight!("{} [{}]", record.event, record.event_level);
        }
        if let Err(e) = self.recorder.append_all(&records).await {
            error!("Could not persist {} events: {e}", records.len());
        }
        if let Err(e) = self.recorder.append(&sample).await {
            error!("Could not persist flight sample: {e}");
        }
        event!("Tick recorded with {} events", records.len());
        Ok(TickOutcome::Recorded { events: records.len() })
    }

    /// Appends a free-form event with the sample of the last captured frame.
    pub async fn record_event(&self, text: &str, level: EventLevel) {
        let sample = self.state.read().await.sample(Utc::now());
        flight!("{text} [{level}]");
        if let Err(e) = self.recorder.append(&EventRecord::new(text, level, sample)).await {
            error!("Could not persist event '{text}': {e}");
        }
    }

    /// Arms every unit and the milestones for a launch at `launch_date`.
    pub async fn arm(&self, launch_date: DateTime<Utc>, target: TargetOrbit) {
        let mut state = self.state.write().await;
        state.registry.set_all_status(UnitStatus::Go);
        let engines = state
            .registry
            .units_of_kind(UnitKind::Engine)
            .filter(|u| u.status() == UnitStatus::Go)
            .count();
        info!("Armed {} units with {engines} engines ready", state.registry.units().len());
        state.milestones.arm(target);
        state.launch_date = Some(launch_date);
    }

    pub async fn launch_relative_time(&self) -> Option<i64> {
        self.state.read().await.launch_relative_time(Utc::now())
    }

    pub async fn unit_status(&self) -> Vec<(String, UnitStatus)> {
        let state = self.state.read().await;
        state.registry.all_status().into_iter().map(|(n, s)| (n.to_string(), s)).collect()
    }

    /// Snapshot of the state captured by the last tick. Performs no I/O.
    pub async fn snapshot(&self) -> TelemetrySnapshot {
        let state = self.state.read().await;
        let empty = VesselFrame::default();
        let frame = state.frame.as_ref().unwrap_or(&empty);
        self.aggregator.snapshot(&state.registry, frame)
    }

    /// Full telemetry frame including the recorded events and the sample tail.
    pub async fn telemetry_frame(&self) -> TelemetryFrame {
        let snapshot = self.snapshot().await;
        let event_records = self.recorder.read_events().await.unwrap_or_else(|e| {
            error!("Could not read events: {e}");
            Vec::new()
        });
        let flight_records =
            self.recorder.tail(Self::FLIGHT_RECORD_TAIL).await.unwrap_or_else(|e| {
                error!("Could not read flight records: {e}");
                Vec::new()
            });
        TelemetryFrame {
            time: Utc::now(),
            launch_relative_time: self.launch_relative_time().await,
            connected: self.supervisor.is_connected(),
            event_records,
            flight_records,
            rocket_status: snapshot.rocket_status,
            vessel_telemetry: snapshot.vessel_telemetry,
        }
    }
}
