use super::{
    AscentSettings, Connector, FlightDynamics, G0, GameScene, MilestoneTracker, RetryPolicy,
    ServiceError, StageDescriptor, Supervisor, TargetOrbit, TelemetryAggregator, UnitDescriptor,
    UnitKind, UnitRegistry, UnitStateMachine, UnitStatus, VehicleSchema, VesselFrame,
    VesselService, round_recursive,
};
use crate::flight_recorder::EventLevel;
use crate::http_handler::common::SasMode;
use crate::http_handler::http_response::{
    ascent_autopilot::AscentAutopilotResponse, flight::FlightInfo, orbit::OrbitInfo, parts::Part,
    vessel::VesselInfo,
};
use crate::info;
use async_trait::async_trait;
use rand::Rng;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared state behind every handle the mock connector opens.
pub(crate) struct MockBridge {
    pub available: AtomicBool,
    pub alive: AtomicBool,
    pub in_flight: AtomicBool,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    /// Number of upcoming `parts` calls that fail with a transient error.
    pub failing_calls: AtomicUsize,
    pub parts_calls: AtomicUsize,
    /// Number of upcoming autopilot polls that still report `enabled`.
    pub autopilot_polls: AtomicUsize,
    pub staged: AtomicUsize,
    pub parts: Mutex<Vec<Part>>,
    pub sas: Mutex<Option<SasMode>>,
    pub configured: Mutex<Option<AscentSettings>>,
}

impl MockBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            available: AtomicBool::new(true),
            alive: AtomicBool::new(true),
            in_flight: AtomicBool::new(true),
            opened: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
            failing_calls: AtomicUsize::new(0),
            parts_calls: AtomicUsize::new(0),
            autopilot_polls: AtomicUsize::new(0),
            staged: AtomicUsize::new(0),
            parts: Mutex::new(Vec::new()),
            sas: Mutex::new(None),
            configured: Mutex::new(None),
        })
    }

    pub fn open_handles(&self) -> usize {
        self.opened.load(Ordering::SeqCst) - self.closed.load(Ordering::SeqCst)
    }

    pub fn set_parts(&self, parts: Vec<Part>) { *self.parts.lock().unwrap() = parts; }
}

pub(crate) struct MockConnector(pub Arc<MockBridge>);

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, _name: &str) -> Result<Arc<dyn VesselService>, ServiceError> {
        tokio::task::yield_now().await;
        if !self.0.available.load(Ordering::SeqCst) {
            return Err(ServiceError::NotConnected);
        }
        self.0.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockVessel(Arc::clone(&self.0))))
    }
}

struct MockVessel(Arc<MockBridge>);

impl MockVessel {
    fn check_alive(&self) -> Result<(), ServiceError> {
        if self.0.alive.load(Ordering::SeqCst) { Ok(()) } else { Err(ServiceError::NotConnected) }
    }
}

#[async_trait]
impl VesselService for MockVessel {
    async fn scene(&self) -> Result<GameScene, ServiceError> {
        self.check_alive()?;
        if self.0.in_flight.load(Ordering::SeqCst) {
            Ok(GameScene::Flight)
        } else {
            Ok(GameScene::SpaceCenter)
        }
    }

    async fn parts(&self) -> Result<Vec<Part>, ServiceError> {
        self.check_alive()?;
        self.0.parts_calls.fetch_add(1, Ordering::SeqCst);
        let failing =
            self.0.failing_calls.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if failing.is_ok() {
            return Err(ServiceError::NotConnected);
        }
        Ok(self.0.parts.lock().unwrap().clone())
    }

    async fn flight(&self) -> Result<FlightInfo, ServiceError> {
        self.check_alive()?;
        Ok(serde_json::from_value(json!({"mean_altitude": 120.0, "surface_altitude": 80.0})).unwrap())
    }

    async fn orbit(&self) -> Result<OrbitInfo, ServiceError> {
        self.check_alive()?;
        Ok(OrbitInfo::default())
    }

    async fn vessel(&self) -> Result<VesselInfo, ServiceError> {
        self.check_alive()?;
        Ok(serde_json::from_value(json!({"name": "Mock", "mass": 9000.0})).unwrap())
    }

    async fn ascent_autopilot(&self) -> Result<AscentAutopilotResponse, ServiceError> {
        self.check_alive()?;
        let enabled = self
            .0
            .autopilot_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        Ok(serde_json::from_value(json!({ "enabled": enabled })).unwrap())
    }

    async fn configure_autopilot(
        &self,
        settings: &AscentSettings,
    ) -> Result<AscentAutopilotResponse, ServiceError> {
        self.check_alive()?;
        *self.0.configured.lock().unwrap() = Some(settings.clone());
        Ok(serde_json::from_value(json!({
            "enabled": settings.enabled,
            "desired_orbit_altitude": settings.desired_orbit_altitude,
            "desired_inclination": settings.desired_inclination,
            "desired_apoapsis": settings.desired_apoapsis,
        }))
        .unwrap())
    }

    async fn activate_next_stage(&self) -> Result<(), ServiceError> {
        self.check_alive()?;
        self.0.staged.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_sas(&self, enabled: bool, mode: SasMode) -> Result<(), ServiceError> {
        self.check_alive()?;
        if enabled {
            *self.0.sas.lock().unwrap() = Some(mode);
        }
        Ok(())
    }

    async fn close(&self) -> Result<(), ServiceError> {
        self.0.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub(crate) fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        attempts: 1,
        interval: Duration::ZERO,
        liveness_interval: Duration::from_millis(10),
        max_in_flight: 2,
    }
}

pub(crate) fn mock_supervisor(bridge: &Arc<MockBridge>) -> Arc<Supervisor> {
    let connector: Arc<dyn Connector> = Arc::new(MockConnector(Arc::clone(bridge)));
    Arc::new(Supervisor::new(connector, "TestConnection", fast_policy()))
}

pub(crate) fn engine_part(tag: &str, mass: f64, active: bool, fuel: f64, isp: f64) -> Part {
    serde_json::from_value(json!({
        "tag": tag,
        "mass": mass,
        "temperature": 350.0,
        "max_temperature": 2000.0,
        "engine": {
            "active": active,
            "thrust": 200_000.0,
            "available_thrust": 215_000.0,
            "max_thrust": 215_000.0,
            "specific_impulse": isp,
            "vacuum_specific_impulse": isp + 20.0,
            "propellant_mass": fuel,
        }
    }))
    .unwrap()
}

pub(crate) fn plain_part(tag: &str, mass: f64) -> Part {
    serde_json::from_value(json!({"tag": tag, "mass": mass, "temperature": 290.0})).unwrap()
}

fn descriptor(name: &str, group: &str, kind: UnitKind) -> UnitDescriptor {
    UnitDescriptor::new(name, group, name, kind, UnitStatus::Wait)
}

/// Two stages below a small payload.
pub(crate) fn two_stage_schema() -> VehicleSchema {
    VehicleSchema::new(
        vec![
            descriptor("main_engine", "first_stage", UnitKind::Engine),
            descriptor("main_tank", "first_stage", UnitKind::Tank),
            descriptor("second_engine", "second_stage", UnitKind::Engine),
            descriptor("second_tank", "second_stage", UnitKind::Tank),
            descriptor("fairing", "payload_stage", UnitKind::Fairing),
            descriptor("solar_panel", "payload_stage", UnitKind::SolarPanel),
            descriptor("satellite_bus", "payload_stage", UnitKind::SatelliteBus),
        ],
        vec![
            StageDescriptor::new("second_stage", "second_engine"),
            StageDescriptor::new("first_stage", "main_engine"),
        ],
        "payload_stage",
        VehicleSchema::DEFAULT_REFERENCE_AREA,
    )
}

/// Payload 1000 kg, upper stage 3000 kg, lower stage 5000 kg.
pub(crate) fn two_stage_parts() -> Vec<Part> {
    vec![
        engine_part("main_engine", 1500.0, false, 3000.0, 280.0),
        plain_part("main_tank", 3500.0),
        engine_part("second_engine", 1000.0, false, 800.0, 300.0),
        plain_part("second_tank", 2000.0),
        plain_part("fairing", 200.0),
        plain_part("solar_panel", 100.0),
        plain_part("satellite_bus", 700.0),
    ]
}

fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-6 }

#[test]
fn test_delta_v_guards() {
    assert!(approx(FlightDynamics::delta_v(300.0, 1000.0, 5000.0), 300.0 * G0 * 1.25f64.ln()));
    assert!((FlightDynamics::delta_v(300.0, 1000.0, 5000.0) - 656.3).abs() < 0.5);
    assert_eq!(FlightDynamics::delta_v(300.0, 1000.0, 0.0), 0.0);
    assert_eq!(FlightDynamics::delta_v(0.0, 1000.0, 5000.0), 0.0);
    assert_eq!(FlightDynamics::delta_v(300.0, 0.0, 5000.0), 0.0);
    assert_eq!(FlightDynamics::delta_v(300.0, 5000.0, 5000.0), 0.0);
    assert_eq!(FlightDynamics::delta_v(300.0, f64::NAN, 5000.0), 0.0);
    assert_eq!(FlightDynamics::burn_time(300.0, 1000.0, 0.0), 0.0);
    assert!(approx(FlightDynamics::burn_time(300.0, 1000.0, 300.0 * G0), 1000.0));
    assert_eq!(FlightDynamics::thrust_to_weight(1000.0, 0.0), 0.0);
    assert!(approx(FlightDynamics::thrust_to_weight(2.0 * G0 * 100.0, 100.0), 2.0));
}

#[test]
fn test_drag_acceleration() {
    let dynamics = FlightDynamics::new(2.0);
    assert!(approx(dynamics.drag_force(1.2, 10.0, 0.5), 60.0));
    assert!(approx(dynamics.drag_acceleration(1.2, 10.0, 0.5, 30.0), 2.0));
    assert_eq!(dynamics.drag_acceleration(1.2, 10.0, 0.5, 0.0), 0.0);
}

#[test]
fn test_schema_rejects_unknown_stage_engine() {
    let raw = r#"{
        "rocket_schemas": [
            {"unit_name": "main_tank", "group_name": "first_stage", "tag": "main_tank", "part_type": "tank"}
        ],
        "stages": [{"group_name": "first_stage", "engine": "main_tank"}]
    }"#;
    assert!(VehicleSchema::from_json(raw).is_err());
}

#[test]
fn test_schema_defaults_and_unknown_kinds() {
    let raw = r#"{
        "rocket_schemas": [
            {"unit_name": "main_engine", "group_name": "first_stage", "tag": "main_engine", "part_type": "engine", "status": 0},
            {"unit_name": "docking_port", "group_name": "payload_stage", "tag": "dock", "part_type": "docking_port"}
        ]
    }"#;
    let schema = VehicleSchema::from_json(raw).unwrap();
    assert_eq!(schema.payload_group(), "payload_stage");
    assert!(approx(schema.reference_area(), VehicleSchema::DEFAULT_REFERENCE_AREA));
    assert_eq!(schema.units()[1].kind(), UnitKind::Generic);
    assert_eq!(schema.units()[1].initial_status(), UnitStatus::Wait);
    assert_eq!(schema.groups(), vec!["first_stage", "payload_stage"]);
}

#[test]
fn test_registry_resolution_and_mass() {
    let schema = two_stage_schema();
    let mut registry = UnitRegistry::initialize(schema.units());
    let mut parts = two_stage_parts();
    parts.push(plain_part("main_tank", 1.0));
    registry.refresh_all(&parts);

    assert!(approx(registry.unit_by_name("main_tank").unwrap().mass(), 3500.0));
    assert!(approx(registry.total_mass("first_stage"), 5000.0));
    assert!(approx(registry.total_mass("payload_stage"), 1000.0));
    assert_eq!(UnitRegistry::duplicate_tags(&parts), vec!["main_tank".to_string()]);
    let engines: Vec<_> = registry.units_of_kind(UnitKind::Engine).map(|u| u.name()).collect();
    assert_eq!(engines, vec!["main_engine", "second_engine"]);

    registry.refresh_all(&parts[1..]);
    assert!(!registry.unit_by_name("main_engine").unwrap().is_present());
    assert!(approx(registry.total_mass("first_stage"), 3500.0));
}

#[test]
fn test_arming_never_revives_terminal_units() {
    let schema = two_stage_schema();
    let mut registry = UnitRegistry::initialize(schema.units());
    registry.refresh_all(&two_stage_parts()[1..]);
    let events = UnitStateMachine::observe(&mut registry);
    assert_eq!(events.len(), 1);
    assert_eq!(registry.unit_by_name("main_engine").unwrap().status(), UnitStatus::Cutoff);

    registry.set_all_status(UnitStatus::Go);
    assert_eq!(registry.unit_by_name("main_engine").unwrap().status(), UnitStatus::Cutoff);
    assert_eq!(registry.unit_by_name("main_tank").unwrap().status(), UnitStatus::Go);
}

#[test]
fn test_engine_lifecycle_and_burnout() {
    let schema = Arc::new(two_stage_schema());
    let aggregator = TelemetryAggregator::new(Arc::clone(&schema));
    let mut registry = UnitRegistry::initialize(schema.units());
    registry.set_all_status(UnitStatus::Go);

    let mut parts = two_stage_parts();
    parts[0] = engine_part("main_engine", 1500.0, true, 3000.0, 280.0);
    registry.refresh_all(&parts);
    let events = UnitStateMachine::observe(&mut registry);
    let ignition: Vec<_> = events.iter().filter(|e| e.unit_name == "main_engine").collect();
    assert_eq!(ignition.len(), 1);
    assert_eq!(ignition[0].text, "Main engine Ignition");
    assert_eq!(ignition[0].level, EventLevel::Important);
    assert_eq!(registry.unit_by_name("main_engine").unwrap().status(), UnitStatus::Active);

    parts.retain(|p| !p.tag().starts_with("main_"));
    registry.refresh_all(&parts);
    let events = UnitStateMachine::observe(&mut registry);
    let cutoff: Vec<_> = events.iter().filter(|e| e.unit_name == "main_engine").collect();
    assert_eq!(cutoff.len(), 1);
    assert_eq!(cutoff[0].text, "Main engine Cutoff");
    assert_eq!(cutoff[0].level, EventLevel::Important);
    assert!(UnitStateMachine::observe(&mut registry).iter().all(|e| e.unit_name != "main_engine"));

    let frame = VesselFrame { parts, ..VesselFrame::default() };
    let status = aggregator.rocket_status(&registry, &frame);
    let engine = &status["main_engine"];
    assert_eq!(engine["status"], json!(3));
    for key in ["start_mass", "thrust", "atom_delta_v", "vac_delta_v", "burn_time", "twr", "temperature"] {
        assert_eq!(engine[key].as_f64(), Some(0.0), "{key} should be zero after cutoff");
    }
}

#[test]
fn test_payload_transitions() {
    let schema = two_stage_schema();
    let mut registry = UnitRegistry::initialize(schema.units());
    registry.set_all_status(UnitStatus::Go);
    let mut parts = two_stage_parts();
    let deployed: Part = serde_json::from_value(json!({
        "tag": "solar_panel", "mass": 100.0, "solar_panel": {"deployed": true, "energy_flow": 1.5}
    }))
    .unwrap();
    let exposed: Part =
        serde_json::from_value(json!({"tag": "satellite_bus", "mass": 700.0, "shielded": false}))
            .unwrap();
    parts.retain(|p| !matches!(p.tag(), "fairing" | "solar_panel" | "satellite_bus"));
    parts.extend([deployed, exposed]);
    registry.refresh_all(&parts);

    let events = UnitStateMachine::observe(&mut registry);
    let text = |name: &str| events.iter().find(|e| e.unit_name == name).map(|e| e.text.clone());
    assert_eq!(text("fairing").as_deref(), Some("Fairing Jettisoned"));
    assert_eq!(text("solar_panel").as_deref(), Some("Solar panel Deployed"));
    assert_eq!(text("satellite_bus").as_deref(), Some("Satellite bus ACTIVE"));
    assert_eq!(registry.unit_by_name("solar_panel").unwrap().status(), UnitStatus::Deployed);

    // A deployed panel stays deployed when the part disappears.
    registry.refresh_all(&[]);
    let events = UnitStateMachine::observe(&mut registry);
    assert!(events.iter().all(|e| e.unit_name != "solar_panel"));
}

#[test]
fn test_status_rank_is_monotonic_under_random_polls() {
    let schema = two_stage_schema();
    let mut registry = UnitRegistry::initialize(schema.units());
    let mut rng = rand::rng();
    let all_parts = two_stage_parts();
    for round in 0..500 {
        if round == 20 {
            registry.set_all_status(UnitStatus::Go);
        }
        let mut parts = Vec::new();
        for part in &all_parts {
            if !rng.random_bool(0.9) {
                continue;
            }
            if part.engine().is_some() {
                parts.push(engine_part(part.tag(), 1000.0, rng.random_bool(0.5), 500.0, 300.0));
            } else {
                parts.push(part.clone());
            }
        }
        let before: Vec<u8> = registry.units().iter().map(|u| u.status().rank()).collect();
        registry.refresh_all(&parts);
        for event in UnitStateMachine::observe(&mut registry) {
            assert!(event.to.rank() > event.from.rank());
        }
        let after: Vec<u8> = registry.units().iter().map(|u| u.status().rank()).collect();
        assert!(before.iter().zip(&after).all(|(b, a)| a >= b));
    }
}

#[test]
fn test_multi_stage_delta_v_budget() {
    let schema = Arc::new(two_stage_schema());
    let aggregator = TelemetryAggregator::new(Arc::clone(&schema));
    let mut registry = UnitRegistry::initialize(schema.units());
    registry.refresh_all(&two_stage_parts());

    let summary = aggregator.delta_v_summary(&registry);
    assert_eq!(summary.delta_v_list.len(), 2);
    let upper = &summary.delta_v_list[0];
    let lower = &summary.delta_v_list[1];
    assert!(approx(upper.start_mass, 4000.0));
    assert!(approx(lower.start_mass, 9000.0));
    assert!(approx(upper.atom_delta_v, 300.0 * G0 * (4000.0f64 / 3200.0).ln()));
    assert!(approx(lower.atom_delta_v, 280.0 * G0 * (9000.0f64 / 6000.0).ln()));
    assert!(approx(summary.stage_delta_v_atom, lower.atom_delta_v));
    assert!(approx(summary.total_delta_v_atom, upper.atom_delta_v + lower.atom_delta_v));
    assert!(approx(summary.total_delta_v_vac, upper.vac_delta_v + lower.vac_delta_v));
    info!("Stack delta-v {:.1} m/s", summary.total_delta_v_atom);
}

#[test]
fn test_stage_budget_follows_separation() {
    let schema = Arc::new(two_stage_schema());
    let aggregator = TelemetryAggregator::new(Arc::clone(&schema));
    let mut registry = UnitRegistry::initialize(schema.units());
    registry.set_all_status(UnitStatus::Go);
    let mut parts = two_stage_parts();
    parts[0] = engine_part("main_engine", 1500.0, true, 3000.0, 280.0);
    registry.refresh_all(&parts);
    UnitStateMachine::observe(&mut registry);

    parts.retain(|p| !p.tag().starts_with("main_"));
    parts[0] = engine_part("second_engine", 1000.0, true, 800.0, 300.0);
    registry.refresh_all(&parts);
    UnitStateMachine::observe(&mut registry);
    assert_eq!(registry.unit_by_name("main_engine").unwrap().status(), UnitStatus::Cutoff);
    assert_eq!(registry.unit_by_name("second_engine").unwrap().status(), UnitStatus::Active);

    let summary = aggregator.delta_v_summary(&registry);
    assert_eq!(summary.delta_v_list.len(), 1);
    let upper = 300.0 * G0 * (4000.0f64 / 3200.0).ln();
    assert!(approx(summary.stage_delta_v_atom, upper));
    assert!(approx(summary.stage_delta_v_vac, 320.0 * G0 * (4000.0f64 / 3200.0).ln()));
    assert!(approx(summary.total_delta_v_atom, upper));
}

#[test]
fn test_tank_status_keeps_its_shape() {
    let schema = Arc::new(two_stage_schema());
    let aggregator = TelemetryAggregator::new(Arc::clone(&schema));
    let mut registry = UnitRegistry::initialize(schema.units());
    let empty = json!({"name": "", "amount": 0.0, "max": 0.0});

    let status = aggregator.rocket_status(&registry, &VesselFrame::default());
    assert_eq!(status["main_tank"]["fuel"], empty);
    assert_eq!(status["main_tank"]["lqd_oxygen"], empty);

    registry.set_all_status(UnitStatus::Go);
    registry.refresh_all(&[]);
    UnitStateMachine::observe(&mut registry);
    assert_eq!(registry.unit_by_name("second_tank").unwrap().status(), UnitStatus::Cutoff);
    let status = aggregator.rocket_status(&registry, &VesselFrame::default());
    let tank = status["second_tank"].as_object().unwrap();
    assert_eq!(tank["fuel"], empty);
    assert_eq!(tank["lqd_oxygen"], empty);
    assert!(tank.contains_key("temperature") && tank.contains_key("max_temperature"));
}

#[test]
fn test_snapshot_is_rounded_and_idempotent() {
    let schema = Arc::new(two_stage_schema());
    let aggregator = TelemetryAggregator::new(Arc::clone(&schema));
    let mut registry = UnitRegistry::initialize(schema.units());
    let frame = VesselFrame { parts: two_stage_parts(), ..VesselFrame::default() };
    registry.refresh_all(&frame.parts);

    let first = aggregator.snapshot(&registry, &frame);
    let second = aggregator.snapshot(&registry, &frame);
    assert_eq!(first, second);
    let dv = first.vessel_telemetry["delta_v_info"]["total_delta_v_atom"].as_f64().unwrap();
    assert!(approx(dv, (dv * 100.0).round() / 100.0));
    assert_eq!(first.rocket_status["main_tank"]["status"], json!(0));
}

#[test]
fn test_round_recursive_leaves_non_floats() {
    let value = json!({"a": 1.23456, "b": [2.005, {"c": 7}], "d": "x", "e": true});
    let rounded = round_recursive(value, 2);
    assert_eq!(rounded["a"], json!(1.23));
    assert_eq!(rounded["b"][1]["c"], json!(7));
    assert_eq!(rounded["d"], json!("x"));
    assert_eq!(rounded["e"], json!(true));
}

#[test]
fn test_milestones_fire_once_after_arming() {
    let mut tracker = MilestoneTracker::default();
    let flight: FlightInfo = serde_json::from_value(json!({"surface_altitude": 12_000.0})).unwrap();
    let orbit: OrbitInfo = serde_json::from_value(json!({
        "apoapsis_altitude": 80_500.0,
        "periapsis_altitude": 70_400.0,
        "inclination": 0.0,
        "speed": 2300.0,
    }))
    .unwrap();
    assert!(tracker.check(&flight, &orbit).is_empty());

    tracker.arm(TargetOrbit { periapsis: 70_000.0, apoapsis: 80_000.0, inclination: 0.0, speed: 0.0 });
    let fired: Vec<String> = tracker.check(&flight, &orbit).into_iter().map(|m| m.text).collect();
    assert_eq!(fired.len(), 4);
    assert!(fired[0].starts_with("Max Q Passed"));
    assert!(fired.contains(&"Target Orbit Achieved".to_string()));
    assert!(fired.iter().all(|t| !t.starts_with("Orbital Speed")));
    assert!(tracker.check(&flight, &orbit).is_empty());
}

#[tokio::test]
async fn test_liveness_reconnect_cycle() {
    let bridge = MockBridge::new();
    let supervisor = mock_supervisor(&bridge);
    let mut connected = supervisor.subscribe();

    supervisor.reconnect().await.unwrap();
    assert!(*connected.borrow_and_update());

    bridge.alive.store(false, Ordering::SeqCst);
    bridge.available.store(false, Ordering::SeqCst);
    assert!(matches!(supervisor.check_liveness().await, Err(ServiceError::ConnectionExhausted)));
    assert!(!supervisor.is_connected());
    assert!(supervisor.check_liveness().await.is_err());
    assert!(!supervisor.is_connected());

    bridge.alive.store(true, Ordering::SeqCst);
    bridge.available.store(true, Ordering::SeqCst);
    supervisor.check_liveness().await.unwrap();
    assert!(supervisor.is_connected());
    assert!(*connected.borrow_and_update());
    assert_eq!(bridge.open_handles(), 1);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_connection() {
    let bridge = MockBridge::new();
    bridge.set_parts(two_stage_parts());
    let supervisor = mock_supervisor(&bridge);

    let call = || supervisor.execute_with_reconnect(|svc| async move { svc.parts().await });
    let (first, liveness, second) = tokio::join!(call(), supervisor.check_liveness(), call());
    liveness.unwrap();
    assert!(first.unwrap().is_some());
    assert!(second.unwrap().is_some());
    assert_eq!(bridge.opened.load(Ordering::SeqCst), 1);
    assert_eq!(bridge.open_handles(), 1);
    assert!(supervisor.is_connected());
}

#[tokio::test]
async fn test_transient_failure_is_retried_once() {
    let bridge = MockBridge::new();
    bridge.set_parts(two_stage_parts());
    let supervisor = mock_supervisor(&bridge);

    bridge.failing_calls.store(1, Ordering::SeqCst);
    let parts = supervisor
        .execute_with_reconnect(|svc| async move { svc.parts().await })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(parts.len(), 7);
    assert_eq!(bridge.opened.load(Ordering::SeqCst), 2);
    assert_eq!(bridge.open_handles(), 1);

    bridge.failing_calls.store(2, Ordering::SeqCst);
    bridge.parts_calls.store(0, Ordering::SeqCst);
    let res = supervisor.execute_with_reconnect(|svc| async move { svc.parts().await }).await;
    assert!(matches!(res, Err(ServiceError::NotConnected)));
    assert_eq!(bridge.parts_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_calls_outside_flight_scene_are_skipped() {
    let bridge = MockBridge::new();
    bridge.in_flight.store(false, Ordering::SeqCst);
    let supervisor = mock_supervisor(&bridge);
    let invoked = AtomicUsize::new(0);

    let res = supervisor
        .execute_with_reconnect(|svc| {
            invoked.fetch_add(1, Ordering::SeqCst);
            async move { svc.activate_next_stage().await }
        })
        .await
        .unwrap();
    assert!(res.is_none());
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
    assert_eq!(bridge.staged.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_liveness_monitor_stops_on_cancel() {
    let bridge = MockBridge::new();
    let supervisor = mock_supervisor(&bridge);
    let token = tokio_util::sync::CancellationToken::new();
    let monitor = {
        let supervisor = Arc::clone(&supervisor);
        let token = token.clone();
        tokio::spawn(async move { supervisor.run_liveness_monitor(token).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(supervisor.is_connected());
    token.cancel();
    tokio::time::timeout(Duration::from_secs(1), monitor).await.unwrap().unwrap();
    supervisor.shutdown().await;
    assert_eq!(bridge.open_handles(), 0);
}

#[test]
fn test_ascent_settings_for_target() {
    let target = TargetOrbit { periapsis: 72_000.0, apoapsis: 75_000.0, inclination: 6.0, speed: 0.0 };
    let settings = AscentSettings::for_target(&target);
    assert_eq!(settings.ascent_path_index, 2);
    assert!(approx(settings.desired_orbit_altitude, 72_000.0));
    assert!(approx(settings.desired_apoapsis, 75_000.0));
    assert!(settings.enabled && settings.autostage && settings.force_roll);
}
