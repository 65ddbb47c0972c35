use crate::flight_recorder::EventLevel;
use crate::http_handler::http_response::{flight::FlightInfo, orbit::OrbitInfo};

/// Orbit the launch sequence aims for. Altitudes in m, inclination in degrees,
/// speed in m/s.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TargetOrbit {
    pub periapsis: f64,
    pub apoapsis: f64,
    pub inclination: f64,
    #[serde(default)]
    pub speed: f64,
}

/// A milestone that fired during one check.
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub text: String,
    pub level: EventLevel,
}

/// One-shot flight milestones. Nothing fires before [`arm`](MilestoneTracker::arm).
#[derive(Debug, Clone)]
pub struct MilestoneTracker {
    target: Option<TargetOrbit>,
    max_q_altitude: f64,
    max_q_passed: bool,
    orbital_speed_exceeded: bool,
    apoapsis_exceeded: bool,
    periapsis_exceeded: bool,
    target_orbit_achieved: bool,
}

impl MilestoneTracker {
    /// Surface altitude above which the dynamic pressure peak is behind the vehicle.
    pub const DEFAULT_MAX_Q_ALTITUDE: f64 = 11_200.0;
    const ALTITUDE_TOLERANCE: f64 = 1_500.0;
    const INCLINATION_TOLERANCE: f64 = 1.0;

    pub fn new(max_q_altitude: f64) -> Self {
        Self {
            target: None,
            max_q_altitude,
            max_q_passed: false,
            orbital_speed_exceeded: false,
            apoapsis_exceeded: false,
            periapsis_exceeded: false,
            target_orbit_achieved: false,
        }
    }

    /// Sets the target and clears every flag.
    pub fn arm(&mut self, target: TargetOrbit) {
        *self = Self::new(self.max_q_altitude);
        self.target = Some(target);
    }

    /// Returns the milestones reached since the last call.
    pub fn check(&mut self, flight: &FlightInfo, orbit: &OrbitInfo) -> Vec<Milestone> {
        let Some(target) = self.target else {
            return Vec::new();
        };
        let mut fired = Vec::new();
        let mut once = |flag: &mut bool, reached: bool, text: String| {
            if reached && !*flag {
                *flag = true;
                fired.push(Milestone { text, level: EventLevel::Important });
            }
        };
        once(
            &mut self.max_q_passed,
            flight.surface_altitude() > self.max_q_altitude,
            "Max Q Passed - Maximum dynamic pressure altitude reached".to_string(),
        );
        once(
            &mut self.orbital_speed_exceeded,
            target.speed > 0.0 && orbit.speed() > target.speed,
            format!("Orbital Speed Exceeded - Orbital speed is greater than {} m/s", target.speed),
        );
        once(
            &mut self.apoapsis_exceeded,
            orbit.apoapsis_altitude() > target.apoapsis,
            format!("Apoapsis Exceeded - Apoapsis altitude is greater than {} m", target.apoapsis),
        );
        once(
            &mut self.periapsis_exceeded,
            orbit.periapsis_altitude() > target.periapsis,
            format!(
                "Periapsis Exceeded - Periapsis altitude is greater than {} m",
                target.periapsis
            ),
        );
        let achieved = (orbit.periapsis_altitude() - target.periapsis).abs()
            <= Self::ALTITUDE_TOLERANCE
            && (orbit.apoapsis_altitude() - target.apoapsis).abs() <= Self::ALTITUDE_TOLERANCE
            && (orbit.inclination_deg() - target.inclination).abs() <= Self::INCLINATION_TOLERANCE;
        once(&mut self.target_orbit_achieved, achieved, "Target Orbit Achieved".to_string());
        fired
    }
}

impl Default for MilestoneTracker {
    fn default() -> Self { Self::new(Self::DEFAULT_MAX_Q_ALTITUDE) }
}
