/// Standard gravity in m/s².
pub const G0: f64 = 9.806_65;

/// Pure rocket-equation and drag numerics.
///
/// Invalid physical inputs (non-positive or non-finite masses, impulses,
/// thrusts) never error; the affected quantity is 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightDynamics {
    /// Aerodynamic reference area in m².
    reference_area: f64,
}

impl FlightDynamics {
    pub fn new(reference_area: f64) -> Self { Self { reference_area } }

    pub fn reference_area(&self) -> f64 { self.reference_area }

    fn valid(values: &[f64]) -> bool { values.iter().all(|v| v.is_finite() && *v > 0.0) }

    /// Ideal velocity change `isp·g0·ln(m0/(m0-fuel))` in m/s.
    pub fn delta_v(isp: f64, fuel_mass: f64, start_mass: f64) -> f64 {
        let end_mass = start_mass - fuel_mass;
        if !Self::valid(&[isp, fuel_mass, start_mass, end_mass]) {
            return 0.0;
        }
        isp * G0 * (start_mass / end_mass).ln()
    }

    /// Seconds needed to burn `fuel_mass` at `thrust` (mass flow `thrust/(isp·g0)`).
    pub fn burn_time(isp: f64, fuel_mass: f64, thrust: f64) -> f64 {
        if !Self::valid(&[isp, fuel_mass, thrust]) {
            return 0.0;
        }
        fuel_mass / (thrust / (isp * G0))
    }

    /// Thrust over weight at standard gravity.
    pub fn thrust_to_weight(thrust: f64, mass: f64) -> f64 {
        if !Self::valid(&[mass]) || !thrust.is_finite() {
            return 0.0;
        }
        thrust / (mass * G0)
    }

    /// Drag force `½ρv²·A·Cd` in N.
    pub fn drag_force(&self, density: f64, velocity: f64, drag_coefficient: f64) -> f64 {
        let force = 0.5 * density * velocity.powi(2) * self.reference_area * drag_coefficient;
        if force.is_finite() { force } else { 0.0 }
    }

    /// Deceleration caused by drag in m/s², 0 for a non-positive mass.
    pub fn drag_acceleration(
        &self,
        density: f64,
        velocity: f64,
        drag_coefficient: f64,
        mass: f64,
    ) -> f64 {
        if !Self::valid(&[mass]) {
            return 0.0;
        }
        self.drag_force(density, velocity, drag_coefficient) / mass
    }
}
