use super::unit::{Unit, UnitKind, UnitStatus};
use super::unit_registry::UnitRegistry;
use crate::flight_recorder::EventLevel;
use crate::http_handler::http_response::parts::Part;

/// Lifecycle change of a single unit, produced by [`UnitStateMachine::observe`].
#[derive(Debug, Clone, PartialEq)]
pub struct UnitEvent {
    pub unit_name: String,
    pub from: UnitStatus,
    pub to: UnitStatus,
    pub text: String,
    pub level: EventLevel,
}

/// Result of evaluating the transition table for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: UnitStatus,
    pub verb: &'static str,
    pub level: EventLevel,
}

/// Derives discrete lifecycle events from the continuously polled parts.
pub struct UnitStateMachine;

impl UnitStateMachine {
    /// Applies at most one transition to every unit of the registry and
    /// returns the resulting events in declaration order. Must run after
    /// [`UnitRegistry::refresh_all`] for the same tick.
    pub fn observe(registry: &mut UnitRegistry) -> Vec<UnitEvent> {
        registry.units_mut().iter_mut().filter_map(Self::observe_unit).collect()
    }

    pub fn observe_unit(unit: &mut Unit) -> Option<UnitEvent> {
        let from = unit.status();
        let transition = Self::transition(unit.kind(), from, unit.part())?;
        debug_assert!(transition.to.rank() > from.rank());
        unit.set_status(transition.to);
        Some(UnitEvent {
            unit_name: unit.name().to_string(),
            from,
            to: transition.to,
            text: format!("{} {}", unit.descriptor().display_name(), transition.verb),
            level: transition.level,
        })
    }

    /// Transition table. Activation is evaluated before absence; terminal
    /// states never leave.
    pub fn transition(
        kind: UnitKind,
        status: UnitStatus,
        part: Option<&Part>,
    ) -> Option<Transition> {
        if status.is_terminal() {
            return None;
        }
        let armed = status == UnitStatus::Go;
        match (kind, part) {
            (UnitKind::Engine, Some(p)) => {
                let ignited = p.engine().and_then(|e| e.active()).unwrap_or(false);
                (armed && ignited).then_some(Transition {
                    to: UnitStatus::Active,
                    verb: "Ignition",
                    level: EventLevel::Important,
                })
            }
            (UnitKind::Engine, None) => Some(Transition {
                to: UnitStatus::Cutoff,
                verb: "Cutoff",
                level: EventLevel::Important,
            }),
            (UnitKind::SolarPanel, Some(p)) => {
                let deployed = p.solar_panel().and_then(|s| s.deployed()).unwrap_or(false);
                (armed && deployed).then_some(Transition {
                    to: UnitStatus::Deployed,
                    verb: "Deployed",
                    level: EventLevel::Normal,
                })
            }
            (UnitKind::SolarPanel, None) | (UnitKind::Fairing, Some(_)) => None,
            (UnitKind::Fairing, None) => Some(Transition {
                to: UnitStatus::Cutoff,
                verb: "Jettisoned",
                level: EventLevel::Important,
            }),
            (UnitKind::SatelliteBus, Some(p)) => {
                let exposed = p.shielded() == Some(false);
                (armed && exposed).then_some(Self::activated())
            }
            (_, Some(_)) => armed.then_some(Self::activated()),
            (_, None) => Some(Transition {
                to: UnitStatus::Cutoff,
                verb: "Cutoff",
                level: EventLevel::Important,
            }),
        }
    }

    fn activated() -> Transition {
        Transition { to: UnitStatus::Active, verb: "ACTIVE", level: EventLevel::Normal }
    }
}
