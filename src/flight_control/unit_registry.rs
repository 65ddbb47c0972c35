use super::unit::{Unit, UnitDescriptor, UnitKind, UnitStatus};
use crate::http_handler::http_response::parts::Part;
use itertools::Itertools;

/// Maps the declared units onto the parts of the live vessel.
///
/// Units are kept in declaration order. The live part of every unit is
/// replaced on each [`refresh_all`](UnitRegistry::refresh_all) and never
/// carried over from an earlier poll.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: Vec<Unit>,
}

impl UnitRegistry {
    pub fn initialize(descriptors: &[UnitDescriptor]) -> Self {
        Self { units: descriptors.iter().cloned().map(Unit::new).collect() }
    }

    /// First part carrying `tag`, if any.
    pub fn resolve<'a>(tag: &str, parts: &'a [Part]) -> Option<&'a Part> {
        parts.iter().find(|p| p.tag() == tag)
    }

    /// Re-resolves every unit against the parts fetched this tick.
    pub fn refresh_all(&mut self, parts: &[Part]) {
        for unit in &mut self.units {
            let part = Self::resolve(unit.descriptor().tag(), parts).cloned();
            unit.set_part(part);
        }
    }

    pub fn units(&self) -> &[Unit] { &self.units }

    pub(super) fn units_mut(&mut self) -> &mut [Unit] { &mut self.units }

    pub fn units_in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Unit> + 'a {
        self.units.iter().filter(move |u| u.descriptor().group_name() == group)
    }

    pub fn unit_by_name(&self, name: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.name() == name)
    }

    pub fn units_of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.kind() == kind)
    }

    /// Sum of the live part masses of a group. Absent parts contribute 0.
    pub fn total_mass(&self, group: &str) -> f64 { self.units_in_group(group).map(Unit::mass).sum() }

    /// Raises every unit to `status`. Units already at or beyond its rank are
    /// left untouched, so arming never revives a terminal unit.
    pub fn set_all_status(&mut self, status: UnitStatus) {
        for unit in &mut self.units {
            if unit.status().rank() < status.rank() {
                unit.set_status(status);
            }
        }
    }

    /// Unit names with their current status, in declaration order.
    pub fn all_status(&self) -> Vec<(&str, UnitStatus)> {
        self.units.iter().map(|u| (u.name(), u.status())).collect()
    }

    /// Tags that occur on more than one part. Resolution still picks the
    /// first occurrence; this is only reported.
    pub fn duplicate_tags(parts: &[Part]) -> Vec<String> {
        parts
            .iter()
            .map(Part::tag)
            .filter(|tag| !tag.is_empty())
            .duplicates()
            .map(str::to_string)
            .collect()
    }
}
