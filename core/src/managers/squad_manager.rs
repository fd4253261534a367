use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;
use rust_sc2::Event::UnitDestroyed;

use crate::snapshot::UnitSnapshot;
use crate::utils::IsDangerous;
use crate::{AIComponent, BotState};

/// Army units close enough to fight together.
#[derive(Default, Clone, Debug)]
pub struct Squad {
    pub units: Vec<UnitSnapshot>,
}

#[derive(Default)]
pub struct Squads {
    pub squads: Vec<Squad>,
}

impl Squad {
    fn influence_range(&self) -> f32 {
        3f32 + (self.units.len() as f32).log10()
    }

    pub fn center(&self) -> Point2 {
        let sum = self
            .units
            .iter()
            .fold(Point2::new(0f32, 0f32), |sum, u| sum + u.position);
        sum / self.units.len().max(1) as f32
    }

    pub fn tags(&self) -> Vec<u64> {
        self.units.iter().map(|u| u.tag).collect()
    }

    pub fn contains(&self, tag: u64) -> bool {
        self.units.iter().any(|u| u.tag == tag)
    }

    fn is_close(&self, unit: &UnitSnapshot) -> bool {
        unit.is_closer(
            unit.speed + unit.ground_range.max(unit.air_range) + unit.radius + self.influence_range(),
            self.center(),
        )
    }
}

/// Units left to the squads: ready, not a worker and able to fight or
/// support.
pub fn is_army_unit(unit: &UnitSnapshot) -> bool {
    !unit.is_structure
        && !unit.is_worker()
        && unit.is_ready()
        && unit.type_id != UnitTypeId::AdeptPhaseShift
        && unit.is_dangerous()
}

impl Squads {
    /// Rebuilds membership from this tick's units. Units that were reserved
    /// elsewhere are left out.
    pub fn recalculate_squads(&mut self, units: &[UnitSnapshot], reserved: &[u64]) {
        self.squads
            .iter_mut()
            .for_each(|squad| squad.units.retain(|u| units.iter().any(|o| o.tag == u.tag)));
        for unit in units
            .iter()
            .filter(|u| is_army_unit(u) && !reserved.contains(&u.tag))
        {
            self.recalculate_unit_squad(unit);
        }
        for squad in self.squads.iter_mut() {
            squad.units.retain(|u| !reserved.contains(&u.tag));
        }
        self.squads.retain(|s| !s.units.is_empty());
    }

    fn recalculate_unit_squad(&mut self, unit: &UnitSnapshot) {
        for squad in self.squads.iter_mut() {
            squad.units.retain(|u| u.tag != unit.tag);
        }
        self.squads.retain(|s| !s.units.is_empty());
        if let Some(squad) = self.squads.iter_mut().find(|squad| squad.is_close(unit)) {
            squad.units.push(unit.clone());
        } else {
            self.squads.push(Squad {
                units: vec![unit.clone()],
            });
        }
    }

    fn destroy_unit(&mut self, tag: u64) {
        for squad in self.squads.iter_mut() {
            squad.units.retain(|u| u.tag != tag);
        }
        self.squads.retain(|s| !s.units.is_empty());
    }

    pub fn find_unit_squad(&self, tag: u64) -> Option<&Squad> {
        self.squads.iter().find(|squad| squad.contains(tag))
    }
}

#[derive(Default)]
pub struct SquadManager {}

impl AIComponent for SquadManager {
    fn process(&mut self, _: &mut Bot, bot_state: &mut BotState) {
        let reserved = bot_state.harass_tags.clone();
        bot_state
            .squads
            .recalculate_squads(bot_state.cache.own_units(), &reserved);
    }

    fn on_event(&mut self, event: &Event, bot_state: &mut BotState) {
        if let UnitDestroyed(tag, _) = event {
            bot_state.squads.destroy_unit(*tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stalker(tag: u64, x: f32) -> UnitSnapshot {
        UnitSnapshot::new(tag, UnitTypeId::Stalker, Point2::new(x, 0f32)).with_ranges(6f32, 6f32)
    }

    #[test]
    fn close_units_share_a_squad() {
        let mut squads = Squads::default();
        let units = vec![stalker(1, 0f32), stalker(2, 2f32), stalker(3, 60f32)];
        squads.recalculate_squads(&units, &[]);
        assert_eq!(squads.squads.len(), 2);
        assert_eq!(squads.find_unit_squad(2).map(|s| s.tags()), Some(vec![1, 2]));
        assert_eq!(squads.find_unit_squad(3).map(|s| s.tags()), Some(vec![3]));
    }

    #[test]
    fn workers_structures_and_reserved_units_are_left_out() {
        let mut squads = Squads::default();
        let units = vec![
            stalker(1, 0f32),
            UnitSnapshot::new(2, UnitTypeId::Probe, Point2::new(1f32, 0f32)).with_ranges(0.1f32, 0f32),
            UnitSnapshot::new(3, UnitTypeId::PhotonCannon, Point2::new(1f32, 1f32))
                .structure()
                .with_ranges(7f32, 7f32),
            UnitSnapshot::new(4, UnitTypeId::DarkTemplar, Point2::new(2f32, 0f32)).with_ranges(0.1f32, 0f32),
        ];
        squads.recalculate_squads(&units, &[4]);
        assert_eq!(squads.squads.len(), 1);
        assert_eq!(squads.squads[0].tags(), vec![1]);
    }

    #[test]
    fn dead_units_leave_their_squad() {
        let mut squads = Squads::default();
        squads.recalculate_squads(&[stalker(1, 0f32), stalker(2, 1f32)], &[]);
        squads.destroy_unit(1);
        assert_eq!(squads.squads[0].tags(), vec![2]);
        squads.recalculate_squads(&[], &[]);
        assert!(squads.squads.is_empty());
    }
}
