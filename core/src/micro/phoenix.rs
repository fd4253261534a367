use log::debug;
use rust_sc2::prelude::*;

use crate::micro::target_selector::{lift_score, select_best};
use crate::micro::*;
use crate::params::GRAVITON_BEAM_ENERGY;
use crate::snapshot::UnitSnapshot;

const BEAM: AbilityId = AbilityId::GravitonBeamGravitonBeam;
const CLOSE_ENEMY_RANGE: f32 = 15f32;
const GROUP_RANGE: f32 = 10f32;
const GROUP_SIZE: usize = 6;
const BEAM_TRAVEL_RANGE: f32 = 8f32;

/// Phoenixes lift priority ground units and hunt air, never fighting under
/// anti air when the group is beaming already.
pub struct PhoenixMicro {
    allow_lift: bool,
}

impl Default for PhoenixMicro {
    fn default() -> Self {
        Self { allow_lift: true }
    }
}

impl PhoenixMicro {
    const RULES: [Rule<Self>; 5] = [
        Self::retreat,
        Self::regroup,
        Self::lift,
        Self::hunt_light_air,
        Self::hunt_air,
    ];

    pub fn allow_lift(&self) -> bool {
        self.allow_lift
    }

    fn retreat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Option<Action> {
        if !ctx.move_type().is_retreat() {
            return None;
        }
        if ready_to_shoot(unit) {
            let closest = ctx.enemies_near_by(unit).into_iter().closest(unit.position);
            if let Some(closest) = closest {
                let real_range = unit.real_range_vs(closest);
                if real_range > 0f32 && real_range < unit.distance(closest.position) {
                    return Some(Action::move_to(closest.position));
                }
            }
        }
        Some(current)
    }

    fn in_group(unit: &UnitSnapshot, ctx: &MicroContext) -> bool {
        ctx.cache.own_in_range(unit.position, GROUP_RANGE).len() >= GROUP_SIZE
    }

    fn in_danger(unit: &UnitSnapshot, ctx: &MicroContext) -> bool {
        unit.shield_health_percentage() <= 0.4f32
            && ctx
                .cache
                .enemy_in_range(unit.position, 11f32)
                .iter()
                .any(|aa| aa.can_attack_air() && aa.distance(unit.position) < aa.air_range + 3f32)
    }

    fn regroup(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !Self::in_group(unit, ctx) || !ctx.tactics.has_ground_units {
            return None;
        }
        let close_enemies = ctx.cache.enemy_in_range(unit.position, CLOSE_ENEMY_RANGE);
        let has_energy = unit.energy > GRAVITON_BEAM_ENERGY;
        if close_enemies.iter().any(|u| u.is_flying) {
            return None;
        }
        if Self::in_danger(unit, ctx) || !has_energy {
            Some(evasive_move_to(unit, ctx.tactics.center, ctx))
        } else {
            None
        }
    }

    fn lift(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !self.allow_lift || unit.energy <= GRAVITON_BEAM_ENERGY || !Self::in_group(unit, ctx) {
            return None;
        }
        let close_enemies = ctx.cache.enemy_in_range(unit.position, CLOSE_ENEMY_RANGE);
        let flyers = close_enemies.iter().any(|u| u.is_flying);
        let harass = ctx.move_type() == MoveType::Harass;
        let (target, score) = select_best(close_enemies.iter().copied(), 0f32, |enemy| {
            if enemy.has_buff(BuffId::GravitonBeam) || (!harass && enemy.is_worker()) {
                None
            } else {
                lift_score(unit.position, enemy)
            }
        })?;
        let worth_it = score > 5f32
            || !flyers
            || (unit.energy > GRAVITON_BEAM_ENERGY * 3f32 && score > 3f32);
        if !worth_it {
            return None;
        }
        debug!(
            "Phoenix [{}] lifting {:?} at {:?}",
            unit.tag, target.type_id, target.position
        );
        if unit.distance(target.position) > BEAM_TRAVEL_RANGE {
            let destination = ctx
                .pather
                .find_influence_air_path(unit.position, target.position);
            Some(Action::move_to(destination))
        } else {
            Some(Action::cast_on(BEAM, target.tag))
        }
    }

    fn hunt(unit: &UnitSnapshot, targets: Vec<&UnitSnapshot>, ctx: &MicroContext) -> Option<Action> {
        let closest = targets.into_iter().closest(unit.position)?;
        if ready_to_shoot(unit) {
            Some(Action::attack(closest.tag))
        } else {
            Some(evasive_move_to(unit, closest.position, ctx))
        }
    }

    fn hunt_light_air(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        let targets = ctx
            .enemies_near_by(unit)
            .into_iter()
            .filter(|u| u.is_flying && u.is_light)
            .collect();
        Self::hunt(unit, targets, ctx)
    }

    fn hunt_air(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        let targets = ctx
            .enemies_near_by(unit)
            .into_iter()
            .filter(|u| u.is_flying)
            .collect();
        Self::hunt(unit, targets, ctx)
    }
}

impl MicroController for PhoenixMicro {
    fn group_solve_combat(&mut self, units: &[&UnitSnapshot], current: Action, _ctx: &MicroContext) -> Action {
        let beaming = units.iter().filter(|u| u.is_using(BEAM)).count();
        self.allow_lift = !(beaming > 0 && beaming as f32 > units.len() as f32 * 0.5f32);
        current
    }

    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        first_match(self, &Self::RULES, unit, current, ctx).unwrap_or(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn squad(beaming: usize) -> Vec<UnitSnapshot> {
        (0..10)
            .map(|i| {
                let phoenix = UnitSnapshot::new(i + 1, UnitTypeId::Phoenix, Point2::new(i as f32 * 0.5f32, 0f32))
                    .flying()
                    .light()
                    .with_ranges(0f32, 5f32)
                    .with_energy(100f32);
                if (i as usize) < beaming {
                    phoenix.with_order(BEAM, Target::Tag(99))
                } else {
                    phoenix
                }
            })
            .collect()
    }

    fn tank() -> UnitSnapshot {
        UnitSnapshot::new(30, UnitTypeId::SiegeTankSieged, Point2::new(4f32, 3f32))
            .armored()
            .with_ranges(13f32, 0f32)
    }

    fn decide(beaming: usize) -> Action {
        let own = squad(beaming);
        let fixture = Fixture::new(own.clone(), vec![tank()]);
        let ctx = fixture.context();
        let current = Action::attack_move(Point2::new(50f32, 50f32));
        let mut micro = PhoenixMicro::default();
        let refs = own.iter().collect::<Vec<_>>();
        let group = micro.group_solve_combat(&refs, current, &ctx);
        micro.unit_solve_combat(&own[9], group, &ctx)
    }

    #[test]
    fn busy_squad_does_not_lift() {
        let action = decide(6);
        assert!(!action.uses(BEAM));
    }

    #[test]
    fn free_squad_lifts_tank() {
        assert_eq!(decide(5), Action::cast_on(BEAM, 30));
    }

    #[test]
    fn group_pass_threshold() {
        let own = squad(5);
        let fixture = Fixture::new(own.clone(), vec![]);
        let ctx = fixture.context();
        let mut micro = PhoenixMicro::default();
        let refs = own.iter().collect::<Vec<_>>();
        micro.group_solve_combat(&refs, Action::move_to(Point2::new(0f32, 0f32)), &ctx);
        assert!(micro.allow_lift());
        let own = squad(6);
        let refs = own.iter().collect::<Vec<_>>();
        micro.group_solve_combat(&refs, Action::move_to(Point2::new(0f32, 0f32)), &ctx);
        assert!(!micro.allow_lift());
    }
}
