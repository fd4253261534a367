use rust_sc2::prelude::*;

use crate::micro::*;
use crate::snapshot::UnitSnapshot;

const SPACING: f32 = 10f32;
const DETECTOR_SCAN_RANGE: f32 = 12f32;

/// Spotter that floats slightly ahead of its group, keeps away from other
/// observers and from enemy detection covered by anti air.
#[derive(Default)]
pub struct ObserverMicro;

impl ObserverMicro {
    const RULES: [Rule<Self>; 3] = [Self::spread, Self::avoid_detection, Self::chase_cloaked];

    fn spread(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        let closest = ctx
            .cache
            .own_of_type(UnitTypeId::Observer)
            .into_iter()
            .filter(|u| u.tag != unit.tag)
            .closest(unit.position)?;
        if closest.distance(unit.position) < SPACING {
            Some(Action::move_to(safe_towards(unit.position, closest.position, -6f32)))
        } else {
            None
        }
    }

    fn avoid_detection(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        let enemies = ctx.cache.enemy_in_range(unit.position, DETECTOR_SCAN_RANGE);
        let detector = enemies.iter().filter(|u| u.is_detector()).copied().closest(unit.position)?;
        if enemies.iter().any(|u| u.can_attack_air()) {
            Some(Action::move_to(safe_towards(unit.position, detector.position, -4f32)))
        } else {
            None
        }
    }

    fn chase_cloaked(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if ctx.enemy_race != Race::Terran {
            return None;
        }
        let cloaked = ctx
            .cache
            .enemy_units()
            .iter()
            .filter(|u| u.is_cloaked)
            .closest(unit.position)?;
        Some(Action::move_to(
            ctx.pather.find_weak_influence_air(cloaked.position, 10f32),
        ))
    }
}

impl MicroController for ObserverMicro {
    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        if let Some(action) = first_match(self, &Self::RULES, unit, current, ctx) {
            return action;
        }
        let target = current.position(ctx.cache).unwrap_or(ctx.tactics.target);
        let center = ctx.tactics.center;
        let ahead = safe_towards(center, target, 3f32);
        Action::move_to(ctx.pather.find_path(center, ahead, 3f32))
    }
}
