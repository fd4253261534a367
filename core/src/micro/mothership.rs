use rust_sc2::prelude::*;

use crate::micro::generic::GenericMicro;
use crate::micro::priorities::STALKER_PRIORITY;
use crate::micro::*;
use crate::snapshot::UnitSnapshot;

const TIME_WARP: AbilityId = AbilityId::EffectTimeWarp;

pub struct MothershipMicro {
    generic: GenericMicro,
}

impl Default for MothershipMicro {
    fn default() -> Self {
        Self {
            generic: GenericMicro::new(&STALKER_PRIORITY),
        }
    }
}

impl MothershipMicro {
    const RULES: [Rule<Self>; 3] = [Self::save_itself, Self::time_warp, Self::regroup];

    fn save_itself(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if unit.shield_health_percentage() > 0.3f32 {
            return None;
        }
        let closest = ctx
            .cache
            .enemy_in_range(unit.position, 12f32)
            .into_iter()
            .closest(unit.position)?;
        Some(Action::move_to(safe_towards(closest.position, unit.position, 5f32)))
    }

    fn time_warp(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !ctx.is_ready(unit, TIME_WARP) {
            return None;
        }
        let enemies = ctx
            .cache
            .enemy_in_range(unit.position, 13f32)
            .into_iter()
            .filter(|u| !u.is_structure)
            .collect::<Vec<_>>();
        if enemies.len() < 7 {
            return None;
        }
        let center = enemies.iter().map(|u| u.position).center()?;
        let target = enemies.into_iter().closest(center)?;
        Some(Action::cast_at(TIME_WARP, target.position))
    }

    fn regroup(&mut self, _: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !ctx.tactics.in_combat() && ctx.tactics.tags.len() >= 10 {
            Some(Action::attack_move(ctx.tactics.center))
        } else {
            None
        }
    }
}

impl MicroController for MothershipMicro {
    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        match first_match(self, &Self::RULES, unit, current, ctx) {
            Some(action) => action,
            None => self.generic.unit_solve_combat(unit, current, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn mothership() -> UnitSnapshot {
        UnitSnapshot::new(1, UnitTypeId::Mothership, Point2::new(0f32, 0f32))
            .flying()
            .with_ranges(7f32, 7f32)
            .with_health(350f32, 350f32)
            .with_shield(350f32, 350f32)
    }

    #[test]
    fn time_warps_big_fights() {
        let enemies = (0..7)
            .map(|i| UnitSnapshot::new(20 + i, UnitTypeId::Marine, Point2::new(8f32, i as f32 - 3f32)))
            .collect();
        let fixture = Fixture::new(vec![mothership()], enemies).ready(1, &[TIME_WARP]);
        let ctx = fixture.context();
        let action = MothershipMicro::default().unit_solve_combat(&mothership(), Action::attack_move(Point2::new(30f32, 0f32)), &ctx);
        assert_eq!(action, Action::cast_at(TIME_WARP, Point2::new(8f32, 0f32)));
    }

    #[test]
    fn wounded_mothership_backs_off() {
        let unit = mothership().with_shield(0f32, 350f32).with_health(100f32, 350f32);
        let marine = UnitSnapshot::new(20, UnitTypeId::Marine, Point2::new(3f32, 0f32));
        let fixture = Fixture::new(vec![unit.clone()], vec![marine]);
        let ctx = fixture.context();
        let action = MothershipMicro::default().unit_solve_combat(&unit, Action::attack_move(Point2::new(30f32, 0f32)), &ctx);
        assert_eq!(action, Action::move_to(Point2::new(-2f32, 0f32)));
    }
}
