use rust_sc2::prelude::*;

use crate::micro::generic::GenericMicro;
use crate::micro::priorities::STALKER_PRIORITY;
use crate::micro::*;
use crate::snapshot::UnitSnapshot;

const BLINK: AbilityId = AbilityId::EffectBlinkStalker;

pub struct StalkerMicro {
    generic: GenericMicro,
}

impl Default for StalkerMicro {
    fn default() -> Self {
        Self {
            generic: GenericMicro::new(&STALKER_PRIORITY),
        }
    }
}

impl StalkerMicro {
    const RULES: [Rule<Self>; 4] = [
        Self::escape_lock_on,
        Self::blink_home,
        Self::blink_on_siege,
        Self::blink_to_safety,
    ];

    fn escape_lock_on(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !ctx.is_locked_on(unit) {
            return None;
        }
        let cyclone = ctx
            .enemies_of_types(unit, &[UnitTypeId::Cyclone])
            .into_iter()
            .closest(unit.position)?;
        let backstep = safe_towards(cyclone.position, unit.position, 15f32);
        let target = ctx.pather.find_weak_influence_ground(backstep, 4f32);
        Some(Action::cast_at(BLINK, target))
    }

    fn blink_home(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !ctx.move_type().is_retreat() {
            return None;
        }
        let closest = ctx
            .cache
            .enemy_in_range(unit.position, 12f32)
            .into_iter()
            .closest(unit.position)?;
        let target = safe_towards(closest.position, ctx.own_main, 8f32);
        Some(Action::cast_at(BLINK, target))
    }

    fn blink_on_siege(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if ctx.model() != CombatModel::StalkerToSiege
            || !matches!(ctx.move_type(), MoveType::Assault | MoveType::SearchAndDestroy)
        {
            return None;
        }
        let target = ctx
            .enemies_of_types(unit, &SIEGE_TYPES)
            .into_iter()
            .closest(unit.position)?;
        if target.distance(unit.position) > 3f32 {
            Some(Action::cast_at(BLINK, target.position))
        } else {
            None
        }
    }

    fn blink_to_safety(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if unit.shield_percentage() >= 0.05f32 {
            return None;
        }
        let enemy_center = ctx
            .enemies_near_by(unit)
            .into_iter()
            .map(|u| u.position)
            .center()?;
        let from = safe_towards(unit.position, enemy_center, -5f32);
        let target = ctx.pather.find_weak_influence_ground_blink(from, 6f32);
        if target.distance(unit.position) > 3f32 {
            Some(Action::cast_at(BLINK, target))
        } else {
            None
        }
    }
}

impl MicroController for StalkerMicro {
    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        if !ctx.tactics.in_combat() {
            return current;
        }
        if ctx.is_ready(unit, BLINK) {
            if let Some(action) = first_match(self, &Self::RULES, unit, current, ctx) {
                return action;
            }
        }
        self.generic.unit_solve_combat(unit, current, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn stalker(shield: f32) -> UnitSnapshot {
        UnitSnapshot::new(1, UnitTypeId::Stalker, Point2::new(0f32, 0f32))
            .with_ranges(6f32, 6f32)
            .with_shield(shield, 80f32)
            .with_health(80f32, 80f32)
            .with_weapon_cooldown(10f32)
    }

    fn roach(tag: u64, x: f32) -> UnitSnapshot {
        UnitSnapshot::new(tag, UnitTypeId::Roach, Point2::new(x, 0f32))
            .with_ranges(4f32, 0f32)
            .with_power(2f32)
            .armored()
    }

    #[test]
    fn low_shield_blinks_to_safety() {
        let unit = stalker(3f32);
        let fixture = Fixture::new(vec![unit.clone()], vec![roach(20, 3f32)])
            .ready(1, &[BLINK])
            .with_tactics(TacticalState::new(
                MoveType::Assault,
                Point2::new(5f32, 0f32),
                Point2::new(50f32, 0f32),
            ));
        let ctx = fixture.context();
        let current = Action::attack_move(Point2::new(50f32, 0f32));
        let action = StalkerMicro::default().unit_solve_combat(&unit, current, &ctx);
        assert!(action.uses(BLINK));
        let landing = action.position(&fixture.cache).unwrap_or(unit.position);
        assert!(landing.distance(unit.position) > 3f32);
        assert!(landing.distance(Point2::new(3f32, 0f32)) > 3f32);
    }

    #[test]
    fn low_shield_blinks_away_from_enemy_not_own_army() {
        let unit = stalker(3f32);
        let fixture = Fixture::new(vec![unit.clone()], vec![roach(20, 3f32)])
            .ready(1, &[BLINK])
            .with_tactics(TacticalState::new(
                MoveType::Assault,
                Point2::new(-5f32, 0f32),
                Point2::new(50f32, 0f32),
            ));
        let ctx = fixture.context();
        let current = Action::attack_move(Point2::new(50f32, 0f32));
        let action = StalkerMicro::default().unit_solve_combat(&unit, current, &ctx);
        assert!(action.uses(BLINK));
        let landing = action.position(&fixture.cache).unwrap_or(unit.position);
        assert!(landing.x < 0f32);
        assert!(landing.distance(Point2::new(3f32, 0f32)) > 3f32);
    }

    #[test]
    fn healthy_stalker_keeps_fighting() {
        let unit = stalker(80f32);
        let fixture = Fixture::new(vec![unit.clone()], vec![roach(20, 3f32)]).ready(1, &[BLINK]);
        let ctx = fixture.context();
        let current = Action::attack_move(Point2::new(50f32, 0f32));
        let action = StalkerMicro::default().unit_solve_combat(&unit, current, &ctx);
        assert!(!action.uses(BLINK));
    }

    #[test]
    fn out_of_combat_keeps_command() {
        let unit = stalker(3f32);
        let fixture = Fixture::new(vec![unit.clone()], vec![roach(20, 3f32)])
            .ready(1, &[BLINK])
            .with_tactics(
                TacticalState::new(MoveType::Assault, Point2::new(5f32, 0f32), Point2::new(50f32, 0f32))
                    .with_ratios(0.1f32, 0.1f32),
            );
        let ctx = fixture.context();
        let current = Action::attack_move(Point2::new(50f32, 0f32));
        assert_eq!(StalkerMicro::default().unit_solve_combat(&unit, current, &ctx), current);
    }

    #[test]
    fn retreat_blinks_towards_main() {
        let unit = stalker(80f32);
        let fixture = Fixture::new(vec![unit.clone()], vec![roach(20, 3f32)])
            .ready(1, &[BLINK])
            .with_tactics(TacticalState::new(
                MoveType::DefensiveRetreat,
                Point2::new(0f32, 0f32),
                Point2::new(-50f32, -50f32),
            ));
        let ctx = fixture.context();
        let current = Action::move_to(Point2::new(-50f32, -50f32));
        let action = StalkerMicro::default().unit_solve_combat(&unit, current, &ctx);
        assert!(action.uses(BLINK));
        let landing = action.position(&fixture.cache).unwrap_or(unit.position);
        assert!(landing.distance(fixture.own_main) < Point2::new(3f32, 0f32).distance(fixture.own_main));
    }
}
