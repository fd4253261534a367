use rust_sc2::prelude::*;

use crate::micro::generic::GenericMicro;
use crate::micro::priorities::STALKER_PRIORITY;
use crate::micro::*;
use crate::snapshot::UnitSnapshot;

const FEEDBACK: AbilityId = AbilityId::FeedbackFeedback;
const STORM: AbilityId = AbilityId::PsiStormPsiStorm;
const STORM_SCAN_RANGE: f32 = 12f32;
const STORM_MIN_TARGETS: usize = 5;

pub struct HighTemplarMicro {
    generic: GenericMicro,
}

impl Default for HighTemplarMicro {
    fn default() -> Self {
        Self {
            generic: GenericMicro::new(&STALKER_PRIORITY),
        }
    }
}

impl HighTemplarMicro {
    fn feedback_target<'a>(unit: &UnitSnapshot, range: f32, ctx: &MicroContext<'a>) -> Option<&'a UnitSnapshot> {
        ctx.cache
            .enemy_in_range(unit.position, range)
            .into_iter()
            .filter(|u| u.energy_percentage() > 0.5f32 && !u.is_structure)
            .closest(unit.position)
    }

    fn last_feedback(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if unit.shield_health_percentage() > 0.3f32 || !ctx.is_ready(unit, FEEDBACK) {
            return None;
        }
        Self::feedback_target(unit, 10f32, ctx).map(|target| Action::cast_on(FEEDBACK, target.tag))
    }

    fn out_of_combat(&mut self, _: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Option<Action> {
        if ctx.tactics.in_combat() {
            None
        } else {
            Some(current)
        }
    }

    fn storm(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !ctx.is_ready(unit, STORM) {
            return None;
        }
        let targets = ctx
            .cache
            .enemy_in_range(unit.position, STORM_SCAN_RANGE)
            .into_iter()
            .filter(|u| !u.is_structure && !u.has_buff(BuffId::PsiStorm))
            .collect::<Vec<_>>();
        if targets.len() < STORM_MIN_TARGETS {
            return None;
        }
        let center = targets.iter().map(|u| u.position).center()?;
        Some(Action::cast_at(STORM, center))
    }

    fn feedback(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !ctx.is_ready(unit, FEEDBACK) {
            return None;
        }
        Self::feedback_target(unit, 11f32, ctx).map(|target| Action::cast_on(FEEDBACK, target.tag))
    }

    const RULES: [Rule<Self>; 4] = [
        Self::last_feedback,
        Self::out_of_combat,
        Self::storm,
        Self::feedback,
    ];
}

impl MicroController for HighTemplarMicro {
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

    fn templar() -> UnitSnapshot {
        UnitSnapshot::new(1, UnitTypeId::HighTemplar, Point2::new(0f32, 0f32))
            .with_ranges(6f32, 0f32)
            .with_energy(100f32)
    }

    fn marines(count: u64) -> Vec<UnitSnapshot> {
        (0..count)
            .map(|i| UnitSnapshot::new(20 + i, UnitTypeId::Marine, Point2::new(6f32, i as f32)).light())
            .collect()
    }

    #[test]
    fn storms_clumped_enemies() {
        let fixture = Fixture::new(vec![templar()], marines(5)).ready(1, &[STORM]);
        let ctx = fixture.context();
        let action = HighTemplarMicro::default().unit_solve_combat(&templar(), Action::attack_move(Point2::new(20f32, 0f32)), &ctx);
        assert_eq!(action, Action::cast_at(STORM, Point2::new(6f32, 2f32)));
    }

    #[test]
    fn too_few_for_storm() {
        let fixture = Fixture::new(vec![templar()], marines(4)).ready(1, &[STORM]);
        let ctx = fixture.context();
        let action = HighTemplarMicro::default().unit_solve_combat(&templar(), Action::attack_move(Point2::new(20f32, 0f32)), &ctx);
        assert!(!action.uses(STORM));
    }

    #[test]
    fn dying_templar_feedbacks() {
        let unit = templar().with_health(10f32, 40f32).with_shield(0f32, 40f32);
        let raven = UnitSnapshot::new(30, UnitTypeId::Raven, Point2::new(5f32, 0f32))
            .flying()
            .with_energy(150f32);
        let fixture = Fixture::new(vec![unit.clone()], vec![raven])
            .ready(1, &[FEEDBACK])
            .with_tactics(
                TacticalState::new(MoveType::Assault, Point2::new(0f32, 0f32), Point2::new(20f32, 0f32))
                    .with_ratios(0f32, 0f32),
            );
        let ctx = fixture.context();
        let action = HighTemplarMicro::default().unit_solve_combat(&unit, Action::attack_move(Point2::new(20f32, 0f32)), &ctx);
        assert_eq!(action, Action::cast_on(FEEDBACK, 30));
    }
}
