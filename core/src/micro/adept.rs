use rust_sc2::prelude::*;

use crate::micro::generic::GenericMicro;
use crate::micro::priorities::ADEPT_PRIORITY;
use crate::micro::target_selector::{adept_score, select_best};
use crate::micro::*;
use crate::snapshot::UnitSnapshot;

const SHIFT: AbilityId = AbilityId::AdeptPhaseShiftAdeptPhaseShift;
const CANCEL_SHIFT: AbilityId = AbilityId::CancelAdeptPhaseShift;

const STATIC_DEFENSE: [UnitTypeId; 4] = [
    UnitTypeId::Bunker,
    UnitTypeId::WidowMine,
    UnitTypeId::WidowMineBurrowed,
    UnitTypeId::PhotonCannon,
];
const LING_LIKE: [UnitTypeId; 4] = [
    UnitTypeId::Zergling,
    UnitTypeId::Marine,
    UnitTypeId::Zealot,
    UnitTypeId::Reaper,
];
const GROUND_FORCE: [UnitTypeId; 3] = [UnitTypeId::Stalker, UnitTypeId::Adept, UnitTypeId::Queen];

/// Adepts harass workers and use their shades either to scout ahead of a
/// target or to escape.
pub struct AdeptMicro {
    generic: GenericMicro,
    target: Option<Point2>,
    side_actions: Vec<(u64, Action)>,
}

impl Default for AdeptMicro {
    fn default() -> Self {
        Self {
            generic: GenericMicro::new(&ADEPT_PRIORITY),
            target: None,
            side_actions: vec![],
        }
    }
}

fn best_target<'a>(from: Point2, enemies: Vec<&'a UnitSnapshot>, shuffler: u64) -> Option<&'a UnitSnapshot> {
    select_best(enemies, 0f32, |enemy| adept_score(from, enemy, shuffler)).map(|(target, _)| target)
}

fn closest_of<'a>(
    ctx: &MicroContext<'a>,
    unit: &UnitSnapshot,
    range: f32,
    filter: impl Fn(&UnitSnapshot) -> bool,
) -> Option<&'a UnitSnapshot> {
    ctx.cache
        .enemy_in_range(unit.position, range)
        .into_iter()
        .filter(|u| filter(*u))
        .closest(unit.position)
}

impl AdeptMicro {
    const RULES: [Rule<Self>; 3] = [Self::shift_home, Self::harass, Self::assault];

    fn control_shade(&mut self, unit: &UnitSnapshot, shuffler: u64, ctx: &MicroContext) {
        let shade = match ctx.cooldowns.shade_of(unit.tag).and_then(|tag| ctx.cache.own_by_tag(tag)) {
            Some(shade) => shade,
            None => return,
        };
        if ctx.move_type().is_retreat() {
            self.side_actions.push((shade.tag, Action::move_to(ctx.own_main)));
            return;
        }
        if self.target.is_none() {
            let nearby = ctx.cache.enemy_in_range(shade.position, 12f32);
            self.target = best_target(shade.position, nearby, shuffler).map(|t| t.position);
        }
        if let Some(target) = self.target {
            self.side_actions
                .push((shade.tag, Action::move_to(safe_towards(target, unit.position, -1f32))));
        }
    }

    fn shift_home(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if ctx.move_type().is_retreat() && ctx.is_ready(unit, SHIFT) {
            Some(Action::cast_at(SHIFT, ctx.own_main))
        } else {
            None
        }
    }

    fn harass(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if ctx.move_type() != MoveType::Harass {
            return None;
        }
        if ctx.is_ready(unit, SHIFT) {
            return self.target.map(|target| Action::cast_at(SHIFT, target));
        }
        if let Some(defense) = closest_of(ctx, unit, 10f32, |u| STATIC_DEFENSE.contains(&u.type_id) && u.is_ready()) {
            return Some(Action::move_to(safe_towards(unit.position, defense.position, -4f32)));
        }
        let ready = ready_to_shoot(unit);
        if ready {
            if let Some(worker) = closest_of(ctx, unit, 9f32, |u| u.is_worker() && u.shield_health_percentage() <= 0.6f32) {
                return Some(Action::attack(worker.tag));
            }
        }
        if let Some(ling) = closest_of(ctx, unit, 8f32, |u| LING_LIKE.contains(&u.type_id)) {
            return if ready {
                Some(Action::attack(ling.tag))
            } else {
                Some(Action::move_to(safe_towards(unit.position, ling.position, -2f32)))
            };
        }
        if ready {
            if let Some(worker) = closest_of(ctx, unit, 9f32, |u| u.is_worker()) {
                return Some(Action::attack(worker.tag));
            }
        }
        closest_of(ctx, unit, 10f32, |u| GROUND_FORCE.contains(&u.type_id))
            .map(|force| Action::move_to(safe_towards(unit.position, force.position, -3f32)))
    }

    fn assault(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        let engaging = matches!(
            ctx.move_type(),
            MoveType::SearchAndDestroy | MoveType::Assault | MoveType::Push | MoveType::ReGroup
        );
        let model = matches!(
            ctx.model(),
            CombatModel::RoachToStalker
                | CombatModel::AssaultRamp
                | CombatModel::StalkerToSiege
                | CombatModel::StalkerToRoach
        );
        if !engaging || !model {
            return None;
        }
        if ctx.is_ready(unit, SHIFT) {
            return self.target.map(|target| Action::cast_at(SHIFT, target));
        }
        let shade = ctx
            .cooldowns
            .shade_of(unit.tag)
            .and_then(|tag| ctx.cache.own_by_tag(tag));
        if let Some(shade) = shade {
            if ctx.cache.danger_at(unit.position, false) < ctx.cache.danger_at(shade.position, false) {
                return Some(Action::cast_at(CANCEL_SHIFT, unit.position));
            }
        }
        if !ready_to_shoot(unit) {
            return None;
        }
        closest_of(ctx, unit, 6f32, |u| u.is_worker())
            .or_else(|| closest_of(ctx, unit, 8f32, |u| u.is_light && !u.is_flying))
            .map(|target| Action::attack(target.tag))
    }
}

impl MicroController for AdeptMicro {
    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        let shuffler = unit.tag % 10;
        self.target = best_target(unit.position, ctx.enemies_near_by(unit), shuffler).map(|t| t.position);
        self.control_shade(unit, shuffler, ctx);
        match first_match(self, &Self::RULES, unit, current, ctx) {
            Some(action) => action,
            None => self.generic.unit_solve_combat(unit, current, ctx),
        }
    }

    fn drain_side_actions(&mut self) -> Vec<(u64, Action)> {
        std::mem::take(&mut self.side_actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn adept() -> UnitSnapshot {
        UnitSnapshot::new(1, UnitTypeId::Adept, Point2::new(0f32, 0f32))
            .with_ranges(4f32, 0f32)
            .light()
    }

    fn harass() -> TacticalState {
        TacticalState::new(MoveType::Harass, Point2::new(0f32, 0f32), Point2::new(30f32, 0f32))
    }

    fn probe(tag: u64, x: f32) -> UnitSnapshot {
        UnitSnapshot::new(tag, UnitTypeId::Probe, Point2::new(x, 0f32))
            .light()
            .with_power(0.5f32)
            .with_ranges(0.1f32, 0f32)
    }

    #[test]
    fn harass_shifts_onto_workers() {
        let fixture = Fixture::new(vec![adept()], vec![probe(20, 6f32)])
            .with_tactics(harass())
            .ready(1, &[SHIFT]);
        let ctx = fixture.context();
        let action = AdeptMicro::default().unit_solve_combat(&adept(), Action::attack_move(Point2::new(30f32, 0f32)), &ctx);
        assert_eq!(action, Action::cast_at(SHIFT, Point2::new(6f32, 0f32)));
    }

    #[test]
    fn harass_avoids_ready_cannon() {
        let cannon = UnitSnapshot::new(30, UnitTypeId::PhotonCannon, Point2::new(5f32, 0f32))
            .structure()
            .with_ranges(7f32, 7f32);
        let fixture = Fixture::new(vec![adept()], vec![cannon, probe(20, 3f32)]).with_tactics(harass());
        let ctx = fixture.context();
        let action = AdeptMicro::default().unit_solve_combat(&adept(), Action::attack_move(Point2::new(30f32, 0f32)), &ctx);
        assert_eq!(action, Action::move_to(Point2::new(-4f32, 0f32)));
    }

    #[test]
    fn harass_finishes_wounded_workers() {
        let wounded = probe(21, 7f32).with_health(10f32, 20f32).with_shield(0f32, 20f32);
        let fixture = Fixture::new(vec![adept()], vec![probe(20, 3f32), wounded]).with_tactics(harass());
        let ctx = fixture.context();
        let action = AdeptMicro::default().unit_solve_combat(&adept(), Action::attack_move(Point2::new(30f32, 0f32)), &ctx);
        assert_eq!(action, Action::attack(21));
    }

    #[test]
    fn shade_moves_past_target() {
        let shade = UnitSnapshot::new(2, UnitTypeId::AdeptPhaseShift, Point2::new(1f32, 0f32));
        let mut fixture = Fixture::new(vec![adept(), shade], vec![probe(20, 6f32)]).with_tactics(harass());
        fixture.cooldowns.link_shade(1, 2);
        let ctx = fixture.context();
        let mut micro = AdeptMicro::default();
        micro.unit_solve_combat(&adept(), Action::attack_move(Point2::new(30f32, 0f32)), &ctx);
        assert_eq!(
            micro.drain_side_actions(),
            vec![(2, Action::move_to(Point2::new(7f32, 0f32)))]
        );
        assert!(micro.drain_side_actions().is_empty());
    }

    #[test]
    fn retreat_shifts_home() {
        let fixture = Fixture::new(vec![adept()], vec![probe(20, 6f32)])
            .with_tactics(TacticalState::new(
                MoveType::PanicRetreat,
                Point2::new(0f32, 0f32),
                Point2::new(-50f32, -50f32),
            ))
            .ready(1, &[SHIFT]);
        let ctx = fixture.context();
        let action = AdeptMicro::default().unit_solve_combat(&adept(), Action::move_to(Point2::new(-50f32, -50f32)), &ctx);
        assert_eq!(action, Action::cast_at(SHIFT, fixture.own_main));
    }
}
