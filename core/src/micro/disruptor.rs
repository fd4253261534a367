use std::collections::HashMap;

use rust_sc2::prelude::*;

use crate::micro::*;
use crate::params::{NOVA_DURATION, NOVA_INTERVAL};
use crate::snapshot::UnitSnapshot;

const NOVA: AbilityId = AbilityId::EffectPurificationNova;
const ENGAGE_RANGE: f32 = 14f32;
const NOVA_MIN_TARGETS: usize = 4;
const NOVA_WALK_RANGE: f32 = 12f32;

/// Fires purification novas into ground clumps, one disruptor at a time.
pub struct DisruptorMicro {
    last_nova: f32,
}

impl Default for DisruptorMicro {
    fn default() -> Self {
        Self {
            last_nova: f32::MIN,
        }
    }
}

impl DisruptorMicro {
    fn stay_safe(ctx: &MicroContext) -> Action {
        Action::move_to(ctx.pather.find_weak_influence_ground(ctx.tactics.center, 3f32))
    }
}

impl MicroController for DisruptorMicro {
    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        if ctx.move_type() == MoveType::DefensiveRetreat {
            return current;
        }
        let closest = ctx.enemies_near_by(unit).into_iter().closest(unit.position);
        match closest {
            Some(closest) if closest.distance(unit.position) <= ENGAGE_RANGE => {}
            _ => return current,
        }
        let targets = ctx
            .cache
            .enemy_in_range(unit.position, ENGAGE_RANGE)
            .into_iter()
            .filter(|u| !u.is_structure && !u.is_flying)
            .collect::<Vec<_>>();
        if ctx.time < self.last_nova + NOVA_INTERVAL || targets.len() < NOVA_MIN_TARGETS {
            return Self::stay_safe(ctx);
        }
        let center = match targets.iter().map(|u| u.position).center() {
            Some(center) => center,
            None => return Self::stay_safe(ctx),
        };
        if ctx.is_ready(unit, NOVA) {
            if ctx.pather.walk_distance(unit.position, center) <= NOVA_WALK_RANGE {
                self.last_nova = ctx.time;
                return Action::cast_at(NOVA, center);
            }
            return Action::move_to(center);
        }
        Self::stay_safe(ctx)
    }
}

/// Steers the nova ball: into the enemy centre while fresh, onto the closest
/// enemy as it runs out, away from our own units otherwise.
#[derive(Default)]
pub struct PurificationNovaMicro {
    spawned: HashMap<u64, f32>,
}

impl PurificationNovaMicro {
    fn time_left(&mut self, tag: u64, time: f32) -> f32 {
        let spawned = *self.spawned.entry(tag).or_insert(time);
        1f32 - (time - spawned) / NOVA_DURATION
    }
}

impl MicroController for PurificationNovaMicro {
    fn group_solve_combat(&mut self, _units: &[&UnitSnapshot], current: Action, ctx: &MicroContext) -> Action {
        // Shared by every squad, so only novas that are gone get forgotten.
        self.spawned.retain(|tag, _| ctx.cache.own_by_tag(*tag).is_some());
        current
    }

    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        let time_left = self.time_left(unit.tag, ctx.time);
        let targets = ctx
            .cache
            .enemy_in_range(unit.position, 10f32 * time_left)
            .into_iter()
            .filter(|u| !u.is_structure && !u.is_flying)
            .collect::<Vec<_>>();
        if !targets.is_empty() {
            let target = if time_left >= 0.4f32 {
                targets.iter().map(|u| u.position).center()
            } else {
                targets.iter().copied().closest(unit.position).map(|u| u.position)
            };
            if let Some(target) = target {
                return Action::move_to(target);
            }
        }
        let own = ctx
            .cache
            .own_in_range(unit.position, 4f32)
            .into_iter()
            .filter(|u| u.tag != unit.tag && !u.is_structure && !u.is_flying)
            .map(|u| u.position)
            .center();
        match own {
            Some(center) => Action::move_to(safe_towards(unit.position, center, -10f32)),
            None => current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn disruptor() -> UnitSnapshot {
        UnitSnapshot::new(1, UnitTypeId::Disruptor, Point2::new(0f32, 0f32)).armored()
    }

    fn lings(count: u64) -> Vec<UnitSnapshot> {
        (0..count)
            .map(|i| {
                UnitSnapshot::new(20 + i, UnitTypeId::Zergling, Point2::new(8f32, i as f32))
                    .with_ranges(0.1f32, 0f32)
                    .light()
            })
            .collect()
    }

    #[test]
    fn fires_into_clump() {
        let fixture = Fixture::new(vec![disruptor()], lings(5)).ready(1, &[NOVA]);
        let ctx = fixture.context();
        let mut micro = DisruptorMicro::default();
        let current = Action::attack_move(Point2::new(30f32, 0f32));
        let action = micro.unit_solve_combat(&disruptor(), current, &ctx);
        assert_eq!(action, Action::cast_at(NOVA, Point2::new(8f32, 2f32)));
        // A second disruptor holds while the first nova is out.
        let action = micro.unit_solve_combat(&disruptor(), current, &ctx);
        assert!(!action.uses(NOVA));
    }

    #[test]
    fn few_targets_stay_safe() {
        let fixture = Fixture::new(vec![disruptor()], lings(3)).ready(1, &[NOVA]);
        let ctx = fixture.context();
        let action = DisruptorMicro::default().unit_solve_combat(&disruptor(), Action::attack_move(Point2::new(30f32, 0f32)), &ctx);
        assert!(!action.uses(NOVA));
        assert!(!action.is_attack);
    }

    #[test]
    fn nova_switches_to_closest_when_fading() {
        let nova = UnitSnapshot::new(2, UnitTypeId::DisruptorPhased, Point2::new(0f32, 0f32));
        let enemies = vec![
            UnitSnapshot::new(20, UnitTypeId::Zergling, Point2::new(1f32, 0f32)),
            UnitSnapshot::new(21, UnitTypeId::Zergling, Point2::new(3f32, 2f32)),
        ];
        let mut micro = PurificationNovaMicro::default();
        let current = Action::move_to(Point2::new(9f32, 9f32));
        let fresh = Fixture::new(vec![nova.clone()], enemies.clone()).with_time(10f32);
        assert_eq!(
            micro.unit_solve_combat(&nova, current, &fresh.context()),
            Action::move_to(Point2::new(2f32, 1f32))
        );
        let fading = Fixture::new(vec![nova.clone()], enemies).with_time(11.5f32);
        assert_eq!(
            micro.unit_solve_combat(&nova, current, &fading.context()),
            Action::move_to(Point2::new(1f32, 0f32))
        );
    }

    #[test]
    fn nova_timers_survive_other_squads() {
        let first = UnitSnapshot::new(2, UnitTypeId::DisruptorPhased, Point2::new(0f32, 0f32));
        let second = UnitSnapshot::new(3, UnitTypeId::DisruptorPhased, Point2::new(0f32, 0f32));
        let enemies = vec![
            UnitSnapshot::new(20, UnitTypeId::Zergling, Point2::new(1f32, 0f32)),
            UnitSnapshot::new(21, UnitTypeId::Zergling, Point2::new(3f32, 2f32)),
        ];
        let mut micro = PurificationNovaMicro::default();
        let current = Action::move_to(Point2::new(9f32, 9f32));
        let mut last = vec![];
        for time in [10f32, 11.5f32] {
            let fixture = Fixture::new(vec![first.clone(), second.clone()], enemies.clone()).with_time(time);
            let ctx = fixture.context();
            last.clear();
            for nova in [&first, &second] {
                let group = micro.group_solve_combat(&[nova], current, &ctx);
                last.push(micro.unit_solve_combat(nova, group, &ctx));
            }
        }
        assert_eq!(last, vec![Action::move_to(Point2::new(1f32, 0f32)); 2]);
    }

    #[test]
    fn dead_novas_are_forgotten() {
        let nova = UnitSnapshot::new(2, UnitTypeId::DisruptorPhased, Point2::new(0f32, 0f32));
        let mut micro = PurificationNovaMicro::default();
        let current = Action::move_to(Point2::new(9f32, 9f32));
        let alive = Fixture::new(vec![nova.clone()], vec![]).with_time(10f32);
        micro.unit_solve_combat(&nova, current, &alive.context());
        let gone = Fixture::new(vec![], vec![]).with_time(11f32);
        micro.group_solve_combat(&[], current, &gone.context());
        assert!(micro.spawned.is_empty());
    }
}
