use std::collections::HashMap;

use rust_sc2::prelude::*;

use crate::micro::*;
use crate::params::{GAME_LOOPS_PER_SECOND, PRISM_PHASE_COOLDOWN, PRISM_TRANSPORT_DELAY};
use crate::snapshot::UnitSnapshot;

const PHASING: AbilityId = AbilityId::MorphWarpPrismPhasingMode;
const TRANSPORT: AbilityId = AbilityId::MorphWarpPrismTransportMode;
const UNLOAD: AbilityId = AbilityId::UnloadAllAtWarpPrism;

const WARP_IN_TYPES: [UnitTypeId; 6] = [
    UnitTypeId::Zealot,
    UnitTypeId::Stalker,
    UnitTypeId::Adept,
    UnitTypeId::Sentry,
    UnitTypeId::HighTemplar,
    UnitTypeId::DarkTemplar,
];

const ANCHOR_TYPES: [UnitTypeId; 4] = [
    UnitTypeId::Colossus,
    UnitTypeId::Immortal,
    UnitTypeId::Archon,
    UnitTypeId::HighTemplar,
];

const PICKUP_SCAN_RANGE: f32 = 14f32;
const PICKUP_RANGE: f32 = 12f32;

/// Moves a prism out of harm's way, escaping cyclone lock-ons and keeping 15
/// away from anti air and bunkers.
pub fn prism_evasive_move_to(prism: &UnitSnapshot, destination: Point2, ctx: &MicroContext) -> Action {
    let mut position = prism.position;
    if ctx.is_locked_on(prism) {
        let cyclone = ctx
            .cache
            .enemy_in_range(prism.position, 20f32)
            .into_iter()
            .filter(|u| u.type_id == UnitTypeId::Cyclone)
            .closest(prism.position);
        if let Some(cyclone) = cyclone {
            position = safe_towards(position, cyclone.position, -18f32);
        }
    }
    let threats = ctx
        .cache
        .enemy_in_range(prism.position, 13f32)
        .into_iter()
        .filter(|u| u.can_attack_air() || u.type_id == UnitTypeId::Bunker)
        .collect::<Vec<_>>();
    if threats.is_empty() {
        return Action::move_to(destination);
    }
    for threat in threats {
        let distance = prism.distance(threat.position);
        position = safe_towards(position, threat.position, -(15f32 - distance));
    }
    Action::move_to(safe_towards(position, destination, 3f32))
}

/// Warp prism supporting the army: phases for reinforcements, rescues
/// wounded units that just fired and drops them back in once they can shoot.
#[derive(Default)]
pub struct WarpPrismMicro {
    release_tags: HashMap<u64, f32>,
}

impl WarpPrismMicro {
    const RULES: [Rule<Self>; 5] = [
        Self::phase,
        Self::transport,
        Self::unload,
        Self::rescue_locked_on,
        Self::pick_up,
    ];

    fn phase(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if unit.type_id != UnitTypeId::WarpPrism || ctx.supply_left <= 3 {
            return None;
        }
        let gates = ctx.cache.own_of_type(UnitTypeId::WarpGate);
        let ready = gates
            .iter()
            .filter(|gate| ctx.is_ready(gate, AbilityId::WarpGateTrainZealot))
            .count();
        if ready >= 2
            && ready >= gates.len()
            && ctx
                .cooldowns
                .is_ready_after(unit.tag, TRANSPORT, PRISM_PHASE_COOLDOWN)
        {
            Some(Action::cast(PHASING))
        } else {
            None
        }
    }

    fn transport(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if unit.type_id != UnitTypeId::WarpPrismPhasing
            || !ctx
                .cooldowns
                .is_ready_after(unit.tag, PHASING, PRISM_TRANSPORT_DELAY)
        {
            return None;
        }
        let warping_in = ctx
            .cache
            .own_of_types(&WARP_IN_TYPES)
            .into_iter()
            .any(|u| !u.is_ready() && u.distance(unit.position) <= 4f32);
        if warping_in {
            None
        } else {
            Some(Action::cast(TRANSPORT))
        }
    }

    fn unload(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if unit.cargo_used == 0 {
            return None;
        }
        let released = unit
            .passengers
            .iter()
            .any(|tag| self.release_tags.get(tag).copied().unwrap_or_default() < ctx.time);
        if !released || !ctx.pather.is_pathable(unit.position) {
            return None;
        }
        let touching = ctx
            .cache
            .enemy_in_range(unit.position, 4f32)
            .into_iter()
            .any(|enemy| enemy.radius + 1f32 > enemy.distance(unit.position));
        if touching {
            None
        } else {
            Some(Action::cast_at(UNLOAD, unit.position))
        }
    }

    fn can_carry(unit: &UnitSnapshot) -> bool {
        unit.cargo_left() > 0 && unit.shield > 0f32 && unit.shield + unit.health > 50f32
    }

    fn rescue_locked_on(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !Self::can_carry(unit) {
            return None;
        }
        ctx.cache
            .own_in_range(unit.position, PICKUP_SCAN_RANGE)
            .into_iter()
            .find(|own| own.tag != unit.tag && ctx.is_locked_on(own))
            .map(|own| Action::cast_on(AbilityId::Smart, own.tag))
    }

    fn pick_up(&mut self, unit: &UnitSnapshot, _: Action, ctx: &MicroContext) -> Option<Action> {
        if !Self::can_carry(unit) {
            return None;
        }
        let cargo_left = unit.cargo_left();
        let best = ctx
            .cache
            .own_in_range(unit.position, PICKUP_SCAN_RANGE)
            .into_iter()
            .filter(|own| {
                own.tag != unit.tag
                    && !own.is_flying
                    && !own.is_structure
                    && own.cargo_size <= cargo_left
                    && own.shield <= 0f32
                    && own.weapon_cooldown >= 2f32
                    && own.distance(unit.position) <= PICKUP_RANGE
            })
            .map(|own| {
                let score = own.ground_range * (1.1f32 - own.health_percentage()) * own.power - 1f32;
                (own, score)
            })
            .fold(None, |best: Option<(&UnitSnapshot, f32)>, (own, score)| {
                if score > best.map_or(0f32, |(_, s)| s) {
                    Some((own, score))
                } else {
                    best
                }
            });
        let (own, _) = best?;
        self.release_tags
            .insert(own.tag, ctx.time + own.weapon_cooldown / GAME_LOOPS_PER_SECOND);
        Some(Action::cast_on(AbilityId::Smart, own.tag))
    }

    fn find_safe_position(unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        let anchor = ctx
            .cache
            .own_of_types(&ANCHOR_TYPES)
            .into_iter()
            .filter(|u| u.distance(unit.position) <= 10f32)
            .map(|u| u.position)
            .center();
        let focus = anchor
            .or_else(|| current.position(ctx.cache))
            .unwrap_or(ctx.tactics.center);
        prism_evasive_move_to(unit, focus, ctx)
    }
}

impl MicroController for WarpPrismMicro {
    fn group_solve_combat(&mut self, _units: &[&UnitSnapshot], current: Action, ctx: &MicroContext) -> Action {
        // A passenger without an entry counts as released.
        self.release_tags.retain(|_, release| *release >= ctx.time);
        current
    }

    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        match first_match(self, &Self::RULES, unit, current, ctx) {
            Some(action) => action,
            None => Self::find_safe_position(unit, current, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::Fixture;

    fn prism() -> UnitSnapshot {
        UnitSnapshot::new(1, UnitTypeId::WarpPrism, Point2::new(0f32, 0f32))
            .flying()
            .with_shield(100f32, 100f32)
            .with_health(80f32, 80f32)
            .with_cargo(0, 8)
    }

    fn gate(tag: u64) -> UnitSnapshot {
        UnitSnapshot::new(tag, UnitTypeId::WarpGate, Point2::new(-30f32, tag as f32 * 3f32)).structure()
    }

    #[test]
    fn phases_when_all_gates_ready() {
        let fixture = Fixture::new(vec![prism(), gate(10), gate(11)], vec![])
            .ready(10, &[AbilityId::WarpGateTrainZealot])
            .ready(11, &[AbilityId::WarpGateTrainZealot]);
        let ctx = fixture.context();
        let action = WarpPrismMicro::default().unit_solve_combat(&prism(), Action::move_to(Point2::new(5f32, 5f32)), &ctx);
        assert_eq!(action, Action::cast(PHASING));
    }

    #[test]
    fn waits_for_every_gate() {
        let fixture = Fixture::new(vec![prism(), gate(10), gate(11), gate(12)], vec![])
            .ready(10, &[AbilityId::WarpGateTrainZealot])
            .ready(11, &[AbilityId::WarpGateTrainZealot]);
        let ctx = fixture.context();
        let action = WarpPrismMicro::default().unit_solve_combat(&prism(), Action::move_to(Point2::new(5f32, 5f32)), &ctx);
        assert!(!action.uses(PHASING));
    }

    #[test]
    fn picks_up_wounded_unit_after_shot() {
        let stalker = UnitSnapshot::new(5, UnitTypeId::Stalker, Point2::new(3f32, 0f32))
            .with_ranges(6f32, 6f32)
            .with_health(20f32, 80f32)
            .with_shield(0f32, 80f32)
            .with_weapon_cooldown(20f32)
            .with_power(2f32)
            .with_cargo_size(2);
        let fixture = Fixture::new(vec![prism(), stalker.clone()], vec![]);
        let ctx = fixture.context();
        let mut micro = WarpPrismMicro::default();
        let action = micro.unit_solve_combat(&prism(), Action::move_to(Point2::new(5f32, 5f32)), &ctx);
        assert_eq!(action, Action::cast_on(AbilityId::Smart, 5));
        // Loaded and released once the cooldown passed.
        let loaded = prism().with_cargo(2, 8).with_passenger(5, 2);
        let later = Fixture::new(vec![loaded.clone()], vec![]).with_time(302f32);
        let action = micro.unit_solve_combat(&loaded, Action::move_to(Point2::new(5f32, 5f32)), &later.context());
        assert_eq!(action, Action::cast_at(UNLOAD, loaded.position));
    }

    #[test]
    fn release_times_are_dropped_once_passed() {
        let stalker = UnitSnapshot::new(5, UnitTypeId::Stalker, Point2::new(3f32, 0f32))
            .with_ranges(6f32, 6f32)
            .with_health(20f32, 80f32)
            .with_shield(0f32, 80f32)
            .with_weapon_cooldown(20f32)
            .with_power(2f32)
            .with_cargo_size(2);
        let mut micro = WarpPrismMicro::default();
        let current = Action::move_to(Point2::new(5f32, 5f32));
        let fixture = Fixture::new(vec![prism(), stalker], vec![]);
        micro.unit_solve_combat(&prism(), current, &fixture.context());
        let waiting = Fixture::new(vec![prism()], vec![]).with_time(300.5f32);
        micro.group_solve_combat(&[], current, &waiting.context());
        assert_eq!(micro.release_tags.len(), 1);
        let later = Fixture::new(vec![prism()], vec![]).with_time(302f32);
        micro.group_solve_combat(&[], current, &later.context());
        assert!(micro.release_tags.is_empty());
    }

    #[test]
    fn holds_cargo_when_enemy_touching() {
        let loaded = prism().with_cargo(2, 8).with_passenger(5, 2);
        let zergling = UnitSnapshot::new(30, UnitTypeId::Zergling, Point2::new(0.5f32, 0f32)).with_ranges(0.1f32, 0f32);
        let fixture = Fixture::new(vec![loaded.clone()], vec![zergling]);
        let ctx = fixture.context();
        let action = WarpPrismMicro::default().unit_solve_combat(&loaded, Action::move_to(Point2::new(5f32, 5f32)), &ctx);
        assert!(!action.uses(UNLOAD));
    }

    #[test]
    fn evades_anti_air() {
        let marine = UnitSnapshot::new(30, UnitTypeId::Marine, Point2::new(5f32, 0f32)).with_ranges(5f32, 5f32);
        let fixture = Fixture::new(vec![prism()], vec![marine]);
        let ctx = fixture.context();
        let action = prism_evasive_move_to(&prism(), Point2::new(-20f32, 0f32), &ctx);
        assert_eq!(action, Action::move_to(Point2::new(-13f32, 0f32)));
    }
}
