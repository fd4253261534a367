//! Per unit combat decisions.
//!
//! Every controller receives the command the army logic would give the unit
//! and may refine it. Controllers are written as ordered rule lists: the first
//! rule that produces an action wins and the generic focus fire logic is the
//! last resort.

pub mod adept;
pub mod disruptor;
pub mod generic;
pub mod high_templar;
pub mod immortal;
pub mod mothership;
pub mod observer;
pub mod phoenix;
pub mod priorities;
pub mod stalker;
pub mod target_selector;
pub mod warp_prism;

use rust_sc2::prelude::*;

use crate::managers::cache_manager::UnitCache;
use crate::managers::cooldown_manager::CooldownTracker;
use crate::params::*;
use crate::pathing::Pather;
use crate::snapshot::UnitSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    SearchAndDestroy,
    Assault,
    Push,
    ReGroup,
    DefensiveRetreat,
    PanicRetreat,
    Harass,
    GatherAndHold,
}

impl MoveType {
    pub fn is_retreat(self) -> bool {
        matches!(self, MoveType::DefensiveRetreat | MoveType::PanicRetreat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatModel {
    Default,
    StalkerToRoach,
    StalkerToSpeedlings,
    StalkerToSiege,
    AssaultRamp,
    RoachToStalker,
}

/// What the squad as a whole is doing this tick.
#[derive(Debug, Clone)]
pub struct TacticalState {
    pub move_type: MoveType,
    pub model: CombatModel,
    pub engage_ratio: f32,
    pub can_engage_ratio: f32,
    pub center: Point2,
    pub has_ground_units: bool,
    pub tags: Vec<u64>,
    pub target: Point2,
}

impl TacticalState {
    pub fn new(move_type: MoveType, center: Point2, target: Point2) -> Self {
        Self {
            move_type,
            model: CombatModel::Default,
            engage_ratio: 1f32,
            can_engage_ratio: 1f32,
            center,
            has_ground_units: false,
            tags: vec![],
            target,
        }
    }

    pub fn with_model(mut self, model: CombatModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_ratios(mut self, engage_ratio: f32, can_engage_ratio: f32) -> Self {
        self.engage_ratio = engage_ratio;
        self.can_engage_ratio = can_engage_ratio;
        self
    }

    pub fn with_ground_units(mut self, has_ground_units: bool) -> Self {
        self.has_ground_units = has_ground_units;
        self
    }

    pub fn in_combat(&self) -> bool {
        !(self.engage_ratio < ENGAGE_RATIO_THRESHOLD
            && self.can_engage_ratio < ENGAGE_RATIO_THRESHOLD)
    }
}

/// A refined command for one unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    pub target: Target,
    pub is_attack: bool,
    pub ability: Option<AbilityId>,
}

impl Action {
    pub fn move_to(pos: Point2) -> Self {
        Self {
            target: Target::Pos(pos),
            is_attack: false,
            ability: None,
        }
    }

    pub fn attack_move(pos: Point2) -> Self {
        Self {
            target: Target::Pos(pos),
            is_attack: true,
            ability: None,
        }
    }

    pub fn attack(tag: u64) -> Self {
        Self {
            target: Target::Tag(tag),
            is_attack: true,
            ability: None,
        }
    }

    /// Right click on a unit, used to load into transports.
    pub fn follow(tag: u64) -> Self {
        Self {
            target: Target::Tag(tag),
            is_attack: false,
            ability: None,
        }
    }

    pub fn cast_at(ability: AbilityId, pos: Point2) -> Self {
        Self {
            target: Target::Pos(pos),
            is_attack: false,
            ability: Some(ability),
        }
    }

    pub fn cast_on(ability: AbilityId, tag: u64) -> Self {
        Self {
            target: Target::Tag(tag),
            is_attack: false,
            ability: Some(ability),
        }
    }

    pub fn cast(ability: AbilityId) -> Self {
        Self {
            target: Target::None,
            is_attack: false,
            ability: Some(ability),
        }
    }

    pub fn uses(&self, ability: AbilityId) -> bool {
        self.ability == Some(ability)
    }

    pub fn position(&self, cache: &UnitCache) -> Option<Point2> {
        match self.target {
            Target::Pos(pos) => Some(pos),
            Target::Tag(tag) => cache.by_tag(tag).map(|u| u.position),
            Target::None => None,
        }
    }
}

/// Everything a controller may read while deciding.
pub struct MicroContext<'a> {
    pub cache: &'a UnitCache,
    pub cooldowns: &'a CooldownTracker,
    pub pather: &'a dyn Pather,
    pub tactics: &'a TacticalState,
    pub time: f32,
    pub own_main: Point2,
    pub enemy_main: Point2,
    pub enemy_race: Race,
    pub supply_left: u32,
}

impl<'a> MicroContext<'a> {
    pub fn move_type(&self) -> MoveType {
        self.tactics.move_type
    }

    pub fn model(&self) -> CombatModel {
        self.tactics.model
    }

    /// Visible enemies around the unit that matter for its decisions.
    pub fn enemies_near_by(&self, unit: &UnitSnapshot) -> Vec<&'a UnitSnapshot> {
        self.cache.enemy_in_range(unit.position, SEARCH_RANGE)
    }

    pub fn enemies_of_types(&self, unit: &UnitSnapshot, types: &[UnitTypeId]) -> Vec<&'a UnitSnapshot> {
        self.enemies_near_by(unit)
            .into_iter()
            .filter(|u| types.contains(&u.type_id))
            .collect()
    }

    pub fn is_ready(&self, unit: &UnitSnapshot, ability: AbilityId) -> bool {
        self.cooldowns.is_ready(unit.tag, ability)
    }

    pub fn is_locked_on(&self, unit: &UnitSnapshot) -> bool {
        unit.has_buff(BuffId::LockOn)
    }
}

/// Units worth diving onto or focusing with heavy hitters.
pub const SIEGE_TYPES: [UnitTypeId; 9] = [
    UnitTypeId::SiegeTank,
    UnitTypeId::SiegeTankSieged,
    UnitTypeId::LiberatorAG,
    UnitTypeId::WidowMineBurrowed,
    UnitTypeId::LurkerMP,
    UnitTypeId::LurkerMPBurrowed,
    UnitTypeId::Disruptor,
    UnitTypeId::Colossus,
    UnitTypeId::Tempest,
];

pub fn ready_to_shoot(unit: &UnitSnapshot) -> bool {
    unit.weapon_cooldown <= READY_TO_SHOOT_COOLDOWN
}

pub type Rule<T> = fn(&mut T, &UnitSnapshot, Action, &MicroContext) -> Option<Action>;

/// Runs rules in order, returning the first produced action.
pub fn first_match<T>(
    controller: &mut T,
    rules: &[Rule<T>],
    unit: &UnitSnapshot,
    current: Action,
    ctx: &MicroContext,
) -> Option<Action> {
    rules
        .iter()
        .find_map(|rule| rule(controller, unit, current, ctx))
}

pub trait MicroController {
    /// Runs once per squad before the per unit decisions.
    fn group_solve_combat(
        &mut self,
        _units: &[&UnitSnapshot],
        current: Action,
        _ctx: &MicroContext,
    ) -> Action {
        current
    }

    fn unit_solve_combat(
        &mut self,
        unit: &UnitSnapshot,
        current: Action,
        ctx: &MicroContext,
    ) -> Action;

    /// Commands for units other than the one decided on, such as adept
    /// shades.
    fn drain_side_actions(&mut self) -> Vec<(u64, Action)> {
        vec![]
    }
}

/// Pushes `origin` away from every threat by `evade - distance` and then
/// projects `travel` towards the destination.
pub fn evade_from<'a, I>(origin: Point2, threats: I, evade: f32) -> Point2
where
    I: IntoIterator<Item = &'a UnitSnapshot>,
{
    let mut position = origin;
    for threat in threats {
        let distance = threat.distance(origin);
        if distance > 0f32 {
            position = safe_towards(position, threat.position, -(evade - distance));
        }
    }
    position
}

/// `towards` that stays put instead of producing NaN on identical points.
pub fn safe_towards(from: Point2, to: Point2, offset: f32) -> Point2 {
    if from.distance(to) < f32::EPSILON {
        from
    } else {
        from.towards(to, offset)
    }
}

/// Moves towards `destination` while keeping away from visible anti air.
pub fn evasive_move_to(unit: &UnitSnapshot, destination: Point2, ctx: &MicroContext) -> Action {
    let anti_air = ctx
        .cache
        .enemy_in_range(unit.position, 11f32)
        .into_iter()
        .filter(|u| u.can_attack_air())
        .collect::<Vec<_>>();
    if anti_air.is_empty() {
        return Action::move_to(destination);
    }
    let position = evade_from(unit.position, anti_air, 15f32);
    let travel = unit.distance(position);
    Action::move_to(safe_towards(position, destination, travel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evasion_moves_away_from_single_threat() {
        let threat = UnitSnapshot::new(1, UnitTypeId::Marine, Point2::new(10f32, 0f32));
        let evaded = evade_from(Point2::new(5f32, 0f32), [&threat], 15f32);
        assert!((evaded.x - -5f32).abs() < 0.001f32);
        assert!(evaded.y.abs() < 0.001f32);
    }

    #[test]
    fn safe_towards_identical_points() {
        let p = Point2::new(3f32, 3f32);
        assert_eq!(safe_towards(p, p, 5f32), p);
    }

    #[test]
    fn combat_gate_needs_both_ratios_low() {
        let state = TacticalState::new(MoveType::Assault, Point2::new(0f32, 0f32), Point2::new(1f32, 1f32));
        assert!(!state.clone().with_ratios(0.1f32, 0.2f32).in_combat());
        assert!(state.clone().with_ratios(0.3f32, 0.2f32).in_combat());
        assert!(state.with_ratios(0.1f32, 0.25f32).in_combat());
    }

    #[test]
    fn rules_stop_at_first_match() {
        struct Counter {
            calls: usize,
        }
        fn skip(c: &mut Counter, _: &UnitSnapshot, _: Action, _: &MicroContext) -> Option<Action> {
            c.calls += 1;
            None
        }
        fn hit(c: &mut Counter, u: &UnitSnapshot, _: Action, _: &MicroContext) -> Option<Action> {
            c.calls += 1;
            Some(Action::attack(u.tag))
        }
        let fixture = crate::test_utils::Fixture::new(vec![], vec![]);
        let ctx = fixture.context();
        let unit = UnitSnapshot::new(5, UnitTypeId::Stalker, Point2::new(0f32, 0f32));
        let mut counter = Counter { calls: 0 };
        let rules: [Rule<Counter>; 3] = [skip, hit, hit];
        let action = first_match(
            &mut counter,
            &rules,
            &unit,
            Action::move_to(Point2::new(1f32, 1f32)),
            &ctx,
        );
        assert_eq!(action, Some(Action::attack(5)));
        assert_eq!(counter.calls, 2);
    }
}
