use rust_sc2::prelude::*;

use crate::micro::generic::GenericMicro;
use crate::micro::priorities::IMMORTAL_PRIORITY;
use crate::micro::*;
use crate::snapshot::UnitSnapshot;

const ARMORED_SCAN_RANGE: f32 = 10f32;

pub struct ImmortalMicro {
    generic: GenericMicro,
}

impl Default for ImmortalMicro {
    fn default() -> Self {
        Self {
            generic: GenericMicro::new(&IMMORTAL_PRIORITY),
        }
    }
}

fn engages(move_type: MoveType) -> bool {
    matches!(
        move_type,
        MoveType::SearchAndDestroy
            | MoveType::Assault
            | MoveType::Push
            | MoveType::ReGroup
            | MoveType::DefensiveRetreat
    )
}

impl ImmortalMicro {
    const RULES: [Rule<Self>; 2] = [Self::shoot_siege, Self::shoot_armored];

    fn shoot_siege(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Option<Action> {
        if ctx.model() != CombatModel::StalkerToSiege || !ready_to_shoot(unit) || !current.is_attack {
            return None;
        }
        ctx.enemies_of_types(unit, &SIEGE_TYPES)
            .into_iter()
            .filter(|u| !u.is_flying && u.is_armored)
            .closest(unit.position)
            .map(|target| Action::attack(target.tag))
    }

    fn shoot_armored(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Option<Action> {
        if !ready_to_shoot(unit) || !current.is_attack {
            return None;
        }
        ctx.cache
            .enemy_in_range(unit.position, ARMORED_SCAN_RANGE)
            .into_iter()
            .filter(|u| u.is_armored && !u.is_flying && !u.is_structure)
            .closest(unit.position)
            .map(|target| Action::attack(target.tag))
    }
}

impl MicroController for ImmortalMicro {
    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        if engages(ctx.move_type()) {
            if let Some(action) = first_match(self, &Self::RULES, unit, current, ctx) {
                return action;
            }
        }
        self.generic.unit_solve_combat(unit, current, ctx)
    }
}
