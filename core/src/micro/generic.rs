use rust_sc2::prelude::*;

use crate::micro::priorities::PriorityTable;
use crate::micro::target_selector::{priority_score, select_best};
use crate::micro::{ready_to_shoot, safe_towards, Action, MicroContext, MicroController, MoveType};
use crate::params::SEARCH_RANGE;
use crate::snapshot::UnitSnapshot;

const KITE_DISTANCE: f32 = 2f32;

/// Focus fire on the best scored target, kiting units it outranges.
pub struct GenericMicro {
    table: &'static PriorityTable,
}

impl GenericMicro {
    pub fn new(table: &'static PriorityTable) -> Self {
        Self { table }
    }

    pub fn best_target<'a>(
        &self,
        unit: &UnitSnapshot,
        ctx: &MicroContext<'a>,
    ) -> Option<&'a UnitSnapshot> {
        select_best(ctx.enemies_near_by(unit), 0f32, |enemy| {
            priority_score(self.table, unit, enemy, SEARCH_RANGE)
        })
        .map(|(target, _)| target)
    }
}

impl MicroController for GenericMicro {
    fn unit_solve_combat(&mut self, unit: &UnitSnapshot, current: Action, ctx: &MicroContext) -> Action {
        if ctx.move_type().is_retreat() || ctx.move_type() == MoveType::GatherAndHold {
            return current;
        }
        let target = match self.best_target(unit, ctx) {
            Some(target) => target,
            None => return current,
        };
        if ready_to_shoot(unit) {
            return Action::attack(target.tag);
        }
        let our_range = unit.real_range_vs(target);
        let their_range = target.real_range_vs(unit);
        let distance = unit.distance(target.position);
        if our_range > their_range && distance < our_range {
            let back = safe_towards(unit.position, target.position, -KITE_DISTANCE);
            return Action::move_to(back);
        }
        current
    }
}
