pub mod pvp;
pub mod pvt;
pub mod pvz;

use rust_sc2::prelude::*;

use zealous_core::managers::build_detector::EnemyRushBuild;
use zealous_core::managers::build_detector::EnemyRushBuild::*;

use crate::plan::Goal;

/// Production plan answering an enemy archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseBuild {
    PvpMacro,
    CounterProxyZealots,
    CounterCannonRush,
    Counter4Gate,
    CounterAir,
    CounterRobo,
    PunishEarlyExpand,
    CounterFastDt,
    PvzEcoStart,
    PvzMacro,
    CounterLingRush,
    CounterRoachRush,
    PvtEcoStart,
    PvtTemplar,
    PvtMacro,
    CounterBunker,
}

/// Response for an archetype seen from `race`. Pairs without a mapping keep
/// whatever is running.
pub fn select_response(race: Race, rush: EnemyRushBuild) -> Option<ResponseBuild> {
    match race {
        Race::Protoss => match rush {
            Macro | SafeExpand => Some(ResponseBuild::PvpMacro),
            WorkerRush | ProxyZealots => Some(ResponseBuild::CounterProxyZealots),
            CannonRush => Some(ResponseBuild::CounterCannonRush),
            ProxyBase | Zealots | AdeptRush => Some(ResponseBuild::Counter4Gate),
            AirOneBase => Some(ResponseBuild::CounterAir),
            ProxyRobo | RoboRush => Some(ResponseBuild::CounterRobo),
            EarlyExpand => Some(ResponseBuild::PunishEarlyExpand),
            FastDT => Some(ResponseBuild::CounterFastDt),
            _ => None,
        },
        // Random plays the zerg lines until the race shows up.
        Race::Zerg | Race::Random => match rush {
            Macro => Some(ResponseBuild::PvzEcoStart),
            EcoExpand | WorkerRush => Some(ResponseBuild::PvzMacro),
            LingRush | NySwarm => Some(ResponseBuild::CounterLingRush),
            RoachRush => Some(ResponseBuild::CounterRoachRush),
            _ => None,
        },
        Race::Terran => match rush {
            Macro => Some(ResponseBuild::PvtEcoStart),
            TerranMacro | ProxyFactory | EarlyExpand => Some(ResponseBuild::PvtTemplar),
            ProxyMarine | ProxyMarauders | TerranOneBase | TerranLate => {
                Some(ResponseBuild::PvtMacro)
            }
            WorkerRush | Bunker => Some(ResponseBuild::CounterBunker),
            _ => None,
        },
    }
}

impl ResponseBuild {
    pub fn goals(&self) -> Vec<Goal> {
        match self {
            ResponseBuild::PvpMacro => pvp::macro_game(),
            ResponseBuild::CounterProxyZealots => pvp::counter_proxy_zealots(),
            ResponseBuild::CounterCannonRush => pvp::counter_cannon_rush(),
            ResponseBuild::Counter4Gate => pvp::counter_four_gate(),
            ResponseBuild::CounterAir => pvp::counter_air(),
            ResponseBuild::CounterRobo => pvp::counter_robo(),
            ResponseBuild::PunishEarlyExpand => pvp::punish_early_expand(),
            ResponseBuild::CounterFastDt => pvp::counter_fast_dt(),
            ResponseBuild::PvzEcoStart => pvz::eco_start(),
            ResponseBuild::PvzMacro => pvz::macro_game(),
            ResponseBuild::CounterLingRush => pvz::counter_ling_rush(),
            ResponseBuild::CounterRoachRush => pvz::counter_roach_rush(),
            ResponseBuild::PvtEcoStart => pvt::eco_start(),
            ResponseBuild::PvtTemplar => pvt::templar(),
            ResponseBuild::PvtMacro => pvt::macro_game(),
            ResponseBuild::CounterBunker => pvt::counter_bunker(),
        }
    }

    /// Lines that open with a dark shrine and send the prism harass.
    pub fn dt_harass(&self) -> bool {
        matches!(self, ResponseBuild::PvtTemplar)
    }

    /// Where the eco openings continue when the enemy stays on a plain
    /// macro game.
    pub fn follow_up(&self) -> Option<ResponseBuild> {
        match self {
            ResponseBuild::PvzEcoStart => Some(ResponseBuild::PvzMacro),
            ResponseBuild::PvtEcoStart => Some(ResponseBuild::PvtMacro),
            _ => None,
        }
    }
}
