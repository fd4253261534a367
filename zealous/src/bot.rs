use log::{error, info};
use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use zealous_core::managers::army_manager::ArmyManager;
use zealous_core::managers::build_detector::BuildDetectorManager;
use zealous_core::managers::cache_manager::CacheManager;
use zealous_core::managers::defense_manager::DefenseManager;
use zealous_core::managers::harass_manager::HarassManager;
use zealous_core::managers::production_manager::ProductionManager;
use zealous_core::managers::resource_manager::ResourceManager;
use zealous_core::managers::squad_manager::SquadManager;
use zealous_core::managers::worker_manager::WorkerManager;
use zealous_core::micro::priorities::validate_tables;
use zealous_core::*;
use zealous_openings::strategy::StrategyManager;
use zealous_openings::BuildFamily;

// Strategy runs right after the detector so a new archetype is planned the
// same tick.
const STRATEGY_SLOT: usize = 2;

#[bot]
pub struct Zealous {
    components: Vec<ProcessLimiter>,
    bot_state: BotState,
    forced_build: Option<BuildFamily>,
}

impl Default for Zealous {
    fn default() -> Self {
        Self {
            _bot: Bot::default(),
            components: vec![
                ProcessLimiter::new(0, Box::new(CacheManager::default())),
                ProcessLimiter::new(0, Box::new(BuildDetectorManager::default())),
                ProcessLimiter::new(10, Box::new(ProductionManager::default())),
                ProcessLimiter::new(15, Box::new(ResourceManager::default())),
                ProcessLimiter::new(0, Box::new(WorkerManager::default())),
                ProcessLimiter::new(15, Box::new(DefenseManager::default())),
                ProcessLimiter::new(0, Box::new(SquadManager::default())),
                ProcessLimiter::new(5, Box::new(ArmyManager::default())),
                ProcessLimiter::new(0, Box::new(HarassManager::default())),
            ],
            bot_state: Default::default(),
            forced_build: None,
        }
    }
}

impl Zealous {
    pub fn force_build(&mut self, build: BuildFamily) {
        self.forced_build = Some(build);
    }
}

impl Player for Zealous {
    fn get_player_settings(&self) -> PlayerSettings {
        PlayerSettings::new(Race::Protoss).with_name("Zealous")
    }

    fn on_start(&mut self) -> SC2Result<()> {
        if let Err(e) = validate_tables() {
            error!("Broken target priorities: {}", e);
        }
        self.bot_state.build_detector.start(
            self._bot.enemy_race,
            self._bot.start_location,
            self._bot.enemy_start,
        );
        if let Some(build) = self.forced_build {
            info!("Forcing {:?} builds", build);
        }
        let mut strategy = StrategyManager::new(self.forced_build);
        strategy.opening(&self._bot, &mut self.bot_state);
        self.components
            .insert(STRATEGY_SLOT, ProcessLimiter::new(0, Box::new(strategy)));
        self._bot
            .chat_ally(format!("Tag:{}v{}", crate_name!(), crate_version!()).as_str());
        Ok(())
    }

    fn on_step(&mut self, _iteration: usize) -> SC2Result<()> {
        for component in self.components.iter_mut() {
            component.process(&mut self._bot, &mut self.bot_state);
        }
        Ok(())
    }

    /// Called once on last step with a result for your bot.
    fn on_end(&self, result: GameResult) -> SC2Result<()> {
        info!("Result {:?}", result);
        Ok(())
    }

    fn on_event(&mut self, event: Event) -> SC2Result<()> {
        for component in self.components.iter_mut() {
            component.on_event(&event, &mut self.bot_state);
        }
        Ok(())
    }
}
