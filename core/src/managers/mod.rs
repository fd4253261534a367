pub mod army_manager;
pub mod build_detector;
pub mod cache_manager;
pub mod cooldown_manager;
pub mod defense_manager;
pub mod harass_manager;
pub mod production_manager;
pub mod resource_manager;
pub mod squad_manager;
pub mod worker_manager;
