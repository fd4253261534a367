// Game speed conversion
pub const GAME_LOOPS_PER_SECOND: f32 = 22.4f32;

// Enemy memory
pub const FOG_AREA_CACHE_TIME: f32 = 60f32;
pub const VISIBLE_AREA_CACHE_TIME: f32 = 10f32;
pub const ON_DETECTION_CACHE_TIME: f32 = 1f32;
pub const TACTICAL_JUMP_CACHE_TIME: f32 = 4f32;

// Build detection
pub const RUSH_TIMEOUT: f32 = 495f32;
pub const CANNON_RUSH_HOLD: f32 = 100f32;
pub const WORKER_RUSH_COUNT: usize = 9;
pub const PROXY_DISTANCE_PROTOSS: f32 = 50f32;
pub const PROXY_DISTANCE_ZERG: f32 = 45f32;
pub const PROXY_DISTANCE_TERRAN: f32 = 50f32;
pub const PROXY_ROBO_DISTANCE: f32 = 80f32;
pub const MAIN_BASE_RADIUS: f32 = 30f32;
pub const MACRO_BUILD_DEADLINE: f32 = 420f32;

// Combat
pub const ENGAGE_RATIO_THRESHOLD: f32 = 0.25f32;
// Game loops left on the weapon cooldown still counted as ready
pub const READY_TO_SHOOT_COOLDOWN: f32 = 2f32;
pub const SEARCH_RANGE: f32 = 14f32;

// Ability energy
pub const GRAVITON_BEAM_ENERGY: f32 = 50f32;

// Disruptor
pub const NOVA_INTERVAL: f32 = 2.2f32;
pub const NOVA_DURATION: f32 = 2.1f32;

// Warp prism
pub const PRISM_PHASE_COOLDOWN: f32 = 6f32;
pub const PRISM_TRANSPORT_DELAY: f32 = 2.5f32;

// Dark templar harass
pub const HARASS_PHASE_TIME: f32 = 3.5f32;
pub const HARASS_LOAD_TIME: f32 = 6f32;
pub const HARASS_DT_COUNT: usize = 3;
pub const HARASS_RESERVE_MINERALS: u32 = 375;
pub const HARASS_RESERVE_GAS: u32 = 375;

// Army
pub const ATTACK_SUPPLY_RATIO: f32 = 1.3f32;
pub const RETREAT_SUPPLY_RATIO: f32 = 0.7f32;
pub const MIN_ATTACK_SUPPLY: f32 = 30f32;
pub const DEFENSE_RANGE: f32 = 25f32;

// Economy
pub const MAX_WORKERS: usize = 70;
pub const AUTO_SUPPLY_START: u32 = 14;
pub const ECONOMY_TAKEOVER_TIME: f32 = 240f32;

// Probe scout
pub const SCOUT_START_TIME: f32 = 50f32;
pub const SCOUT_END_TIME: f32 = 150f32;
