use rust_sc2::bot::Bot;
use rust_sc2::prelude::*;

use crate::micro::Action;
use crate::snapshot::UnitSnapshot;

pub trait Strength {
    fn strength(&self) -> f32;
}

impl Strength for [&UnitSnapshot] {
    fn strength(&self) -> f32 {
        self.iter().map(|u| u.strength()).sum::<f32>() * (1f32 + (self.len() as f32 + 1f32).log(10f32))
    }
}

impl Strength for UnitSnapshot {
    fn strength(&self) -> f32 {
        let multiplier = if !self.is_ready() || self.is_hallucination {
            0.0f32
        } else if self.is_worker() {
            0.2f32
        } else if SPECIAL_DANGEROUS.contains(&self.type_id) {
            1.0f32
        } else if !self.can_attack_ground() && !self.can_attack_air() {
            0.0f32
        } else if self.is_structure {
            1.5f32
        } else if self.is_cloaked {
            2f32
        } else {
            1f32
        };
        multiplier * self.power
    }
}

pub trait IsDangerous {
    fn is_dangerous(&self) -> bool;
}

impl IsDangerous for UnitSnapshot {
    fn is_dangerous(&self) -> bool {
        self.can_attack_ground()
            || self.can_attack_air()
            || SPECIAL_DANGEROUS.contains(&self.type_id)
            || SPECIAL_UNITS.contains(&self.type_id)
    }
}

const SPECIAL_DANGEROUS: [UnitTypeId; 12] = [
    UnitTypeId::Infestor,
    UnitTypeId::InfestorBurrowed,
    UnitTypeId::LurkerMP,
    UnitTypeId::LurkerMPBurrowed,
    UnitTypeId::Disruptor,
    UnitTypeId::DisruptorPhased,
    UnitTypeId::HighTemplar,
    UnitTypeId::Liberator,
    UnitTypeId::LiberatorAG,
    UnitTypeId::WidowMine,
    UnitTypeId::Raven,
    UnitTypeId::Mothership,
];

const SPECIAL_UNITS: [UnitTypeId; 6] = [
    UnitTypeId::Observer,
    UnitTypeId::WarpPrism,
    UnitTypeId::WarpPrismPhasing,
    UnitTypeId::Medivac,
    UnitTypeId::Overlord,
    UnitTypeId::Overseer,
];

/// Base type of morphs and alternate modes, used to compare timings.
pub trait RealType {
    fn real_type(&self) -> UnitTypeId;
}

impl RealType for UnitTypeId {
    fn real_type(&self) -> UnitTypeId {
        match *self {
            UnitTypeId::Lair | UnitTypeId::Hive => UnitTypeId::Hatchery,
            UnitTypeId::OrbitalCommand
            | UnitTypeId::OrbitalCommandFlying
            | UnitTypeId::PlanetaryFortress
            | UnitTypeId::CommandCenterFlying => UnitTypeId::CommandCenter,
            UnitTypeId::BarracksFlying => UnitTypeId::Barracks,
            UnitTypeId::FactoryFlying => UnitTypeId::Factory,
            UnitTypeId::StarportFlying => UnitTypeId::Starport,
            UnitTypeId::SupplyDepotLowered => UnitTypeId::SupplyDepot,
            UnitTypeId::WarpGate => UnitTypeId::Gateway,
            UnitTypeId::GreaterSpire => UnitTypeId::Spire,
            UnitTypeId::AssimilatorRich => UnitTypeId::Assimilator,
            UnitTypeId::ExtractorRich => UnitTypeId::Extractor,
            UnitTypeId::RefineryRich => UnitTypeId::Refinery,
            UnitTypeId::SpineCrawlerUprooted => UnitTypeId::SpineCrawler,
            UnitTypeId::SporeCrawlerUprooted => UnitTypeId::SporeCrawler,
            other => other,
        }
    }
}

pub trait PathingDistance {
    fn pathing_distance(&self, p1: Point2, p2: Point2) -> Option<f32>;
}

impl PathingDistance for Bot {
    fn pathing_distance(&self, p1: Point2, p2: Point2) -> Option<f32> {
        if let Result::Ok(result) = self.query_pathing(vec![(Target::Pos(p1), p2)]) {
            if result.is_empty() {
                None
            } else {
                Some(result.iter().map(|d| d.unwrap_or_max()).sum())
            }
        } else {
            None
        }
    }
}

pub trait UnitOrderCheck {
    fn order_move_to(&self, target: Target, range: f32, queue: bool);
    fn order_attack(&self, target: Target, queue: bool);
    fn order_gather(&self, target: u64, queue: bool);
    fn order_ability(&self, ability: AbilityId, target: Target, queue: bool);
    /// Issues a refined micro action, skipping it when the unit already does
    /// the same thing.
    fn order_action(&self, action: &Action);
}

impl UnitOrderCheck for Unit {
    fn order_move_to(&self, target: Target, range: f32, queue: bool) {
        if should_send_order(self, target, range, queue) {
            self.move_to(target, queue);
        }
    }

    fn order_attack(&self, target: Target, queue: bool) {
        if should_send_order(self, target, 0.3f32, queue) {
            self.attack(target, queue);
        }
    }

    fn order_gather(&self, target: u64, queue: bool) {
        let target_tag = Target::Tag(target);
        if should_send_order(self, target_tag, 0.1f32, queue) {
            self.gather(target, false);
        }
    }

    fn order_ability(&self, ability: AbilityId, target: Target, queue: bool) {
        let repeated = self.ordered_ability() == Some(ability)
            && (target == Target::None || !should_send_order(self, target, 0.3f32, false));
        if queue || !repeated {
            match target {
                Target::None => self.use_ability(ability, queue),
                _ => self.command(ability, target, queue),
            }
        }
    }

    fn order_action(&self, action: &Action) {
        match (action.ability, action.is_attack) {
            (Some(ability), _) => self.order_ability(ability, action.target, false),
            (None, true) => self.order_attack(action.target, false),
            (None, false) => match action.target {
                Target::Tag(tag) => {
                    if should_send_order(self, action.target, 0.1f32, false) {
                        self.smart(Target::Tag(tag), false);
                    }
                }
                Target::Pos(_) => self.order_move_to(action.target, 0.5f32, false),
                Target::None => {}
            },
        }
    }
}

fn should_send_order(unit: &Unit, target: Target, range: f32, queue: bool) -> bool {
    if queue {
        true
    } else {
        match (unit.target(), target) {
            (Target::Pos(current_pos), Target::Pos(wanted_pos)) => {
                current_pos.distance(wanted_pos) > range
            }
            (_, Target::Pos(wanted_pos)) => unit.position().distance(wanted_pos) > range,
            (Target::Tag(current_tag), Target::Tag(wanted_tag)) => current_tag != wanted_tag,
            (_, _) => true,
        }
    }
}

pub trait ProducedOn {
    fn produced_on(&self) -> Vec<UnitTypeId>;
}

pub trait IsStaticDefense {
    fn is_static_defense(&self) -> bool;
}

impl IsStaticDefense for UnitTypeId {
    fn is_static_defense(&self) -> bool {
        matches!(
            self,
            UnitTypeId::SpineCrawler
                | UnitTypeId::SporeCrawler
                | UnitTypeId::PhotonCannon
                | UnitTypeId::ShieldBattery
                | UnitTypeId::Bunker
                | UnitTypeId::MissileTurret
        )
    }
}

pub trait BuildingRequirement {
    fn building_requirements(&self) -> Vec<UnitTypeId>;
}

/// Units a warpgate can warp in.
pub trait WarpIn {
    fn warp_ability(&self) -> Option<AbilityId>;
}

impl WarpIn for UnitTypeId {
    fn warp_ability(&self) -> Option<AbilityId> {
        match *self {
            UnitTypeId::Zealot => Some(AbilityId::WarpGateTrainZealot),
            UnitTypeId::Stalker => Some(AbilityId::WarpGateTrainStalker),
            UnitTypeId::Adept => Some(AbilityId::TrainWarpAdept),
            UnitTypeId::Sentry => Some(AbilityId::WarpGateTrainSentry),
            UnitTypeId::HighTemplar => Some(AbilityId::WarpGateTrainHighTemplar),
            UnitTypeId::DarkTemplar => Some(AbilityId::WarpGateTrainDarkTemplar),
            _ => None,
        }
    }
}

impl ProducedOn for UnitTypeId {
    fn produced_on(&self) -> Vec<UnitTypeId> {
        match *self {
            UnitTypeId::Zealot
            | UnitTypeId::Stalker
            | UnitTypeId::Adept
            | UnitTypeId::Sentry
            | UnitTypeId::HighTemplar
            | UnitTypeId::DarkTemplar => vec![UnitTypeId::Gateway, UnitTypeId::WarpGate],
            UnitTypeId::Observer
            | UnitTypeId::Immortal
            | UnitTypeId::WarpPrism
            | UnitTypeId::Colossus
            | UnitTypeId::Disruptor => vec![UnitTypeId::RoboticsFacility],
            UnitTypeId::Phoenix
            | UnitTypeId::Oracle
            | UnitTypeId::VoidRay
            | UnitTypeId::Tempest
            | UnitTypeId::Carrier => vec![UnitTypeId::Stargate],
            UnitTypeId::Probe | UnitTypeId::Mothership => vec![UnitTypeId::Nexus],
            UnitTypeId::Archon => vec![UnitTypeId::HighTemplar],
            _ => {
                if self.is_structure() {
                    vec![UnitTypeId::Probe]
                } else {
                    vec![]
                }
            }
        }
    }
}

impl BuildingRequirement for UnitTypeId {
    fn building_requirements(&self) -> Vec<UnitTypeId> {
        match *self {
            // Units
            UnitTypeId::Stalker | UnitTypeId::Adept | UnitTypeId::Sentry => {
                vec![UnitTypeId::CyberneticsCore]
            }
            UnitTypeId::HighTemplar => vec![UnitTypeId::TemplarArchive],
            UnitTypeId::DarkTemplar => vec![UnitTypeId::DarkShrine],
            UnitTypeId::Colossus | UnitTypeId::Disruptor => vec![UnitTypeId::RoboticsBay],
            UnitTypeId::Tempest | UnitTypeId::Carrier | UnitTypeId::Mothership => {
                vec![UnitTypeId::FleetBeacon]
            }

            // Buildings
            UnitTypeId::Gateway | UnitTypeId::Forge => vec![UnitTypeId::Pylon],
            UnitTypeId::Pylon | UnitTypeId::Nexus | UnitTypeId::Assimilator => vec![],
            UnitTypeId::CyberneticsCore => vec![UnitTypeId::Gateway, UnitTypeId::WarpGate],
            UnitTypeId::PhotonCannon => vec![UnitTypeId::Forge],
            UnitTypeId::ShieldBattery
            | UnitTypeId::TwilightCouncil
            | UnitTypeId::Stargate
            | UnitTypeId::RoboticsFacility => vec![UnitTypeId::CyberneticsCore],
            UnitTypeId::TemplarArchive | UnitTypeId::DarkShrine => vec![UnitTypeId::TwilightCouncil],
            UnitTypeId::RoboticsBay => vec![UnitTypeId::RoboticsFacility],
            UnitTypeId::FleetBeacon => vec![UnitTypeId::Stargate],
            _ => vec![],
        }
    }
}

impl ProducedOn for UpgradeId {
    fn produced_on(&self) -> Vec<UnitTypeId> {
        match *self {
            UpgradeId::WarpGateResearch
            | UpgradeId::ProtossAirWeaponsLevel1
            | UpgradeId::ProtossAirWeaponsLevel2
            | UpgradeId::ProtossAirWeaponsLevel3
            | UpgradeId::ProtossAirArmorsLevel1
            | UpgradeId::ProtossAirArmorsLevel2
            | UpgradeId::ProtossAirArmorsLevel3 => vec![UnitTypeId::CyberneticsCore],
            UpgradeId::Charge | UpgradeId::BlinkTech | UpgradeId::AdeptPiercingAttack => {
                vec![UnitTypeId::TwilightCouncil]
            }
            UpgradeId::PsiStormTech => vec![UnitTypeId::TemplarArchive],
            UpgradeId::ExtendedThermalLance
            | UpgradeId::ObserverGraviticBooster
            | UpgradeId::GraviticDrive => vec![UnitTypeId::RoboticsBay],
            UpgradeId::ProtossGroundWeaponsLevel1
            | UpgradeId::ProtossGroundWeaponsLevel2
            | UpgradeId::ProtossGroundWeaponsLevel3
            | UpgradeId::ProtossGroundArmorsLevel1
            | UpgradeId::ProtossGroundArmorsLevel2
            | UpgradeId::ProtossGroundArmorsLevel3
            | UpgradeId::ProtossShieldsLevel1
            | UpgradeId::ProtossShieldsLevel2
            | UpgradeId::ProtossShieldsLevel3 => vec![UnitTypeId::Forge],
            UpgradeId::DarkTemplarBlinkUpgrade => vec![UnitTypeId::DarkShrine],
            UpgradeId::PhoenixRangeUpgrade => vec![UnitTypeId::FleetBeacon],
            _ => vec![],
        }
    }
}

impl BuildingRequirement for UpgradeId {
    fn building_requirements(&self) -> Vec<UnitTypeId> {
        match *self {
            UpgradeId::ProtossGroundWeaponsLevel2
            | UpgradeId::ProtossGroundWeaponsLevel3
            | UpgradeId::ProtossGroundArmorsLevel2
            | UpgradeId::ProtossGroundArmorsLevel3
            | UpgradeId::ProtossShieldsLevel2
            | UpgradeId::ProtossShieldsLevel3 => vec![UnitTypeId::TwilightCouncil],
            UpgradeId::ProtossAirWeaponsLevel2
            | UpgradeId::ProtossAirWeaponsLevel3
            | UpgradeId::ProtossAirArmorsLevel2
            | UpgradeId::ProtossAirArmorsLevel3 => vec![UnitTypeId::FleetBeacon],
            _ => vec![],
        }
    }
}

pub trait CanAffordVespeneUpgrade {
    fn can_afford_vespene_upgrade(&self, upgrade: UpgradeId) -> bool;
}

impl CanAffordVespeneUpgrade for Bot {
    fn can_afford_vespene_upgrade(&self, upgrade: UpgradeId) -> bool {
        let cost = self.get_upgrade_cost(upgrade);
        self.vespene >= cost.vespene
    }
}

pub trait HasRequirement {
    fn has_requirement(&self, bot: &Bot) -> bool;
}

fn requirements_met(requirements: Vec<UnitTypeId>, bot: &Bot) -> bool {
    requirements.is_empty()
        || requirements
            .iter()
            .any(|requirement| !bot.units.my.structures.ready().of_type(*requirement).is_empty())
}

impl HasRequirement for UnitTypeId {
    fn has_requirement(&self, bot: &Bot) -> bool {
        requirements_met(self.building_requirements(), bot)
    }
}

impl HasRequirement for UpgradeId {
    fn has_requirement(&self, bot: &Bot) -> bool {
        requirements_met(self.building_requirements(), bot)
    }
}

/// First free spot on growing rings around `center`, used for warp-ins.
pub fn find_warp_spot<F>(center: Point2, max_radius: f32, is_free: F) -> Option<Point2>
where
    F: Fn(Point2) -> bool,
{
    let mut radius = 2f32;
    while radius <= max_radius {
        for step in 0..8 {
            let angle = step as f32 * std::f32::consts::PI / 4f32;
            let spot = Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
            if is_free(spot) {
                return Some(spot);
            }
        }
        radius += 1f32;
    }
    None
}
