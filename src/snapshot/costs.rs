//! Resource costs of everything the engine can order

use serde::{Deserialize, Serialize};

use crate::core::types::{UnitTypeId, UpgradeId};

/// Minerals, vespene and supply consumed by one order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub minerals: u32,
    pub vespene: u32,
    pub supply: u32,
}

impl Cost {
    pub const fn new(minerals: u32, vespene: u32, supply: u32) -> Self {
        Self { minerals, vespene, supply }
    }

    pub const FREE: Cost = Cost::new(0, 0, 0);
}

/// Cost of training, morphing into or building `unit_type`.
///
/// Morph costs are the difference paid on top of the source unit.
pub fn unit_cost(unit_type: UnitTypeId) -> Cost {
    match unit_type {
        UnitTypeId::Drone => Cost::new(50, 0, 1),
        UnitTypeId::Overlord => Cost::new(100, 0, 0),
        UnitTypeId::Overseer => Cost::new(50, 50, 0),
        UnitTypeId::Queen => Cost::new(150, 0, 2),
        // A pair hatches from one larva; supply is for the pair
        UnitTypeId::Zergling => Cost::new(50, 0, 1),
        UnitTypeId::Hydralisk => Cost::new(100, 50, 2),
        UnitTypeId::Hatchery => Cost::new(300, 0, 0),
        UnitTypeId::Lair => Cost::new(150, 100, 0),
        UnitTypeId::Hive => Cost::new(200, 150, 0),
        UnitTypeId::SpawningPool => Cost::new(200, 0, 0),
        UnitTypeId::Extractor => Cost::new(25, 0, 0),
        UnitTypeId::HydraliskDen => Cost::new(100, 100, 0),
        UnitTypeId::Larva | UnitTypeId::Other(_) => Cost::FREE,
    }
}

pub fn upgrade_cost(upgrade: UpgradeId) -> Cost {
    match upgrade {
        UpgradeId::MetabolicBoost => Cost::new(100, 100, 0),
        UpgradeId::GroovedSpines => Cost::new(100, 100, 0),
        UpgradeId::MuscularAugments => Cost::new(100, 100, 0),
    }
}
