//! Read-only view of one tick's game state
//!
//! The host captures a `Snapshot` at tick start and every controller reads
//! from that same value, so decisions within a tick never see torn state.

pub mod costs;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{Tick, UnitTag, UnitTypeId, UpgradeId, Vec2};

pub use costs::{unit_cost, upgrade_cost, Cost};

fn full_health() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

/// A unit or structure as seen this tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub tag: UnitTag,
    pub unit_type: UnitTypeId,
    pub position: Vec2,
    /// 0.0 (dead) to 1.0 (full health)
    #[serde(default = "full_health")]
    pub health_fraction: f32,
    #[serde(default)]
    pub energy: f32,
    #[serde(default = "yes")]
    pub is_idle: bool,
    /// Construction or morph finished
    #[serde(default = "yes")]
    pub is_ready: bool,
    /// Workers currently harvesting from this gas building
    #[serde(default)]
    pub assigned_harvesters: u32,
    #[serde(default)]
    pub ideal_harvesters: u32,
}

impl Unit {
    pub fn new(tag: u64, unit_type: UnitTypeId, position: Vec2) -> Self {
        Self {
            tag: UnitTag(tag),
            unit_type,
            position,
            health_fraction: 1.0,
            energy: 0.0,
            is_idle: true,
            is_ready: true,
            assigned_harvesters: 0,
            ideal_harvesters: 0,
        }
    }

    pub fn with_energy(mut self, energy: f32) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_health(mut self, fraction: f32) -> Self {
        self.health_fraction = fraction;
        self
    }

    pub fn busy(mut self) -> Self {
        self.is_idle = false;
        self
    }

    pub fn under_construction(mut self) -> Self {
        self.is_ready = false;
        self
    }

    pub fn with_harvesters(mut self, assigned: u32, ideal: u32) -> Self {
        self.assigned_harvesters = assigned;
        self.ideal_harvesters = ideal;
        self
    }

    pub fn distance_to(&self, pos: &Vec2) -> f32 {
        self.position.distance(pos)
    }

    pub fn is_damaged(&self) -> bool {
        self.health_fraction < 1.0
    }
}

/// Complete game state at the start of a tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tick: Tick,
    #[serde(default)]
    pub game_time_secs: f32,
    pub minerals: u32,
    pub vespene: u32,
    pub supply_used: u32,
    pub supply_cap: u32,
    /// Supply taken by workers that exist right now
    pub supply_workers: u32,
    pub start_location: Vec2,
    pub enemy_start: Vec2,
    pub map_center: Vec2,
    /// Own units and structures
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Enemy units currently visible
    #[serde(default)]
    pub enemy_units: Vec<Unit>,
    /// In-progress trains, morphs and constructions per type
    #[serde(default)]
    pub pending: AHashMap<UnitTypeId, u32>,
    /// Research progress in [0,1]; absent means not started
    #[serde(default)]
    pub upgrades: AHashMap<UpgradeId, f32>,
}

impl Snapshot {
    pub fn new(start_location: Vec2, enemy_start: Vec2, map_center: Vec2) -> Self {
        Self {
            tick: 0,
            game_time_secs: 0.0,
            minerals: 50,
            vespene: 0,
            supply_used: 12,
            supply_cap: 14,
            supply_workers: 12,
            start_location,
            enemy_start,
            map_center,
            units: Vec::new(),
            enemy_units: Vec::new(),
            pending: AHashMap::new(),
            upgrades: AHashMap::new(),
        }
    }

    pub fn get(&self, tag: UnitTag) -> Option<&Unit> {
        self.units.iter().find(|u| u.tag == tag)
    }

    pub fn contains(&self, tag: UnitTag) -> bool {
        self.get(tag).is_some()
    }

    pub fn units_of_type(&self, unit_type: UnitTypeId) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(move |u| u.unit_type == unit_type)
    }

    pub fn ready_of_type(&self, unit_type: UnitTypeId) -> impl Iterator<Item = &Unit> + '_ {
        self.units_of_type(unit_type).filter(|u| u.is_ready)
    }

    pub fn count_of_type(&self, unit_type: UnitTypeId) -> u32 {
        self.units_of_type(unit_type).count() as u32
    }

    pub fn has_ready(&self, unit_type: UnitTypeId) -> bool {
        self.ready_of_type(unit_type).next().is_some()
    }

    pub fn townhalls(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(|u| u.unit_type.is_townhall())
    }

    pub fn townhall_count(&self) -> u32 {
        self.townhalls().count() as u32
    }

    /// The first townhall; production and tech orders go through it
    pub fn main_townhall(&self) -> Option<&Unit> {
        self.townhalls().next()
    }

    pub fn larvae(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units_of_type(UnitTypeId::Larva)
    }

    pub fn workers(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.iter().filter(|u| u.unit_type.is_worker())
    }

    pub fn gas_buildings(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units_of_type(UnitTypeId::Extractor)
    }

    pub fn already_pending(&self, unit_type: UnitTypeId) -> u32 {
        self.pending.get(&unit_type).copied().unwrap_or(0)
    }

    pub fn upgrade_progress(&self, upgrade: UpgradeId) -> f32 {
        self.upgrades.get(&upgrade).copied().unwrap_or(0.0)
    }

    pub fn supply_left(&self) -> u32 {
        self.supply_cap.saturating_sub(self.supply_used)
    }

    /// Existing workers plus workers in production
    pub fn worker_count(&self) -> u32 {
        self.supply_workers + self.already_pending(UnitTypeId::Drone)
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.minerals >= cost.minerals
            && self.vespene >= cost.vespene
            && self.supply_left() >= cost.supply
    }
}
