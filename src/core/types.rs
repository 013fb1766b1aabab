//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Stable identity of a unit or structure, assigned by the game engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitTag(pub u64);

impl std::fmt::Display for UnitTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Game tick counter (simulation step)
pub type Tick = u64;

/// 2D map position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Point `distance` along the line from `self` to `target`.
    ///
    /// Negative distances step away from the target. When both points
    /// coincide there is no direction and `self` is returned.
    pub fn towards(&self, target: &Self, distance: f32) -> Self {
        let dir = (*target - *self).normalize();
        *self + dir * distance
    }

    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Point on the circle of radius `distance` around `self` at `angle` radians
    pub fn offset_polar(&self, angle: f32, distance: f32) -> Self {
        Self::new(self.x + angle.cos() * distance, self.y + angle.sin() * distance)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

/// Unit and structure types the engine reasons about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitTypeId {
    Larva,
    Drone,
    Overlord,
    Overseer,
    Queen,
    Zergling,
    Hydralisk,
    Hatchery,
    Lair,
    Hive,
    SpawningPool,
    Extractor,
    HydraliskDen,
    /// Anything else (enemy units, neutral objects); only position matters
    Other(u32),
}

impl UnitTypeId {
    pub fn is_townhall(&self) -> bool {
        matches!(self, UnitTypeId::Hatchery | UnitTypeId::Lair | UnitTypeId::Hive)
    }

    /// Lair or anything above it in the townhall chain
    pub fn is_tier_two_townhall(&self) -> bool {
        matches!(self, UnitTypeId::Lair | UnitTypeId::Hive)
    }

    pub fn is_structure(&self) -> bool {
        matches!(
            self,
            UnitTypeId::Hatchery
                | UnitTypeId::Lair
                | UnitTypeId::Hive
                | UnitTypeId::SpawningPool
                | UnitTypeId::Extractor
                | UnitTypeId::HydraliskDen
        )
    }

    pub fn is_worker(&self) -> bool {
        matches!(self, UnitTypeId::Drone)
    }

    /// Types thrown at the enemy when every townhall is lost
    pub fn joins_all_in(&self) -> bool {
        matches!(
            self,
            UnitTypeId::Drone | UnitTypeId::Queen | UnitTypeId::Zergling | UnitTypeId::Hydralisk
        )
    }
}

/// Research upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeId {
    /// Zergling movement speed
    MetabolicBoost,
    /// Hydralisk range
    GroovedSpines,
    /// Hydralisk movement speed
    MuscularAugments,
}

/// Unit abilities the engine casts directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityId {
    InjectLarva,
    BuildCreepTumor,
    Transfusion,
    SpawnChangeling,
}
