//! Intents handed to the execution layer
//!
//! Unit-level commands are executed as-is. Macro orders are pre-packaged
//! behaviours (worker staffing, placement search, expansion) the execution
//! layer owns.

pub mod plan;

use serde::{Deserialize, Serialize};

use crate::core::types::{AbilityId, UnitTag, UnitTypeId, UpgradeId, Vec2};

pub use plan::{Budget, SkipReason, TickPlan};

/// Target of an ability cast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityTarget {
    None,
    Unit(UnitTag),
    Point(Vec2),
}

/// What a single unit or facility is told to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Move(Vec2),
    Attack(UnitTag),
    /// Advance toward a point, engaging anything met on the way
    AttackMove(Vec2),
    Gather(UnitTag),
    UseAbility {
        ability: AbilityId,
        target: AbilityTarget,
    },
    Train(UnitTypeId),
    /// Transform the actor itself (townhall tier-up, overseer)
    Morph(UnitTypeId),
    Research(UpgradeId),
}

/// Command addressed to one actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub actor: UnitTag,
    pub action: Action,
    /// Appended after the actor's current order instead of replacing it
    pub queued: bool,
}

/// Behaviours delegated to the execution layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MacroOrder {
    /// Keep worker lines staffed across bases
    Mining,
    /// Keep this many gas buildings (built or pending)
    GasBuildingTarget(u32),
    /// Keep this many bases (built or pending)
    ExpansionTarget(u32),
    /// Find a placement near `near` and build there
    BuildStructure { structure: UnitTypeId, near: Vec2 },
    /// Let the execution layer manage supply
    AutoSupply,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Command(Command),
    Macro(MacroOrder),
}

impl Intent {
    pub fn command(actor: UnitTag, action: Action) -> Self {
        Intent::Command(Command {
            actor,
            action,
            queued: false,
        })
    }

    pub fn queued(actor: UnitTag, action: Action) -> Self {
        Intent::Command(Command {
            actor,
            action,
            queued: true,
        })
    }

    pub fn actor(&self) -> Option<UnitTag> {
        match self {
            Intent::Command(c) => Some(c.actor),
            Intent::Macro(_) => None,
        }
    }

    pub fn action(&self) -> Option<&Action> {
        match self {
            Intent::Command(c) => Some(&c.action),
            Intent::Macro(_) => None,
        }
    }

    /// Unit type this intent brings into production, if any
    pub fn produces(&self) -> Option<UnitTypeId> {
        match self {
            Intent::Command(Command {
                action: Action::Train(t) | Action::Morph(t),
                ..
            }) => Some(*t),
            Intent::Macro(MacroOrder::BuildStructure { structure, .. }) => Some(*structure),
            _ => None,
        }
    }
}
