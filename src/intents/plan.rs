//! Per-tick accumulation of intents
//!
//! A `TickPlan` is created from the snapshot at tick start and consumed when
//! the tick's intents are handed off. It enforces two things across every
//! controller in the pass:
//! - spending: each paid order deducts from one shared budget, so a later
//!   rule sees what is left rather than the snapshot totals;
//! - one command per actor: the first non-queued command an actor receives
//!   this tick wins. Overriding rules use `force`.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::types::{UnitTag, UnitTypeId};
use crate::intents::{Action, Intent, MacroOrder};
use crate::snapshot::{Cost, Snapshot};

/// Why an eligible action was not taken this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    Unaffordable,
    MissingPrerequisite,
    NoTarget,
    /// Producer or unit already has an order this tick
    ActorBusy,
}

/// Resources still uncommitted this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub minerals: u32,
    pub vespene: u32,
    pub supply: u32,
}

impl Budget {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            minerals: snapshot.minerals,
            vespene: snapshot.vespene,
            supply: snapshot.supply_left(),
        }
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.minerals >= cost.minerals && self.vespene >= cost.vespene && self.supply >= cost.supply
    }

    pub fn spend(&mut self, cost: Cost) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.minerals -= cost.minerals;
        self.vespene -= cost.vespene;
        self.supply -= cost.supply;
        true
    }
}

#[derive(Debug, Clone)]
pub struct TickPlan {
    intents: Vec<Intent>,
    claimed: AHashSet<UnitTag>,
    issued: AHashMap<UnitTypeId, u32>,
    budget: Budget,
}

impl TickPlan {
    pub fn new(snapshot: &Snapshot) -> Self {
        Self {
            intents: Vec::new(),
            claimed: AHashSet::new(),
            issued: AHashMap::new(),
            budget: Budget::from_snapshot(snapshot),
        }
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.budget.can_afford(cost)
    }

    pub fn is_claimed(&self, tag: UnitTag) -> bool {
        self.claimed.contains(&tag)
    }

    /// Units of `unit_type` ordered into production earlier this tick
    pub fn issued(&self, unit_type: UnitTypeId) -> u32 {
        self.issued.get(&unit_type).copied().unwrap_or(0)
    }

    /// Free command; returns false when the actor already has one this tick
    pub fn command(&mut self, actor: UnitTag, action: Action) -> bool {
        if !self.claimed.insert(actor) {
            return false;
        }
        self.intents.push(Intent::command(actor, action));
        true
    }

    /// Append to the actor's order queue without claiming it
    pub fn queue(&mut self, actor: UnitTag, action: Action) {
        self.intents.push(Intent::queued(actor, action));
    }

    /// Replace whatever the actor was told earlier this tick
    pub fn force(&mut self, actor: UnitTag, action: Action) {
        self.intents.retain(|i| i.actor() != Some(actor));
        self.claimed.insert(actor);
        self.intents.push(Intent::command(actor, action));
    }

    /// Macro orders are idempotent within a tick; duplicates collapse
    pub fn order(&mut self, order: MacroOrder) {
        let intent = Intent::Macro(order);
        if !self.intents.contains(&intent) {
            self.intents.push(intent);
        }
    }

    /// Accept a paid intent if its actor is free and the budget covers it
    pub fn submit(&mut self, intent: Intent, cost: Cost) -> Result<(), SkipReason> {
        if let Some(actor) = intent.actor() {
            if self.claimed.contains(&actor) {
                return Err(SkipReason::ActorBusy);
            }
        }
        if !self.budget.spend(cost) {
            return Err(SkipReason::Unaffordable);
        }
        if let Some(actor) = intent.actor() {
            self.claimed.insert(actor);
        }
        if let Some(unit_type) = intent.produces() {
            *self.issued.entry(unit_type).or_insert(0) += 1;
        }
        self.intents.push(intent);
        Ok(())
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn into_intents(self) -> Vec<Intent> {
        self.intents
    }
}
