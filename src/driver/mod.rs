//! Tick driver: the engine's entry point
//!
//! Owns the role registry across ticks and runs the controllers in a fixed
//! order against one shared plan: economy, production, combat.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::combat::{self, CombatCoordinator};
use crate::core::config::Thresholds;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Tick, UnitTag};
use crate::economy::EconomyController;
use crate::intents::{Intent, TickPlan};
use crate::production::ProductionController;
use crate::roles::{Role, RoleRegistry};
use crate::services::MapServices;
use crate::snapshot::Snapshot;

/// Interface the host game loop drives
pub trait DecisionEngine {
    /// Decide everything for one tick
    fn on_tick(&mut self, snapshot: &Snapshot) -> Vec<Intent>;

    /// A new own unit appeared; returns the role it was given, if any
    fn on_unit_spawned(&mut self, tag: UnitTag, snapshot: &Snapshot) -> Result<Option<Role>>;

    fn on_unit_destroyed(&mut self, tag: UnitTag);
}

pub struct TickDriver<S: MapServices> {
    thresholds: Thresholds,
    services: S,
    registry: RoleRegistry,
    economy: EconomyController,
    production: ProductionController,
    combat: CombatCoordinator,
    rng: StdRng,
    last_tick: Option<Tick>,
}

impl<S: MapServices> TickDriver<S> {
    /// Create a driver with the default seed
    pub fn new(thresholds: Thresholds, services: S) -> Self {
        Self::with_seed(thresholds, services, 42)
    }

    /// Create with a specific RNG seed for reproducible overlord spread
    pub fn with_seed(thresholds: Thresholds, services: S, seed: u64) -> Self {
        Self {
            thresholds,
            services,
            registry: RoleRegistry::new(),
            economy: EconomyController::new(),
            production: ProductionController::new(),
            combat: CombatCoordinator::new(),
            rng: StdRng::seed_from_u64(seed),
            last_tick: None,
        }
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Register every own unit in `snapshot` that has no role yet.
    ///
    /// Used when attaching to a game already in progress.
    pub fn adopt_units(&mut self, snapshot: &Snapshot) -> Result<usize> {
        let fresh: Vec<UnitTag> = snapshot
            .units
            .iter()
            .filter(|u| self.registry.role_of(u.tag).is_none())
            .map(|u| u.tag)
            .collect();
        let mut assigned = 0;
        for tag in fresh {
            if self.on_unit_spawned(tag, snapshot)?.is_some() {
                assigned += 1;
            }
        }
        Ok(assigned)
    }
}

impl<S: MapServices> DecisionEngine for TickDriver<S> {
    fn on_tick(&mut self, snapshot: &Snapshot) -> Vec<Intent> {
        if let Some(last) = self.last_tick {
            if snapshot.tick <= last {
                tracing::warn!(tick = snapshot.tick, last, "tick did not advance");
            }
        }
        self.last_tick = Some(snapshot.tick);

        let mut plan = TickPlan::new(snapshot);
        let economy = self.economy.evaluate(snapshot, &self.thresholds, &mut plan);
        let production = self.production.evaluate(snapshot, &self.thresholds, &mut plan);
        let summary = self.combat.evaluate(
            snapshot,
            &self.thresholds,
            &self.services,
            &mut self.registry,
            &mut self.rng,
            &mut plan,
        );

        tracing::debug!(
            tick = snapshot.tick,
            economy = economy.len(),
            production = production.len(),
            promoted = summary.promoted,
            all_in = summary.all_in,
            intents = plan.intents().len(),
            "tick decided"
        );
        plan.into_intents()
    }

    fn on_unit_spawned(&mut self, tag: UnitTag, snapshot: &Snapshot) -> Result<Option<Role>> {
        let unit = snapshot.get(tag).ok_or(EngineError::UnknownUnit(tag))?;
        let Some(role) = combat::spawn_role(unit, snapshot) else {
            return Ok(None);
        };
        self.registry.assign(tag, role, snapshot)?;
        tracing::info!(unit = %tag, unit_type = ?unit.unit_type, ?role, "role assigned");
        Ok(Some(role))
    }

    fn on_unit_destroyed(&mut self, tag: UnitTag) {
        if let Some(role) = self.registry.remove(tag) {
            tracing::debug!(unit = %tag, ?role, "unit lost");
        }
    }
}
