//! Combat coordinator: role-driven unit behaviour
//!
//! Precedence within one tick:
//! 1. defender promotion, so squads below see the new membership
//! 2. all-in when no townhall remains (overrides anything issued earlier)
//! 3. workers and defenders answering a threat at the mineral line
//! 4. queens: transfusion first, then inject and creep duties
//! 5. squads: defending, then attacking
//! 6. overseer scouting and overlord spread
//!
//! Later steps never overwrite a unit an earlier step already commanded;
//! only the all-in forces its orders.

pub mod emergency;
pub mod queens;
pub mod scouting;
pub mod squads;

use rand::Rng;

use crate::core::config::Thresholds;
use crate::core::types::{UnitTypeId, Vec2};
use crate::intents::TickPlan;
use crate::roles::{Role, RoleRegistry};
use crate::services::MapServices;
use crate::snapshot::{Snapshot, Unit};
use crate::spatial::UnitIndex;

/// Everything the combat steps read during one tick
pub struct CombatContext<'a> {
    pub snapshot: &'a Snapshot,
    pub thresholds: &'a Thresholds,
    pub services: &'a dyn MapServices,
    /// Visible enemies, bucketed once per tick
    pub enemies: UnitIndex<'a>,
}

impl<'a> CombatContext<'a> {
    pub fn new(
        snapshot: &'a Snapshot,
        thresholds: &'a Thresholds,
        services: &'a dyn MapServices,
    ) -> Self {
        Self {
            snapshot,
            thresholds,
            services,
            enemies: UnitIndex::new(&snapshot.enemy_units),
        }
    }

    /// Creep tile a short step from `from` toward the contested middle.
    ///
    /// The heading is the midpoint of the enemy start and the map centre.
    pub fn creep_frontier(&self, from: Vec2) -> Option<Vec2> {
        let heading = self.snapshot.enemy_start.midpoint(&self.snapshot.map_center);
        let probe = from.towards(&heading, self.thresholds.combat.frontier_probe);
        self.services.closest_creep_tile(probe)
    }

    /// Where an overseer heads when idle
    pub fn scouting_target(&self) -> Vec2 {
        self.services
            .enemy_expansion()
            .unwrap_or(self.snapshot.enemy_start)
    }
}

/// What the coordinator changed beyond issuing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatSummary {
    /// Units moved from defending to attacking this tick
    pub promoted: usize,
    /// Units thrown into the all-in
    pub all_in: usize,
}

/// Role a freshly spawned unit starts with, if any.
///
/// Queens beyond one per townhall spread creep; the rest inject.
pub fn spawn_role(unit: &Unit, snapshot: &Snapshot) -> Option<Role> {
    match unit.unit_type {
        UnitTypeId::Zergling | UnitTypeId::Hydralisk => Some(Role::Defending),
        UnitTypeId::Queen => {
            if snapshot.count_of_type(UnitTypeId::Queen) > snapshot.townhall_count() {
                Some(Role::QueenCreep)
            } else {
                Some(Role::QueenInject)
            }
        }
        UnitTypeId::Overseer => Some(Role::Scouting),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CombatCoordinator;

impl CombatCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Switch the whole defending squad to attacking once it is big enough.
    ///
    /// Only members alive in `snapshot` count toward the size.
    pub fn promote_defenders(
        &self,
        registry: &mut RoleRegistry,
        snapshot: &Snapshot,
        thresholds: &Thresholds,
    ) -> usize {
        let defenders = registry.units_with_role(Role::Defending, snapshot).len();
        if defenders <= thresholds.combat.promote_defenders_above {
            return 0;
        }
        let moved = registry.switch_role(Role::Defending, Role::Attacking);
        tracing::info!(defenders, moved, "defending squad promoted to attacking");
        moved
    }

    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        snapshot: &Snapshot,
        thresholds: &Thresholds,
        services: &dyn MapServices,
        registry: &mut RoleRegistry,
        rng: &mut R,
        plan: &mut TickPlan,
    ) -> CombatSummary {
        let promoted = self.promote_defenders(registry, snapshot, thresholds);
        let registry = &*registry;
        let ctx = CombatContext::new(snapshot, thresholds, services);

        let all_in = emergency::all_in(&ctx, plan);
        emergency::worker_defense(&ctx, registry, plan);

        queens::transfusion(&ctx, registry, plan);
        queens::inject(&ctx, registry, plan);
        queens::spread_creep(&ctx, registry, plan);

        squads::defend(&ctx, registry, plan);
        squads::attack(&ctx, registry, plan);

        scouting::overseers(&ctx, registry, plan);
        scouting::overlords(&ctx, rng, plan);

        CombatSummary { promoted, all_in }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn snapshot() -> Snapshot {
        let mut s = Snapshot::new(Vec2::new(10.0, 10.0), Vec2::new(150.0, 150.0), Vec2::new(80.0, 80.0));
        s.units.push(Unit::new(1, UnitTypeId::Hatchery, Vec2::new(10.0, 10.0)));
        s
    }

    /// Register every unit of `unit_type` in `snapshot` under `role`
    pub fn assign_all(registry: &mut RoleRegistry, snapshot: &Snapshot, unit_type: UnitTypeId, role: Role) {
        let tags: Vec<_> = snapshot.units_of_type(unit_type).map(|u| u.tag).collect();
        for tag in tags {
            registry.assign(tag, role, snapshot).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::core::types::UnitTag;
    use crate::intents::Action;
    use crate::services::FixedServices;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn with_defenders(n: u64) -> (Snapshot, RoleRegistry) {
        let mut s = snapshot();
        for i in 0..n {
            s.units.push(Unit::new(100 + i, UnitTypeId::Zergling, Vec2::new(20.0, 20.0)));
        }
        let mut reg = RoleRegistry::new();
        assign_all(&mut reg, &s, UnitTypeId::Zergling, Role::Defending);
        (s, reg)
    }

    #[test]
    fn test_spawn_roles() {
        let mut s = snapshot();
        let ling = Unit::new(2, UnitTypeId::Zergling, Vec2::default());
        let drone = Unit::new(3, UnitTypeId::Drone, Vec2::default());
        let first_queen = Unit::new(4, UnitTypeId::Queen, Vec2::default());
        s.units.push(first_queen.clone());
        assert_eq!(spawn_role(&ling, &s), Some(Role::Defending));
        assert_eq!(spawn_role(&drone, &s), None);
        assert_eq!(spawn_role(&first_queen, &s), Some(Role::QueenInject));

        let second_queen = Unit::new(5, UnitTypeId::Queen, Vec2::default());
        s.units.push(second_queen.clone());
        assert_eq!(spawn_role(&second_queen, &s), Some(Role::QueenCreep));

        let overseer = Unit::new(6, UnitTypeId::Overseer, Vec2::default());
        assert_eq!(spawn_role(&overseer, &s), Some(Role::Scouting));
    }

    #[test]
    fn test_no_promotion_at_threshold() {
        let (s, mut reg) = with_defenders(24);
        let moved = CombatCoordinator::new().promote_defenders(&mut reg, &s, &Thresholds::default());
        assert_eq!(moved, 0);
        assert_eq!(reg.count(Role::Defending), 24);
    }

    #[test]
    fn test_promotion_above_threshold() {
        let (s, mut reg) = with_defenders(25);
        let moved = CombatCoordinator::new().promote_defenders(&mut reg, &s, &Thresholds::default());
        assert_eq!(moved, 25);
        assert_eq!(reg.count(Role::Defending), 0);
        assert_eq!(reg.count(Role::Attacking), 25);
    }

    #[test]
    fn test_dead_defenders_do_not_count() {
        let (mut s, mut reg) = with_defenders(25);
        s.units.retain(|u| u.tag != UnitTag(100));
        let moved = CombatCoordinator::new().promote_defenders(&mut reg, &s, &Thresholds::default());
        assert_eq!(moved, 0);
    }

    #[test]
    fn test_promoted_squad_acts_same_tick() {
        let (s, mut reg) = with_defenders(25);
        let mut plan = TickPlan::new(&s);
        let mut rng = StdRng::seed_from_u64(7);
        let summary = CombatCoordinator::new().evaluate(
            &s,
            &Thresholds::default(),
            &FixedServices::none(),
            &mut reg,
            &mut rng,
            &mut plan,
        );
        assert_eq!(summary.promoted, 25);
        let advancing = plan
            .intents()
            .iter()
            .filter(|i| i.action() == Some(&Action::AttackMove(s.enemy_start)))
            .count();
        assert_eq!(advancing, 25);
    }
}
