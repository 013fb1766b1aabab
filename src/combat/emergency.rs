//! All-in and worker self-defence

use crate::combat::CombatContext;
use crate::intents::{Action, TickPlan};
use crate::roles::{Role, RoleRegistry};

/// With no townhall left, send every fighting-capable unit at the enemy start.
///
/// Overrides whatever the same units were told earlier in the tick.
pub fn all_in(ctx: &CombatContext<'_>, plan: &mut TickPlan) -> usize {
    if ctx.snapshot.townhall_count() > 0 {
        return 0;
    }
    let target = ctx.snapshot.enemy_start;
    let mut sent = 0;
    for unit in ctx.snapshot.units.iter().filter(|u| u.unit_type.joins_all_in()) {
        plan.force(unit.tag, Action::AttackMove(target));
        sent += 1;
    }
    if sent > 0 {
        tracing::warn!(units = sent, "no townhall left, committing everything");
    }
    sent
}

/// Workers with an enemy in touching range fight back, and the defending
/// squad converges on that enemy.
pub fn worker_defense(ctx: &CombatContext<'_>, registry: &RoleRegistry, plan: &mut TickPlan) {
    let radius = ctx.thresholds.combat.worker_threat_radius;
    let defenders = registry.units_with_role(Role::Defending, ctx.snapshot);

    for drone in ctx.snapshot.workers() {
        let Some(enemy) = ctx.enemies.closest_within(radius, drone.position) else {
            continue;
        };
        tracing::debug!(worker = %drone.tag, enemy = %enemy.tag, "worker under attack");
        plan.command(drone.tag, Action::Attack(enemy.tag));
        for defender in &defenders {
            plan.command(defender.tag, Action::Attack(enemy.tag));
        }
    }
}
