//! Queen duties: transfusion, larva injection and creep spread

use ordered_float::OrderedFloat;

use crate::combat::CombatContext;
use crate::core::types::AbilityId;
use crate::intents::{AbilityTarget, Action, TickPlan};
use crate::roles::{Role, RoleRegistry};
use crate::spatial;

fn ability(ability: AbilityId, target: AbilityTarget) -> Action {
    Action::UseAbility { ability, target }
}

/// Badly hurt queens are healed by the nearest queen of the same duty that
/// has the energy for it.
pub fn transfusion(ctx: &CombatContext<'_>, registry: &RoleRegistry, plan: &mut TickPlan) {
    let q = &ctx.thresholds.queens;

    for role in [Role::QueenInject, Role::QueenCreep] {
        let queens = registry.units_with_role(role, ctx.snapshot);
        for patient in queens.iter().filter(|u| u.health_fraction < q.transfuse_health) {
            let healer = queens
                .iter()
                .filter(|h| h.tag != patient.tag && h.energy >= q.transfuse_energy)
                .filter(|h| h.distance_to(&patient.position) < q.transfuse_range)
                .filter(|h| !plan.is_claimed(h.tag))
                .min_by_key(|h| OrderedFloat(h.distance_to(&patient.position)));
            if let Some(healer) = healer {
                tracing::debug!(healer = %healer.tag, patient = %patient.tag, "transfusion");
                plan.command(
                    healer.tag,
                    ability(AbilityId::Transfusion, AbilityTarget::Unit(patient.tag)),
                );
            }
        }
    }
}

/// Idle inject queens with enough energy inject the closest townhall
pub fn inject(ctx: &CombatContext<'_>, registry: &RoleRegistry, plan: &mut TickPlan) {
    let energy = ctx.thresholds.queens.inject_energy;

    for queen in registry.units_with_role(Role::QueenInject, ctx.snapshot) {
        if !queen.is_idle || queen.energy < energy {
            continue;
        }
        let Some(townhall) = spatial::closest_to(ctx.snapshot.townhalls(), queen.position) else {
            return;
        };
        plan.command(
            queen.tag,
            ability(AbilityId::InjectLarva, AbilityTarget::Unit(townhall.tag)),
        );
    }
}

/// Creep queens plant tumors at the creep edge when charged, and otherwise
/// walk the creep toward the enemy while staying near each other.
pub fn spread_creep(ctx: &CombatContext<'_>, registry: &RoleRegistry, plan: &mut TickPlan) {
    let q = &ctx.thresholds.queens;
    let queens = registry.units_with_role(Role::QueenCreep, ctx.snapshot);
    let Some(center) = spatial::centroid(queens.iter().copied()) else {
        return;
    };

    for queen in queens.iter().filter(|u| u.is_idle) {
        if queen.energy >= q.creep_tumor_energy {
            if let Some(edge) = ctx.services.nearby_creep_edge(queen.position) {
                plan.command(
                    queen.tag,
                    ability(AbilityId::BuildCreepTumor, AbilityTarget::Point(edge)),
                );
            }
            continue;
        }
        let Some(frontier) = ctx.creep_frontier(queen.position) else {
            continue;
        };
        let destination = if queen.distance_to(&center) > q.creep_clumping_distance {
            center.midpoint(&frontier)
        } else {
            frontier
        };
        plan.command(queen.tag, Action::Move(destination));
    }
}
