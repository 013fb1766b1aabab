//! Overseer scouting and overlord spread

use rand::Rng;
use std::f32::consts::TAU;

use crate::combat::CombatContext;
use crate::core::types::{AbilityId, UnitTypeId};
use crate::intents::{AbilityTarget, Action, TickPlan};
use crate::roles::{Role, RoleRegistry};

/// Overseers head for the enemy, keep their distance from anything they
/// meet, and pull back hard once damaged, dropping a changeling if charged.
pub fn overseers(ctx: &CombatContext<'_>, registry: &RoleRegistry, plan: &mut TickPlan) {
    let s = &ctx.thresholds.scouting;
    let scouts = ctx.snapshot.units.iter().filter(|u| {
        u.unit_type == UnitTypeId::Overseer || registry.role_of(u.tag) == Some(Role::Scouting)
    });

    for scout in scouts {
        let threat = ctx.enemies.closest_within(s.threat_radius, scout.position);
        match threat {
            Some(enemy) if scout.is_damaged() => {
                let away = scout.position.towards(&enemy.position, -s.retreat_distance);
                tracing::debug!(scout = %scout.tag, enemy = %enemy.tag, "scout retreating");
                if plan.command(scout.tag, Action::Move(away)) && scout.energy >= s.changeling_energy {
                    plan.queue(
                        scout.tag,
                        Action::UseAbility {
                            ability: AbilityId::SpawnChangeling,
                            target: AbilityTarget::None,
                        },
                    );
                }
            }
            Some(enemy) => {
                let away = scout.position.towards(&enemy.position, -s.kite_distance);
                plan.command(scout.tag, Action::Move(away));
            }
            None if scout.is_idle => {
                plan.command(scout.tag, Action::Move(ctx.scouting_target()));
            }
            None => {}
        }
    }
}

/// Idle overlords drift to a random nearby point, or back off from enemies
pub fn overlords<R: Rng + ?Sized>(ctx: &CombatContext<'_>, rng: &mut R, plan: &mut TickPlan) {
    let s = &ctx.thresholds.scouting;

    for overlord in ctx
        .snapshot
        .ready_of_type(UnitTypeId::Overlord)
        .filter(|o| o.is_idle)
    {
        let destination = match ctx.enemies.closest_within(s.threat_radius, overlord.position) {
            Some(enemy) => overlord.position.towards(&enemy.position, -s.retreat_distance),
            None => overlord
                .position
                .offset_polar(rng.gen_range(0.0..TAU), s.overlord_spread),
        };
        plan.command(overlord.tag, Action::Move(destination));
    }
}
