//! Defending and attacking squads

use crate::combat::CombatContext;
use crate::intents::{Action, TickPlan};
use crate::roles::{Role, RoleRegistry};
use crate::snapshot::Unit;
use crate::spatial;

/// Every member engages the enemy closest to it
fn engage(members: &[&Unit], threats: &[&Unit], plan: &mut TickPlan) {
    for unit in members {
        if let Some(enemy) = spatial::closest_to(threats.iter().copied(), unit.position) {
            plan.command(unit.tag, Action::Attack(enemy.tag));
        }
    }
}

/// Hold near home: fight anything close to the squad, otherwise gather up
/// and creep forward.
pub fn defend(ctx: &CombatContext<'_>, registry: &RoleRegistry, plan: &mut TickPlan) {
    let c = &ctx.thresholds.combat;
    let members = registry.units_with_role(Role::Defending, ctx.snapshot);
    let Some(center) = spatial::centroid(members.iter().copied()) else {
        return;
    };

    let threats = ctx.enemies.closer_than(c.defend_radius, center);
    if !threats.is_empty() {
        tracing::debug!(squad = members.len(), threats = threats.len(), "defending");
        engage(&members, &threats, plan);
        return;
    }

    for unit in &members {
        if unit.distance_to(&center) > c.clumping_distance {
            plan.command(unit.tag, Action::Move(center));
        } else if let Some(frontier) = ctx.creep_frontier(unit.position) {
            plan.command(unit.tag, Action::Move(frontier));
        }
    }
}

/// Push on the enemy start while the squad is large enough, regroup otherwise.
///
/// A squad too small to push falls back on the defending squad, or on its own
/// centroid when there is nobody left at home.
pub fn attack(ctx: &CombatContext<'_>, registry: &RoleRegistry, plan: &mut TickPlan) {
    let c = &ctx.thresholds.combat;
    let members = registry.units_with_role(Role::Attacking, ctx.snapshot);
    let Some(center) = spatial::centroid(members.iter().copied()) else {
        return;
    };

    let threats = ctx.enemies.closer_than(c.attack_radius, center);
    if !threats.is_empty() {
        tracing::debug!(squad = members.len(), threats = threats.len(), "attacking squad engaged");
        engage(&members, &threats, plan);
        return;
    }

    if members.len() > c.min_attack_size {
        let target = ctx.snapshot.enemy_start;
        for unit in &members {
            if unit.distance_to(&center) > c.clumping_distance {
                plan.command(unit.tag, Action::Move(center));
            } else {
                plan.command(unit.tag, Action::AttackMove(target));
            }
        }
        return;
    }

    let rally = spatial::centroid(registry.units_with_role(Role::Defending, ctx.snapshot))
        .unwrap_or(center);
    for unit in &members {
        plan.command(unit.tag, Action::Move(rally));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::test_support::*;
    use crate::core::config::Thresholds;
    use crate::core::types::{UnitTag, UnitTypeId, Vec2};
    use crate::services::FixedServices;
    use crate::snapshot::Snapshot;

    fn squad(s: &mut Snapshot, first_tag: u64, n: u64, unit_type: UnitTypeId, origin: Vec2) {
        for i in 0..n {
            let pos = Vec2::new(origin.x + (i % 3) as f32, origin.y + (i / 3) as f32);
            s.units.push(Unit::new(first_tag + i, unit_type, pos));
        }
    }

    fn orders(plan: &TickPlan, action: &Action) -> usize {
        plan.intents().iter().filter(|i| i.action() == Some(action)).count()
    }

    fn run<F>(s: &Snapshot, reg: &RoleRegistry, services: &FixedServices, step: F) -> TickPlan
    where
        F: Fn(&CombatContext<'_>, &RoleRegistry, &mut TickPlan),
    {
        let t = Thresholds::default();
        let ctx = CombatContext::new(s, &t, services);
        let mut plan = TickPlan::new(s);
        step(&ctx, reg, &mut plan);
        plan
    }

    #[test]
    fn test_seven_clumped_attackers_advance() {
        let mut s = snapshot();
        squad(&mut s, 100, 7, UnitTypeId::Zergling, Vec2::new(40.0, 40.0));
        let mut reg = RoleRegistry::new();
        assign_all(&mut reg, &s, UnitTypeId::Zergling, Role::Attacking);

        let plan = run(&s, &reg, &FixedServices::none(), attack);
        assert_eq!(orders(&plan, &Action::AttackMove(s.enemy_start)), 7);
    }

    #[test]
    fn test_five_attackers_regroup_on_defenders() {
        let mut s = snapshot();
        squad(&mut s, 100, 5, UnitTypeId::Zergling, Vec2::new(40.0, 40.0));
        s.units.push(Unit::new(200, UnitTypeId::Hydralisk, Vec2::new(12.0, 12.0)));
        s.units.push(Unit::new(201, UnitTypeId::Hydralisk, Vec2::new(14.0, 12.0)));
        let mut reg = RoleRegistry::new();
        assign_all(&mut reg, &s, UnitTypeId::Zergling, Role::Attacking);
        assign_all(&mut reg, &s, UnitTypeId::Hydralisk, Role::Defending);

        let plan = run(&s, &reg, &FixedServices::none(), attack);
        assert_eq!(orders(&plan, &Action::AttackMove(s.enemy_start)), 0);
        assert_eq!(orders(&plan, &Action::Move(Vec2::new(13.0, 12.0))), 5);
    }

    #[test]
    fn test_small_squad_without_defenders_holds_together() {
        let mut s = snapshot();
        s.units.push(Unit::new(100, UnitTypeId::Zergling, Vec2::new(40.0, 40.0)));
        s.units.push(Unit::new(101, UnitTypeId::Zergling, Vec2::new(42.0, 40.0)));
        let mut reg = RoleRegistry::new();
        assign_all(&mut reg, &s, UnitTypeId::Zergling, Role::Attacking);

        let plan = run(&s, &reg, &FixedServices::none(), attack);
        assert_eq!(orders(&plan, &Action::Move(Vec2::new(41.0, 40.0))), 2);
    }

    #[test]
    fn test_straggler_rejoins_before_advancing() {
        let mut s = snapshot();
        squad(&mut s, 100, 7, UnitTypeId::Zergling, Vec2::new(40.0, 40.0));
        s.units.push(Unit::new(150, UnitTypeId::Zergling, Vec2::new(90.0, 40.0)));
        let mut reg = RoleRegistry::new();
        assign_all(&mut reg, &s, UnitTypeId::Zergling, Role::Attacking);

        let plan = run(&s, &reg, &FixedServices::none(), attack);
        let straggler = plan
            .intents()
            .iter()
            .find(|i| i.actor() == Some(UnitTag(150)))
            .and_then(|i| i.action().cloned());
        assert!(matches!(straggler, Some(Action::Move(_))));
    }

    #[test]
    fn test_attackers_engage_nearby_enemy() {
        let mut s = snapshot();
        squad(&mut s, 100, 3, UnitTypeId::Zergling, Vec2::new(40.0, 40.0));
        s.enemy_units.push(Unit::new(900, UnitTypeId::Other(7), Vec2::new(55.0, 40.0)));
        s.enemy_units.push(Unit::new(901, UnitTypeId::Other(7), Vec2::new(120.0, 40.0)));
        let mut reg = RoleRegistry::new();
        assign_all(&mut reg, &s, UnitTypeId::Zergling, Role::Attacking);

        let plan = run(&s, &reg, &FixedServices::none(), attack);
        assert_eq!(orders(&plan, &Action::Attack(UnitTag(900))), 3);
    }

    #[test]
    fn test_defenders_engage_within_radius() {
        let mut s = snapshot();
        squad(&mut s, 100, 4, UnitTypeId::Zergling, Vec2::new(20.0, 20.0));
        s.enemy_units.push(Unit::new(900, UnitTypeId::Other(7), Vec2::new(30.0, 20.0)));
        let mut reg = RoleRegistry::new();
        assign_all(&mut reg, &s, UnitTypeId::Zergling, Role::Defending);

        let plan = run(&s, &reg, &FixedServices::none(), defend);
        assert_eq!(orders(&plan, &Action::Attack(UnitTag(900))), 4);
    }

    #[test]
    fn test_idle_defenders_creep_forward() {
        let mut s = snapshot();
        squad(&mut s, 100, 4, UnitTypeId::Zergling, Vec2::new(20.0, 20.0));
        let mut reg = RoleRegistry::new();
        assign_all(&mut reg, &s, UnitTypeId::Zergling, Role::Defending);

        let tile = Vec2::new(30.0, 30.0);
        let plan = run(&s, &reg, &FixedServices::none().with_creep_tile(tile), defend);
        assert_eq!(orders(&plan, &Action::Move(tile)), 4);

        // Without creep the squad simply waits
        let plan = run(&s, &reg, &FixedServices::none(), defend);
        assert!(plan.intents().is_empty());
    }

    #[test]
    fn test_empty_squads_do_nothing() {
        let s = snapshot();
        let reg = RoleRegistry::new();
        assert!(run(&s, &reg, &FixedServices::none(), defend).intents().is_empty());
        assert!(run(&s, &reg, &FixedServices::none(), attack).intents().is_empty());
    }
}
