//! Production controller: tech structures, research and army
//!
//! Structure rules are independent of each other. Research and army rules
//! are first-match chains in priority order, so the movement-speed upgrade
//! wins over a queen at the pool step, range over speed at the den, and
//! ranged units over melee units when larvae are contested.

use crate::core::config::Thresholds;
use crate::core::types::{UnitTypeId, UpgradeId};
use crate::intents::{SkipReason, TickPlan};
use crate::rules::{Proposal, Rule, RuleContext, RuleGroup, Verdict};
use crate::snapshot::{unit_cost, upgrade_cost, Snapshot};

fn spawning_pool(ctx: &RuleContext<'_>) -> Verdict {
    let expanding = ctx.pending(UnitTypeId::Hatchery) >= 1 || ctx.snapshot.townhall_count() >= 2;
    if ctx.total(UnitTypeId::SpawningPool) != 0 || !expanding {
        return Verdict::Pass;
    }
    if !ctx.can_afford(unit_cost(UnitTypeId::SpawningPool)) {
        return Verdict::Hold(SkipReason::Unaffordable);
    }
    Verdict::one(Proposal::build(
        UnitTypeId::SpawningPool,
        ctx.snapshot.start_location,
    ))
}

fn has_tier_two(ctx: &RuleContext<'_>) -> bool {
    ctx.snapshot.townhalls().any(|t| t.unit_type.is_tier_two_townhall())
        || ctx.pending(UnitTypeId::Lair) > 0
}

fn tier_two_ready(ctx: &RuleContext<'_>) -> bool {
    ctx.snapshot
        .townhalls()
        .any(|t| t.is_ready && t.unit_type.is_tier_two_townhall())
}

fn tier_two_wanted(ctx: &RuleContext<'_>) -> bool {
    let s = ctx.snapshot;
    s.has_ready(UnitTypeId::SpawningPool)
        && s.upgrade_progress(UpgradeId::MetabolicBoost) > 0.0
        && s.count_of_type(UnitTypeId::Queen) >= ctx.thresholds.production.min_queens_for_lair
        && !has_tier_two(ctx)
}

/// The Lair morph would go out this tick if the main Hatchery stays free
pub(crate) fn tier_two_due(ctx: &RuleContext<'_>) -> bool {
    tier_two_wanted(ctx)
        && ctx
            .idle_main_townhall()
            .is_some_and(|hq| hq.unit_type == UnitTypeId::Hatchery)
        && ctx.can_afford(unit_cost(UnitTypeId::Lair))
}

fn tier_two_townhall(ctx: &RuleContext<'_>) -> Verdict {
    if !tier_two_wanted(ctx) {
        return Verdict::Pass;
    }
    let Some(hq) = ctx
        .idle_main_townhall()
        .filter(|hq| hq.unit_type == UnitTypeId::Hatchery)
    else {
        return Verdict::Hold(SkipReason::ActorBusy);
    };
    if !ctx.can_afford(unit_cost(UnitTypeId::Lair)) {
        return Verdict::Hold(SkipReason::Unaffordable);
    }
    Verdict::one(Proposal::morph(hq.tag, UnitTypeId::Lair))
}

fn hydralisk_den(ctx: &RuleContext<'_>) -> Verdict {
    if !tier_two_ready(ctx) || ctx.total(UnitTypeId::HydraliskDen) != 0 {
        return Verdict::Pass;
    }
    if !ctx.can_afford(unit_cost(UnitTypeId::HydraliskDen)) {
        return Verdict::Hold(SkipReason::Unaffordable);
    }
    Verdict::one(Proposal::build(
        UnitTypeId::HydraliskDen,
        ctx.snapshot.start_location,
    ))
}

fn overseer(ctx: &RuleContext<'_>) -> Verdict {
    if !tier_two_ready(ctx)
        || ctx.total(UnitTypeId::Overseer) >= ctx.thresholds.production.overseer_count
    {
        return Verdict::Pass;
    }
    let plan = ctx.plan;
    let Some(overlord) = ctx
        .snapshot
        .ready_of_type(UnitTypeId::Overlord)
        .find(|o| !plan.is_claimed(o.tag))
    else {
        return Verdict::Hold(SkipReason::MissingPrerequisite);
    };
    if !ctx.can_afford(unit_cost(UnitTypeId::Overseer)) {
        return Verdict::Hold(SkipReason::Unaffordable);
    }
    Verdict::one(Proposal::morph(overlord.tag, UnitTypeId::Overseer))
}

/// Research `upgrade` at an idle `structure` if not started and affordable
fn research_at(ctx: &RuleContext<'_>, structure: UnitTypeId, upgrade: UpgradeId) -> Verdict {
    if ctx.snapshot.upgrade_progress(upgrade) > 0.0 || !ctx.can_afford(upgrade_cost(upgrade)) {
        return Verdict::Pass;
    }
    match ctx.idle_structure(structure) {
        Some(building) => Verdict::one(Proposal::research(building.tag, upgrade)),
        None => Verdict::Pass,
    }
}

fn metabolic_boost(ctx: &RuleContext<'_>) -> Verdict {
    if !ctx.snapshot.has_ready(UnitTypeId::SpawningPool) {
        return Verdict::Pass;
    }
    research_at(ctx, UnitTypeId::SpawningPool, UpgradeId::MetabolicBoost)
}

fn queen_per_townhall(ctx: &RuleContext<'_>) -> Verdict {
    if !ctx.snapshot.has_ready(UnitTypeId::SpawningPool)
        || ctx.total(UnitTypeId::Queen) >= ctx.snapshot.townhall_count()
    {
        return Verdict::Pass;
    }
    let Some(hq) = ctx.idle_main_townhall() else {
        return Verdict::Pass;
    };
    if !ctx.can_afford(unit_cost(UnitTypeId::Queen)) {
        return Verdict::Hold(SkipReason::Unaffordable);
    }
    Verdict::one(Proposal::train(hq.tag, UnitTypeId::Queen))
}

fn grooved_spines(ctx: &RuleContext<'_>) -> Verdict {
    research_at(ctx, UnitTypeId::HydraliskDen, UpgradeId::GroovedSpines)
}

fn muscular_augments(ctx: &RuleContext<'_>) -> Verdict {
    research_at(ctx, UnitTypeId::HydraliskDen, UpgradeId::MuscularAugments)
}

fn army_unit(ctx: &RuleContext<'_>, unit_type: UnitTypeId, requires: UnitTypeId) -> Verdict {
    if !ctx.snapshot.has_ready(requires) || !ctx.can_afford(unit_cost(unit_type)) {
        return Verdict::Pass;
    }
    match ctx.free_larva() {
        Some(larva) => Verdict::one(Proposal::train(larva.tag, unit_type)),
        None => Verdict::Pass,
    }
}

fn hydralisk(ctx: &RuleContext<'_>) -> Verdict {
    army_unit(ctx, UnitTypeId::Hydralisk, UnitTypeId::HydraliskDen)
}

fn zergling(ctx: &RuleContext<'_>) -> Verdict {
    army_unit(ctx, UnitTypeId::Zergling, UnitTypeId::SpawningPool)
}

/// Tech, research and army decisions
#[derive(Debug, Clone)]
pub struct ProductionController {
    groups: Vec<RuleGroup>,
}

impl ProductionController {
    pub fn new() -> Self {
        let groups = vec![
            RuleGroup::independent(
                "structures",
                vec![
                    Rule { name: "spawning_pool", eval: spawning_pool },
                    Rule { name: "tier_two_townhall", eval: tier_two_townhall },
                    Rule { name: "hydralisk_den", eval: hydralisk_den },
                    Rule { name: "overseer", eval: overseer },
                ],
            ),
            RuleGroup::first_match(
                "pool",
                vec![
                    Rule { name: "metabolic_boost", eval: metabolic_boost },
                    Rule { name: "queen_per_townhall", eval: queen_per_townhall },
                ],
            ),
            RuleGroup::first_match(
                "den",
                vec![
                    Rule { name: "grooved_spines", eval: grooved_spines },
                    Rule { name: "muscular_augments", eval: muscular_augments },
                ],
            ),
            RuleGroup::first_match(
                "army",
                vec![
                    Rule { name: "hydralisk", eval: hydralisk },
                    Rule { name: "zergling", eval: zergling },
                ],
            ),
        ];
        Self { groups }
    }

    /// Run every group in order; returns the rules whose guards held
    pub fn evaluate(
        &self,
        snapshot: &Snapshot,
        thresholds: &Thresholds,
        plan: &mut TickPlan,
    ) -> Vec<&'static str> {
        self.groups
            .iter()
            .flat_map(|g| g.run(snapshot, thresholds, plan))
            .collect()
    }
}

impl Default for ProductionController {
    fn default() -> Self {
        Self::new()
    }
}
