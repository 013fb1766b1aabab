//! Economy controller: workers, supply, gas and the overflow queen
//!
//! Worker-count breakpoints form one first-match chain (supply unit at 13,
//! expansion at 16, drones below 38). Supply, gas, staffing and the extra
//! queen guard different resources and are evaluated on every tick
//! regardless of what the worker chain did.

use crate::core::config::Thresholds;
use crate::core::types::{UnitTag, UnitTypeId};
use crate::intents::{Action, Intent, MacroOrder, SkipReason, TickPlan};
use crate::production;
use crate::rules::{Proposal, Rule, RuleContext, RuleGroup, Verdict};
use crate::snapshot::{unit_cost, Snapshot, Unit};
use crate::spatial;

/// Train `unit_type` from the first free larva
fn train_from_larva(ctx: &RuleContext<'_>, unit_type: UnitTypeId) -> Verdict {
    if !ctx.can_afford(unit_cost(unit_type)) {
        return Verdict::Hold(SkipReason::Unaffordable);
    }
    match ctx.free_larva() {
        Some(larva) => Verdict::one(Proposal::train(larva.tag, unit_type)),
        None => Verdict::Hold(SkipReason::MissingPrerequisite),
    }
}

fn supply_unit_at_breakpoint(ctx: &RuleContext<'_>) -> Verdict {
    let e = &ctx.thresholds.economy;
    if ctx.snapshot.worker_count() != e.overlord_at_workers || ctx.pending(UnitTypeId::Overlord) > 0 {
        return Verdict::Pass;
    }
    train_from_larva(ctx, UnitTypeId::Overlord)
}

fn expand_at_breakpoint(ctx: &RuleContext<'_>) -> Verdict {
    let e = &ctx.thresholds.economy;
    if ctx.snapshot.worker_count() != e.expand_at_workers || ctx.pending(UnitTypeId::Hatchery) > 0 {
        return Verdict::Pass;
    }
    Verdict::one(Proposal::order(MacroOrder::ExpansionTarget(e.expansion_target)))
}

fn drone_below_cap(ctx: &RuleContext<'_>) -> Verdict {
    if ctx.snapshot.worker_count() >= ctx.thresholds.economy.max_workers {
        return Verdict::Pass;
    }
    train_from_larva(ctx, UnitTypeId::Drone)
}

fn auto_supply(ctx: &RuleContext<'_>) -> Verdict {
    if !ctx.thresholds.economy.auto_supply {
        return Verdict::Pass;
    }
    Verdict::one(Proposal::order(MacroOrder::AutoSupply))
}

fn supply_block_guard(ctx: &RuleContext<'_>) -> Verdict {
    let e = &ctx.thresholds.economy;
    if e.auto_supply {
        return Verdict::Pass;
    }
    let supply_left = ctx.plan.budget().supply;
    if supply_left >= e.supply_buffer_early
        || ctx.snapshot.supply_cap >= e.max_supply
        || ctx.pending(UnitTypeId::Overlord) > 0
    {
        return Verdict::Pass;
    }
    train_from_larva(ctx, UnitTypeId::Overlord)
}

fn supply_headroom(ctx: &RuleContext<'_>) -> Verdict {
    let e = &ctx.thresholds.economy;
    if e.auto_supply {
        return Verdict::Pass;
    }
    let cap = ctx.snapshot.supply_cap;
    if ctx.plan.budget().supply > e.supply_buffer_late
        || cap <= e.late_supply_cap
        || cap >= e.max_supply
        || ctx.pending(UnitTypeId::Overlord) > e.max_pending_overlords
    {
        return Verdict::Pass;
    }
    train_from_larva(ctx, UnitTypeId::Overlord)
}

/// Gas rules only apply once a pool exists and an extractor is affordable
fn gas_allowed(ctx: &RuleContext<'_>) -> bool {
    ctx.snapshot.count_of_type(UnitTypeId::SpawningPool) > 0
        && ctx.can_afford(unit_cost(UnitTypeId::Extractor))
}

fn first_gas(ctx: &RuleContext<'_>) -> Verdict {
    if !gas_allowed(ctx) || ctx.total(UnitTypeId::Extractor) != 0 {
        return Verdict::Pass;
    }
    Verdict::one(Proposal::order(MacroOrder::GasBuildingTarget(1)))
}

fn gas_per_base(ctx: &RuleContext<'_>) -> Verdict {
    if !gas_allowed(ctx)
        || ctx.total(UnitTypeId::Extractor) != 1
        || ctx.snapshot.supply_cap < ctx.thresholds.economy.gas_per_base_supply_cap
    {
        return Verdict::Pass;
    }
    Verdict::one(Proposal::order(MacroOrder::GasBuildingTarget(
        ctx.snapshot.townhall_count(),
    )))
}

fn mining(_: &RuleContext<'_>) -> Verdict {
    Verdict::one(Proposal::order(MacroOrder::Mining))
}

/// One nearby worker per unsaturated gas building.
///
/// Workers with an enemy in touching range are left free to fight back.
fn gas_saturation(ctx: &RuleContext<'_>) -> Verdict {
    let radius = ctx.thresholds.economy.gas_worker_radius;
    let threat_radius = ctx.thresholds.combat.worker_threat_radius;
    let mut taken: Vec<UnitTag> = Vec::new();
    let mut proposals = Vec::new();

    let threatened = |w: &Unit| {
        !spatial::closer_than(&ctx.snapshot.enemy_units, threat_radius, w.position).is_empty()
    };

    for gas in ctx.snapshot.gas_buildings() {
        if !gas.is_ready || gas.assigned_harvesters >= gas.ideal_harvesters {
            continue;
        }
        let free_workers = ctx
            .snapshot
            .workers()
            .filter(|w| !ctx.plan.is_claimed(w.tag) && !taken.contains(&w.tag))
            .filter(|w| !threatened(*w));
        let nearby = spatial::closer_than(free_workers, radius, gas.position);
        if let Some(worker) = spatial::closest_to(nearby, gas.position) {
            taken.push(worker.tag);
            proposals.push(Proposal::free(Intent::command(worker.tag, Action::Gather(gas.tag))));
        }
    }

    if proposals.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Issue(proposals)
    }
}

fn overflow_queen(ctx: &RuleContext<'_>) -> Verdict {
    if ctx.snapshot.minerals <= ctx.thresholds.economy.extra_queen_minerals
        || !ctx.snapshot.has_ready(UnitTypeId::SpawningPool)
    {
        return Verdict::Pass;
    }
    let Some(hq) = ctx.idle_main_townhall() else {
        return Verdict::Pass;
    };
    // The main Hatchery is owed to the Lair morph
    if production::tier_two_due(ctx) {
        return Verdict::Hold(SkipReason::ActorBusy);
    }
    if !ctx.can_afford(unit_cost(UnitTypeId::Queen)) {
        return Verdict::Hold(SkipReason::Unaffordable);
    }
    Verdict::one(Proposal::train(hq.tag, UnitTypeId::Queen))
}

/// Worker, supply and gas decisions
#[derive(Debug, Clone)]
pub struct EconomyController {
    groups: Vec<RuleGroup>,
}

impl EconomyController {
    pub fn new() -> Self {
        let groups = vec![
            RuleGroup::first_match(
                "workers",
                vec![
                    Rule { name: "supply_unit_at_breakpoint", eval: supply_unit_at_breakpoint },
                    Rule { name: "expand_at_breakpoint", eval: expand_at_breakpoint },
                    Rule { name: "drone_below_cap", eval: drone_below_cap },
                ],
            ),
            RuleGroup::independent(
                "supply",
                vec![
                    Rule { name: "auto_supply", eval: auto_supply },
                    Rule { name: "supply_block_guard", eval: supply_block_guard },
                    Rule { name: "supply_headroom", eval: supply_headroom },
                ],
            ),
            RuleGroup::first_match(
                "gas",
                vec![
                    Rule { name: "first_gas", eval: first_gas },
                    Rule { name: "gas_per_base", eval: gas_per_base },
                ],
            ),
            RuleGroup::independent(
                "staffing",
                vec![
                    Rule { name: "mining", eval: mining },
                    Rule { name: "gas_saturation", eval: gas_saturation },
                ],
            ),
            RuleGroup::independent(
                "queens",
                vec![Rule { name: "overflow_queen", eval: overflow_queen }],
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

impl Default for EconomyController {
    fn default() -> Self {
        Self::new()
    }
}
