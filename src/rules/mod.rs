//! Guarded rule groups
//!
//! A controller is an ordered list of rule groups. Each rule is a plain
//! function of the snapshot, the thresholds and the plan so far, returning a
//! `Verdict`. Groups evaluate either first-match (the rules are exclusive
//! alternatives in priority order) or independently (every rule gets a say).
//!
//! A guard that holds but cannot act this tick (unaffordable, busy producer)
//! is still a match: in a first-match group it blocks lower-priority rules,
//! exactly like an `if/else if` chain whose taken branch did nothing.

use crate::core::config::Thresholds;
use crate::core::types::{UnitTag, UnitTypeId, UpgradeId, Vec2};
use crate::intents::{Action, Intent, MacroOrder, SkipReason, TickPlan};
use crate::snapshot::{unit_cost, upgrade_cost, Cost, Snapshot, Unit};

/// Read-only inputs of a rule
pub struct RuleContext<'a> {
    pub snapshot: &'a Snapshot,
    pub thresholds: &'a Thresholds,
    pub plan: &'a TickPlan,
}

impl<'a> RuleContext<'a> {
    /// In production according to the snapshot plus ordered earlier this tick
    pub fn pending(&self, unit_type: UnitTypeId) -> u32 {
        self.snapshot.already_pending(unit_type) + self.plan.issued(unit_type)
    }

    /// Owned (built or building) plus pending
    pub fn total(&self, unit_type: UnitTypeId) -> u32 {
        self.snapshot.count_of_type(unit_type) + self.pending(unit_type)
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.plan.can_afford(cost)
    }

    /// First larva without an order this tick
    pub fn free_larva(&self) -> Option<&'a Unit> {
        let plan = self.plan;
        self.snapshot.larvae().find(|l| !plan.is_claimed(l.tag))
    }

    /// Main townhall when it is ready, idle and not yet ordered this tick
    pub fn idle_main_townhall(&self) -> Option<&'a Unit> {
        self.snapshot
            .main_townhall()
            .filter(|hq| hq.is_ready && hq.is_idle && !self.plan.is_claimed(hq.tag))
    }

    /// Ready, idle structure of `unit_type` free this tick
    pub fn idle_structure(&self, unit_type: UnitTypeId) -> Option<&'a Unit> {
        let plan = self.plan;
        self.snapshot
            .ready_of_type(unit_type)
            .find(|s| s.is_idle && !plan.is_claimed(s.tag))
    }
}

/// An intent together with what it costs
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub intent: Intent,
    pub cost: Cost,
}

impl Proposal {
    pub fn free(intent: Intent) -> Self {
        Self {
            intent,
            cost: Cost::FREE,
        }
    }

    pub fn order(order: MacroOrder) -> Self {
        Self::free(Intent::Macro(order))
    }

    pub fn train(producer: UnitTag, unit_type: UnitTypeId) -> Self {
        Self {
            intent: Intent::command(producer, Action::Train(unit_type)),
            cost: unit_cost(unit_type),
        }
    }

    pub fn morph(actor: UnitTag, into: UnitTypeId) -> Self {
        Self {
            intent: Intent::command(actor, Action::Morph(into)),
            cost: unit_cost(into),
        }
    }

    pub fn research(structure: UnitTag, upgrade: UpgradeId) -> Self {
        Self {
            intent: Intent::command(structure, Action::Research(upgrade)),
            cost: upgrade_cost(upgrade),
        }
    }

    pub fn build(structure: UnitTypeId, near: Vec2) -> Self {
        Self {
            intent: Intent::Macro(MacroOrder::BuildStructure { structure, near }),
            cost: unit_cost(structure),
        }
    }
}

/// Outcome of one rule
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Guard false
    Pass,
    /// Guard true, but nothing can be done this tick
    Hold(SkipReason),
    Issue(Vec<Proposal>),
}

impl Verdict {
    pub fn one(proposal: Proposal) -> Self {
        Verdict::Issue(vec![proposal])
    }
}

pub type RuleFn = fn(&RuleContext<'_>) -> Verdict;

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub eval: RuleFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Stop at the first rule whose guard holds
    FirstMatch,
    Independent,
}

#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub name: &'static str,
    pub evaluation: Evaluation,
    pub rules: Vec<Rule>,
}

impl RuleGroup {
    pub fn first_match(name: &'static str, rules: Vec<Rule>) -> Self {
        Self {
            name,
            evaluation: Evaluation::FirstMatch,
            rules,
        }
    }

    pub fn independent(name: &'static str, rules: Vec<Rule>) -> Self {
        Self {
            name,
            evaluation: Evaluation::Independent,
            rules,
        }
    }

    /// Evaluate the group into `plan`; returns the names of rules whose guard held
    pub fn run(
        &self,
        snapshot: &Snapshot,
        thresholds: &Thresholds,
        plan: &mut TickPlan,
    ) -> Vec<&'static str> {
        let mut matched = Vec::new();

        for rule in &self.rules {
            let verdict = {
                let ctx = RuleContext {
                    snapshot,
                    thresholds,
                    plan: &*plan,
                };
                (rule.eval)(&ctx)
            };

            match verdict {
                Verdict::Pass => continue,
                Verdict::Hold(reason) => {
                    tracing::trace!(group = self.name, rule = rule.name, ?reason, "rule held");
                }
                Verdict::Issue(proposals) => {
                    for proposal in proposals {
                        apply(self.name, rule.name, proposal, plan);
                    }
                }
            }

            matched.push(rule.name);
            if self.evaluation == Evaluation::FirstMatch {
                break;
            }
        }

        matched
    }
}

fn apply(group: &'static str, rule: &'static str, proposal: Proposal, plan: &mut TickPlan) {
    if let Intent::Macro(order) = &proposal.intent {
        if proposal.cost == Cost::FREE {
            tracing::debug!(group, rule, ?order, "macro order");
            plan.order(order.clone());
            return;
        }
    }
    let actor = proposal.intent.actor();
    match plan.submit(proposal.intent, proposal.cost) {
        Ok(()) => tracing::debug!(group, rule, ?actor, "rule fired"),
        Err(reason) => tracing::trace!(group, rule, ?actor, ?reason, "proposal rejected"),
    }
}
