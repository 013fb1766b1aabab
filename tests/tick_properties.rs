//! Property-based tests over randomly populated snapshots

use ahash::AHashSet;
use proptest::prelude::*;

use brood_mind::core::types::{UnitTag, UnitTypeId, Vec2};
use brood_mind::driver::{DecisionEngine, TickDriver};
use brood_mind::intents::{Action, Intent, MacroOrder};
use brood_mind::services::FixedServices;
use brood_mind::snapshot::{unit_cost, upgrade_cost, Cost, Snapshot, Unit};
use brood_mind::Thresholds;

#[derive(Debug, Clone)]
struct Population {
    townhalls: u64,
    larvae: u64,
    drones: u64,
    lings: u64,
    queens: u64,
    overlords: u64,
    enemies: u64,
    pool: bool,
    minerals: u32,
    vespene: u32,
    supply_used: u32,
    supply_cap: u32,
}

fn population() -> impl Strategy<Value = Population> {
    (
        (0u64..3, 0u64..4, 0u64..30, 0u64..40, 0u64..5, 0u64..6, 0u64..20),
        (any::<bool>(), 0u32..2000, 0u32..800, 0u32..200, 0u32..200),
    )
        .prop_map(
            |((townhalls, larvae, drones, lings, queens, overlords, enemies), (pool, minerals, vespene, a, b))| {
                Population {
                    townhalls,
                    larvae,
                    drones,
                    lings,
                    queens,
                    overlords,
                    enemies,
                    pool,
                    minerals,
                    vespene,
                    supply_used: a.min(b),
                    supply_cap: a.max(b),
                }
            },
        )
}

fn build(p: &Population) -> Snapshot {
    let mut s = Snapshot::new(Vec2::new(20.0, 20.0), Vec2::new(140.0, 140.0), Vec2::new(80.0, 80.0));
    s.minerals = p.minerals;
    s.vespene = p.vespene;
    s.supply_used = p.supply_used;
    s.supply_cap = p.supply_cap;
    s.supply_workers = p.drones as u32;

    let mut tag = 1u64;
    let mut push = |s: &mut Snapshot, unit_type: UnitTypeId, pos: Vec2| {
        s.units.push(Unit::new(tag, unit_type, pos));
        tag += 1;
    };
    for i in 0..p.townhalls {
        push(&mut s, UnitTypeId::Hatchery, Vec2::new(20.0 + i as f32 * 30.0, 20.0));
    }
    if p.pool {
        push(&mut s, UnitTypeId::SpawningPool, Vec2::new(24.0, 16.0));
    }
    for _ in 0..p.larvae {
        push(&mut s, UnitTypeId::Larva, Vec2::new(21.0, 18.0));
    }
    for i in 0..p.drones {
        push(&mut s, UnitTypeId::Drone, Vec2::new(14.0 + (i % 5) as f32, 18.0 + (i / 5) as f32));
    }
    for i in 0..p.lings {
        push(&mut s, UnitTypeId::Zergling, Vec2::new(30.0 + (i % 8) as f32, 30.0 + (i / 8) as f32));
    }
    for i in 0..p.queens {
        push(&mut s, UnitTypeId::Queen, Vec2::new(22.0 + i as f32, 22.0));
    }
    for i in 0..p.overlords {
        push(&mut s, UnitTypeId::Overlord, Vec2::new(10.0 + i as f32 * 6.0, 40.0));
    }
    for i in 0..p.enemies {
        s.enemy_units.push(Unit::new(
            10_000 + i,
            UnitTypeId::Other(1),
            Vec2::new(18.0 + (i % 10) as f32 * 4.0, 20.0 + (i / 10) as f32 * 15.0),
        ));
    }
    s
}

fn cost_of(intent: &Intent) -> Cost {
    match intent {
        Intent::Command(c) => match &c.action {
            Action::Train(t) | Action::Morph(t) => unit_cost(*t),
            Action::Research(u) => upgrade_cost(*u),
            _ => Cost::FREE,
        },
        Intent::Macro(MacroOrder::BuildStructure { structure, .. }) => unit_cost(*structure),
        Intent::Macro(_) => Cost::FREE,
    }
}

fn decide(p: &Population) -> (Snapshot, Vec<Intent>) {
    let s = build(p);
    let services = FixedServices::none()
        .with_creep_tile(Vec2::new(40.0, 40.0))
        .with_creep_edge(Vec2::new(44.0, 44.0));
    let mut driver = TickDriver::with_seed(Thresholds::default(), services, 5);
    driver.adopt_units(&s).unwrap();
    let intents = driver.on_tick(&s);
    (s, intents)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_commands_only_address_known_units(p in population()) {
        let (s, intents) = decide(&p);
        for intent in &intents {
            if let Some(actor) = intent.actor() {
                prop_assert!(s.contains(actor), "unknown actor {}", actor);
            }
        }
    }

    #[test]
    fn prop_one_direct_command_per_actor(p in population()) {
        let (_, intents) = decide(&p);
        let mut seen: AHashSet<UnitTag> = AHashSet::new();
        for intent in &intents {
            if let Intent::Command(c) = intent {
                if !c.queued {
                    prop_assert!(seen.insert(c.actor), "second command for {}", c.actor);
                }
            }
        }
    }

    #[test]
    fn prop_spending_within_resources(p in population()) {
        let (s, intents) = decide(&p);
        let (minerals, vespene, supply) = intents.iter().map(cost_of).fold((0, 0, 0), |acc, c| {
            (acc.0 + c.minerals, acc.1 + c.vespene, acc.2 + c.supply)
        });
        prop_assert!(minerals <= s.minerals);
        prop_assert!(vespene <= s.vespene);
        prop_assert!(supply <= s.supply_left());
    }

    #[test]
    fn prop_thirteen_workers_never_trains_drone(larvae in 1u64..4, minerals in 100u32..2000) {
        let p = Population {
            townhalls: 1,
            larvae,
            drones: 13,
            lings: 0,
            queens: 0,
            overlords: 1,
            enemies: 0,
            pool: false,
            minerals,
            vespene: 0,
            supply_used: 13,
            supply_cap: 22,
        };
        let (_, intents) = decide(&p);
        let trains: Vec<_> = intents
            .iter()
            .filter_map(|i| i.action())
            .filter(|a| matches!(a, Action::Train(_)))
            .collect();
        prop_assert!(trains.contains(&&Action::Train(UnitTypeId::Overlord)));
        prop_assert!(!trains.contains(&&Action::Train(UnitTypeId::Drone)));
    }
}
