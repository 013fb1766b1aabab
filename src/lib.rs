//! Brood Mind - per-tick decision engine for a zerg real-time strategy agent

pub mod combat;
pub mod core;
pub mod driver;
pub mod economy;
pub mod intents;
pub mod production;
pub mod roles;
pub mod rules;
pub mod services;
pub mod snapshot;
pub mod spatial;

pub use crate::core::{load_thresholds, EngineError, Result, Thresholds};
pub use crate::driver::{DecisionEngine, TickDriver};
