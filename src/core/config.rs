//! Decision thresholds loaded from TOML
//!
//! Every numeric cutoff the controllers consult lives here. The defaults are
//! the hand-tuned opening/midgame values; presets under `data/thresholds/`
//! override any subset of them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{EngineError, Result};

/// Worker, supply and gas breakpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyThresholds {
    /// Worker count (incl. in-progress) at which one extra supply unit is made
    pub overlord_at_workers: u32,
    /// Worker count at which the first expansion is taken
    pub expand_at_workers: u32,
    /// Base count requested when expanding
    pub expansion_target: u32,
    /// Workers are trained while the count stays below this
    pub max_workers: u32,
    /// Early supply block guard: train supply when supply left is below this
    pub supply_buffer_early: u32,
    /// Later supply guard: train supply when supply left is at or below this
    pub supply_buffer_late: u32,
    /// Supply cap above which the later guard applies
    pub late_supply_cap: u32,
    /// Hard supply ceiling of the game
    pub max_supply: u32,
    /// Overlords allowed in flight before the later guard stops adding more
    pub max_pending_overlords: u32,
    /// Supply cap from which one gas building per townhall is wanted
    pub gas_per_base_supply_cap: u32,
    /// Minerals above which an idle townhall trains an extra queen
    pub extra_queen_minerals: u32,
    /// How far to look for a worker to staff an unsaturated gas building
    pub gas_worker_radius: f32,
    /// Delegate supply entirely to the execution layer's auto-supply
    pub auto_supply: bool,
}

impl Default for EconomyThresholds {
    fn default() -> Self {
        Self {
            overlord_at_workers: 13,
            expand_at_workers: 16,
            expansion_target: 2,
            max_workers: 38,
            supply_buffer_early: 2,
            supply_buffer_late: 5,
            late_supply_cap: 30,
            max_supply: 200,
            max_pending_overlords: 1,
            gas_per_base_supply_cap: 33,
            extra_queen_minerals: 300,
            gas_worker_radius: 10.0,
            auto_supply: false,
        }
    }
}

/// Tech progression knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionThresholds {
    /// Support units (queens) required before the tier-2 townhall morph
    pub min_queens_for_lair: u32,
    /// Overseers kept alive once tier 2 is reached
    pub overseer_count: u32,
}

impl Default for ProductionThresholds {
    fn default() -> Self {
        Self {
            min_queens_for_lair: 1,
            overseer_count: 1,
        }
    }
}

/// Army role transitions and engagement radii
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatThresholds {
    /// Units farther than this from their squad centroid regroup first
    pub clumping_distance: f32,
    /// Defending squad is promoted to attacking once it holds more than this
    pub promote_defenders_above: usize,
    /// Attacking squad pushes only while it holds more than this
    pub min_attack_size: usize,
    /// Enemy detection radius around the defending centroid
    pub defend_radius: f32,
    /// Enemy detection radius around the attacking centroid
    pub attack_radius: f32,
    /// Enemies this close to a worker make it fight back
    pub worker_threat_radius: f32,
    /// How far ahead of a unit the creep frontier is probed
    pub frontier_probe: f32,
}

impl Default for CombatThresholds {
    fn default() -> Self {
        Self {
            clumping_distance: 7.0,
            promote_defenders_above: 24,
            min_attack_size: 6,
            defend_radius: 15.0,
            attack_radius: 20.0,
            worker_threat_radius: 3.0,
            frontier_probe: 6.0,
        }
    }
}

/// Queen energy and spacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueenThresholds {
    pub inject_energy: f32,
    pub creep_tumor_energy: f32,
    /// Creep queens farther than this from their centroid close in while walking
    pub creep_clumping_distance: f32,
    pub transfuse_energy: f32,
    /// Health fraction below which a queen asks for a transfusion
    pub transfuse_health: f32,
    pub transfuse_range: f32,
}

impl Default for QueenThresholds {
    fn default() -> Self {
        Self {
            inject_energy: 25.0,
            creep_tumor_energy: 25.0,
            creep_clumping_distance: 8.0,
            transfuse_energy: 50.0,
            transfuse_health: 0.5,
            transfuse_range: 7.0,
        }
    }
}

/// Overseer and overlord scouting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutingThresholds {
    pub threat_radius: f32,
    /// Step taken away from a nearby enemy while scouting
    pub kite_distance: f32,
    /// Step taken away from a nearby enemy when damaged or exposed
    pub retreat_distance: f32,
    pub changeling_energy: f32,
    /// Radius of the random wander for idle overlords
    pub overlord_spread: f32,
}

impl Default for ScoutingThresholds {
    fn default() -> Self {
        Self {
            threat_radius: 15.0,
            kite_distance: 2.0,
            retreat_distance: 10.0,
            changeling_energy: 30.0,
            overlord_spread: 5.0,
        }
    }
}

/// Complete threshold table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thresholds {
    /// Preset name (set from filename)
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub economy: EconomyThresholds,
    #[serde(default)]
    pub production: ProductionThresholds,
    #[serde(default)]
    pub combat: CombatThresholds,
    #[serde(default)]
    pub queens: QueenThresholds,
    #[serde(default)]
    pub scouting: ScoutingThresholds,
}

impl Thresholds {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let thresholds: Thresholds = toml::from_str(contents)?;
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Reject tables the controllers cannot act on sensibly
    pub fn validate(&self) -> Result<()> {
        let e = &self.economy;
        if e.overlord_at_workers >= e.expand_at_workers || e.expand_at_workers >= e.max_workers {
            return Err(EngineError::InvalidThreshold(format!(
                "worker breakpoints must increase: {} < {} < {}",
                e.overlord_at_workers, e.expand_at_workers, e.max_workers
            )));
        }

        let distances = [
            ("combat.clumping_distance", self.combat.clumping_distance),
            ("combat.defend_radius", self.combat.defend_radius),
            ("combat.attack_radius", self.combat.attack_radius),
            ("combat.worker_threat_radius", self.combat.worker_threat_radius),
            ("queens.transfuse_range", self.queens.transfuse_range),
            ("scouting.threat_radius", self.scouting.threat_radius),
            ("economy.gas_worker_radius", e.gas_worker_radius),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidThreshold(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.queens.transfuse_health) {
            return Err(EngineError::InvalidThreshold(
                "queens.transfuse_health must be within [0,1]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a threshold preset from a TOML file; the preset name is the file stem
pub fn load_thresholds(path: &Path) -> Result<Thresholds> {
    let contents = fs::read_to_string(path)?;
    let mut thresholds = Thresholds::from_toml_str(&contents)?;
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        thresholds.name = stem.to_string();
    }
    Ok(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn preset(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("data/thresholds")
            .join(format!("{name}.toml"))
    }

    #[test]
    fn test_default_values() {
        let t = Thresholds::default();
        assert_eq!(t.economy.overlord_at_workers, 13);
        assert_eq!(t.economy.expand_at_workers, 16);
        assert_eq!(t.economy.max_workers, 38);
        assert_eq!(t.combat.promote_defenders_above, 24);
        assert_eq!(t.combat.clumping_distance, 7.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let t = Thresholds::from_toml_str("[combat]\npromote_defenders_above = 12\n").unwrap();
        assert_eq!(t.combat.promote_defenders_above, 12);
        assert_eq!(t.combat.attack_radius, 20.0);
        assert_eq!(t.economy.max_workers, 38);
    }

    #[test]
    fn test_inverted_worker_breakpoints_rejected() {
        let err = Thresholds::from_toml_str("[economy]\nexpand_at_workers = 40\n").unwrap_err();
        assert!(matches!(err, EngineError::InvalidThreshold(_)));
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        let err = Thresholds::from_toml_str("[combat]\ndefend_radius = 0.0\n").unwrap_err();
        assert!(matches!(err, EngineError::InvalidThreshold(_)));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Thresholds::from_toml_str("[combat\n").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_load_default_preset() {
        let t = load_thresholds(&preset("default")).expect("default preset should load");
        assert_eq!(t.name, "default");
        assert_eq!(t.combat.promote_defenders_above, 24);
    }

    #[test]
    fn test_load_aggressive_preset() {
        let t = load_thresholds(&preset("aggressive")).expect("aggressive preset should load");
        assert!(t.combat.promote_defenders_above < 24);
        assert!(t.economy.max_workers < 38);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_thresholds(&preset("does_not_exist")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
