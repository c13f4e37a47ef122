//! Simulation configuration

use crate::catalog::Catalog;
use crate::error::{HaggleError, Result};
use crate::types::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub state_file: PathBuf,
    /// Wall-clock bound for a run, in seconds
    pub duration_secs: u64,
    /// Pause between rounds, in milliseconds
    pub round_delay_ms: u64,
    pub max_rounds: u32,
    /// Seed for message selection; random when unset
    pub seed: Option<u64>,
    pub buyer: BuyerConfig,
    pub seller: SellerConfig,
    pub catalog: Catalog,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from("negotiations.json"),
            duration_secs: 60,
            round_delay_ms: 500,
            max_rounds: 8,
            seed: None,
            buyer: BuyerConfig::default(),
            seller: SellerConfig::default(),
            catalog: Catalog::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyerConfig {
    pub agent_id: AgentId,
    pub budget: u64,
    /// First bid as a fraction of the asking price
    pub opening_fraction: f64,
    /// Share of the remaining distance to the maximum conceded each round
    pub step_fraction: f64,
    /// Midpoint band as a fraction of the asking price
    pub convergence_band: f64,
    /// Highest share of the asking price the buyer will pay, per category
    pub category_limits: BTreeMap<String, f64>,
    pub default_limit: f64,
}

impl Default for BuyerConfig {
    fn default() -> Self {
        let category_limits = [("Electronics", 0.85), ("Furniture", 0.70), ("Sports", 0.80)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        Self {
            agent_id: AgentId::from("buyer_001"),
            budget: 1200,
            opening_fraction: 0.60,
            step_fraction: 0.5,
            convergence_band: 0.05,
            category_limits,
            default_limit: 0.75,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerConfig {
    pub agent_id: AgentId,
    pub step_fraction: f64,
    pub convergence_band: f64,
    /// Extra step fraction per unit of listing urgency
    pub urgency_weight: f64,
}

impl Default for SellerConfig {
    fn default() -> Self {
        Self {
            agent_id: AgentId::from("seller_001"),
            step_fraction: 0.5,
            convergence_band: 0.05,
            urgency_weight: 0.1,
        }
    }
}

impl SimulationConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HaggleError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            HaggleError::Configuration(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(HaggleError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }

        check_fraction("buyer.opening_fraction", self.buyer.opening_fraction)?;
        check_fraction("buyer.step_fraction", self.buyer.step_fraction)?;
        check_fraction("seller.step_fraction", self.seller.step_fraction)?;
        check_fraction("buyer.default_limit", self.buyer.default_limit)?;
        check_band("buyer.convergence_band", self.buyer.convergence_band)?;
        check_band("seller.convergence_band", self.seller.convergence_band)?;
        check_band("seller.urgency_weight", self.seller.urgency_weight)?;
        for (category, limit) in &self.buyer.category_limits {
            check_fraction(&format!("buyer.category_limits.{}", category), *limit)?;
        }

        if self.catalog.is_empty() {
            return Err(HaggleError::InvalidConfig(
                "catalog must list at least one item".to_string(),
            ));
        }
        self.catalog.validate()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn round_delay(&self) -> Duration {
        Duration::from_millis(self.round_delay_ms)
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(HaggleError::InvalidConfig(format!(
            "{} must be in (0, 1], got {}",
            name, value
        )))
    }
}

fn check_band(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(HaggleError::InvalidConfig(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )))
    }
}
