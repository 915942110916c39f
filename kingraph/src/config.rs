//! View configuration: layout geometry and merge behavior.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KinError, Result};
use crate::model::Point;

/// Default distance between a person and whoever discovered them
pub const DEFAULT_STEP_DISTANCE: f64 = 100.0;

/// How a snapshot is reconciled into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Align store and snapshot by sorted position. Assumes dense 0-based ids.
    #[default]
    Positional,
    /// Match nodes by id; add and remove by id presence.
    ById,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub step_distance: f64,
    /// Where the layout root is placed, usually the viewport center.
    pub origin: Point,
    pub merge_strategy: MergeStrategy,
    /// Report links to already placed people next to the traversal edges.
    pub cross_links: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            step_distance: DEFAULT_STEP_DISTANCE,
            origin: Point::ORIGIN,
            merge_strategy: MergeStrategy::Positional,
            cross_links: false,
        }
    }
}

impl ViewConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ViewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.step_distance.is_finite() || self.step_distance <= 0.0 {
            return Err(KinError::InvalidConfig(format!(
                "step_distance must be a positive finite number, got {}",
                self.step_distance
            )));
        }
        if !self.origin.x.is_finite() || !self.origin.y.is_finite() {
            return Err(KinError::InvalidConfig("origin must be finite".into()));
        }
        Ok(())
    }
}
