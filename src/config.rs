use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::MergeError,
    passes::{ConditionalParams, PassLimits},
};

/// Area and similarity thresholds for the three passes.
///
/// Every field is required; defaults belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub road_split_area_threshold: f64,
    pub small_area_threshold: f64,
    pub medium_area_threshold: f64,
    pub target_area_threshold: f64,
    pub max_merged_area: f64,
    pub similarity_threshold: f64,
    pub max_neighbors_considered: usize,
    pub adjacency_buffer_tolerance: f64,
}

/// Engine configuration, usually read from a JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub thresholds: Thresholds,
    /// Per-pass cap on processed records; guards against inconsistent thresholds.
    pub max_iterations: usize,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MergeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, MergeError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Check ranges and the relationships between thresholds.
    pub fn validate(&self) -> Result<(), MergeError> {
        let t = &self.thresholds;
        let values = [
            ("road_split_area_threshold", t.road_split_area_threshold),
            ("small_area_threshold", t.small_area_threshold),
            ("medium_area_threshold", t.medium_area_threshold),
            ("target_area_threshold", t.target_area_threshold),
            ("max_merged_area", t.max_merged_area),
            ("similarity_threshold", t.similarity_threshold),
            ("adjacency_buffer_tolerance", t.adjacency_buffer_tolerance),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(MergeError::Config(format!("`{name}` must be a finite non-negative number, got {value}")))
            }
        }

        if t.medium_area_threshold > t.target_area_threshold {
            return Err(MergeError::Config(format!(
                "`medium_area_threshold` ({}) exceeds `target_area_threshold` ({})",
                t.medium_area_threshold, t.target_area_threshold
            )))
        }
        if t.adjacency_buffer_tolerance == 0.0 {
            return Err(MergeError::Config("`adjacency_buffer_tolerance` must be positive".into()))
        }
        if t.max_neighbors_considered == 0 {
            return Err(MergeError::Config("`max_neighbors_considered` must be at least 1".into()))
        }
        if self.max_iterations == 0 {
            return Err(MergeError::Config("`max_iterations` must be at least 1".into()))
        }

        if t.small_area_threshold > t.road_split_area_threshold {
            warn!(
                small = t.small_area_threshold,
                road_split = t.road_split_area_threshold,
                "small-area threshold exceeds road-split threshold; passes run strictly in sequence"
            );
        }

        Ok(())
    }

    pub fn limits(&self) -> PassLimits {
        PassLimits {
            adjacency_tolerance: self.thresholds.adjacency_buffer_tolerance,
            max_iterations: self.max_iterations,
        }
    }

    pub fn conditional_params(&self) -> ConditionalParams {
        ConditionalParams {
            medium_threshold: self.thresholds.medium_area_threshold,
            target_threshold: self.thresholds.target_area_threshold,
            max_area: self.thresholds.max_merged_area,
            similarity_threshold: self.thresholds.similarity_threshold,
            max_neighbors: self.thresholds.max_neighbors_considered,
        }
    }
}
