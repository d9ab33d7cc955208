//! Per-axis limit configuration, loaded and validated once at startup.
//!
//! ## Example: TOML Configuration
//!
//! ```toml
//! tolerance = 1e-8
//!
//! [[axes]]
//! name = "x"
//! max_velocity = 5.0
//! max_accel = 2.0
//!
//! [[axes]]
//! name = "z"
//! max_velocity = 1.0
//! min_velocity = -0.5
//! max_accel = 0.25
//! ```
//!
//! Omitted `min_velocity`/`min_accel` default to the negated maxima.
//! Validation happens here, once, so the per-tick solve path stays
//! branch-minimal.

// src/config.rs

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::limits::{KinematicLimits, LimitError, Tolerance};
use crate::solver::ProfileSolver;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("axis `{axis}`: {source}")]
    Limit { axis: String, source: LimitError },
}

/// Planner-side configuration: one limit envelope per axis plus the relative
/// tolerance used by profile validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlannerConfig {
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub axes: Vec<AxisConfig>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            axes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AxisConfig {
    pub name: String,
    pub max_velocity: f64,
    /// Defaults to `-max_velocity` when omitted.
    #[serde(default)]
    pub min_velocity: Option<f64>,
    pub max_accel: f64,
    /// Defaults to `-max_accel` when omitted.
    #[serde(default)]
    pub min_accel: Option<f64>,
}

impl AxisConfig {
    pub fn limits(&self) -> KinematicLimits {
        KinematicLimits {
            v_max: self.max_velocity,
            v_min: self.min_velocity.unwrap_or(-self.max_velocity),
            a_max: self.max_accel,
            a_min: self.min_accel.unwrap_or(-self.max_accel),
        }
    }
}

impl PlannerConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Validates every axis envelope and builds one solver per axis. This is
    /// the single place limit invariants are enforced; solvers assume them
    /// afterwards.
    pub fn build_solvers(&self) -> Result<Vec<ProfileSolver>, ConfigError> {
        let tolerance = Tolerance {
            rel: self.tolerance,
        };
        let mut solvers = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            let limits = axis.limits();
            limits.validate().map_err(|source| ConfigError::Limit {
                axis: axis.name.clone(),
                source,
            })?;
            tracing::debug!(
                "axis {}: v=[{}, {}] a=[{}, {}]",
                axis.name,
                limits.v_min,
                limits.v_max,
                limits.a_min,
                limits.a_max
            );
            solvers.push(ProfileSolver::with_tolerance(limits, tolerance));
        }
        tracing::info!(axes = solvers.len(), "planner configuration validated");
        Ok(solvers)
    }
}

fn default_tolerance() -> f64 {
    1e-8
}
