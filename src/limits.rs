// src/limits.rs - Axis limit envelope, boundary conditions, and tolerance policy

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Velocity and acceleration envelope for one axis, independently signed.
///
/// Bounds must satisfy `v_max >= 0 >= v_min` and `a_max >= 0 >= a_min`.
/// The all-zero velocity window (`v_max == v_min == 0`) is an explicit
/// special case: the axis has no velocity freedom and the move duration is
/// forced by continuity alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicLimits {
    /// Upper velocity bound (>= 0), units/s.
    pub v_max: f64,
    /// Lower velocity bound (<= 0), units/s.
    pub v_min: f64,
    /// Upper acceleration bound (>= 0), units/s^2.
    pub a_max: f64,
    /// Lower acceleration bound (<= 0), units/s^2.
    pub a_min: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("limit value is not finite")]
    NonFinite,
    #[error("velocity bounds must satisfy v_max >= 0 >= v_min")]
    VelocityBounds,
    #[error("acceleration bounds must satisfy a_max >= 0 >= a_min")]
    AccelerationBounds,
}

impl KinematicLimits {
    /// Symmetric envelope: `[-v, v]` and `[-a, a]`.
    pub fn symmetric(v: f64, a: f64) -> Self {
        Self {
            v_max: v,
            v_min: -v,
            a_max: a,
            a_min: -a,
        }
    }

    /// Checks the limit invariants. Run once when configuration is loaded;
    /// the solve path assumes limits are already well formed.
    pub fn validate(&self) -> Result<(), LimitError> {
        let values = [self.v_max, self.v_min, self.a_max, self.a_min];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LimitError::NonFinite);
        }
        if self.v_max < 0.0 || self.v_min > 0.0 {
            return Err(LimitError::VelocityBounds);
        }
        if self.a_max < 0.0 || self.a_min > 0.0 {
            return Err(LimitError::AccelerationBounds);
        }
        Ok(())
    }

    /// True when the axis has no velocity freedom at all.
    pub(crate) fn zero_velocity_window(&self) -> bool {
        self.v_max == 0.0 && self.v_min == 0.0
    }
}

/// Start and end state of one axis for a single solve. Pure input with no
/// identity; recreated for every planning event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryCondition {
    /// Start position.
    pub p0: f64,
    /// Start velocity.
    pub v0: f64,
    /// End position.
    pub pf: f64,
    /// End velocity.
    pub vf: f64,
}

impl BoundaryCondition {
    pub fn new(p0: f64, v0: f64, pf: f64, vf: f64) -> Self {
        Self { p0, v0, pf, vf }
    }

    /// Signed distance to travel.
    pub fn pd(&self) -> f64 {
        self.pf - self.p0
    }
}

/// Relative tolerance policy for profile validation.
///
/// All comparisons in the checker scale with the magnitudes of the problem;
/// a fixed absolute epsilon would be wrong across unit systems (meters vs.
/// micrometers), so the only knob here is a relative factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Relative tolerance applied to the per-solve magnitude scales.
    pub rel: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { rel: 1e-8 }
    }
}

/// Concrete epsilons for one solve, derived from the problem's magnitudes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Eps {
    pub position: f64,
    pub velocity: f64,
    pub time: f64,
}

impl Tolerance {
    pub(crate) fn for_problem(&self, bc: &BoundaryCondition, limits: &KinematicLimits) -> Eps {
        let v_scale = bc
            .v0
            .abs()
            .max(bc.vf.abs())
            .max(limits.v_max)
            .max(-limits.v_min);
        let a_scale = limits.a_max.max(-limits.a_min);

        // Characteristic ramp and cruise durations bound the time scale.
        let t_ramp = if a_scale > 0.0 { v_scale / a_scale } else { 0.0 };
        let t_cruise = if v_scale > 0.0 {
            bc.pd().abs() / v_scale
        } else {
            0.0
        };
        let t_scale = t_ramp.max(t_cruise);

        let p_scale = bc
            .p0
            .abs()
            .max(bc.pf.abs())
            .max(bc.pd().abs())
            .max(v_scale * t_scale);

        Eps {
            position: self.rel * p_scale,
            velocity: self.rel * v_scale,
            time: self.rel * t_scale,
        }
    }
}
