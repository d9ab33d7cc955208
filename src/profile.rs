// src/profile.rs - Phase-duration profile data type and equations-of-motion checker

use crate::limits::{BoundaryCondition, Eps, KinematicLimits};

/// Number of phase slots in a profile. The second-order solver fills the
/// first three (accelerate, cruise, decelerate); the remaining slots are
/// reserved for the jerk-limited members of the same profile family so the
/// data layout is shared across solvers.
pub const PHASES: usize = 7;

/// Which kinematic bound a validated profile saturates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReachedLimits {
    /// The first ramp ends exactly on a velocity bound and holds it through
    /// the cruise phase.
    Acc0,
    /// Interior optimum: the velocity extremum stays strictly inside the
    /// envelope.
    #[default]
    None,
}

/// Which limit set a solver branch was evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// The forward set: first ramp at `a_max` toward `v_max`.
    #[default]
    Forward,
    /// The sign-mirrored set: first ramp at `a_min` toward `v_min`.
    Mirrored,
}

/// Directed view of the limits for one branch evaluation: `v_lim` is the
/// velocity bound the first ramp drives toward, `a_up` the first-ramp
/// acceleration, `a_down` the final-ramp acceleration. `v_lo`/`v_hi` stay
/// the undirected envelope.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LimitFrame {
    pub v_lim: f64,
    pub a_up: f64,
    pub a_down: f64,
    pub v_lo: f64,
    pub v_hi: f64,
    pub direction: Direction,
}

impl LimitFrame {
    pub fn forward(limits: &KinematicLimits) -> Self {
        Self {
            v_lim: limits.v_max,
            a_up: limits.a_max,
            a_down: limits.a_min,
            v_lo: limits.v_min,
            v_hi: limits.v_max,
            direction: Direction::Forward,
        }
    }

    pub fn mirrored(limits: &KinematicLimits) -> Self {
        Self {
            v_lim: limits.v_min,
            a_up: limits.a_min,
            a_down: limits.a_max,
            v_lo: limits.v_min,
            v_hi: limits.v_max,
            direction: Direction::Mirrored,
        }
    }
}

/// One concrete phase-duration decomposition of a single-axis move.
///
/// Created fresh per solver branch and discarded if the checker rejects it;
/// no mutation after acceptance. Position and velocity at every phase boundary
/// are cached by the checker so callers can re-integrate or sample without
/// redoing the algebra.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Profile {
    /// Phase durations. May carry a negative value within tolerance of zero;
    /// integration and sampling treat those as empty phases.
    pub t: [f64; PHASES],
    /// Prefix sums of the (clamped) phase durations.
    pub t_sum: [f64; PHASES],
    /// Piecewise-constant acceleration per phase.
    pub a: [f64; PHASES],
    /// Position at each phase boundary, `p[0] = p0`.
    pub p: [f64; PHASES + 1],
    /// Velocity at each phase boundary, `v[0] = v0`.
    pub v: [f64; PHASES + 1],
    /// Which bound this profile saturates.
    pub limits: ReachedLimits,
    /// Which limit set produced it.
    pub direction: Direction,
}

impl Profile {
    /// Second-order candidate: ramp, cruise, ramp.
    pub(crate) fn second_order(t: [f64; 3], a: [f64; 3]) -> Self {
        let mut profile = Self::default();
        profile.t[..3].copy_from_slice(&t);
        profile.a[..3].copy_from_slice(&a);
        profile
    }

    /// Pure cruise at the start velocity, used by the zero-velocity-window
    /// special case where the normal envelope check does not apply.
    pub(crate) fn cruise(duration: f64) -> Self {
        let mut profile = Self::default();
        profile.t[1] = duration;
        profile
    }

    /// Integrates the declared piecewise-constant accelerations from the
    /// start state, filling the cached boundary states and prefix sums.
    pub(crate) fn integrate_from(&mut self, bc: &BoundaryCondition) {
        self.p[0] = bc.p0;
        self.v[0] = bc.v0;
        let mut sum = 0.0;
        for i in 0..PHASES {
            let dt = self.t[i].max(0.0);
            self.v[i + 1] = self.v[i] + self.a[i] * dt;
            self.p[i + 1] = self.p[i] + self.v[i] * dt + 0.5 * self.a[i] * dt * dt;
            sum += dt;
            self.t_sum[i] = sum;
        }
    }

    /// Validates this candidate against the equations of motion and the
    /// limit envelope, claiming `tag`. Returns false for spurious algebraic
    /// roots: negative durations beyond tolerance, boundary states that do
    /// not reproduce `(pf, vf)`, velocities outside the envelope, or a peak
    /// that fails the exact-saturation requirement of `Acc0`.
    pub(crate) fn check(
        &mut self,
        tag: ReachedLimits,
        bc: &BoundaryCondition,
        frame: &LimitFrame,
        eps: &Eps,
    ) -> bool {
        for i in 0..3 {
            if self.t[i] < -eps.time {
                return false;
            }
        }

        self.integrate_from(bc);

        // Under piecewise-constant acceleration the velocity extremes sit on
        // phase boundaries, so checking boundaries covers the whole
        // trajectory. v[0] is included: a start velocity outside the
        // envelope makes the move unplannable, not a limit violation later.
        for i in 0..=3 {
            if self.v[i] < frame.v_lo - eps.velocity || self.v[i] > frame.v_hi + eps.velocity {
                return false;
            }
        }

        match tag {
            ReachedLimits::Acc0 => {
                // Equality, not range: the synchronizer distinguishes a
                // saturated solution from an interior optimum.
                if (self.v[1] - frame.v_lim).abs() > eps.velocity {
                    return false;
                }
            }
            ReachedLimits::None => {}
        }

        if (self.p[PHASES] - bc.pf).abs() > eps.position
            || (self.v[PHASES] - bc.vf).abs() > eps.velocity
        {
            return false;
        }

        self.limits = tag;
        self.direction = frame.direction;
        true
    }

    /// Total move duration.
    pub fn total_duration(&self) -> f64 {
        self.t_sum[PHASES - 1]
    }

    /// Samples `(position, velocity, acceleration)` at `time`, clamped to
    /// `[0, total_duration]`.
    pub fn at_time(&self, time: f64) -> (f64, f64, f64) {
        let t = time.clamp(0.0, self.total_duration());
        let mut start = 0.0;
        for i in 0..PHASES {
            let dt_phase = self.t[i].max(0.0);
            if t <= start + dt_phase {
                let dt = t - start;
                let p = self.p[i] + self.v[i] * dt + 0.5 * self.a[i] * dt * dt;
                let v = self.v[i] + self.a[i] * dt;
                return (p, v, self.a[i]);
            }
            start += dt_phase;
        }
        (self.p[PHASES], self.v[PHASES], 0.0)
    }
}
