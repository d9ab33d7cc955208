// src/solver.rs - Branch enumeration for the time-optimal second-order profile

use tracing::{debug, trace};

use crate::block::{Block, Infeasible, Interval};
use crate::limits::{BoundaryCondition, Eps, KinematicLimits, Tolerance};
use crate::profile::{LimitFrame, Profile, ReachedLimits};

/// Upper bound on surviving candidates: two directions, each contributing at
/// most one saturated profile and two interior roots.
pub(crate) const MAX_CANDIDATES: usize = 6;

/// Fixed-capacity candidate buffer. Stack-allocated so the solve path never
/// touches the heap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidates {
    buf: [Profile; MAX_CANDIDATES],
    len: usize,
}

impl Candidates {
    pub fn new() -> Self {
        Self {
            buf: [Profile::default(); MAX_CANDIDATES],
            len: 0,
        }
    }

    pub fn push(&mut self, profile: Profile) {
        debug_assert!(self.len < MAX_CANDIDATES);
        self.buf[self.len] = profile;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[Profile] {
        &self.buf[..self.len]
    }
}

/// Time-optimal profile solver for one axis.
///
/// Owns the axis limits and the tolerance policy; `get_profile` is called
/// once per axis per planning event by the multi-axis synchronizer. Solves
/// are pure and independent across axes, with bounded worst-case cost (a
/// handful of closed-form operations plus at most two square roots).
#[derive(Debug, Clone, Copy)]
pub struct ProfileSolver {
    limits: KinematicLimits,
    tolerance: Tolerance,
}

impl ProfileSolver {
    /// Builds a solver for validated limits. Limit invariants are checked at
    /// configuration load, not here, keeping the solve path branch-minimal.
    pub fn new(limits: KinematicLimits) -> Self {
        Self {
            limits,
            tolerance: Tolerance::default(),
        }
    }

    pub fn with_tolerance(limits: KinematicLimits, tolerance: Tolerance) -> Self {
        Self { limits, tolerance }
    }

    pub fn limits(&self) -> &KinematicLimits {
        &self.limits
    }

    /// Finds every valid phase decomposition for the boundary condition and
    /// reduces them to the minimum-time profile plus the blocked duration
    /// window. `Err(Infeasible)` means no trajectory exists under these
    /// limits, an ordinary planning outcome.
    pub fn get_profile(&self, bc: &BoundaryCondition) -> Result<Block, Infeasible> {
        let eps = self.tolerance.for_problem(bc, &self.limits);

        if self.limits.zero_velocity_window() {
            return self.zero_window_block(bc, &eps);
        }

        let mut candidates = Candidates::new();
        for frame in [
            LimitFrame::forward(&self.limits),
            LimitFrame::mirrored(&self.limits),
        ] {
            self.time_acc0(&mut candidates, bc, &frame, &eps);
            self.time_none(&mut candidates, bc, &frame, &eps);
        }
        trace!(
            valid = candidates.as_slice().len(),
            "candidate enumeration finished"
        );

        let block = Block::calculate(candidates.as_slice(), &eps);
        if block.is_err() {
            debug!(
                "no valid profile: pd={:.6} v0={:.6} vf={:.6}",
                bc.pd(),
                bc.v0,
                bc.vf
            );
        }
        block
    }

    /// Saturated branch: the first ramp ends exactly on the directed
    /// velocity bound, cruises, then ramps to the final velocity. The cruise
    /// duration comes from the total-distance balance; a negative cruise
    /// means the bound is algebraically unreachable for this distance.
    fn time_acc0(&self, out: &mut Candidates, bc: &BoundaryCondition, frame: &LimitFrame, eps: &Eps) {
        if frame.a_up == 0.0 || frame.a_down == 0.0 || frame.v_lim == 0.0 {
            return;
        }

        let t0 = (frame.v_lim - bc.v0) / frame.a_up;
        let t2 = (bc.vf - frame.v_lim) / frame.a_down;
        let ramp_distance = (frame.v_lim * frame.v_lim - bc.v0 * bc.v0) / (2.0 * frame.a_up)
            + (bc.vf * bc.vf - frame.v_lim * frame.v_lim) / (2.0 * frame.a_down);
        let t1 = (bc.pd() - ramp_distance) / frame.v_lim;
        if t1 < -eps.time {
            return;
        }

        let mut profile =
            Profile::second_order([t0, t1, t2], [frame.a_up, 0.0, frame.a_down]);
        if profile.check(ReachedLimits::Acc0, bc, frame, eps) {
            out.push(profile);
        }
    }

    /// Unsaturated branch: two ramps meeting at a free velocity extremum.
    /// Both signs of the root are independent candidates; an algebraically
    /// valid root can still be physically invalid, so each goes through the
    /// checker and rejects are discarded silently.
    fn time_none(&self, out: &mut Candidates, bc: &BoundaryCondition, frame: &LimitFrame, eps: &Eps) {
        let a_diff = frame.a_up - frame.a_down;
        if frame.a_up == 0.0 || frame.a_down == 0.0 || a_diff == 0.0 {
            return;
        }

        let radicand = (frame.a_up * bc.vf * bc.vf - frame.a_down * bc.v0 * bc.v0
            - 2.0 * frame.a_up * frame.a_down * bc.pd())
            / a_diff;
        if radicand < 0.0 {
            return;
        }
        let h1 = radicand.sqrt();

        for v_peak in [h1, -h1] {
            let t0 = (v_peak - bc.v0) / frame.a_up;
            let t2 = (bc.vf - v_peak) / frame.a_down;
            let mut profile =
                Profile::second_order([t0, 0.0, t2], [frame.a_up, 0.0, frame.a_down]);
            if profile.check(ReachedLimits::None, bc, frame, eps) {
                out.push(profile);
            }
        }
    }

    /// All-zero velocity window: no velocity-phase freedom exists, so the
    /// duration is forced by continuity. With `v0 != 0` exactly one duration
    /// `pd / v0` is realizable and everything longer is blocked; with
    /// `v0 == 0` only a zero-length move is possible.
    fn zero_window_block(&self, bc: &BoundaryCondition, eps: &Eps) -> Result<Block, Infeasible> {
        if (bc.vf - bc.v0).abs() > eps.velocity {
            return Err(Infeasible);
        }

        if bc.v0.abs() <= eps.velocity {
            if bc.pd().abs() > eps.position {
                return Err(Infeasible);
            }
            let mut profile = Profile::cruise(0.0);
            profile.integrate_from(bc);
            return Ok(Block {
                p_min: profile,
                t_min: 0.0,
                blocked: None,
            });
        }

        let t = bc.pd() / bc.v0;
        if t < -eps.time {
            return Err(Infeasible);
        }
        let t = t.max(0.0);
        let mut profile = Profile::cruise(t);
        profile.integrate_from(bc);
        Ok(Block {
            p_min: profile,
            t_min: t,
            blocked: Some(Interval::unbounded_from(t)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_window_forces_duration_and_blocks_everything_longer() {
        let solver = ProfileSolver::new(KinematicLimits {
            v_max: 0.0,
            v_min: 0.0,
            a_max: 0.0,
            a_min: 0.0,
        });
        let bc = BoundaryCondition::new(0.0, 2.0, 6.0, 2.0);
        let block = solver.get_profile(&bc).unwrap();
        assert_relative_eq!(block.t_min, 3.0);
        let blocked = block.blocked.unwrap();
        assert!(blocked.is_unbounded());
        assert!(block.is_blocked(3.5));
        assert!(!block.is_blocked(3.0));
    }

    #[test]
    fn zero_window_rejects_velocity_discontinuity() {
        let solver = ProfileSolver::new(KinematicLimits {
            v_max: 0.0,
            v_min: 0.0,
            a_max: 0.0,
            a_min: 0.0,
        });
        let bc = BoundaryCondition::new(0.0, 2.0, 6.0, 1.0);
        assert_eq!(solver.get_profile(&bc), Err(Infeasible));
    }

    #[test]
    fn zero_window_at_rest_allows_only_zero_length_moves() {
        let solver = ProfileSolver::new(KinematicLimits {
            v_max: 0.0,
            v_min: 0.0,
            a_max: 0.0,
            a_min: 0.0,
        });

        let bc = BoundaryCondition::new(1.0, 0.0, 1.0, 0.0);
        let block = solver.get_profile(&bc).unwrap();
        assert_relative_eq!(block.t_min, 0.0);
        assert!(block.blocked.is_none());

        let bc = BoundaryCondition::new(0.0, 0.0, 1.0, 0.0);
        assert_eq!(solver.get_profile(&bc), Err(Infeasible));
    }

    #[test]
    fn zero_window_rejects_backward_motion() {
        let solver = ProfileSolver::new(KinematicLimits {
            v_max: 0.0,
            v_min: 0.0,
            a_max: 0.0,
            a_min: 0.0,
        });
        // Moving backward while cruising forward would need negative time.
        let bc = BoundaryCondition::new(0.0, 2.0, -6.0, 2.0);
        assert_eq!(solver.get_profile(&bc), Err(Infeasible));
    }

    #[test]
    fn zero_acceleration_bound_yields_no_candidates() {
        // a_max = 0 leaves no ramp toward positive velocity in either
        // direction; every branch skips and the solve stays NaN-free.
        let solver = ProfileSolver::new(KinematicLimits {
            v_max: 5.0,
            v_min: -5.0,
            a_max: 0.0,
            a_min: -2.0,
        });
        let bc = BoundaryCondition::new(0.0, 0.0, 10.0, 0.0);
        assert_eq!(solver.get_profile(&bc), Err(Infeasible));
    }

    #[test]
    fn one_sided_zero_velocity_bound_admits_only_reverse_moves() {
        // v_max = 0 with v_min = -5: forward displacement from rest has no
        // admissible peak, while the mirrored branch still plans a reverse
        // triangle through negative velocity.
        let solver = ProfileSolver::new(KinematicLimits {
            v_max: 0.0,
            v_min: -5.0,
            a_max: 2.0,
            a_min: -2.0,
        });

        let forward = BoundaryCondition::new(0.0, 0.0, 5.0, 0.0);
        assert_eq!(solver.get_profile(&forward), Err(Infeasible));

        let reverse = BoundaryCondition::new(0.0, 0.0, -5.0, 0.0);
        let block = solver.get_profile(&reverse).unwrap();
        assert_relative_eq!(block.t_min, 2.0 * 2.5_f64.sqrt(), epsilon = 1e-9);
        assert!(block.p_min.v[1] >= -5.0 - 1e-9);
    }

    #[test]
    fn candidate_buffer_never_exceeds_capacity() {
        // pd = 0 with equal nonzero endpoint velocities exercises every
        // branch in both directions.
        let solver = ProfileSolver::new(KinematicLimits::symmetric(5.0, 2.0));
        let bc = BoundaryCondition::new(0.0, 1.0, 0.0, 1.0);
        let block = solver.get_profile(&bc).unwrap();
        assert_relative_eq!(block.t_min, 0.0);
    }
}
