// src/block.rs - Candidate aggregation: minimum-time profile plus blocked durations

use thiserror::Error;

use crate::limits::Eps;
use crate::profile::Profile;

/// No candidate across all solver branches survived validation. A normal
/// planning outcome ("this axis cannot be planned for this boundary
/// condition"), not a programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no kinematically valid profile exists for the boundary condition")]
pub struct Infeasible;

/// Open interval of total durations no valid profile can realize.
///
/// `left` itself is always an achievable duration; `right` is either the
/// next achievable duration or infinity for the zero-velocity-window case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub left: f64,
    pub right: f64,
}

impl Interval {
    pub(crate) fn unbounded_from(left: f64) -> Self {
        Self {
            left,
            right: f64::INFINITY,
        }
    }

    /// True when `t` lies strictly inside the interval.
    pub fn contains(&self, t: f64) -> bool {
        self.left < t && t < self.right
    }

    pub fn is_unbounded(&self) -> bool {
        self.right.is_infinite()
    }
}

/// Result of solving one axis: the minimum-duration profile and, when the
/// candidate set spans more than one achievable duration, the window of
/// durations a multi-axis synchronizer must never select.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    /// The minimum-duration valid profile.
    pub p_min: Profile,
    /// Total duration of `p_min`.
    pub t_min: f64,
    /// Durations strictly inside this interval are unreachable.
    pub blocked: Option<Interval>,
}

impl Block {
    /// Reduces a validated candidate set to a block. Each solver branch is a
    /// discrete algebraic case rather than a continuum, so the gap strictly
    /// between the smallest and next-smallest distinct durations cannot be
    /// realized and becomes the blocked interval.
    pub(crate) fn calculate(candidates: &[Profile], eps: &Eps) -> Result<Self, Infeasible> {
        let p_min = candidates
            .iter()
            .min_by(|a, b| a.total_duration().total_cmp(&b.total_duration()))
            .copied()
            .ok_or(Infeasible)?;
        let t_min = p_min.total_duration();

        let mut next: Option<f64> = None;
        for candidate in candidates {
            let t = candidate.total_duration();
            if t > t_min + eps.time && next.is_none_or(|n| t < n) {
                next = Some(t);
            }
        }

        Ok(Self {
            p_min,
            t_min,
            blocked: next.map(|right| Interval { left: t_min, right }),
        })
    }

    /// True when no valid profile of total duration `t` exists: either `t`
    /// is shorter than the minimum or it falls inside the blocked window.
    pub fn is_blocked(&self, t: f64) -> bool {
        t < self.t_min || self.blocked.is_some_and(|interval| interval.contains(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;

    fn eps() -> Eps {
        Eps {
            position: 1e-8,
            velocity: 1e-8,
            time: 1e-8,
        }
    }

    fn candidate_with_duration(duration: f64) -> Profile {
        let mut profile = Profile::cruise(duration);
        profile.integrate_from(&crate::limits::BoundaryCondition::new(0.0, 0.0, 0.0, 0.0));
        profile
    }

    #[test]
    fn empty_candidate_set_is_infeasible() {
        assert_eq!(Block::calculate(&[], &eps()), Err(Infeasible));
    }

    #[test]
    fn single_candidate_has_no_blocked_interval() {
        let block = Block::calculate(&[candidate_with_duration(2.0)], &eps()).unwrap();
        assert_eq!(block.t_min, 2.0);
        assert!(block.blocked.is_none());
    }

    #[test]
    fn duplicate_durations_within_tolerance_do_not_block() {
        let candidates = [
            candidate_with_duration(2.0),
            candidate_with_duration(2.0 + 1e-12),
        ];
        let block = Block::calculate(&candidates, &eps()).unwrap();
        assert!(block.blocked.is_none());
    }

    #[test]
    fn gap_between_two_smallest_durations_is_blocked() {
        let candidates = [
            candidate_with_duration(5.0),
            candidate_with_duration(2.0),
            candidate_with_duration(3.0),
        ];
        let block = Block::calculate(&candidates, &eps()).unwrap();
        assert_eq!(block.t_min, 2.0);
        let blocked = block.blocked.unwrap();
        assert_eq!(blocked.left, 2.0);
        assert_eq!(blocked.right, 3.0);

        assert!(block.is_blocked(2.5));
        assert!(block.is_blocked(1.0));
        assert!(!block.is_blocked(2.0));
        assert!(!block.is_blocked(3.0));
        assert!(!block.is_blocked(4.0));
    }

    #[test]
    fn unbounded_interval_blocks_everything_above() {
        let interval = Interval::unbounded_from(1.5);
        assert!(interval.is_unbounded());
        assert!(interval.contains(2.0));
        assert!(interval.contains(1e12));
        assert!(!interval.contains(1.5));
    }
}
