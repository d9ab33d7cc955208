// timeopt: time-optimal single-axis motion profile solver
//
// Given one axis's boundary condition (start/end position and velocity) and
// its kinematic limit envelope, enumerate every valid phase-duration
// decomposition, validate each against the equations of motion, and reduce
// them to the minimum-time profile plus the blocked duration window a
// multi-axis synchronizer needs to pick one common move duration.
//
// The solve path is synchronous and never allocates or panics: planning
// infeasibility is an ordinary `Err(Infeasible)` value, and the worst case
// is a fixed set of closed-form branches. Limit validation and configuration
// loading happen once at startup, outside the control tick.

pub mod block;
pub mod config;
pub mod limits;
pub mod profile;
pub mod solver;

pub use block::{Block, Infeasible, Interval};
pub use config::{AxisConfig, ConfigError, PlannerConfig};
pub use limits::{BoundaryCondition, KinematicLimits, LimitError, Tolerance};
pub use profile::{Direction, Profile, ReachedLimits, PHASES};
pub use solver::ProfileSolver;
