//! Small pieces shared by every `octant-*` crate: the spatial rank constant,
//! axis/face naming, and a logging bootstrap for binaries and tests.
//!
//! Crates in this workspace call `log::debug!`/`log::trace!` etc. directly
//! rather than routing through a wrapper macro; this module only provides
//! the one-time `env_logger` init that a binary or test harness needs.

pub mod axis;
pub mod logging;

/// Spatial dimensionality the mesh is built for. The refresh protocol is
/// only specified in 3-D; `RANK` is kept as a named constant (rather than a
/// literal `3` scattered through the crates) because several loops iterate
/// `0..RANK` and a handful of geometry identities only hold for `RANK == 3`.
pub const RANK: usize = 3;

/// Number of children of an octree node (`2^RANK`).
pub const CHILDREN: usize = 1 << RANK;

/// Width of the particle sorter's binning window along each axis (§4.D).
pub const SORT_WINDOW: usize = 4;
