//! Box Geometry (§4.B): the overlap region between a block's own frame and
//! a neighbor's (or a padded "extra" contributor's) frame under a given
//! face/child/level configuration.
//!
//! `Box` works in a per-axis local coordinate system where a block's own
//! interior occupies `[0, n)` and its ghost zone extends `[-g, 0)` on the
//! low side and `[n, n+g)` on the high side. `get_limits` returns a
//! half-open `[lo, hi)` region in whichever block's frame was asked for.

use octant_support::axis::{in_bounds, Axis};

use crate::error::{Error, Result};

/// Which block's coordinate frame a `get_limits` query is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// The block that owns this `Box` instance (receiver when filling
    /// ghosts, or the coarse sender slicing out a per-child slab).
    Own,
    /// The structural face neighbor.
    Neighbor,
    /// A third block discovered only because a padded prolongation
    /// stencil's footprint reaches past the immediate face neighbor.
    Extra,
}

#[derive(Debug, Clone)]
pub struct Box {
    block_shape: [i32; 3],
    ghost_depth: [i32; 3],
    if3: [i32; 3],
    ic3: [u8; 3],
    relative_level: i32,
    padding: i32,
    active_padding: i32,
}

impl Box {
    pub fn new(block_shape: [i32; 3], ghost_depth: [i32; 3]) -> Self {
        Self {
            block_shape,
            ghost_depth,
            if3: [0, 0, 0],
            ic3: [0, 0, 0],
            relative_level: 0,
            padding: 0,
            active_padding: 0,
        }
    }

    /// Positions the other block relative to this one: `relative_level` is
    /// `other_level - this_level`, `if3` is the face vector from this block
    /// toward the other, `ic3` is the child index of whichever side of the
    /// pair is finer.
    pub fn set_block(&mut self, relative_level: i32, if3: [i32; 3], ic3: [u8; 3]) -> Result<()> {
        if !in_bounds(if3) {
            return Err(Error::GeometryOverflow { if3 });
        }
        if ic3.iter().any(|&c| c > 1) {
            return Err(Error::InvalidChildIndex { ic3 });
        }
        self.if3 = if3;
        self.ic3 = ic3;
        self.relative_level = relative_level;
        Ok(())
    }

    pub fn set_padding(&mut self, padding: i32) {
        self.padding = padding;
    }

    /// Activates padding for the subsequent `get_limits` calls: the
    /// neighbor/extra frame's footprint is inflated tangentially and read
    /// deeper into the sender's interior along the face normal.
    pub fn compute_region(&mut self) {
        self.active_padding = self.padding;
    }

    /// Activates the unpadded (plain overlap test) mode.
    pub fn compute_block_start(&mut self) {
        self.active_padding = 0;
    }

    /// Returns the half-open `[lo, hi)` region in `frame`'s local
    /// coordinates, or `None` if there is no overlap once clipped to that
    /// block's valid extent.
    pub fn get_limits(&self, frame: Frame) -> Option<([i32; 3], [i32; 3])> {
        let mut lo = [0i32; 3];
        let mut hi = [0i32; 3];
        for axis in Axis::ALL {
            let ax = axis.index();
            let (l, h) = self.axis_limits(ax, frame)?;
            lo[ax] = l;
            hi[ax] = h;
        }
        Some((lo, hi))
    }

    /// Tangential face vectors a padded prolongation footprint pokes into
    /// beyond this face neighbor's own extent (§4.B): for each tangential
    /// axis where the inflated `Extra`-frame region overflows the
    /// neighbor's own `[0, n)`, the diagonal "extra" contributor sharing
    /// only an edge/corner with this block along that axis. Requires
    /// `set_padding`/`compute_region` to already be active; returns an
    /// empty list once there is no overlap at all (`get_limits` returns
    /// `None`).
    pub fn extra_overlaps(&self) -> Vec<[i32; 3]> {
        let Some((lo, hi)) = self.get_limits(Frame::Extra) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for axis in Axis::ALL {
            let ax = axis.index();
            if self.if3[ax] != 0 {
                continue;
            }
            let n = self.block_shape[ax];
            if let Some((clo, chi)) = clip_to_extent(lo[ax], hi[ax], 0, n) {
                if lo[ax] < clo {
                    let mut extra = self.if3;
                    extra[ax] = -1;
                    out.push(extra);
                }
                if hi[ax] > chi {
                    let mut extra = self.if3;
                    extra[ax] = 1;
                    out.push(extra);
                }
            }
        }
        out
    }

    fn axis_limits(&self, axis: usize, frame: Frame) -> Option<(i32, i32)> {
        let n = self.block_shape[axis];
        let g = self.ghost_depth[axis];
        let p = self.active_padding;

        if self.if3[axis] == 0 {
            return Some(self.tangential_limits(axis, frame, n, p));
        }
        Some(self.normal_limits(axis, frame, n, g, p))
    }

    fn tangential_limits(&self, axis: usize, frame: Frame, n: i32, p: i32) -> (i32, i32) {
        match frame {
            Frame::Own => {
                if self.relative_level > 0 {
                    half_range(n, self.ic3[axis])
                } else {
                    (0, n)
                }
            }
            Frame::Neighbor | Frame::Extra => {
                let (lo, hi) = if self.relative_level < 0 {
                    half_range(n, self.ic3[axis])
                } else {
                    (0, n)
                };
                (lo - p, hi + p)
            }
        }
    }

    fn normal_limits(&self, axis: usize, frame: Frame, n: i32, g: i32, p: i32) -> (i32, i32) {
        let toward_positive = self.if3[axis] > 0;
        match frame {
            Frame::Own => {
                if toward_positive {
                    (n, n + g)
                } else {
                    (-g, 0)
                }
            }
            Frame::Neighbor | Frame::Extra => {
                let depth = g + p;
                if toward_positive {
                    // Other block sits on our high side; the shared face is
                    // on its own low side, so we read inward from 0.
                    (0, depth.min(n))
                } else {
                    (n - depth.min(n), n)
                }
            }
        }
    }
}

fn half_range(n: i32, which: u8) -> (i32, i32) {
    let half = n / 2;
    if which == 0 {
        (0, half)
    } else {
        (half, n)
    }
}

/// Clips `[lo,hi)` to the valid extent of a block's own array
/// (`[-g, n+g)` for the frame's tangential axes, `[0, n)` for its normal
/// axis reads), returning `None` if the clipped interval is empty. `Box`
/// callers use this to turn an inflated padding footprint into an
/// overlap/no-overlap decision for a candidate "extra" block.
pub fn clip_to_extent(lo: i32, hi: i32, valid_lo: i32, valid_hi: i32) -> Option<(i32, i32)> {
    let clo = lo.max(valid_lo);
    let chi = hi.min(valid_hi);
    if clo < chi {
        Some((clo, chi))
    } else {
        None
    }
}
