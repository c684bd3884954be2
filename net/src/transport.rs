//! The messaging contract components F/G are written against (§4.H):
//! `BlockTransport` is the seam a production deployment swaps for one
//! indexed by process rank instead of an in-process registry.

use octant_block::RefreshMsg;
use octant_core::BlockIndex;

pub trait BlockTransport {
    fn send(&mut self, target: &BlockIndex, msg: RefreshMsg);
}
