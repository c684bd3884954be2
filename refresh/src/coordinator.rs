//! Refresh Coordinator (§4.G): the Sync-counter state machine that drives
//! one refresh instance to completion on one block.
//!
//! The coordinator itself knows nothing about field buffers or particle
//! bags — producing a payload (4.C/4.D/4.E) and transporting it (4.H) are
//! the caller's job, passed in as a prepared [`SendPlan`] list and an
//! `apply` closure respectively. This keeps the state machine testable
//! without a real mesh or transport.

use octant_block::{Block, RefreshMsg, RefreshPayload, SyncState};
use octant_core::{neighbors, Box as GeomBox, LeafOracle, Neighbor};
use octant_core::BlockIndex;

use crate::descriptor::{CallbackId, FieldSet, ParticleSet, RefreshDescriptor};
use crate::error::{Error, Result};

/// One payload this block needs to send as part of starting a refresh.
pub struct SendPlan {
    pub target: BlockIndex,
    pub payload: RefreshPayload,
}

/// The contract the async messaging substrate (component H) fulfills.
pub trait RefreshTransport {
    fn send(&mut self, target: &BlockIndex, msg: RefreshMsg);
}

pub struct RefreshCoordinator;

impl RefreshCoordinator {
    /// §4.G step 3: the number of deliveries `block` should expect back for
    /// `descriptor`, computed by walking its own neighbors (4.A) rather than
    /// assumed equal to how many messages it sends. This is *not* generally
    /// symmetric with the send side: §4.E has a coarse block send zero flux
    /// corrections to a finer neighbor while still expecting one back, and
    /// a fine receiver's padded prolongation stencil (4.B) can expect
    /// messages from "extra" blocks diagonally adjacent to the ordinary
    /// face neighbor that it never itself sends anything to.
    pub fn expected_receive_count<O: LeafOracle>(
        block: &Block,
        descriptor: &RefreshDescriptor,
        oracle: &O,
    ) -> u32 {
        let wants_fields = wants_field_set(descriptor.field_set());
        let wants_particles = wants_particle_set(descriptor.particle_set());
        let my_level = block.index().level() as i32;
        let mut count = 0u32;
        for n in neighbors(
            block.index(),
            oracle,
            descriptor.min_face_rank(),
            descriptor.neighbor_type(),
            0,
            descriptor.root_level(),
        ) {
            if wants_fields {
                count += 1;
                if n.face_level < my_level {
                    count += extra_overlap_count(block, descriptor, oracle, &n);
                }
            }
            if wants_particles {
                count += 1;
            }
            if descriptor.include_fluxes() && n.face_level > my_level {
                count += 1;
            }
        }
        count
    }

    /// `start`: INACTIVE -> ACTIVE, sends every planned message, then closes
    /// enumeration with `sync.stop` set to `expected_receive_count` (§4.G
    /// step 3), normally produced by [`RefreshCoordinator::expected_receive_count`].
    /// Finally calls `wait`.
    pub fn start<T: RefreshTransport>(
        block: &mut Block,
        descriptor: &RefreshDescriptor,
        sends: Vec<SendPlan>,
        expected_receive_count: u32,
        transport: &mut T,
        apply: impl FnMut(&mut Block, &RefreshMsg) -> Result<()>,
    ) -> Result<Option<CallbackId>> {
        let refresh_id = descriptor.id();
        block.sync_mut(refresh_id).activate(refresh_id, descriptor.callback().0)?;

        for plan in sends {
            transport.send(&plan.target, RefreshMsg { refresh_id, payload: plan.payload });
        }
        block.sync_mut(refresh_id).close_enumeration(refresh_id, expected_receive_count)?;

        Self::wait(block, descriptor, apply)
    }

    /// `wait`: ACTIVE -> READY, draining and applying any messages that
    /// arrived before this block had enumerated its own neighbors. Step 1
    /// (§4.G): asserts the callback recorded at `activate` time still
    /// matches the descriptor's own callback.
    pub fn wait(
        block: &mut Block,
        descriptor: &RefreshDescriptor,
        mut apply: impl FnMut(&mut Block, &RefreshMsg) -> Result<()>,
    ) -> Result<Option<CallbackId>> {
        let refresh_id = descriptor.id();
        let expected = descriptor.callback().0;
        if let Some(got) = block.sync(refresh_id).callback() {
            if got != expected {
                return Err(Error::CallbackMismatch { refresh_id, expected, got });
            }
        }
        let pending = block.drain_pending(refresh_id);
        for msg in &pending {
            apply(block, msg)?;
            block.sync_mut(refresh_id).advance(refresh_id)?;
        }
        Self::check_done(block, descriptor)
    }

    /// `recv`: applied immediately if the counter is already READY,
    /// otherwise buffered without being applied (§4.G: "ACTIVE --recv--> ACTIVE
    /// (enqueue without applying)").
    pub fn recv(
        block: &mut Block,
        descriptor: &RefreshDescriptor,
        msg: RefreshMsg,
        apply: impl FnOnce(&mut Block, &RefreshMsg) -> Result<()>,
    ) -> Result<Option<CallbackId>> {
        let refresh_id = descriptor.id();
        if block.sync(refresh_id).state() == SyncState::Ready {
            apply(block, &msg)?;
            block.sync_mut(refresh_id).advance(refresh_id)?;
            return Self::check_done(block, descriptor);
        }
        block.enqueue(msg);
        Ok(None)
    }

    /// Closes the counter and returns the callback to dispatch when quorum
    /// is reached: `stop == 0` (nothing was ever expected) or `value ==
    /// stop` while READY. A non-empty pending queue at that point is the
    /// precondition violation called out in §4.G/§9 (resolved: assert,
    /// don't tolerate).
    pub fn check_done(
        block: &mut Block,
        descriptor: &RefreshDescriptor,
    ) -> Result<Option<CallbackId>> {
        let refresh_id = descriptor.id();
        let sync = block.sync(refresh_id);
        let quorum = sync.stop() == 0 || (sync.value() == sync.stop() && sync.state() == SyncState::Ready);
        if !quorum {
            return Ok(None);
        }
        if !block.pending_is_empty(refresh_id) {
            return Err(Error::PreconditionViolation {
                refresh_id,
                detail: "sync reached quorum with a non-empty pending queue".to_string(),
            });
        }
        let closed = block.sync_mut(refresh_id).try_close(true);
        Ok(closed.then(|| descriptor.callback()))
    }
}

fn wants_field_set(set: &FieldSet) -> bool {
    !matches!(set, FieldSet::Named(names) if names.is_empty())
}

fn wants_particle_set(set: &ParticleSet) -> bool {
    !matches!(set, ParticleSet::Named(names) if names.is_empty())
}

/// §4.B: when `neighbor` is coarser than `block`, a padded prolongation
/// stencil can reach past it into a diagonally adjacent "extra" block. Walks
/// `block`'s own box geometry (from `block`'s point of view, since which
/// half of the shared face it occupies depends on `block`'s own child
/// index) to find the tangential axes a padded stencil overflows, then
/// resolves each "extra" as the same-level tangential neighbor of
/// `neighbor` itself — the diagonal block shares an edge/corner with
/// `block` but a full face with `neighbor` — and counts the ones that are
/// themselves leaves in the forest `oracle` describes.
fn extra_overlap_count<O: LeafOracle>(
    block: &Block,
    descriptor: &RefreshDescriptor,
    oracle: &O,
    neighbor: &Neighbor,
) -> u32 {
    let mut geom = GeomBox::new(block.block_shape(), block.ghost_depth());
    if geom.set_block(-1, neighbor.if3, block.index().child_index()).is_err() {
        return 0;
    }
    geom.set_padding(descriptor.prolong_padding());
    geom.compute_region();
    geom.extra_overlaps()
        .into_iter()
        .map(|extra_if3| tangential_component(extra_if3, neighbor.if3))
        .filter_map(|tangential| neighbor.index.face_neighbor(tangential).ok())
        .filter(|idx| oracle.is_leaf(idx))
        .count() as u32
}

/// Strips the normal-axis component out of an `extra_overlaps()` vector,
/// leaving only the tangential offset from `neighbor`'s own position to the
/// diagonal "extra" block.
fn tangential_component(extra_if3: [i32; 3], normal_if3: [i32; 3]) -> [i32; 3] {
    let mut out = extra_if3;
    for axis in 0..3 {
        if normal_if3[axis] != 0 {
            out[axis] = 0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use octant_core::BlockIndex;

    struct RecordingTransport {
        sent: Vec<(BlockIndex, RefreshMsg)>,
    }

    impl RefreshTransport for RecordingTransport {
        fn send(&mut self, target: &BlockIndex, msg: RefreshMsg) {
            self.sent.push((target.clone(), msg));
        }
    }

    fn test_descriptor() -> RefreshDescriptor {
        crate::descriptor::RefreshDescriptorBuilder::new()
            .add_field("density")
            .set_callback(CallbackId(42))
            .build(1)
            .unwrap()
    }

    struct SetOracle(std::collections::HashSet<BlockIndex>);
    impl LeafOracle for SetOracle {
        fn is_leaf(&self, index: &BlockIndex) -> bool {
            self.0.contains(index)
        }
    }

    #[test]
    fn zero_sends_closes_immediately() {
        let mut block = Block::new(BlockIndex::root((0, 0, 0)), [8, 8, 8], [2, 2, 2]);
        let descriptor = test_descriptor();
        let mut transport = RecordingTransport { sent: Vec::new() };
        let cb = RefreshCoordinator::start(&mut block, &descriptor, vec![], 0, &mut transport, |_, _| Ok(()))
            .unwrap();
        assert_eq!(cb, Some(CallbackId(42)));
        assert_eq!(block.sync(descriptor.id()).state(), SyncState::Inactive);
    }

    #[test]
    fn pending_arrival_before_start_is_drained_on_wait() {
        let mut block = Block::new(BlockIndex::root((0, 0, 0)), [8, 8, 8], [2, 2, 2]);
        let descriptor = test_descriptor();
        // simulate an early heartbeat buffered before this block even starts
        block.sync_mut(descriptor.id()).activate(descriptor.id(), descriptor.callback().0).unwrap();
        block.enqueue(RefreshMsg::heartbeat(descriptor.id()));
        block.sync_mut(descriptor.id()).close_enumeration(descriptor.id(), 1).unwrap();

        let cb = RefreshCoordinator::wait(&mut block, &descriptor, |_, _| Ok(())).unwrap();
        assert_eq!(cb, Some(CallbackId(42)));
    }

    #[test]
    fn wait_rejects_a_callback_that_does_not_match_the_one_recorded_at_start() {
        let mut block = Block::new(BlockIndex::root((0, 0, 0)), [8, 8, 8], [2, 2, 2]);
        let descriptor = test_descriptor();
        block.sync_mut(descriptor.id()).activate(descriptor.id(), 999).unwrap();
        block.sync_mut(descriptor.id()).close_enumeration(descriptor.id(), 0).unwrap();

        let err = RefreshCoordinator::wait(&mut block, &descriptor, |_, _| Ok(())).unwrap_err();
        assert!(matches!(
            err,
            Error::CallbackMismatch { expected: 42, got: 999, .. }
        ));
    }

    #[test]
    fn recv_while_active_buffers_without_applying() {
        let mut block = Block::new(BlockIndex::root((0, 0, 0)), [8, 8, 8], [2, 2, 2]);
        let descriptor = test_descriptor();
        block.sync_mut(descriptor.id()).activate(descriptor.id(), descriptor.callback().0).unwrap();

        let applied = std::cell::Cell::new(false);
        let cb = RefreshCoordinator::recv(
            &mut block,
            &descriptor,
            RefreshMsg::heartbeat(descriptor.id()),
            |_, _| {
                applied.set(true);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(cb, None);
        assert!(!applied.get());
        assert!(!block.pending_is_empty(descriptor.id()));
    }

    #[test]
    fn recv_while_ready_applies_immediately_and_can_close() {
        let mut block = Block::new(BlockIndex::root((0, 0, 0)), [8, 8, 8], [2, 2, 2]);
        let descriptor = test_descriptor();
        block.sync_mut(descriptor.id()).activate(descriptor.id(), descriptor.callback().0).unwrap();
        block.sync_mut(descriptor.id()).close_enumeration(descriptor.id(), 1).unwrap();

        let cb = RefreshCoordinator::recv(
            &mut block,
            &descriptor,
            RefreshMsg::heartbeat(descriptor.id()),
            |_, _| Ok(()),
        )
        .unwrap();
        assert_eq!(cb, Some(CallbackId(42)));
    }

    #[test]
    fn quorum_with_nonempty_queue_is_a_precondition_violation() {
        let mut block = Block::new(BlockIndex::root((0, 0, 0)), [8, 8, 8], [2, 2, 2]);
        let descriptor = test_descriptor();
        block.sync_mut(descriptor.id()).activate(descriptor.id(), descriptor.callback().0).unwrap();
        block.sync_mut(descriptor.id()).advance(descriptor.id()).unwrap();
        block.sync_mut(descriptor.id()).close_enumeration(descriptor.id(), 1).unwrap();
        block.enqueue(RefreshMsg::heartbeat(descriptor.id()));

        let err = RefreshCoordinator::check_done(&mut block, &descriptor).unwrap_err();
        assert!(matches!(err, Error::PreconditionViolation { .. }));
    }

    #[test]
    fn expected_receive_count_matches_neighbor_count_for_a_same_level_field_refresh() {
        // A root block surrounded on every tree face by a leaf neighbor:
        // min_face_rank=2 (faces only) with no fluxes/particles should see
        // exactly one expected delivery per face, six in 3-D, no extras.
        let block = Block::new(BlockIndex::root((1, 1, 1)), [8, 8, 8], [2, 2, 2]);
        let mut leaves = std::collections::HashSet::new();
        for if3 in [[1, 0, 0], [-1, 0, 0], [0, 1, 0], [0, -1, 0], [0, 0, 1], [0, 0, -1]] {
            leaves.insert(block.index().face_neighbor(if3).unwrap());
        }
        let oracle = SetOracle(leaves);
        let descriptor = test_descriptor();
        let count = RefreshCoordinator::expected_receive_count(&block, &descriptor, &oracle);
        assert_eq!(count, 6);
    }

    #[test]
    fn expected_receive_count_adds_extras_for_a_coarser_neighbor_with_padding() {
        // child (x=1,y=0,z=0): the high-x half of its parent, so its shared
        // face with the coarse +x neighbor only covers that neighbor's
        // low-y/low-z half.
        let block = Block::new(BlockIndex::root((1, 1, 1)).descend(0b001).unwrap(), [4, 4, 4], [2, 2, 2]);
        let coarse_neighbor = block.index().parent().unwrap().face_neighbor([1, 0, 0]).unwrap();
        let extra_y = coarse_neighbor.face_neighbor([0, -1, 0]).unwrap();
        let extra_z = coarse_neighbor.face_neighbor([0, 0, -1]).unwrap();

        let mut leaves = std::collections::HashSet::new();
        leaves.insert(coarse_neighbor);
        leaves.insert(extra_y);
        leaves.insert(extra_z);
        let oracle = SetOracle(leaves);

        let descriptor = crate::descriptor::RefreshDescriptorBuilder::new()
            .add_field("density")
            .set_prolong_padding(2)
            .set_callback(CallbackId(1))
            .build(0)
            .unwrap();
        let count = RefreshCoordinator::expected_receive_count(&block, &descriptor, &oracle);
        // one ordinary delivery from the coarse +x neighbor, plus the two
        // diagonal extras its padded footprint pokes into.
        assert_eq!(count, 3);
    }
}
