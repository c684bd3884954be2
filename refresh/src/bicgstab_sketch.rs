//! Test-only illustration (§9.1) that the coordination primitive driving
//! ghost refresh — a Sync counter advanced by asynchronous deliveries, with
//! a callback fired once quorum closes — is the same pattern an iterative
//! linear solver's collective-reduction loop uses. Not a solver: the
//! iteration state below never runs a real BiCGStab step, it only exercises
//! `loop_N -> reduction -> loop_{N+1}` the way
//! `EnzoSolverBiCgStab::loop_0..loop_14` chains its continuations.

use octant_block::{Block, SyncState};
use octant_core::BlockIndex;

/// Mirrors the numbered continuation entries of the original solver,
/// collapsed to the handful that matter for the coordination pattern: two
/// reduction-gated phases (dot products) and a convergence check between
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Loop {
    Loop0Init,
    Loop2AwaitRho,
    Loop6AwaitOmega,
    Loop10CheckConverged,
    Loop14Done,
}

/// Drives one block's participation in a collective reduction the same way
/// a refresh instance drives quorum: a per-"refresh id" Sync counter that
/// must see one contribution from every participating block before the
/// next `loop_N` may run.
struct ReductionDriver {
    state: Loop,
    reduction_id: u32,
    contributions_seen: u32,
    participant_count: u32,
    accumulator: f64,
}

impl ReductionDriver {
    fn new(reduction_id: u32, participant_count: u32) -> Self {
        Self {
            state: Loop::Loop0Init,
            reduction_id,
            contributions_seen: 0,
            participant_count,
            accumulator: 0.0,
        }
    }

    fn contribute(&mut self, block: &mut Block, value: f64) {
        block.sync_mut(self.reduction_id).activate(self.reduction_id, 0).ok();
        block.sync_mut(self.reduction_id).close_enumeration(self.reduction_id, self.participant_count).ok();

        self.accumulator += value;
        self.contributions_seen += 1;
        block.sync_mut(self.reduction_id).advance(self.reduction_id).unwrap();

        if self.contributions_seen == self.participant_count {
            self.advance_loop();
        }
    }

    fn advance_loop(&mut self) {
        self.state = match self.state {
            Loop::Loop0Init => Loop::Loop2AwaitRho,
            Loop::Loop2AwaitRho => Loop::Loop6AwaitOmega,
            Loop::Loop6AwaitOmega => Loop::Loop10CheckConverged,
            Loop::Loop10CheckConverged => Loop::Loop14Done,
            Loop::Loop14Done => Loop::Loop14Done,
        };
        self.contributions_seen = 0;
        self.accumulator = 0.0;
    }
}

#[test]
fn reduction_closes_only_after_every_participant_contributes() {
    let mut blocks: Vec<Block> = (0..3)
        .map(|i| Block::new(BlockIndex::root((i, 0, 0)), [8, 8, 8], [2, 2, 2]))
        .collect();
    let mut driver = ReductionDriver::new(99, blocks.len() as u32);

    driver.contribute(&mut blocks[0], 1.0);
    driver.contribute(&mut blocks[1], 2.0);
    assert_eq!(driver.state, Loop::Loop0Init);
    assert_eq!(blocks[0].sync(99).state(), SyncState::Ready);

    driver.contribute(&mut blocks[2], 3.0);
    assert_eq!(driver.state, Loop::Loop2AwaitRho);
}

#[test]
fn loop_chain_reaches_done_after_three_reduction_rounds() {
    let mut blocks: Vec<Block> = (0..2)
        .map(|i| Block::new(BlockIndex::root((i, 0, 0)), [8, 8, 8], [2, 2, 2]))
        .collect();
    let mut driver = ReductionDriver::new(7, blocks.len() as u32);

    for _round in 0..3 {
        for block in blocks.iter_mut() {
            driver.contribute(block, 1.0);
        }
    }
    assert_eq!(driver.state, Loop::Loop10CheckConverged);
}
