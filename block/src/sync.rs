//! Per-(block, refresh-id) Sync counter (§3 Sync, §4.G): the late-bound
//! quorum state machine a block advances as refresh messages arrive.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Inactive,
    Active,
    Ready,
}

/// Tracks how many of an expected `stop` deliveries have arrived for one
/// refresh instance on one block. `stop` is unknown until the block itself
/// finishes enumerating neighbors and calls [`Sync::close_enumeration`],
/// which is why arrivals can (and routinely do) outrun the final count —
/// `value` is allowed to advance past what `stop` will eventually be set to
/// only in the sense that both are compared once both are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sync {
    state: Option<SyncStateInner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SyncStateInner {
    ready: bool,
    value: u32,
    stop: u32,
    callback: u32,
}

impl Sync {
    pub fn new() -> Self {
        Self { state: None }
    }

    pub fn state(&self) -> SyncState {
        match &self.state {
            None => SyncState::Inactive,
            Some(s) if !s.ready => SyncState::Active,
            Some(_) => SyncState::Ready,
        }
    }

    pub fn value(&self) -> u32 {
        self.state.map(|s| s.value).unwrap_or(0)
    }

    pub fn stop(&self) -> u32 {
        self.state.map(|s| s.stop).unwrap_or(0)
    }

    /// The callback token recorded when this refresh instance was
    /// activated, or `None` if it is currently INACTIVE.
    pub fn callback(&self) -> Option<u32> {
        self.state.map(|s| s.callback)
    }

    /// INACTIVE -> ACTIVE: a refresh instance begins on this block,
    /// recording `callback` so a later `wait` can assert it is still being
    /// awaited with the descriptor it was started with (§4.G step 1).
    pub fn activate(&mut self, refresh_id: u32, callback: u32) -> Result<()> {
        if self.state.is_some() {
            return Err(Error::SyncAlreadyActive { refresh_id });
        }
        self.state = Some(SyncStateInner { ready: false, value: 0, stop: 0, callback });
        Ok(())
    }

    /// Records one delivery, including empty heartbeats (invariant 3).
    pub fn advance(&mut self, refresh_id: u32) -> Result<()> {
        let s = self.state.as_mut().ok_or(Error::SyncNotActive { refresh_id })?;
        s.value += 1;
        Ok(())
    }

    /// ACTIVE -> READY: the block has finished enumerating neighbors and
    /// now knows how many deliveries to expect, including buffered extras
    /// (§4.B) and empty heartbeats.
    pub fn close_enumeration(&mut self, refresh_id: u32, stop: u32) -> Result<()> {
        let s = self.state.as_mut().ok_or(Error::SyncNotActive { refresh_id })?;
        if s.ready {
            return Err(Error::SyncAlreadyActive { refresh_id });
        }
        s.ready = true;
        s.stop = stop;
        Ok(())
    }

    /// READY -> INACTIVE iff `value == stop` and the caller confirms the
    /// pending message queue for this refresh is empty. Returns whether the
    /// transition happened.
    pub fn try_close(&mut self, pending_empty: bool) -> bool {
        let done = matches!(self.state, Some(s) if s.ready && s.value == s.stop) && pending_empty;
        if done {
            self.state = None;
        }
        done
    }
}
