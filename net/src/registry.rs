//! `BlockProxyRegistry` (§4.H): maps a `BlockIndex` to the current mailbox
//! of whatever task owns that block right now. Looking a block up by index
//! rather than by a fixed location is what lets a block migrate between
//! processing elements without the sender noticing.

use std::collections::HashMap;

use octant_block::RefreshMsg;
use octant_core::BlockIndex;
use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::transport::BlockTransport;

/// The receiving half of a registered block's mailbox. A block's entry
/// loop reads from this; entries are processed one at a time (§5), so no
/// internal locking of the block itself is required.
pub type Mailbox = mpsc::UnboundedReceiver<RefreshMsg>;

#[derive(Default)]
pub struct BlockProxyRegistry {
    senders: RwLock<HashMap<BlockIndex, mpsc::UnboundedSender<RefreshMsg>>>,
}

impl BlockProxyRegistry {
    pub fn new() -> Self {
        Self { senders: RwLock::new(HashMap::new()) }
    }

    /// Registers a fresh mailbox for `index`, returning the receiving half
    /// for the hosting task to poll. Re-registering (e.g. after migration)
    /// replaces the old sender, so in-flight references to the old mailbox
    /// become dead ends rather than delivering to a stale location.
    pub fn register(&self, index: BlockIndex) -> Mailbox {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.write().insert(index, tx);
        rx
    }

    pub fn unregister(&self, index: &BlockIndex) {
        self.senders.write().remove(index);
    }

    pub fn is_registered(&self, index: &BlockIndex) -> bool {
        self.senders.read().contains_key(index)
    }

    pub fn deliver(&self, target: &BlockIndex, msg: RefreshMsg) -> Result<()> {
        let senders = self.senders.read();
        let tx = senders.get(target).ok_or_else(|| Error::UnknownTarget { index: target.clone() })?;
        tx.send(msg).map_err(|_| Error::MailboxClosed { index: target.clone() })
    }
}

impl BlockTransport for BlockProxyRegistry {
    fn send(&mut self, target: &BlockIndex, msg: RefreshMsg) {
        // §4.H: delivery need not be reliable; a send racing an unregistered
        // or migrated-away target is logged and dropped rather than treated
        // as a protocol failure.
        if let Err(err) = self.deliver(target, msg) {
            log::warn!("dropping refresh message: {err}");
        }
    }
}

/// `octant_refresh::RefreshCoordinator` is written against this narrower
/// seam so it never needs to depend on this crate.
impl octant_refresh::RefreshTransport for BlockProxyRegistry {
    fn send(&mut self, target: &BlockIndex, msg: RefreshMsg) {
        BlockTransport::send(self, target, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octant_block::RefreshPayload;

    #[tokio::test]
    async fn delivered_message_reaches_the_registered_mailbox() {
        let registry = BlockProxyRegistry::new();
        let index = BlockIndex::root((0, 0, 0));
        let mut mailbox = registry.register(index.clone());

        registry
            .deliver(&index, RefreshMsg { refresh_id: 1, payload: RefreshPayload::Heartbeat })
            .unwrap();

        let msg = mailbox.recv().await.unwrap();
        assert_eq!(msg.refresh_id, 1);
    }

    #[test]
    fn delivery_to_unknown_target_is_an_error() {
        let registry = BlockProxyRegistry::new();
        let index = BlockIndex::root((1, 0, 0));
        let err = registry
            .deliver(&index, RefreshMsg { refresh_id: 1, payload: RefreshPayload::Heartbeat })
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTarget { .. }));
    }
}
