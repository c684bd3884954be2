pub mod block;
pub mod error;
pub mod message;
pub mod sync;

pub use block::Block;
pub use error::{Error, Result};
pub use message::{RefreshMsg, RefreshPayload};
pub use sync::{Sync, SyncState};
