use octant_core::BlockIndex;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("no mailbox registered for block {index:?}")]
    UnknownTarget { index: BlockIndex },

    #[error("mailbox for block {index:?} is closed")]
    MailboxClosed { index: BlockIndex },
}

pub type Result<T> = std::result::Result<T, Error>;
