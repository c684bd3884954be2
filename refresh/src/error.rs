use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("refresh descriptor {id} has no callback set")]
    MissingCallback { id: u32 },

    #[error("refresh {refresh_id} callback mismatch: expected {expected:?}, got {got:?}")]
    CallbackMismatch { refresh_id: u32, expected: u32, got: u32 },

    #[error("refresh {refresh_id} reached quorum with a non-empty pending queue: {detail}")]
    PreconditionViolation { refresh_id: u32, detail: String },

    #[error(transparent)]
    Block(#[from] octant_block::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
