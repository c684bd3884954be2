use thiserror::Error;

/// Refresh-id and particle-type lookups are precondition checks (§6, §7):
/// an id outside `0 <= id < num_registered_refreshes` is a fatal
/// programming error, not a recoverable runtime condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("refresh id {id} is out of range (0..{registered} registered)")]
    UnknownRefreshId { id: u32, registered: u32 },

    #[error("no particle type registered under {type_name:?}")]
    UnknownParticleType { type_name: String },

    #[error(transparent)]
    Refresh(#[from] octant_refresh::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
