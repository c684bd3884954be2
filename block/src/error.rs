use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("block has no field named {name:?}")]
    UnknownField { name: String },

    #[error("block has no particle batch named {type_name:?}")]
    UnknownParticleType { type_name: String },

    #[error("sync counter for refresh {refresh_id} is already active")]
    SyncAlreadyActive { refresh_id: u32 },

    #[error("sync counter for refresh {refresh_id} is not active")]
    SyncNotActive { refresh_id: u32 },

    #[error(transparent)]
    Fields(#[from] octant_fields::Error),

    #[error(transparent)]
    Particles(#[from] octant_particles::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
