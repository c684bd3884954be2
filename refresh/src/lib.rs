pub mod coordinator;
pub mod descriptor;
pub mod error;

#[cfg(test)]
mod bicgstab_sketch;

pub use coordinator::{RefreshCoordinator, RefreshTransport, SendPlan};
pub use octant_block::SyncState;
pub use descriptor::{
    CallbackId, FieldSet, ParticleSet, RefreshDescriptor, RefreshDescriptorBuilder, SyncType,
};
pub use error::{Error, Result};
