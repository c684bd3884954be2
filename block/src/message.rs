//! RefreshMsg (§3): the in-flight payload a block sends to or receives from
//! a neighbor during one refresh instance.

use octant_fields::{Face, FluxSlab};
use octant_particles::Particle;

#[derive(Debug, Clone)]
pub enum RefreshPayload {
    FieldFace { name: String, buf: Vec<f64> },
    ParticleBag { type_name: String, particles: Vec<Particle> },
    FaceFluxes { field: String, face: Face, slab: FluxSlab },
    /// Carries no data; exists so the receiver's [`crate::Sync`] counter
    /// still advances when a neighbor has nothing to send this refresh.
    Heartbeat,
}

#[derive(Debug, Clone)]
pub struct RefreshMsg {
    pub refresh_id: u32,
    pub payload: RefreshPayload,
}

impl RefreshMsg {
    pub fn heartbeat(refresh_id: u32) -> Self {
        Self { refresh_id, payload: RefreshPayload::Heartbeat }
    }
}
