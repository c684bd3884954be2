//! The Block type (§3 Block): owns fields, particle batches, a flux
//! register, and the per-refresh Sync/pending-queue bookkeeping a refresh
//! instance needs. Migrated between processing elements by the messaging
//! substrate without the application observing address changes — this type
//! itself carries no knowledge of where it currently lives.

use std::collections::HashMap;

use octant_core::BlockIndex;
use octant_fields::FieldArray;
use octant_particles::ParticleBatch;

use crate::error::{Error, Result};
use crate::message::RefreshMsg;
use crate::sync::Sync;

pub struct Block {
    index: BlockIndex,
    block_shape: [i32; 3],
    ghost_depth: [i32; 3],
    fields: HashMap<String, FieldArray>,
    particles: HashMap<String, ParticleBatch>,
    flux: octant_fields::FluxRegister,
    sync: HashMap<u32, Sync>,
    pending: HashMap<u32, Vec<RefreshMsg>>,
}

impl Block {
    pub fn new(index: BlockIndex, block_shape: [i32; 3], ghost_depth: [i32; 3]) -> Self {
        Self {
            index,
            block_shape,
            ghost_depth,
            fields: HashMap::new(),
            particles: HashMap::new(),
            flux: octant_fields::FluxRegister::new(),
            sync: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    pub fn index(&self) -> &BlockIndex {
        &self.index
    }

    pub fn block_shape(&self) -> [i32; 3] {
        self.block_shape
    }

    pub fn ghost_depth(&self) -> [i32; 3] {
        self.ghost_depth
    }

    pub fn add_field(&mut self, name: impl Into<String>, field: FieldArray) {
        self.fields.insert(name.into(), field);
    }

    pub fn field(&self, name: &str) -> Result<&FieldArray> {
        self.fields.get(name).ok_or_else(|| Error::UnknownField { name: name.to_string() })
    }

    pub fn field_mut(&mut self, name: &str) -> Result<&mut FieldArray> {
        self.fields.get_mut(name).ok_or_else(|| Error::UnknownField { name: name.to_string() })
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn add_particle_batch(&mut self, batch: ParticleBatch) {
        self.particles.insert(batch.type_name.clone(), batch);
    }

    pub fn particle_batch(&self, type_name: &str) -> Result<&ParticleBatch> {
        self.particles
            .get(type_name)
            .ok_or_else(|| Error::UnknownParticleType { type_name: type_name.to_string() })
    }

    pub fn particle_batch_mut(&mut self, type_name: &str) -> Result<&mut ParticleBatch> {
        self.particles
            .get_mut(type_name)
            .ok_or_else(|| Error::UnknownParticleType { type_name: type_name.to_string() })
    }

    pub fn flux(&self) -> &octant_fields::FluxRegister {
        &self.flux
    }

    pub fn flux_mut(&mut self) -> &mut octant_fields::FluxRegister {
        &mut self.flux
    }

    /// The Sync counter for `refresh_id`, created INACTIVE on first access
    /// (invariant 1: a never-touched refresh id behaves as if inactive).
    pub fn sync_mut(&mut self, refresh_id: u32) -> &mut Sync {
        self.sync.entry(refresh_id).or_insert_with(Sync::new)
    }

    pub fn sync(&self, refresh_id: u32) -> Sync {
        self.sync.get(&refresh_id).copied().unwrap_or_default()
    }

    pub fn enqueue(&mut self, msg: RefreshMsg) {
        self.pending.entry(msg.refresh_id).or_default().push(msg);
    }

    pub fn pending_is_empty(&self, refresh_id: u32) -> bool {
        self.pending.get(&refresh_id).map(Vec::is_empty).unwrap_or(true)
    }

    /// Takes every pending message for `refresh_id`, leaving the queue
    /// empty so a subsequent [`Sync::try_close`] check can succeed.
    pub fn drain_pending(&mut self, refresh_id: u32) -> Vec<RefreshMsg> {
        self.pending.remove(&refresh_id).unwrap_or_default()
    }
}
