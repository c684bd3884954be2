//! Refresh Descriptor (§4.F): the immutable configuration of one refresh
//! instance, identified by a stable integer id.

use octant_core::NeighborType;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSet {
    All,
    Named(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticleSet {
    All,
    Named(Vec<String>),
}

/// Exit synchronization mode: how the descriptor's callback is dispatched
/// once a block's Sync counter closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncType {
    /// No cross-block coordination: fire the callback as soon as this
    /// block's own counter closes.
    None,
    /// Wait for every participating block to close before any fires.
    Barrier,
    /// Wait until no messages for this refresh id are in flight anywhere.
    Quiescence,
    /// Fire once this block and its immediate neighbors have all closed.
    Neighbor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshDescriptor {
    id: u32,
    field_set: FieldSet,
    particle_set: ParticleSet,
    include_fluxes: bool,
    ghost_depth: [i32; 3],
    neighbor_type: NeighborType,
    min_face_rank: u8,
    sync_type: SyncType,
    root_level: u32,
    callback: CallbackId,
    prolong_padding: i32,
}

impl RefreshDescriptor {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn field_set(&self) -> &FieldSet {
        &self.field_set
    }

    pub fn particle_set(&self) -> &ParticleSet {
        &self.particle_set
    }

    pub fn include_fluxes(&self) -> bool {
        self.include_fluxes
    }

    pub fn ghost_depth(&self) -> [i32; 3] {
        self.ghost_depth
    }

    pub fn neighbor_type(&self) -> NeighborType {
        self.neighbor_type
    }

    pub fn min_face_rank(&self) -> u8 {
        self.min_face_rank
    }

    pub fn sync_type(&self) -> SyncType {
        self.sync_type
    }

    pub fn root_level(&self) -> u32 {
        self.root_level
    }

    pub fn callback(&self) -> CallbackId {
        self.callback
    }

    /// Tangential inflation (in cells) a prolongation stencil reads beyond
    /// the ordinary face neighbor's own extent (§4.B), driving how far
    /// [`crate::coordinator::RefreshCoordinator::expected_receive_count`]
    /// must look for "extra" diagonal contributors. Zero for refreshes that
    /// never prolong (same-level field exchange, particle bags, fluxes).
    pub fn prolong_padding(&self) -> i32 {
        self.prolong_padding
    }
}

pub struct RefreshDescriptorBuilder {
    field_set: FieldSet,
    particle_set: ParticleSet,
    include_fluxes: bool,
    ghost_depth: [i32; 3],
    neighbor_type: NeighborType,
    min_face_rank: u8,
    sync_type: SyncType,
    root_level: u32,
    callback: Option<CallbackId>,
    prolong_padding: i32,
}

impl Default for RefreshDescriptorBuilder {
    fn default() -> Self {
        Self {
            field_set: FieldSet::Named(Vec::new()),
            particle_set: ParticleSet::Named(Vec::new()),
            include_fluxes: false,
            ghost_depth: [0, 0, 0],
            neighbor_type: NeighborType::Leaf,
            min_face_rank: 2,
            sync_type: SyncType::Neighbor,
            root_level: 0,
            callback: None,
            prolong_padding: 0,
        }
    }
}

impl RefreshDescriptorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_field(mut self, name: impl Into<String>) -> Self {
        if let FieldSet::Named(names) = &mut self.field_set {
            names.push(name.into());
        }
        self
    }

    pub fn add_all_fields(mut self) -> Self {
        self.field_set = FieldSet::All;
        self
    }

    pub fn add_particle(mut self, type_name: impl Into<String>) -> Self {
        if let ParticleSet::Named(names) = &mut self.particle_set {
            names.push(type_name.into());
        }
        self
    }

    pub fn add_all_particles(mut self) -> Self {
        self.particle_set = ParticleSet::All;
        self
    }

    pub fn include_fluxes(mut self, include: bool) -> Self {
        self.include_fluxes = include;
        self
    }

    pub fn set_ghost_depth(mut self, g: [i32; 3]) -> Self {
        self.ghost_depth = g;
        self
    }

    pub fn set_neighbor_type(mut self, t: NeighborType) -> Self {
        self.neighbor_type = t;
        self
    }

    pub fn set_min_face_rank(mut self, r: u8) -> Self {
        self.min_face_rank = r;
        self
    }

    pub fn set_sync_type(mut self, s: SyncType) -> Self {
        self.sync_type = s;
        self
    }

    pub fn set_root_level(mut self, l: u32) -> Self {
        self.root_level = l;
        self
    }

    pub fn set_callback(mut self, c: CallbackId) -> Self {
        self.callback = Some(c);
        self
    }

    pub fn set_prolong_padding(mut self, p: i32) -> Self {
        self.prolong_padding = p;
        self
    }

    pub fn build(self, id: u32) -> Result<RefreshDescriptor> {
        let callback = self.callback.ok_or(Error::MissingCallback { id })?;
        Ok(RefreshDescriptor {
            id,
            field_set: self.field_set,
            particle_set: self.particle_set,
            include_fluxes: self.include_fluxes,
            ghost_depth: self.ghost_depth,
            neighbor_type: self.neighbor_type,
            min_face_rank: self.min_face_rank,
            sync_type: self.sync_type,
            root_level: self.root_level,
            callback,
            prolong_padding: self.prolong_padding,
        })
    }
}
