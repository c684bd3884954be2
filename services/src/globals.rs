//! Global Services (§4.J): explicitly constructed, passed by `Arc` into
//! entry methods rather than reached through a singleton — matching this
//! corpus's `ConsensusManager`/`ConsensusInstance` pattern of an owned
//! handle over ambient global state, so kernels stay testable in isolation.

use std::sync::Arc;

use crate::config::SimulationConfig;
use crate::hierarchy::Hierarchy;
use crate::particle_descriptor::ParticleDescriptorRegistry;
use crate::refresh_registry::RefreshDescriptorRegistry;

pub struct Globals {
    hierarchy: Hierarchy,
    config: SimulationConfig,
    refreshes: RefreshDescriptorRegistry,
    particles: ParticleDescriptorRegistry,
}

impl Globals {
    pub fn new(
        hierarchy: Hierarchy,
        config: SimulationConfig,
        refreshes: RefreshDescriptorRegistry,
        particles: ParticleDescriptorRegistry,
    ) -> Arc<Self> {
        Arc::new(Self { hierarchy, config, refreshes, particles })
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn refreshes(&self) -> &RefreshDescriptorRegistry {
        &self.refreshes
    }

    pub fn particles(&self) -> &ParticleDescriptorRegistry {
        &self.particles
    }
}
