//! Particle type schema registry (§6 `particle_descr`): attribute layout,
//! position representation, and batch stride for each registered particle
//! type.

use std::collections::HashMap;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionKind {
    Float,
    Integer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleTypeDescriptor {
    pub name: String,
    pub attributes: Vec<String>,
    pub position_kind: PositionKind,
    pub batch_stride: usize,
}

#[derive(Debug, Default)]
pub struct ParticleDescriptorRegistry {
    types: HashMap<String, ParticleTypeDescriptor>,
}

impl ParticleDescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: ParticleTypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, type_name: &str) -> Result<&ParticleTypeDescriptor> {
        self.types
            .get(type_name)
            .ok_or_else(|| Error::UnknownParticleType { type_name: type_name.to_string() })
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_type_is_an_error() {
        let registry = ParticleDescriptorRegistry::new();
        assert!(registry.get("dark_matter").is_err());
    }

    #[test]
    fn registered_type_round_trips() {
        let mut registry = ParticleDescriptorRegistry::new();
        registry.register(ParticleTypeDescriptor {
            name: "tracer".to_string(),
            attributes: vec!["vx".to_string(), "vy".to_string(), "vz".to_string()],
            position_kind: PositionKind::Float,
            batch_stride: 64,
        });
        let found = registry.get("tracer").unwrap();
        assert_eq!(found.batch_stride, 64);
    }
}
