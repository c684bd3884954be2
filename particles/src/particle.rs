//! A single particle and the batch a block keeps per particle type.

/// Position is kept in block-local coordinates where `[0, 1)` spans the
/// block's own interior along each axis; values outside `[0, 1)` describe a
/// particle that has drifted into a neighbor's territory.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: [f64; 3],
    /// Whatever else rides along with the particle (velocity, mass, id,
    /// ...); the sorter only ever looks at `position`.
    pub payload: Vec<f64>,
}

impl Particle {
    pub fn new(position: [f64; 3], payload: Vec<f64>) -> Self {
        Self { position, payload }
    }
}

/// All particles of one type currently owned by a block.
#[derive(Debug, Clone, Default)]
pub struct ParticleBatch {
    pub type_name: String,
    pub particles: Vec<Particle>,
}

impl ParticleBatch {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), particles: Vec::new() }
    }
}
