pub mod error;
pub mod particle;
pub mod sorter;

pub use error::{Error, Result};
pub use particle::{Particle, ParticleBatch};
pub use sorter::{BoundaryInfo, DepartureBag, ParticleSorter};
