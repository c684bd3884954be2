//! Block index, neighbor enumeration, and overlap geometry (§4.A, §4.B).

pub mod error;
pub mod geometry;
pub mod index;

pub use error::{Error, Result};
pub use geometry::{clip_to_extent, Box, Frame};
pub use index::{neighbors, BlockIndex, LeafOracle, Neighbor, NeighborType, Selector};
