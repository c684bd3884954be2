pub mod error;
pub mod field;
pub mod flux;
pub mod packer;

pub use error::{Error, Result};
pub use field::FieldArray;
pub use flux::{Face, FluxRegister, FluxSlab};
pub use packer::{FacePacker, ProlongStencil, RefreshKind, REFINEMENT_RATIO};
