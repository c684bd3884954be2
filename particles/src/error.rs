use thiserror::Error;

/// Failures recognized by the particle sorter (§7).
///
/// `OutOfRange` is a precondition violation, not a recoverable condition: a
/// particle landing outside the 4x4x4 sub-block window means it moved more
/// than one whole block width in a single step, which indicates a CFL
/// violation upstream rather than anything the sorter can correct.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("particle {index} of type {type_name:?} has sub-block index {sub:?}, outside the 4x4x4 window")]
    OutOfRange { type_name: String, index: usize, sub: [i32; 3] },

    #[error("unknown particle type {type_name:?}")]
    UnknownType { type_name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
