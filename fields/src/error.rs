use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("field {name:?} not found on block")]
    UnknownField { name: String },

    #[error("packed buffer has {got} values, expected {expected} for region {lo:?}..{hi:?}")]
    BufferSizeMismatch { name: String, lo: [i32; 3], hi: [i32; 3], expected: usize, got: usize },

    #[error("restriction region {lo:?}..{hi:?} is not evenly divisible by the refinement ratio")]
    MisalignedRestriction { lo: [i32; 3], hi: [i32; 3] },

    #[error("flux register has no recorded slab for face {face:?} field {field:?}")]
    MissingFluxSlab { face: crate::flux::Face, field: String },
}

pub type Result<T> = std::result::Result<T, Error>;
