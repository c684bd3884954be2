use thiserror::Error;

/// Failures recognized by the block-index and box-geometry layer (§7).
///
/// Both variants here are precondition violations: the caller handed the
/// geometry code a face vector or child index that cannot occur if the
/// forest was built correctly. Neither is recoverable in-place; the driver
/// that observes one logs it and aborts the enclosing refresh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("face vector {if3:?} has a component outside {{-1,0,1}}")]
    GeometryOverflow { if3: [i32; 3] },

    #[error("child index {ic3:?} has a component outside {{0,1}}")]
    InvalidChildIndex { ic3: [u8; 3] },

    #[error("cannot take parent of a level-0 block index")]
    NoParentAtRoot,
}

pub type Result<T> = std::result::Result<T, Error>;
