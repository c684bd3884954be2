//! Naming helpers for the `{-1,0,1}^3` face vectors and `{0,1}^3` child
//! indices used throughout the neighbor-enumeration and geometry code.

/// One of the three spatial axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// `true` if every component of `if3` is `0` (i.e. not a face vector at
/// all — used to skip the degenerate "no face" case while enumerating
/// `{-1,0,1}^3`).
pub fn is_zero(if3: [i32; 3]) -> bool {
    if3 == [0, 0, 0]
}

/// Number of non-zero components of a face vector, i.e. its codimension
/// (1 = face, 2 = edge, 3 = corner).
pub fn face_rank(if3: [i32; 3]) -> usize {
    if3.iter().filter(|&&c| c != 0).count()
}

/// Validates that every component of `if3` lies in `{-1,0,1}`. Used at the
/// boundary between the geometry code and the wire format, where a
/// corrupted/overflowed face vector is a `GeometryOverflow` precondition
/// violation rather than something to clamp silently.
pub fn in_bounds(if3: [i32; 3]) -> bool {
    if3.iter().all(|&c| (-1..=1).contains(&c))
}
