//! Flux Register (§4.E): per-face conservative flux bookkeeping, coarsened
//! on the way to a coarser neighbor, used to restore conservation at level
//! boundaries.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::packer::REFINEMENT_RATIO;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    XLo,
    XHi,
    YLo,
    YHi,
    ZLo,
    ZHi,
}

impl Face {
    pub fn axis(self) -> usize {
        match self {
            Face::XLo | Face::XHi => 0,
            Face::YLo | Face::YHi => 1,
            Face::ZLo | Face::ZHi => 2,
        }
    }

    pub fn is_hi(self) -> bool {
        matches!(self, Face::XHi | Face::YHi | Face::ZHi)
    }

    /// The face a neighbor sitting across `if3` shares with us.
    pub fn from_if3(if3: [i32; 3]) -> Option<Face> {
        for (axis, &c) in if3.iter().enumerate() {
            if c > 0 {
                return Some([Face::XHi, Face::YHi, Face::ZHi][axis]);
            }
            if c < 0 {
                return Some([Face::XLo, Face::YLo, Face::ZLo][axis]);
            }
        }
        None
    }
}

/// A dense 2-D slab of per-cell flux values recorded on one face.
#[derive(Debug, Clone)]
pub struct FluxSlab {
    dims: [usize; 2],
    data: Vec<f64>,
}

impl FluxSlab {
    pub fn new(dims: [usize; 2]) -> Self {
        Self { data: vec![0.0; dims[0] * dims[1]], dims }
    }

    pub fn from_values(dims: [usize; 2], data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), dims[0] * dims[1]);
        Self { dims, data }
    }

    pub fn dims(&self) -> [usize; 2] {
        self.dims
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[j * self.dims[0] + i]
    }

    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        let idx = j * self.dims[0] + i;
        self.data[idx] = v;
    }

    /// Coarsens this (fine sender's) slab by summing each
    /// `REFINEMENT_RATIO x REFINEMENT_RATIO` block of fine cells — the
    /// conservative-correction formula (§4.E, verified by S4: a 4x4 slab
    /// of ones coarsens to `sum/4 == 1.0` per coarse cell).
    pub fn coarsen(&self) -> FluxSlab {
        let r = REFINEMENT_RATIO as usize;
        let out_dims = [self.dims[0] / r, self.dims[1] / r];
        let mut out = FluxSlab::new(out_dims);
        for j in 0..out_dims[1] {
            for i in 0..out_dims[0] {
                let mut sum = 0.0;
                for dj in 0..r {
                    for di in 0..r {
                        sum += self.get(i * r + di, j * r + dj);
                    }
                }
                out.set(i, j, sum / (r * r) as f64);
            }
        }
        out
    }
}

/// Per-face, per-field flux slabs recorded during the hydrodynamic update,
/// and the bookkeeping to apply a remote coarsened correction.
#[derive(Debug, Default)]
pub struct FluxRegister {
    slabs: HashMap<(Face, String), FluxSlab>,
}

impl FluxRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, face: Face, field: &str, slab: FluxSlab) {
        self.slabs.insert((face, field.to_string()), slab);
    }

    pub fn get(&self, face: Face, field: &str) -> Result<&FluxSlab> {
        self.slabs
            .get(&(face, field.to_string()))
            .ok_or_else(|| Error::MissingFluxSlab { face, field: field.to_string() })
    }

    /// Coarsens the recorded slab for sending to a coarser neighbor
    /// (fine-sender case of §4.E).
    pub fn coarsened_for_send(&self, face: Face, field: &str) -> Result<FluxSlab> {
        Ok(self.get(face, field)?.coarsen())
    }

    /// Applies a coarsened remote correction: subtracts this register's own
    /// recorded boundary flux and returns the per-cell delta to add into
    /// the adjacent interior cell, restoring conservation (§4.E, §8
    /// property: `Σ sent == Σ applied` and the S4 scenario).
    pub fn correction(&self, face: Face, field: &str, remote: &FluxSlab) -> Result<FluxSlab> {
        let mine = self.get(face, field)?;
        let mut out = FluxSlab::new(remote.dims());
        for j in 0..remote.dims()[1] {
            for i in 0..remote.dims()[0] {
                out.set(i, j, remote.get(i, j) - mine.get(i, j));
            }
        }
        Ok(out)
    }
}
