//! Field Face Packer (§4.C): extracts/injects a rectangular slab of field
//! values, applying identity copy, restriction, or prolongation depending
//! on the relative refinement level between sender and receiver.

use crate::error::{Error, Result};
use crate::field::FieldArray;

/// Refinement ratio between adjacent levels. Fixed at 2 (the standard
/// octree ratio); the restriction/prolongation math below is written in
/// terms of this constant rather than a hard-coded `2` so the one place
/// that would need to change for a different ratio is obvious.
pub const REFINEMENT_RATIO: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// Sender and receiver are at the same level: identity copy.
    Same,
    /// Sender is finer than the receiver: restriction (average).
    Coarse,
    /// Sender is coarser than the receiver: prolongation (interpolate).
    Fine,
}

/// Which interpolation stencil a `Fine` (prolongation) refresh uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProlongStencil {
    /// Piecewise-linear, conservative (volume-weighted) interpolation.
    Linear,
    /// Linear plus a curvature correction term from a 3-point stencil.
    Quadratic,
    /// Linear with a minmod slope limiter, avoiding new extrema — named
    /// for `control_new_refresh.cpp`'s `DEBUG_ENZO_PROLONG`-adjacent
    /// prolongation path.
    EnzoProlong,
}

impl ProlongStencil {
    /// Minimum padding (cells beyond the nominal face) the sender must
    /// supply for this stencil to have the neighbor values it needs.
    pub fn required_padding(self) -> i32 {
        match self {
            ProlongStencil::Linear => 1,
            ProlongStencil::Quadratic => 2,
            ProlongStencil::EnzoProlong => 1,
        }
    }
}

/// Packs/unpacks one named field's slab for a block with the given ghost
/// depth. `lo`/`hi` are interior-relative bounds as produced by
/// [`octant_core::Box::get_limits`] (may be negative or exceed the
/// interior extent — that's the ghost zone and padding).
pub struct FacePacker {
    ghost_depth: [i32; 3],
}

impl FacePacker {
    pub fn new(ghost_depth: [i32; 3]) -> Self {
        Self { ghost_depth }
    }

    fn to_array_index(&self, axis: usize, coord: i32) -> usize {
        (coord + self.ghost_depth[axis]) as usize
    }

    fn region_dims(lo: [i32; 3], hi: [i32; 3]) -> [usize; 3] {
        [
            (hi[0] - lo[0]).max(0) as usize,
            (hi[1] - lo[1]).max(0) as usize,
            (hi[2] - lo[2]).max(0) as usize,
        ]
    }

    /// Extracts the slab `[lo,hi)` from `field`, applying restriction when
    /// `kind == Coarse`. Returns the buffer in `(k, j, i)` row-major order
    /// at whatever resolution the receiver expects (full resolution for
    /// `Same`/`Fine`, one value per coarse cell for `Coarse`).
    pub fn pack(&self, name: &str, field: &FieldArray, lo: [i32; 3], hi: [i32; 3], kind: RefreshKind) -> Result<Vec<f64>> {
        match kind {
            RefreshKind::Same | RefreshKind::Fine => Ok(self.pack_identity(field, lo, hi)),
            RefreshKind::Coarse => self.pack_restrict(name, field, lo, hi),
        }
    }

    fn pack_identity(&self, field: &FieldArray, lo: [i32; 3], hi: [i32; 3]) -> Vec<f64> {
        let dims = Self::region_dims(lo, hi);
        let mut out = Vec::with_capacity(dims[0] * dims[1] * dims[2]);
        for k in lo[2]..hi[2] {
            for j in lo[1]..hi[1] {
                for i in lo[0]..hi[0] {
                    out.push(field.get(
                        self.to_array_index(0, i),
                        self.to_array_index(1, j),
                        self.to_array_index(2, k),
                    ));
                }
            }
        }
        out
    }

    fn pack_restrict(&self, name: &str, field: &FieldArray, lo: [i32; 3], hi: [i32; 3]) -> Result<Vec<f64>> {
        for axis in 0..3 {
            if (hi[axis] - lo[axis]) % REFINEMENT_RATIO != 0 {
                return Err(Error::MisalignedRestriction { lo, hi });
            }
        }
        let coarse_dims = [
            ((hi[0] - lo[0]) / REFINEMENT_RATIO) as usize,
            ((hi[1] - lo[1]) / REFINEMENT_RATIO) as usize,
            ((hi[2] - lo[2]) / REFINEMENT_RATIO) as usize,
        ];
        let mut out = Vec::with_capacity(coarse_dims[0] * coarse_dims[1] * coarse_dims[2]);
        let r = REFINEMENT_RATIO;
        let mut kc = lo[2];
        while kc < hi[2] {
            let mut jc = lo[1];
            while jc < hi[1] {
                let mut ic = lo[0];
                while ic < hi[0] {
                    let mut sum = 0.0;
                    for dk in 0..r {
                        for dj in 0..r {
                            for di in 0..r {
                                sum += field.get(
                                    self.to_array_index(0, ic + di),
                                    self.to_array_index(1, jc + dj),
                                    self.to_array_index(2, kc + dk),
                                );
                            }
                        }
                    }
                    out.push(sum / (r * r * r) as f64);
                    ic += r;
                }
                jc += r;
            }
            kc += r;
        }
        let _ = name; // kept for symmetric error context with unpack
        Ok(out)
    }

    /// Writes `buf` into `field`'s ghost cells at `[lo,hi)`, applying
    /// prolongation when `kind == Fine`. For `Fine`, `buf` holds the
    /// *coarse* padded slab (dims `(hi-lo)/REFINEMENT_RATIO`, already
    /// inflated by the stencil's required padding) and this expands it to
    /// the full-resolution `[lo,hi)` fine region.
    pub fn unpack(
        &self,
        name: &str,
        field: &mut FieldArray,
        lo: [i32; 3],
        hi: [i32; 3],
        kind: RefreshKind,
        buf: &[f64],
        stencil: ProlongStencil,
    ) -> Result<()> {
        match kind {
            RefreshKind::Same | RefreshKind::Coarse => self.unpack_identity(name, field, lo, hi, buf),
            RefreshKind::Fine => self.unpack_prolong(name, field, lo, hi, buf, stencil),
        }
    }

    fn unpack_identity(&self, name: &str, field: &mut FieldArray, lo: [i32; 3], hi: [i32; 3], buf: &[f64]) -> Result<()> {
        let dims = Self::region_dims(lo, hi);
        let expected = dims[0] * dims[1] * dims[2];
        if buf.len() != expected {
            return Err(Error::BufferSizeMismatch { name: name.to_string(), lo, hi, expected, got: buf.len() });
        }
        let mut idx = 0;
        for k in lo[2]..hi[2] {
            for j in lo[1]..hi[1] {
                for i in lo[0]..hi[0] {
                    field.set(self.to_array_index(0, i), self.to_array_index(1, j), self.to_array_index(2, k), buf[idx]);
                    idx += 1;
                }
            }
        }
        Ok(())
    }

    /// `buf` is a padded coarse slab: `padded_dims = (hi-lo)/ratio +
    /// 2*padding` along each axis, laid out `(k,j,i)` row-major, centered
    /// so that index `padding` along an axis corresponds to coarse cell
    /// `lo/ratio` on that axis. The fine output written is exactly
    /// `[lo,hi)`.
    fn unpack_prolong(
        &self,
        name: &str,
        field: &mut FieldArray,
        lo: [i32; 3],
        hi: [i32; 3],
        buf: &[f64],
        stencil: ProlongStencil,
    ) -> Result<()> {
        let r = REFINEMENT_RATIO;
        let pad = stencil.required_padding();
        let coarse_dims = [
            (hi[0] - lo[0]) / r + 2 * pad,
            (hi[1] - lo[1]) / r + 2 * pad,
            (hi[2] - lo[2]) / r + 2 * pad,
        ];
        let expected = (coarse_dims[0] * coarse_dims[1] * coarse_dims[2]) as usize;
        if buf.len() != expected {
            return Err(Error::BufferSizeMismatch { name: name.to_string(), lo, hi, expected, got: buf.len() });
        }
        let at = |buf: &[f64], ci: i32, cj: i32, ck: i32| -> f64 {
            let ii = (ci + pad) as usize;
            let jj = (cj + pad) as usize;
            let kk = (ck + pad) as usize;
            let idx = (kk * coarse_dims[1] as usize + jj) * coarse_dims[0] as usize + ii;
            buf[idx]
        };
        let mut kc = 0;
        while kc * r < hi[2] - lo[2] {
            let mut jc = 0;
            while jc * r < hi[1] - lo[1] {
                let mut ic = 0;
                while ic * r < hi[0] - lo[0] {
                    let center = at(buf, ic, jc, kc);
                    let slope = |axis: usize| -> f64 {
                        let plus = match axis {
                            0 => at(buf, ic + 1, jc, kc),
                            1 => at(buf, ic, jc + 1, kc),
                            _ => at(buf, ic, jc, kc + 1),
                        };
                        let minus = match axis {
                            0 => at(buf, ic - 1, jc, kc),
                            1 => at(buf, ic, jc - 1, kc),
                            _ => at(buf, ic, jc, kc - 1),
                        };
                        match stencil {
                            ProlongStencil::Linear | ProlongStencil::Quadratic => (plus - minus) / 2.0,
                            ProlongStencil::EnzoProlong => minmod(plus - center, center - minus),
                        }
                    };
                    let curvature = |axis: usize| -> f64 {
                        if stencil != ProlongStencil::Quadratic || pad < 2 {
                            return 0.0;
                        }
                        let plus = match axis {
                            0 => at(buf, ic + 1, jc, kc),
                            1 => at(buf, ic, jc + 1, kc),
                            _ => at(buf, ic, jc, kc + 1),
                        };
                        let minus = match axis {
                            0 => at(buf, ic - 1, jc, kc),
                            1 => at(buf, ic, jc - 1, kc),
                            _ => at(buf, ic, jc, kc - 1),
                        };
                        plus - 2.0 * center + minus
                    };
                    let sx = slope(0);
                    let sy = slope(1);
                    let sz = slope(2);
                    let cx = curvature(0);
                    let cy = curvature(1);
                    let cz = curvature(2);

                    for dk in 0..r {
                        let fz = sub_cell_offset(dk);
                        for dj in 0..r {
                            let fy = sub_cell_offset(dj);
                            for di in 0..r {
                                let fx = sub_cell_offset(di);
                                let mut value = center + fx * sx + fy * sy + fz * sz;
                                value += (fx * fx - 1.0 / 16.0) * cx
                                    + (fy * fy - 1.0 / 16.0) * cy
                                    + (fz * fz - 1.0 / 16.0) * cz;
                                let fi = lo[0] + ic * r + di;
                                let fj = lo[1] + jc * r + dj;
                                let fk = lo[2] + kc * r + dk;
                                field.set(
                                    self.to_array_index(0, fi),
                                    self.to_array_index(1, fj),
                                    self.to_array_index(2, fk),
                                    value,
                                );
                            }
                        }
                    }
                    ic += 1;
                }
                jc += 1;
            }
            kc += 1;
        }
        Ok(())
    }
}

/// Offset, in units of one coarse cell width, of fine sub-cell `d` (0 or 1
/// within a refinement-ratio-2 split) from the coarse cell center:
/// `-1/4` for the near sub-cell, `+1/4` for the far one.
fn sub_cell_offset(d: i32) -> f64 {
    if d == 0 {
        -0.25
    } else {
        0.25
    }
}

fn minmod(a: f64, b: f64) -> f64 {
    if a * b <= 0.0 {
        0.0
    } else if a.abs() < b.abs() {
        a
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_pack_unpack_round_trips() {
        let packer = FacePacker::new([2, 2, 2]);
        let mut field = FieldArray::new([12, 12, 12]);
        for k in 0..8 {
            for j in 0..8 {
                for i in 0..8 {
                    field.set(i + 2, j + 2, k + 2, (i + j * 8 + k * 64) as f64);
                }
            }
        }
        let lo = [0, 0, 0];
        let hi = [8, 8, 8];
        let buf = packer.pack("rho", &field, lo, hi, RefreshKind::Same).unwrap();

        let mut dst = FieldArray::new([12, 12, 12]);
        packer.unpack("rho", &mut dst, lo, hi, RefreshKind::Same, &buf, ProlongStencil::Linear).unwrap();
        for k in 0..8 {
            for j in 0..8 {
                for i in 0..8 {
                    assert_eq!(dst.get(i + 2, j + 2, k + 2), field.get(i + 2, j + 2, k + 2));
                }
            }
        }
    }

    #[test]
    fn restriction_averages_refinement_ratio_cubed_cells() {
        let packer = FacePacker::new([2, 2, 2]);
        let mut field = FieldArray::new([12, 12, 12]);
        for k in 0..8 {
            for j in 0..8 {
                for i in 0..8 {
                    field.set(i + 2, j + 2, k + 2, 3.0);
                }
            }
        }
        let buf = packer.pack("rho", &field, [0, 0, 0], [4, 4, 4], RefreshKind::Coarse).unwrap();
        assert_eq!(buf.len(), 8);
        assert!(buf.iter().all(|&v| (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn prolongation_of_constant_field_reproduces_constant() {
        let packer = FacePacker::new([2, 2, 2]);
        // Uniform padded coarse buffer: constant field has zero slope and
        // curvature everywhere, so every stencil must reproduce it exactly.
        let pad = ProlongStencil::Quadratic.required_padding();
        let dims = [2 + 2 * pad, 2 + 2 * pad, 2 + 2 * pad];
        let buf = vec![5.0; (dims[0] * dims[1] * dims[2]) as usize];
        let mut field = FieldArray::new([12, 12, 12]);
        packer
            .unpack("rho", &mut field, [0, 0, 0], [4, 4, 4], RefreshKind::Fine, &buf, ProlongStencil::Quadratic)
            .unwrap();
        for k in 0..4 {
            for j in 0..4 {
                for i in 0..4 {
                    assert!((field.get(i + 2, j + 2, k + 2) - 5.0).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn prolongation_restriction_consistency() {
        // A linear ramp along x (uniform in y/z) should prolong so that the
        // average of each pair of fine sub-cells reproduces the coarse
        // cell's own value (property #4 in §8, to within the stencil's
        // stated order — exact for linear reconstruction).
        let packer = FacePacker::new([2, 2, 2]);
        let pad = ProlongStencil::Linear.required_padding();
        let n = 1 + 2 * pad; // one coarse cell per axis plus padding
        let mut buf = vec![0.0; (n * n * n) as usize];
        for k in 0..n {
            for j in 0..n {
                for i in 0..n {
                    let idx = ((k * n + j) * n + i) as usize;
                    buf[idx] = i as f64; // ramp along x only
                }
            }
        }
        let mut field = FieldArray::new([8, 8, 8]);
        let lo = [0, 0, 0];
        let hi = [2, 2, 2];
        packer.unpack("rho", &mut field, lo, hi, RefreshKind::Fine, &buf, ProlongStencil::Linear).unwrap();
        let center_value = buf[(pad + pad * n + pad * n * n) as usize];
        let avg = (field.get(2, 3, 3) + field.get(3, 3, 3)) / 2.0;
        assert!((avg - center_value).abs() < 1e-9);
    }
}
