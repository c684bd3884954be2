//! Particle Sorter (§4.D): bins departing particles into neighbor-addressed
//! bags, using the same 4x4x4 sub-block window the original mesh code keys
//! particle migration on.

use crate::error::{Error, Result};
use crate::particle::Particle;

/// Per-axis description of whether this block sits on the domain boundary
/// and whether that boundary wraps around.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryInfo {
    pub on_boundary_lo: [bool; 3],
    pub on_boundary_hi: [bool; 3],
    pub periodic: [bool; 3],
    pub domain_extent: [f64; 3],
}

impl BoundaryInfo {
    pub fn interior() -> Self {
        Self {
            on_boundary_lo: [false; 3],
            on_boundary_hi: [false; 3],
            periodic: [false; 3],
            domain_extent: [1.0; 3],
        }
    }
}

/// Classifies a single-axis coordinate into one of the four sub-block bins:
/// `0` = beyond the low face, `1`/`2` = the two interior halves, `3` =
/// beyond the high face. Coordinates more than one full block-width past
/// either face are out of range — a CFL violation upstream (§4.D).
fn axis_bin(x: f64) -> std::result::Result<u8, ()> {
    if !(-1.0..2.0).contains(&x) {
        return Err(());
    }
    Ok(if x < 0.0 {
        0
    } else if x < 0.5 {
        1
    } else if x < 1.0 {
        2
    } else {
        3
    })
}

fn sub_block(position: [f64; 3]) -> std::result::Result<[u8; 3], usize> {
    let mut sub = [0u8; 3];
    for axis in 0..3 {
        sub[axis] = axis_bin(position[axis]).map_err(|_| axis)?;
    }
    Ok(sub)
}

fn is_interior(sub: [u8; 3]) -> bool {
    sub.iter().all(|&s| s == 1 || s == 2)
}

/// The face vector a neighbor bag's sub-blocks correspond to: `-1` for the
/// single low-face bin, `1` for the single high-face bin, `0` for either of
/// the two interior bins along that axis.
fn if3_axis_value(s: u8) -> i32 {
    match s {
        0 => -1,
        3 => 1,
        _ => 0,
    }
}

/// All sub-block coordinates a given neighbor face vector owns: along an
/// axis where `if3` is non-zero, the single matching edge bin; along the
/// other axes, both interior bins (the particle may sit anywhere along
/// those axes and still belong to this neighbor).
fn subblocks_for_if3(if3: [i32; 3]) -> Vec<[u8; 3]> {
    fn values(c: i32) -> Vec<u8> {
        match c {
            -1 => vec![0],
            1 => vec![3],
            _ => vec![1, 2],
        }
    }
    let mut out = Vec::new();
    for z in values(if3[2]) {
        for y in values(if3[1]) {
            for x in values(if3[0]) {
                out.push([x, y, z]);
            }
        }
    }
    out
}

/// Departing particles of one type, binned by neighbor.
#[derive(Debug)]
pub struct DepartureBag {
    pub if3: [i32; 3],
    pub particles: Vec<Particle>,
}

/// Maps the 4x4x4 sub-block window to allocated neighbor bags and performs
/// the actual binning for one refresh instance.
#[derive(Debug, Default)]
pub struct ParticleSorter {
    bins: [[[Option<usize>; 4]; 4]; 4],
    bag_if3: Vec<[i32; 3]>,
}

impl ParticleSorter {
    pub fn new() -> Self {
        Self { bins: [[[None; 4]; 4]; 4], bag_if3: Vec::new() }
    }

    /// Allocates one bag per discovered neighbor face vector and assigns it
    /// to every sub-block cell that neighbor's footprint covers. Overlapping
    /// neighbors (e.g. an edge and the two faces touching it are distinct
    /// face vectors so this does not arise for the neighbor iterator's
    /// output) each keep a disjoint set of cells.
    pub fn allocate_bags(&mut self, neighbor_if3s: impl IntoIterator<Item = [i32; 3]>) {
        for if3 in neighbor_if3s {
            let bag_id = self.bag_if3.len();
            self.bag_if3.push(if3);
            for sub in subblocks_for_if3(if3) {
                self.bins[sub[0] as usize][sub[1] as usize][sub[2] as usize] = Some(bag_id);
            }
        }
    }

    /// Bins every particle in `particles` that has exited the block's
    /// interior into its neighbor's bag, removing it from `particles` in
    /// place, and applies the periodic coordinate shift for bags crossing a
    /// periodic domain face.
    pub fn sort(
        &self,
        type_name: &str,
        particles: &mut Vec<Particle>,
        boundary: &BoundaryInfo,
    ) -> Result<Vec<DepartureBag>> {
        let mut bags: Vec<Vec<Particle>> = vec![Vec::new(); self.bag_if3.len()];
        let mut keep = Vec::with_capacity(particles.len());

        for (index, particle) in particles.drain(..).enumerate() {
            let sub = sub_block(particle.position).map_err(|axis| {
                let mut sub = [0i32; 3];
                sub[axis] = if particle.position[axis] < 0.0 { -1 } else { 2 };
                Error::OutOfRange { type_name: type_name.to_string(), index, sub }
            })?;

            if is_interior(sub) {
                keep.push(particle);
                continue;
            }

            let bag_id = self.bins[sub[0] as usize][sub[1] as usize][sub[2] as usize]
                .ok_or_else(|| Error::OutOfRange {
                    type_name: type_name.to_string(),
                    index,
                    sub: [if3_axis_value(sub[0]), if3_axis_value(sub[1]), if3_axis_value(sub[2])],
                })?;
            bags[bag_id].push(particle);
        }
        *particles = keep;

        let mut out = Vec::new();
        for (bag_id, mut particles) in bags.into_iter().enumerate() {
            if particles.is_empty() {
                continue;
            }
            let if3 = self.bag_if3[bag_id];
            apply_periodic_shift(&mut particles, if3, boundary);
            out.push(DepartureBag { if3, particles });
        }
        Ok(out)
    }
}

/// Shifts every particle in a departing bag by the domain extent when its
/// neighbor lies across a periodic domain face (§4.D point 4). The sign
/// follows the crossing direction: a particle leaving the low face of a
/// periodic axis reappears on the high side, so its coordinate needs
/// `+extent` to stay consistent with the neighbor's own frame, and
/// symmetrically `-extent` at the high face.
fn apply_periodic_shift(particles: &mut [Particle], if3: [i32; 3], boundary: &BoundaryInfo) {
    for axis in 0..3 {
        let shift = if if3[axis] == -1 && boundary.on_boundary_lo[axis] && boundary.periodic[axis]
        {
            boundary.domain_extent[axis]
        } else if if3[axis] == 1 && boundary.on_boundary_hi[axis] && boundary.periodic[axis] {
            -boundary.domain_extent[axis]
        } else {
            continue;
        };
        for p in particles.iter_mut() {
            p.position[axis] += shift;
        }
    }
}
