//! Riemann Flux Consumer (§4.I): the solver functor contract and an HLLC
//! implementation, used by the S6 Sod shock tube scenario. Generalized over
//! [`crate::variables::VariableLut`] (§9 Design Notes) so the same solver
//! body serves both `HydroLut` and `MhdLut` callers instead of being
//! duplicated per physics.

use crate::variables::VariableLut;

/// Primitive hydrodynamic (and, when the caller's [`VariableLut`] carries
/// one, magnetic) state at one interface side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub density: f64,
    pub velocity: [f64; 3],
    pub pressure: f64,
    /// Zero for pure hydro; meaningful only when the solver is called with
    /// an `L: VariableLut` whose `has_magnetic_field()` is `true`.
    pub magnetic_field: [f64; 3],
}

impl Primitive {
    /// Convenience constructor for pure-hydro callers (`HydroLut`), where
    /// `magnetic_field` is always zero.
    pub fn hydro(density: f64, velocity: [f64; 3], pressure: f64) -> Self {
        Self { density, velocity, pressure, magnetic_field: [0.0; 3] }
    }
}

/// Conserved hydrodynamic state: density, momentum, total energy, plus the
/// magnetic field carried along passively (see [`Primitive::magnetic_field`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conserved {
    pub density: f64,
    pub momentum: [f64; 3],
    pub energy: f64,
    pub magnetic_field: [f64; 3],
}

impl Conserved {
    pub fn from_primitive(p: &Primitive, gamma: f64) -> Self {
        let v2 = p.velocity.iter().map(|v| v * v).sum::<f64>();
        let b2 = p.magnetic_field.iter().map(|b| b * b).sum::<f64>();
        let energy = p.pressure / (gamma - 1.0) + 0.5 * p.density * v2 + 0.5 * b2;
        Self {
            density: p.density,
            momentum: [p.density * p.velocity[0], p.density * p.velocity[1], p.density * p.velocity[2]],
            energy,
            magnetic_field: p.magnetic_field,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxVector {
    pub density: f64,
    pub momentum: [f64; 3],
    pub energy: f64,
    /// Induction-equation flux, zero on the normal axis (`div B = 0`) and
    /// zero whenever the caller's LUT carries no magnetic field at all.
    pub magnetic_flux: [f64; 3],
}

/// `flux_of` adds the magnetic pressure and tension terms to the normal
/// momentum flux, and a simplified upwinded induction-equation flux on the
/// tangential axes, only when `lut.has_magnetic_field()`. This is the
/// illustrative MHD term this solver carries — not the full HLLD wave
/// structure Toro ch. 10 (and the source's HLLD solver) derive for the
/// star regions; the star-region magnetic state is instead carried through
/// unchanged by `star_state`/`star_flux` below.
fn flux_of<L: VariableLut>(prim: &Primitive, cons: &Conserved, axis: usize, lut: &L) -> FluxVector {
    let u_d = prim.velocity[axis];
    let mut momentum = [cons.momentum[0] * u_d, cons.momentum[1] * u_d, cons.momentum[2] * u_d];
    momentum[axis] += prim.pressure;
    let mut magnetic_flux = [0.0; 3];
    if lut.has_magnetic_field() {
        let b = prim.magnetic_field;
        let b2 = b.iter().map(|c| c * c).sum::<f64>();
        momentum[axis] += 0.5 * b2;
        for a in 0..3 {
            momentum[a] -= b[axis] * b[a];
        }
        for (a, flux) in magnetic_flux.iter_mut().enumerate() {
            if a != axis {
                *flux = u_d * b[a] - prim.velocity[a] * b[axis];
            }
        }
    }
    FluxVector { density: cons.density * u_d, momentum, energy: (cons.energy + prim.pressure) * u_d, magnetic_flux }
}

/// `(Fl, Fr, Wl, Wr, Ul, Ur, pl, pr, barotropic, gamma, cs) -> F, v_interface`
/// per §4.I, generalized over the face-normal axis and over the physics
/// variant via `L: VariableLut`.
pub trait RiemannSolver {
    fn solve<L: VariableLut>(
        &self,
        left: &Primitive,
        right: &Primitive,
        axis: usize,
        gamma: f64,
        lut: &L,
    ) -> (FluxVector, f64);
}

/// Toro's HLLC solver (Riemann Solvers and Numerical Methods for Fluid
/// Dynamics, ch. 10) for the ideal-gas Euler equations, extended with the
/// simplified magnetic terms in `flux_of` when `lut` carries a field.
pub struct Hllc;

impl RiemannSolver for Hllc {
    fn solve<L: VariableLut>(
        &self,
        left: &Primitive,
        right: &Primitive,
        axis: usize,
        gamma: f64,
        lut: &L,
    ) -> (FluxVector, f64) {
        let (rho_l, rho_r) = (left.density, right.density);
        let (p_l, p_r) = (left.pressure, right.pressure);
        let (u_l, u_r) = (left.velocity[axis], right.velocity[axis]);
        let c_l = gamma * p_l / rho_l;
        let c_r = gamma * p_r / rho_r;
        let c_l = c_l.sqrt();
        let c_r = c_r.sqrt();

        let s_l = (u_l - c_l).min(u_r - c_r);
        let s_r = (u_l + c_l).max(u_r + c_r);

        let cons_l = Conserved::from_primitive(left, gamma);
        let cons_r = Conserved::from_primitive(right, gamma);
        let flux_l = flux_of(left, &cons_l, axis, lut);
        let flux_r = flux_of(right, &cons_r, axis, lut);

        if s_l >= 0.0 {
            return (flux_l, u_l);
        }
        if s_r <= 0.0 {
            return (flux_r, u_r);
        }

        let s_star = (p_r - p_l + rho_l * u_l * (s_l - u_l) - rho_r * u_r * (s_r - u_r))
            / (rho_l * (s_l - u_l) - rho_r * (s_r - u_r));

        if s_star >= 0.0 {
            let star = star_state(left, &cons_l, axis, s_l, s_star);
            (star_flux(&flux_l, &cons_l, &star, s_l), s_star)
        } else {
            let star = star_state(right, &cons_r, axis, s_r, s_star);
            (star_flux(&flux_r, &cons_r, &star, s_r), s_star)
        }
    }
}

fn star_state(prim: &Primitive, cons: &Conserved, axis: usize, s_k: f64, s_star: f64) -> Conserved {
    let rho_k = prim.density;
    let u_k = prim.velocity[axis];
    let p_k = prim.pressure;
    let coeff = rho_k * (s_k - u_k) / (s_k - s_star);
    let mut velocity = prim.velocity;
    velocity[axis] = s_star;
    let energy = coeff
        * (cons.energy / rho_k + (s_star - u_k) * (s_star + p_k / (rho_k * (s_k - u_k))));
    Conserved {
        density: coeff,
        momentum: [coeff * velocity[0], coeff * velocity[1], coeff * velocity[2]],
        energy,
        magnetic_field: prim.magnetic_field,
    }
}

fn star_flux(flux_k: &FluxVector, cons_k: &Conserved, star: &Conserved, s_k: f64) -> FluxVector {
    FluxVector {
        density: flux_k.density + s_k * (star.density - cons_k.density),
        momentum: [
            flux_k.momentum[0] + s_k * (star.momentum[0] - cons_k.momentum[0]),
            flux_k.momentum[1] + s_k * (star.momentum[1] - cons_k.momentum[1]),
            flux_k.momentum[2] + s_k * (star.momentum[2] - cons_k.momentum[2]),
        ],
        energy: flux_k.energy + s_k * (star.energy - cons_k.energy),
        // the star-region magnetic state is carried through unchanged
        // (see `flux_of`'s doc comment), so its flux is too.
        magnetic_flux: flux_k.magnetic_flux,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::{HydroLut, MhdLut};

    #[test]
    fn identical_states_yield_the_bulk_flow_flux() {
        let state = Primitive::hydro(1.0, [2.0, 0.0, 0.0], 1.0);
        let (flux, v) = Hllc.solve(&state, &state, 0, 1.4, &HydroLut);
        assert!((v - 2.0).abs() < 1e-12);
        assert!((flux.density - state.density * 2.0).abs() < 1e-12);
        assert_eq!(flux.magnetic_flux, [0.0; 3]);
    }

    #[test]
    fn sod_shock_tube_contact_speed_is_non_negative_into_the_low_pressure_side() {
        // Standard Sod initial data (Toro ch. 4).
        let left = Primitive::hydro(1.0, [0.0, 0.0, 0.0], 1.0);
        let right = Primitive::hydro(0.125, [0.0, 0.0, 0.0], 0.1);
        let (flux, v_interface) = Hllc.solve(&left, &right, 0, 1.4, &HydroLut);
        assert!(v_interface > 0.0);
        assert!(flux.density > 0.0);
    }

    #[test]
    fn mhd_lut_adds_magnetic_pressure_to_the_normal_momentum_flux() {
        // Identical, at-rest states on both sides: the only nonzero
        // contribution to the normal momentum flux is gas pressure plus
        // the magnetic pressure/tension terms `flux_of` adds when the LUT
        // reports a magnetic field.
        let b = [0.5, 0.0, 0.0];
        let state = Primitive { density: 1.0, velocity: [0.0, 0.0, 0.0], pressure: 1.0, magnetic_field: b };
        let (flux, _) = Hllc.solve(&state, &state, 0, 1.4, &MhdLut);
        let expected = 1.0 + 0.5 * 0.25 - 0.5 * 0.5;
        assert!((flux.momentum[0] - expected).abs() < 1e-9);
        assert_eq!(flux.magnetic_flux, [0.0; 3]);
    }

    #[test]
    fn hydro_lut_never_produces_a_magnetic_flux_even_with_a_nonzero_field_set() {
        // A caller that mistakenly populates `magnetic_field` while still
        // using `HydroLut` gets it ignored, not silently multiplied in.
        let b = [0.5, 0.0, 0.0];
        let state = Primitive { density: 1.0, velocity: [1.0, 0.0, 0.0], pressure: 1.0, magnetic_field: b };
        let (flux, _) = Hllc.solve(&state, &state, 0, 1.4, &HydroLut);
        assert_eq!(flux.magnetic_flux, [0.0; 3]);
    }
}
