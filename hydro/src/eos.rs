//! Equation of state interface the Riemann consumer queries (§6).

pub trait EquationOfState {
    fn is_barotropic(&self) -> bool;
    fn isothermal_sound_speed(&self) -> f64;
    fn gamma(&self) -> f64;
    fn sound_speed(&self, density: f64, pressure: f64) -> f64;
    fn eint_from_primitive(&self, density: f64, pressure: f64) -> f64;
}

/// The ideal-gas law, `p = (gamma - 1) * rho * e_int`.
#[derive(Debug, Clone, Copy)]
pub struct IdealGas {
    pub gamma: f64,
}

impl IdealGas {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }
}

impl EquationOfState for IdealGas {
    fn is_barotropic(&self) -> bool {
        false
    }

    fn isothermal_sound_speed(&self) -> f64 {
        f64::NAN
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn sound_speed(&self, density: f64, pressure: f64) -> f64 {
        (self.gamma * pressure / density).sqrt()
    }

    fn eint_from_primitive(&self, density: f64, pressure: f64) -> f64 {
        pressure / ((self.gamma - 1.0) * density)
    }
}

/// An isothermal gas: pressure tracks density through a fixed sound speed
/// rather than an independent energy equation.
#[derive(Debug, Clone, Copy)]
pub struct Isothermal {
    pub sound_speed: f64,
}

impl EquationOfState for Isothermal {
    fn is_barotropic(&self) -> bool {
        true
    }

    fn isothermal_sound_speed(&self) -> f64 {
        self.sound_speed
    }

    fn gamma(&self) -> f64 {
        1.0
    }

    fn sound_speed(&self, _density: f64, _pressure: f64) -> f64 {
        self.sound_speed
    }

    fn eint_from_primitive(&self, _density: f64, _pressure: f64) -> f64 {
        0.0
    }
}
