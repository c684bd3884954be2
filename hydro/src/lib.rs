pub mod consumer;
pub mod eos;
pub mod error;
pub mod riemann;
pub mod variables;

pub use consumer::{FluxConsumer, InterfaceResult};
pub use eos::{EquationOfState, IdealGas, Isothermal};
pub use error::{Error, Result};
pub use riemann::{Conserved, FluxVector, Hllc, Primitive, RiemannSolver};
pub use variables::{HydroLut, MhdLut, Physics, VariableLut};
