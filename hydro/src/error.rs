use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("solver diverged: {detail}")]
    SolverDivergence { detail: String },

    #[error("solver failed to converge after {iterations} iterations (residual {residual:e}, tolerance {tolerance:e})")]
    NonConvergence { iterations: u32, residual: f64, tolerance: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
