pub mod ast;
pub mod circuit;
pub mod clifford;
pub mod error;
pub mod executor;
pub mod lexer;
pub mod parser;
pub mod register;
pub mod simulator;
pub mod state;
pub mod statevector_backend;
pub mod token;

use std::collections::HashMap;

use clap::ValueEnum;

pub use circuit::Circuit;
pub use error::Error;
pub use simulator::Simulator;

use clifford::CliffordSimulator;
use statevector_backend::StateVectorSimulator;

/// Which backend executes a compiled circuit. Doubles as the CLI's
/// `--backend` flag type via `ValueEnum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    #[value(name = "statevector")]
    StateVector,
    #[value(name = "clifford")]
    Clifford,
}

/// Parses, compiles, and runs `source` against the chosen backend for
/// `shots` shots, returning the classical outcome histogram.
pub fn run_source(
    source: &str,
    backend: BackendKind,
    shots: u32,
    seed: Option<u64>,
) -> Result<HashMap<String, u32>, Error> {
    let circuit = Circuit::from_qasm(source)?;
    match backend {
        BackendKind::StateVector => executor::run::<StateVectorSimulator>(&circuit, shots, seed),
        BackendKind::Clifford => executor::run::<CliffordSimulator>(&circuit, shots, seed),
    }
}
