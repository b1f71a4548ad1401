//! Stabilizer-style backend. Out of scope for this implementation: the
//! contract it must satisfy is the [`Simulator`] trait, nothing more. Every
//! operation fails cleanly with `NotImplemented` rather than silently
//! producing wrong results.

use crate::error::Error;
use crate::simulator::{Basis, Simulator};

pub struct CliffordSimulator {
    num_qubits: usize,
}

impl Simulator for CliffordSimulator {
    fn new(num_qubits: usize) -> Self {
        Self { num_qubits }
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn apply_gate(&mut self, name: &str, _qubits: &[usize]) -> Result<(), Error> {
        Err(Error::NotImplemented(format!(
            "clifford backend does not implement gate '{name}'"
        )))
    }

    fn measure(&mut self, _qubit: usize, _basis: Basis) -> Result<u8, Error> {
        Err(Error::NotImplemented(
            "clifford backend does not implement measurement".to_string(),
        ))
    }
}
