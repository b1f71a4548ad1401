//! Dense state-vector simulation backend. Implements the required gate set
//! `i, x, y, z, h, s, sdg, t, cx, cy, cz, swap` over [`StateVector`].

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Error;
use crate::simulator::{Basis, Simulator};
use crate::state::{GateMatrix, StateVector};

const I_MAT: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
];
const X_MAT: GateMatrix = [
    [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
];
const Y_MAT: GateMatrix = [
    [Complex::new(0.0, 0.0), Complex::new(0.0, -1.0)],
    [Complex::new(0.0, 1.0), Complex::new(0.0, 0.0)],
];
const Z_MAT: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(-1.0, 0.0)],
];
const H_MAT: GateMatrix = [
    [
        Complex::new(FRAC_1_SQRT_2, 0.0),
        Complex::new(FRAC_1_SQRT_2, 0.0),
    ],
    [
        Complex::new(FRAC_1_SQRT_2, 0.0),
        Complex::new(-FRAC_1_SQRT_2, 0.0),
    ],
];
const S_MAT: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(0.0, 1.0)],
];
const SDG_MAT: GateMatrix = [
    [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    [Complex::new(0.0, 0.0), Complex::new(0.0, -1.0)],
];

fn t_matrix() -> GateMatrix {
    let phase = Complex::new(0.0, std::f64::consts::FRAC_PI_4).exp();
    [
        [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
        [Complex::new(0.0, 0.0), phase],
    ]
}

pub struct StateVectorSimulator {
    state: StateVector,
    rng: StdRng,
}

impl StateVectorSimulator {
    /// Seeds the internal PRNG deterministically; used by the executor when
    /// the CLI `--seed` flag is supplied.
    pub fn with_seed(num_qubits: usize, seed: u64) -> Self {
        Self {
            state: StateVector::new(num_qubits),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Simulator for StateVectorSimulator {
    fn new(num_qubits: usize) -> Self {
        Self {
            state: StateVector::new(num_qubits),
            rng: StdRng::from_entropy(),
        }
    }

    fn new_seeded(num_qubits: usize, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(num_qubits, seed),
            None => Self::new(num_qubits),
        }
    }

    fn num_qubits(&self) -> usize {
        self.state.num_qubits
    }

    fn apply_gate(&mut self, name: &str, qubits: &[usize]) -> Result<(), Error> {
        match name {
            "i" => {
                self.state.apply_single_qubit_gate(&I_MAT, qubits[0]);
            }
            "x" => self.state.apply_single_qubit_gate(&X_MAT, qubits[0]),
            "y" => self.state.apply_single_qubit_gate(&Y_MAT, qubits[0]),
            "z" => self.state.apply_single_qubit_gate(&Z_MAT, qubits[0]),
            "h" => self.state.apply_single_qubit_gate(&H_MAT, qubits[0]),
            "s" => self.state.apply_single_qubit_gate(&S_MAT, qubits[0]),
            "sdg" => self.state.apply_single_qubit_gate(&SDG_MAT, qubits[0]),
            "t" => self.state.apply_single_qubit_gate(&t_matrix(), qubits[0]),
            "cx" => self
                .state
                .apply_controlled_single_qubit_gate(&X_MAT, qubits[0], qubits[1]),
            "cy" => self
                .state
                .apply_controlled_single_qubit_gate(&Y_MAT, qubits[0], qubits[1]),
            "cz" => self
                .state
                .apply_controlled_single_qubit_gate(&Z_MAT, qubits[0], qubits[1]),
            "swap" => self.state.apply_swap(qubits[0], qubits[1]),
            other => return Err(Error::NotImplemented(format!("unknown gate '{other}'"))),
        }
        Ok(())
    }

    fn measure(&mut self, qubit: usize, basis: Basis) -> Result<u8, Error> {
        match basis {
            Basis::Z => Ok(self.state.measure_qubit_in_z(qubit, &mut self.rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_gate_name_is_not_implemented() {
        let mut sim = StateVectorSimulator::new(1);
        let err = sim.apply_gate("frobnicate", &[0]).unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
    }

    #[test]
    fn x_then_measure_is_deterministic() {
        let mut sim = StateVectorSimulator::with_seed(1, 1);
        sim.apply_gate("x", &[0]).unwrap();
        let bit = sim.measure(0, Basis::Z).unwrap();
        assert_eq!(bit, 1);
    }

    #[test]
    fn cx_entangles_bell_pair() {
        let mut sim = StateVectorSimulator::with_seed(2, 3);
        sim.apply_gate("h", &[0]).unwrap();
        sim.apply_gate("cx", &[0, 1]).unwrap();
        let b0 = sim.measure(0, Basis::Z).unwrap();
        let b1 = sim.measure(1, Basis::Z).unwrap();
        assert_eq!(b0, b1);
    }

    #[test]
    fn measure_all_orders_qubit_zero_as_rightmost_char() {
        let mut sim = StateVectorSimulator::with_seed(2, 9);
        sim.apply_gate("x", &[0]).unwrap();
        let bits = sim.measure_all(Basis::Z).unwrap();
        assert_eq!(bits, "01");
    }
}
