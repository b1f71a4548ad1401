//! Dense state-vector representation and the unitary/measurement primitives
//! the [`crate::statevector_backend::StateVectorSimulator`] is built from.
//!
//! The amplitude vector is never exposed outside the crate: this module
//! backs a simulation backend, not an inspection API.

use num_complex::Complex;
use rand::Rng;

pub type GateMatrix = [[Complex<f64>; 2]; 2];

#[derive(Clone, Debug)]
pub struct StateVector {
    pub(crate) num_qubits: usize,
    pub(crate) amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    pub fn new(num_qubits: usize) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex::new(0.0, 0.0); size];
        amplitudes[0] = Complex::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    pub fn reset(&mut self) {
        for amp in &mut self.amplitudes {
            *amp = Complex::new(0.0, 0.0);
        }
        self.amplitudes[0] = Complex::new(1.0, 0.0);
    }

    /// Applies a single-qubit unitary in place via the index-pair trick:
    /// iterate basis states where `target`'s bit is 0, updating each paired
    /// amplitude together. O(2^n) rather than the O(8^n) of an explicit
    /// Kronecker-product multiply.
    pub fn apply_single_qubit_gate(&mut self, gate: &GateMatrix, target: usize) {
        assert!(target < self.num_qubits, "qubit out of range");
        let k = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if (i & k) == 0 {
                let j = i | k;
                let amp_i = self.amplitudes[i];
                let amp_j = self.amplitudes[j];
                self.amplitudes[i] = gate[0][0] * amp_i + gate[0][1] * amp_j;
                self.amplitudes[j] = gate[1][0] * amp_i + gate[1][1] * amp_j;
            }
        }
    }

    /// Applies a single-qubit unitary on `target`, conditioned on `control`
    /// being 1. Precondition: `control != target` (a programming error, not
    /// a recoverable condition).
    pub fn apply_controlled_single_qubit_gate(
        &mut self,
        gate: &GateMatrix,
        control: usize,
        target: usize,
    ) {
        assert!(control != target, "control and target must differ");
        assert!(control < self.num_qubits && target < self.num_qubits);
        let control_mask = 1usize << control;
        let target_mask = 1usize << target;
        for i in 0..self.amplitudes.len() {
            if (i & control_mask) != 0 && (i & target_mask) == 0 {
                let j = i | target_mask;
                let amp_i = self.amplitudes[i];
                let amp_j = self.amplitudes[j];
                self.amplitudes[i] = gate[0][0] * amp_i + gate[0][1] * amp_j;
                self.amplitudes[j] = gate[1][0] * amp_i + gate[1][1] * amp_j;
            }
        }
    }

    pub fn apply_swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let mask_a = 1usize << a;
        let mask_b = 1usize << b;
        for i in 0..self.amplitudes.len() {
            let bit_a = (i & mask_a) != 0;
            let bit_b = (i & mask_b) != 0;
            if bit_a && !bit_b {
                let j = (i & !mask_a) | mask_b;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Z-basis projective measurement of `qubit`: samples a branch weighted
    /// by amplitude-squared sums, zeroes the other branch, renormalizes.
    pub fn measure_qubit_in_z<R: Rng + ?Sized>(&mut self, qubit: usize, rng: &mut R) -> u8 {
        assert!(qubit < self.num_qubits, "qubit out of range");
        let stride = 1usize << qubit;

        let mut p1 = 0.0f64;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if (i & stride) != 0 {
                p1 += amp.norm_sqr();
            }
        }

        let r: f64 = rng.r#gen();
        let outcome = if r < p1 { 1u8 } else { 0u8 };

        let p_keep = if outcome == 1 { p1 } else { 1.0 - p1 };
        let norm = if p_keep > 0.0 { p_keep.sqrt() } else { 1.0 };

        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let bit = ((i & stride) != 0) as u8;
            if bit != outcome {
                *amp = Complex::new(0.0, 0.0);
            } else {
                *amp /= norm;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    const H: GateMatrix = [
        [
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(FRAC_1_SQRT_2, 0.0),
        ],
        [
            Complex::new(FRAC_1_SQRT_2, 0.0),
            Complex::new(-FRAC_1_SQRT_2, 0.0),
        ],
    ];
    const X: GateMatrix = [
        [Complex::new(0.0, 0.0), Complex::new(1.0, 0.0)],
        [Complex::new(1.0, 0.0), Complex::new(0.0, 0.0)],
    ];

    fn norm(state: &StateVector) -> f64 {
        state.amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }

    #[test]
    fn initializes_to_all_zero() {
        let state = StateVector::new(3);
        assert_eq!(state.amplitudes.len(), 8);
        assert_abs_diff_eq!(state.amplitudes[0].re, 1.0, epsilon = 1e-9);
        for amp in &state.amplitudes[1..] {
            assert_abs_diff_eq!(amp.norm_sqr(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn hadamard_then_measure_preserves_norm() {
        let mut state = StateVector::new(1);
        state.apply_single_qubit_gate(&H, 0);
        assert_abs_diff_eq!(norm(&state), 1.0, epsilon = 1e-9);

        let mut rng = StdRng::seed_from_u64(7);
        state.measure_qubit_in_z(0, &mut rng);
        assert_abs_diff_eq!(norm(&state), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn measurement_collapse_is_deterministic_after_first_read() {
        let mut state = StateVector::new(1);
        state.apply_single_qubit_gate(&H, 0);
        let mut rng = StdRng::seed_from_u64(42);
        let first = state.measure_qubit_in_z(0, &mut rng);
        let second = state.measure_qubit_in_z(0, &mut rng);
        assert_eq!(first, second);
    }

    #[test]
    fn x_is_self_inverse() {
        let mut state = StateVector::new(1);
        state.apply_single_qubit_gate(&X, 0);
        state.apply_single_qubit_gate(&X, 0);
        assert_abs_diff_eq!(state.amplitudes[0].re, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.amplitudes[1].norm_sqr(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn controlled_not_flips_target_only_when_control_set() {
        let mut state = StateVector::new(2);
        state.apply_single_qubit_gate(&X, 0);
        state.apply_controlled_single_qubit_gate(&X, 0, 1);
        // |00> -X(q0)-> |01> wait: our bit0 is qubit0; index 1 = q0 set.
        // after CX(control=0,target=1): index 1 -> index 3
        assert_abs_diff_eq!(state.amplitudes[3].re, 1.0, epsilon = 1e-9);
    }
}
