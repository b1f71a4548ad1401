//! Runs a compiled [`Circuit`] `shots` times against a fresh backend
//! instance per shot, collecting the classical-outcome histogram.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::circuit::{Circuit, Operation};
use crate::error::Error;
use crate::register::Register;
use crate::simulator::{Basis, Simulator};

/// Per-shot classical memory: one `u8` per global classical bit.
struct ClassicalMemory {
    bits: Vec<u8>,
}

impl ClassicalMemory {
    fn new(total_bits: usize) -> Self {
        Self {
            bits: vec![0; total_bits],
        }
    }

    /// Little-endian integer value of a register: its lowest-offset cell is
    /// the least-significant bit.
    fn register_value(&self, reg: &Register) -> i64 {
        let mut value: i64 = 0;
        for local in (0..reg.size).rev() {
            value <<= 1;
            value |= self.bits[reg.offset + local] as i64;
        }
        value
    }

    /// Outcome string for one register: cell 0 is the rightmost character.
    fn register_string(&self, reg: &Register) -> String {
        (0..reg.size)
            .rev()
            .map(|local| char::from(b'0' + self.bits[reg.offset + local]))
            .collect()
    }
}

/// Resolves `If` register lookups and executes one shot end to end.
fn run_shot<S: Simulator>(circuit: &Circuit, backend: &mut S) -> Result<String, Error> {
    let mut memory = ClassicalMemory::new(circuit.total_bits);

    fn exec<S: Simulator>(
        circuit: &Circuit,
        backend: &mut S,
        memory: &mut ClassicalMemory,
        ops: &[Operation],
    ) -> Result<(), Error> {
        for op in ops {
            match op {
                Operation::Apply(name, qubits) => backend.apply_gate(name, qubits)?,
                Operation::Measure(qubit, bit) => {
                    let outcome = backend.measure(*qubit, Basis::Z)?;
                    memory.bits[*bit] = outcome;
                }
                Operation::If(val, creg_name, body) => {
                    let reg = circuit
                        .cregs
                        .get(creg_name)
                        .expect("circuit compiler guarantees known creg names in If");
                    if memory.register_value(reg) == *val {
                        exec(circuit, backend, memory, body)?;
                    }
                }
            }
        }
        Ok(())
    }

    exec(circuit, backend, &mut memory, &circuit.operations)?;

    // Concatenate registers in reverse declaration order; declaration order
    // is the iteration order of offsets ascending, so we sort descending.
    let mut regs: Vec<&Register> = circuit.cregs.values().collect();
    regs.sort_by(|a, b| b.offset.cmp(&a.offset));
    Ok(regs
        .into_iter()
        .map(|r| memory.register_string(r))
        .collect())
}

/// Runs the circuit `shots` times, returning the observed outcome
/// histogram. `seed`, when given, derives each shot's PRNG seed so the run
/// is fully reproducible.
pub fn run<S: Simulator>(
    circuit: &Circuit,
    shots: u32,
    seed: Option<u64>,
) -> Result<HashMap<String, u32>, Error> {
    if shots == 0 {
        return Err(Error::NotImplemented(
            "shots must be at least 1".to_string(),
        ));
    }

    debug!(shots, qubits = circuit.total_qubits, "starting run");
    let mut histogram = HashMap::new();
    for shot in 0..shots {
        let shot_seed = seed.map(|s| s.wrapping_add(shot as u64));
        let mut backend = S::new_seeded(circuit.total_qubits, shot_seed);
        trace!(shot, seed = shot_seed, "executing shot");
        let outcome = run_shot(circuit, &mut backend)?;
        *histogram.entry(outcome).or_insert(0) += 1;
    }
    Ok(histogram)
}

/// Runs the circuit `shots` times across a `std::thread::scope` pool sized
/// to available parallelism, merging each worker's histogram. Shots are
/// independent and pure, so splitting the range across threads changes
/// nothing but wall-clock time: worker `w`'s shots are seeded from the same
/// `seed + global_shot_index` sequence `run` would use single-threaded, so a
/// given `(circuit, shots, seed)` produces the same histogram regardless of
/// how many workers ran it.
pub fn run_parallel<S: Simulator + Send>(
    circuit: &Circuit,
    shots: u32,
    seed: Option<u64>,
) -> Result<HashMap<String, u32>, Error> {
    if shots == 0 {
        return Err(Error::NotImplemented(
            "shots must be at least 1".to_string(),
        ));
    }

    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(shots as usize);

    debug!(shots, workers, "starting parallel run");

    let base = shots / workers as u32;
    let remainder = shots % workers as u32;

    let chunk_results: Vec<Result<HashMap<String, u32>, Error>> = std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        let mut shot_offset: u64 = 0;
        for worker in 0..workers {
            let worker_shots = base + u32::from((worker as u32) < remainder);
            let worker_seed = seed.map(|s| s.wrapping_add(shot_offset));
            shot_offset += worker_shots as u64;
            handles.push(scope.spawn(move || run::<S>(circuit, worker_shots, worker_seed)));
        }
        handles
            .into_iter()
            .map(|h| h.join().expect("simulation worker thread panicked"))
            .collect()
    });

    let mut histogram = HashMap::new();
    for chunk in chunk_results {
        for (outcome, count) in chunk? {
            *histogram.entry(outcome).or_insert(0) += count;
        }
    }
    Ok(histogram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statevector_backend::StateVectorSimulator;

    #[test]
    fn histogram_total_equals_shots() {
        let circuit =
            Circuit::from_qasm("OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\nh q[0];\nmeasure q[0] -> c[0];\n")
                .unwrap();
        let histogram = run::<StateVectorSimulator>(&circuit, 256, Some(11)).unwrap();
        let total: u32 = histogram.values().sum();
        assert_eq!(total, 256);
    }

    #[test]
    fn bell_pair_outcomes_are_correlated() {
        let circuit = Circuit::from_qasm(
            "OPENQASM 2.0;\nqreg q[2];\ncreg c[2];\nh q[0];\ncx q[0],q[1];\nmeasure q[0] -> c[0];\nmeasure q[1] -> c[1];\n",
        )
        .unwrap();
        let histogram = run::<StateVectorSimulator>(&circuit, 200, Some(5)).unwrap();
        for key in histogram.keys() {
            assert!(key == "00" || key == "11", "unexpected outcome {key}");
        }
    }

    #[test]
    fn conditional_application_flips_second_measurement() {
        let circuit = Circuit::from_qasm(
            "OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\nx q[0];\nmeasure q[0] -> c[0];\nif (c==1) x q[0];\nmeasure q[0] -> c[0];\n",
        )
        .unwrap();
        let histogram = run::<StateVectorSimulator>(&circuit, 1, Some(1)).unwrap();
        assert_eq!(histogram.get("0"), Some(&1));
    }

    #[test]
    fn single_shot_is_accepted() {
        let circuit =
            Circuit::from_qasm("OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\nmeasure q[0] -> c[0];\n")
                .unwrap();
        let histogram = run::<StateVectorSimulator>(&circuit, 1, None).unwrap();
        assert_eq!(histogram.values().sum::<u32>(), 1);
    }

    #[test]
    fn zero_shots_is_rejected() {
        let circuit =
            Circuit::from_qasm("OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\n").unwrap();
        let err = run::<StateVectorSimulator>(&circuit, 0, None).unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
    }

    #[test]
    fn run_parallel_matches_single_threaded_histogram_for_same_seed() {
        let circuit = Circuit::from_qasm(
            "OPENQASM 2.0;\nqreg q[2];\ncreg c[2];\nh q[0];\ncx q[0],q[1];\nmeasure q[0] -> c[0];\nmeasure q[1] -> c[1];\n",
        )
        .unwrap();
        let sequential = run::<StateVectorSimulator>(&circuit, 300, Some(42)).unwrap();
        let parallel = run_parallel::<StateVectorSimulator>(&circuit, 300, Some(42)).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn run_parallel_total_equals_shots() {
        let circuit =
            Circuit::from_qasm("OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\nh q[0];\nmeasure q[0] -> c[0];\n")
                .unwrap();
        let histogram = run_parallel::<StateVectorSimulator>(&circuit, 500, Some(3)).unwrap();
        assert_eq!(histogram.values().sum::<u32>(), 500);
    }

    #[test]
    fn run_parallel_rejects_zero_shots() {
        let circuit =
            Circuit::from_qasm("OPENQASM 2.0;\nqreg q[1];\ncreg c[1];\n").unwrap();
        let err = run_parallel::<StateVectorSimulator>(&circuit, 0, None).unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
    }
}
