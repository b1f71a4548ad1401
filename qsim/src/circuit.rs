//! Compiles a parsed [`Program`] into a flat [`Circuit`]: registers resolved
//! to global indices, whole-register applications expanded via Cartesian
//! product, conditional bodies compiled inline.

use std::collections::HashMap;

use tracing::debug;

use crate::ast::{GateApplication, Instruction, Program, RegisterArg};
use crate::error::{CircuitError, Error, RegisterError};
use crate::parser::parse_program;
use crate::register::{Register, RegisterKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Apply(String, Vec<usize>),
    Measure(usize, usize),
    If(i64, String, Vec<Operation>),
}

#[derive(Debug, Clone)]
pub struct Circuit {
    pub qregs: HashMap<String, Register>,
    pub cregs: HashMap<String, Register>,
    pub total_qubits: usize,
    pub total_bits: usize,
    pub operations: Vec<Operation>,
}

impl Circuit {
    pub fn from_qasm(source: &str) -> Result<Circuit, Error> {
        let program = parse_program(source)?;
        Circuit::compile(&program)
    }

    pub fn compile(program: &Program) -> Result<Circuit, Error> {
        debug!(
            instructions = program.instructions.len(),
            "starting compilation"
        );
        let mut qregs: HashMap<String, Register> = HashMap::new();
        let mut cregs: HashMap<String, Register> = HashMap::new();
        let mut total_qubits = 0usize;
        let mut total_bits = 0usize;

        for instr in &program.instructions {
            match instr {
                Instruction::QReg { id, size } => {
                    let size = *size as usize;
                    qregs.insert(
                        id.clone(),
                        Register::new(id.clone(), size, RegisterKind::Quantum, total_qubits),
                    );
                    total_qubits += size;
                }
                Instruction::CReg { id, size } => {
                    let size = *size as usize;
                    cregs.insert(
                        id.clone(),
                        Register::new(id.clone(), size, RegisterKind::Classical, total_bits),
                    );
                    total_bits += size;
                }
                _ => {}
            }
        }

        let mut operations = Vec::new();
        for instr in &program.instructions {
            match instr {
                Instruction::QReg { .. } | Instruction::CReg { .. } => {}
                Instruction::ApplyGate(app) => {
                    operations.extend(compile_apply(app, &qregs)?);
                }
                Instruction::Measure { q, c } => {
                    operations.extend(compile_measure(q, c, &qregs, &cregs)?);
                }
                Instruction::If {
                    creg_name,
                    val,
                    body,
                } => {
                    if !cregs.contains_key(creg_name) {
                        return Err(RegisterError::Unknown(creg_name.clone()).into());
                    }
                    let body_ops = compile_apply(body, &qregs)?;
                    operations.push(Operation::If(*val, creg_name.clone(), body_ops));
                }
                Instruction::Barrier { .. } => {
                    return Err(Error::NotImplemented("barrier".to_string()));
                }
                Instruction::Reset { .. } => {
                    return Err(Error::NotImplemented("reset".to_string()));
                }
                Instruction::Gate { .. } => {
                    return Err(Error::NotImplemented(
                        "user-defined gate bodies are not executed".to_string(),
                    ));
                }
                Instruction::Opaque { .. } => {
                    return Err(Error::NotImplemented("opaque declarations".to_string()));
                }
                Instruction::Include { .. } => {
                    return Err(Error::NotImplemented("include".to_string()));
                }
            }
        }

        debug!(
            total_qubits,
            total_bits,
            operations = operations.len(),
            "finished compilation"
        );
        Ok(Circuit {
            qregs,
            cregs,
            total_qubits,
            total_bits,
            operations,
        })
    }
}

/// Resolves a single register argument to the tuple of global indices it
/// denotes: a singleton for an indexed reference, the full contiguous range
/// for a whole-register reference.
fn resolve_indices(
    arg: &RegisterArg,
    registers: &HashMap<String, Register>,
) -> Result<Vec<usize>, RegisterError> {
    let reg = registers
        .get(&arg.id)
        .ok_or_else(|| RegisterError::Unknown(arg.id.clone()))?;
    if arg.is_whole() {
        Ok((reg.offset..reg.offset + reg.size).collect())
    } else {
        let idx = arg.idx;
        if idx < 0 || idx as usize >= reg.size {
            return Err(RegisterError::OutOfBounds {
                register: arg.id.clone(),
                index: idx,
                size: reg.size as i64,
            });
        }
        Ok(vec![reg.offset + idx as usize])
    }
}

/// Cartesian product of the per-argument index tuples, realizing OPENQASM's
/// broadcast rule for gate applications over whole registers.
fn cartesian_product(columns: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut result: Vec<Vec<usize>> = vec![Vec::new()];
    for column in columns {
        let mut next = Vec::with_capacity(result.len() * column.len());
        for prefix in &result {
            for &value in column {
                let mut row = prefix.clone();
                row.push(value);
                next.push(row);
            }
        }
        result = next;
    }
    result
}

fn compile_apply(
    app: &GateApplication,
    qregs: &HashMap<String, Register>,
) -> Result<Vec<Operation>, Error> {
    let mut columns = Vec::with_capacity(app.args.len());
    for arg in &app.args {
        columns.push(resolve_indices(arg, qregs)?);
    }
    let rows = cartesian_product(&columns);
    Ok(rows
        .into_iter()
        .map(|indices| Operation::Apply(app.name.clone(), indices))
        .collect())
}

fn compile_measure(
    q: &RegisterArg,
    c: &RegisterArg,
    qregs: &HashMap<String, Register>,
    cregs: &HashMap<String, Register>,
) -> Result<Vec<Operation>, Error> {
    let qubits = resolve_indices(q, qregs)?;
    let bits = resolve_indices(c, cregs)?;
    if qubits.len() != bits.len() {
        return Err(CircuitError::Measure {
            qubits: qubits.len(),
            bits: bits.len(),
        }
        .into());
    }
    Ok(qubits
        .into_iter()
        .zip(bits)
        .map(|(q, b)| Operation::Measure(q, b))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_global_offsets_for_multiple_registers() {
        let circuit = Circuit::from_qasm(
            "OPENQASM 2.0;\nqreg a[2];\nqreg b[3];\ncreg c[2];\nx a[1];\nx b[2];\n",
        )
        .unwrap();
        assert_eq!(circuit.total_qubits, 5);
        assert_eq!(circuit.total_bits, 2);
        assert_eq!(
            circuit.operations,
            vec![
                Operation::Apply("x".into(), vec![1]),
                Operation::Apply("x".into(), vec![4]),
            ]
        );
    }

    #[test]
    fn broadcast_expands_to_cartesian_product() {
        let circuit =
            Circuit::from_qasm("OPENQASM 2.0;\nqreg q[3];\ncreg c[3];\nx q;\nmeasure q -> c;\n")
                .unwrap();
        assert_eq!(
            circuit.operations[0..3].to_vec(),
            vec![
                Operation::Apply("x".into(), vec![0]),
                Operation::Apply("x".into(), vec![1]),
                Operation::Apply("x".into(), vec![2]),
            ]
        );
    }

    #[test]
    fn out_of_bounds_index_is_rejected() {
        let err = Circuit::from_qasm("OPENQASM 2.0;\nqreg q[2];\nx q[5];\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Circuit(CircuitError::Register(RegisterError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn barrier_is_not_implemented_at_compile_time() {
        let err = Circuit::from_qasm("OPENQASM 2.0;\nqreg q[1];\nbarrier q[0];\n").unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
    }
}
