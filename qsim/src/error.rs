//! Closed error hierarchy. Every failure mode surfaced by the pipeline is a
//! variant here; nothing is swallowed, and diagnostics carry the offending
//! token's textual form where one is available.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QasmSyntaxError {
    #[error("missing equal sign")]
    MissingEqualSign,
    #[error("missing ';' near {found}")]
    MissingSemicolon { found: String },
    #[error("missing identifier near {found}")]
    MissingIdentifier { found: String },
    #[error("missing integer literal near {found}")]
    MissingInteger { found: String },
    #[error("missing real literal near {found}")]
    MissingReal { found: String },
    #[error("malformed expression near {found}")]
    MalformedExpression { found: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QasmIoError {
    #[error("unexpected end of input while expecting {expected}")]
    EndOfCode { expected: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QasmError {
    #[error("unsupported OPENQASM version {0}")]
    UnsupportedVersion(f64),
    #[error("invalid OPENQASM version declaration")]
    InvalidVersion,
    #[error(transparent)]
    Io(#[from] QasmIoError),
    #[error(transparent)]
    Syntax(#[from] QasmSyntaxError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegisterError {
    #[error("index {index} out of bounds for register '{register}' of size {size}")]
    OutOfBounds {
        register: String,
        index: i64,
        size: i64,
    },
    #[error("unknown register '{0}'")]
    Unknown(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircuitError {
    #[error(transparent)]
    Register(#[from] RegisterError),
    #[error("measure operands have mismatched lengths: {qubits} qubit(s) vs {bits} bit(s)")]
    Measure { qubits: usize, bits: usize },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Qasm(#[from] QasmError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RegisterError> for Error {
    fn from(e: RegisterError) -> Self {
        Error::Circuit(CircuitError::Register(e))
    }
}

impl From<QasmSyntaxError> for Error {
    fn from(e: QasmSyntaxError) -> Self {
        Error::Qasm(QasmError::Syntax(e))
    }
}

impl From<QasmIoError> for Error {
    fn from(e: QasmIoError) -> Self {
        Error::Qasm(QasmError::Io(e))
    }
}
