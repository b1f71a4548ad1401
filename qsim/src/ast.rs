//! Parse-time instruction tree produced by [`crate::parser::Parser`].

/// A reference to a register or a single element of one. `idx == -1` means
/// "the whole register".
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterArg {
    pub id: String,
    pub idx: i64,
}

impl RegisterArg {
    pub fn whole(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            idx: -1,
        }
    }

    pub fn indexed(id: impl Into<String>, idx: i64) -> Self {
        Self { id: id.into(), idx }
    }

    pub fn is_whole(&self) -> bool {
        self.idx < 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateApplication {
    pub name: String,
    /// Non-empty only when the stub parameter-expression extension is
    /// exercised; presently always empty (see `Parser::parse_params`).
    pub params: Vec<()>,
    pub args: Vec<RegisterArg>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    QReg { id: String, size: i64 },
    CReg { id: String, size: i64 },
    Barrier { arg: RegisterArg },
    Reset { arg: RegisterArg },
    Measure { q: RegisterArg, c: RegisterArg },
    ApplyGate(GateApplication),
    Gate {
        name: String,
        params: Vec<String>,
        args: Vec<String>,
        body: Vec<GateApplication>,
    },
    Opaque {
        name: String,
        params: Vec<String>,
        args: Vec<String>,
    },
    Include { filename: String },
    If {
        creg_name: String,
        val: i64,
        body: GateApplication,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub version: f64,
    pub instructions: Vec<Instruction>,
}
