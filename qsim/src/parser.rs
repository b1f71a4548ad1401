//! Single-token-lookahead recursive-descent parser turning a [`Lexer`] token
//! stream into a [`Program`].

use tracing::debug;

use crate::ast::{GateApplication, Instruction, Program, RegisterArg};
use crate::error::{Error, QasmIoError, QasmSyntaxError};
use crate::lexer::Lexer;
use crate::token::Token;

pub struct Parser {
    lexer: Lexer,
    current: Token,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, Error> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn advance(&mut self) -> Result<Token, Error> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect_semicolon(&mut self) -> Result<(), Error> {
        if matches!(self.current, Token::EndOfFile) {
            return Err(QasmIoError::EndOfCode {
                expected: "';'".to_string(),
            }
            .into());
        }
        match self.current {
            Token::Semicolon => {
                self.advance()?;
                Ok(())
            }
            _ => Err(QasmSyntaxError::MissingSemicolon {
                found: self.current.describe(),
            }
            .into()),
        }
    }

    fn expect(&mut self, expected: Token, describe: &str) -> Result<(), Error> {
        if matches!(self.current, Token::EndOfFile) && expected != Token::EndOfFile {
            return Err(QasmIoError::EndOfCode {
                expected: describe.to_string(),
            }
            .into());
        }
        if self.current == expected {
            self.advance()?;
            Ok(())
        } else {
            Err(QasmSyntaxError::MalformedExpression {
                found: self.current.describe(),
            }
            .into())
        }
    }

    fn expect_id(&mut self) -> Result<String, Error> {
        if matches!(self.current, Token::EndOfFile) {
            return Err(QasmIoError::EndOfCode {
                expected: "identifier".to_string(),
            }
            .into());
        }
        match self.advance()? {
            Token::Id(s) => Ok(s),
            other => Err(QasmSyntaxError::MissingIdentifier {
                found: other.describe(),
            }
            .into()),
        }
    }

    fn expect_integer(&mut self) -> Result<i64, Error> {
        if matches!(self.current, Token::EndOfFile) {
            return Err(QasmIoError::EndOfCode {
                expected: "integer".to_string(),
            }
            .into());
        }
        match self.advance()? {
            Token::Integer(n) => Ok(n),
            other => Err(QasmSyntaxError::MissingInteger {
                found: other.describe(),
            }
            .into()),
        }
    }

    fn expect_real(&mut self) -> Result<f64, Error> {
        if matches!(self.current, Token::EndOfFile) {
            return Err(QasmIoError::EndOfCode {
                expected: "real number".to_string(),
            }
            .into());
        }
        match self.advance()? {
            Token::Real(r) => Ok(r),
            Token::Integer(i) => Ok(i as f64),
            other => Err(QasmSyntaxError::MissingReal {
                found: other.describe(),
            }
            .into()),
        }
    }

    /// `'[' integer ']'` — the declaration-size suffix on `qreg`/`creg`.
    fn parse_size(&mut self) -> Result<i64, Error> {
        self.expect(Token::LSParen, "'['")?;
        let n = self.expect_integer()?;
        self.expect(Token::RSParen, "']'")?;
        Ok(n)
    }

    /// `id ('[' integer ']')?`
    fn parse_register_arg(&mut self) -> Result<RegisterArg, Error> {
        let id = self.expect_id()?;
        if self.current == Token::LSParen {
            let idx = self.parse_size()?;
            Ok(RegisterArg::indexed(id, idx))
        } else {
            Ok(RegisterArg::whole(id))
        }
    }

    /// Parses a gate's optional parenthesized parameter list. An empty list
    /// is accepted; a non-empty one is a deliberate, explicit extension
    /// point (see module docs on math expressions) and fails cleanly rather
    /// than mis-consuming tokens the way a silently-stubbed expression
    /// reader would.
    fn parse_param_list(&mut self) -> Result<Vec<()>, Error> {
        if self.current != Token::LParen {
            return Ok(Vec::new());
        }
        self.advance()?;
        if self.current == Token::RParen {
            self.advance()?;
            return Ok(Vec::new());
        }
        Err(Error::NotImplemented(
            "gate parameter expressions are not supported".to_string(),
        ))
    }

    fn parse_arg_list(&mut self) -> Result<Vec<RegisterArg>, Error> {
        let mut args = vec![self.parse_register_arg()?];
        while self.current == Token::Comma {
            self.advance()?;
            args.push(self.parse_register_arg()?);
        }
        Ok(args)
    }

    fn parse_id_list(&mut self) -> Result<Vec<String>, Error> {
        let mut ids = vec![self.expect_id()?];
        while self.current == Token::Comma {
            self.advance()?;
            ids.push(self.expect_id()?);
        }
        Ok(ids)
    }

    /// `name ('(' params? ')')? args ';'`
    fn parse_gate_application(&mut self, name: String) -> Result<GateApplication, Error> {
        let params = self.parse_param_list()?;
        let args = self.parse_arg_list()?;
        self.expect_semicolon()?;
        Ok(GateApplication { name, params, args })
    }

    fn parse_instruction(&mut self) -> Result<Instruction, Error> {
        match self.current.clone() {
            Token::QReg => {
                self.advance()?;
                let id = self.expect_id()?;
                let size = self.parse_size()?;
                self.expect_semicolon()?;
                Ok(Instruction::QReg { id, size })
            }
            Token::CReg => {
                self.advance()?;
                let id = self.expect_id()?;
                let size = self.parse_size()?;
                self.expect_semicolon()?;
                Ok(Instruction::CReg { id, size })
            }
            Token::Barrier => {
                self.advance()?;
                let arg = self.parse_register_arg()?;
                self.expect_semicolon()?;
                Ok(Instruction::Barrier { arg })
            }
            Token::Reset => {
                self.advance()?;
                let arg = self.parse_register_arg()?;
                self.expect_semicolon()?;
                Ok(Instruction::Reset { arg })
            }
            Token::Measure => {
                self.advance()?;
                let q = self.parse_register_arg()?;
                self.expect(Token::Arrow, "'->'")?;
                let c = self.parse_register_arg()?;
                self.expect_semicolon()?;
                Ok(Instruction::Measure { q, c })
            }
            Token::Include => {
                self.advance()?;
                match self.advance()? {
                    Token::Filename(filename) => {
                        self.expect_semicolon()?;
                        Ok(Instruction::Include { filename })
                    }
                    other => Err(QasmSyntaxError::MalformedExpression {
                        found: other.describe(),
                    }
                    .into()),
                }
            }
            Token::Opaque => {
                self.advance()?;
                let name = self.expect_id()?;
                let params = self.parse_optional_id_param_list()?;
                let args = self.parse_id_list()?;
                self.expect_semicolon()?;
                Ok(Instruction::Opaque { name, params, args })
            }
            Token::Gate => {
                self.advance()?;
                let name = self.expect_id()?;
                let params = self.parse_optional_id_param_list()?;
                let args = self.parse_id_list()?;
                self.expect(Token::LCParen, "'{'")?;
                let mut body = Vec::new();
                while self.current != Token::RCParen {
                    if matches!(self.current, Token::EndOfFile) {
                        return Err(QasmIoError::EndOfCode {
                            expected: "'}'".to_string(),
                        }
                        .into());
                    }
                    let gate_name = self.expect_id()?;
                    body.push(self.parse_gate_application(gate_name)?);
                }
                self.expect(Token::RCParen, "'}'")?;
                Ok(Instruction::Gate {
                    name,
                    params,
                    args,
                    body,
                })
            }
            Token::If => {
                self.advance()?;
                self.expect(Token::LParen, "'('")?;
                let creg_name = self.expect_id()?;
                self.expect(Token::Equals, "'=='")?;
                let val = self.expect_integer()?;
                self.expect(Token::RParen, "')'")?;
                let gate_name = self.expect_id()?;
                let body = self.parse_gate_application(gate_name)?;
                Ok(Instruction::If {
                    creg_name,
                    val,
                    body,
                })
            }
            Token::Id(name) => {
                self.advance()?;
                Ok(Instruction::ApplyGate(self.parse_gate_application(name)?))
            }
            other => Err(QasmSyntaxError::MalformedExpression {
                found: other.describe(),
            }
            .into()),
        }
    }

    /// `('(' id_list? ')')?` — used by `gate`/`opaque` declarations, which
    /// take bare identifiers rather than value expressions as parameters.
    fn parse_optional_id_param_list(&mut self) -> Result<Vec<String>, Error> {
        if self.current != Token::LParen {
            return Ok(Vec::new());
        }
        self.advance()?;
        let params = if self.current == Token::RParen {
            Vec::new()
        } else {
            self.parse_id_list()?
        };
        self.expect(Token::RParen, "')'")?;
        Ok(params)
    }

    /// Parses the whole program: header, then a sequence of instructions.
    pub fn parse(&mut self) -> Result<Program, Error> {
        debug!("starting parsing");
        self.expect(Token::OpenQASM, "OPENQASM")?;
        let version = match self.current.clone() {
            Token::Real(_) | Token::Integer(_) => self.expect_real()?,
            _ => return Err(crate::error::QasmError::InvalidVersion.into()),
        };
        self.expect_semicolon()?;
        if (version - 2.0).abs() > f64::EPSILON {
            return Err(crate::error::QasmError::UnsupportedVersion(version).into());
        }

        let mut instructions = Vec::new();
        while self.current != Token::EndOfFile {
            instructions.push(self.parse_instruction()?);
        }
        debug!(instructions = instructions.len(), "finished parsing");
        Ok(Program {
            version,
            instructions,
        })
    }
}

/// Convenience entry point mirroring the teacher crate's free-function style.
pub fn parse_program(source: &str) -> Result<Program, Error> {
    Parser::new(source)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    #[test]
    fn parses_header_and_registers() {
        let prog = parse_program("OPENQASM 2.0;\nqreg q[2];\ncreg c[2];\n").unwrap();
        assert_eq!(prog.version, 2.0);
        assert_eq!(
            prog.instructions,
            vec![
                Instruction::QReg {
                    id: "q".into(),
                    size: 2
                },
                Instruction::CReg {
                    id: "c".into(),
                    size: 2
                },
            ]
        );
    }

    #[test]
    fn parses_gate_application_and_measure() {
        let prog = parse_program(
            "OPENQASM 2.0;\nqreg q[2];\ncreg c[2];\nh q[0];\ncx q[0],q[1];\nmeasure q -> c;\n",
        )
        .unwrap();
        assert_eq!(
            prog.instructions[2],
            Instruction::ApplyGate(GateApplication {
                name: "h".into(),
                params: vec![],
                args: vec![RegisterArg::indexed("q", 0)],
            })
        );
        assert_eq!(
            prog.instructions[3],
            Instruction::ApplyGate(GateApplication {
                name: "cx".into(),
                params: vec![],
                args: vec![RegisterArg::indexed("q", 0), RegisterArg::indexed("q", 1)],
            })
        );
        assert_eq!(
            prog.instructions[4],
            Instruction::Measure {
                q: RegisterArg::whole("q"),
                c: RegisterArg::whole("c"),
            }
        );
    }

    #[test]
    fn parses_conditional_application() {
        let prog =
            parse_program("OPENQASM 2.0;\ncreg c[1];\nqreg q[1];\nif (c==1) x q[0];\n").unwrap();
        assert_eq!(
            prog.instructions[2],
            Instruction::If {
                creg_name: "c".into(),
                val: 1,
                body: GateApplication {
                    name: "x".into(),
                    params: vec![],
                    args: vec![RegisterArg::indexed("q", 0)],
                },
            }
        );
    }

    #[test]
    fn rejects_version_3() {
        let err = parse_program("OPENQASM 3.0;\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Qasm(crate::error::QasmError::UnsupportedVersion(v)) if v == 3.0
        ));
    }

    #[test]
    fn missing_semicolon_is_reported() {
        let err = parse_program("OPENQASM 2.0;\nqreg q[1]\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Qasm(crate::error::QasmError::Syntax(
                QasmSyntaxError::MissingSemicolon { .. }
            ))
        ));
    }

    #[test]
    fn non_empty_gate_params_are_not_implemented() {
        let err = parse_program("OPENQASM 2.0;\nqreg q[1];\nrx(1.57) q[0];\n").unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
    }

    #[test]
    fn truncated_input_reports_end_of_code() {
        let err = parse_program("OPENQASM 2.0;\nqreg q").unwrap_err();
        assert!(matches!(
            err,
            Error::Qasm(crate::error::QasmError::Io(QasmIoError::EndOfCode { .. }))
        ));
    }

    #[test]
    fn lone_equal_sign_reports_missing_equal_sign() {
        let err = parse_program("OPENQASM 2.0;\ncreg c[1];\nqreg q[1];\nif (c=1) x q[0];\n")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Qasm(crate::error::QasmError::Syntax(
                QasmSyntaxError::MissingEqualSign
            ))
        ));
    }
}
