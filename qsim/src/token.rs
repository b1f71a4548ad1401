//! Lexical token model for the supported OPENQASM 2.0 subset.

/// A single lexical unit. Two tokens are `==` to each other based on variant
/// alone; payload (`Real`, `Integer`, `Id`, `Filename`) is inspected by the
/// parser through pattern matching, not through `PartialEq`.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Illegal(char),
    EndOfFile,

    Real(f64),
    Integer(i64),
    Id(String),
    Filename(String),

    OpenQASM,

    Semicolon,
    Comma,
    LParen,
    RParen,
    LSParen,
    RSParen,
    LCParen,
    RCParen,
    Arrow,
    Equals,
    Plus,
    Minus,
    Times,
    Divide,
    Power,

    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Pi,

    QReg,
    CReg,
    Barrier,
    Gate,
    Measure,
    Reset,
    Include,
    Opaque,
    If,
}

impl Token {
    /// Resolve an identifier against the fixed keyword table, falling back
    /// to a plain `Id`.
    pub fn keyword_or_id(text: String) -> Token {
        match text.as_str() {
            "OPENQASM" => Token::OpenQASM,
            "sin" => Token::Sin,
            "cos" => Token::Cos,
            "tan" => Token::Tan,
            "exp" => Token::Exp,
            "ln" => Token::Ln,
            "sqrt" => Token::Sqrt,
            "pi" => Token::Pi,
            "qreg" => Token::QReg,
            "creg" => Token::CReg,
            "barrier" => Token::Barrier,
            "gate" => Token::Gate,
            "measure" => Token::Measure,
            "reset" => Token::Reset,
            "include" => Token::Include,
            "opaque" => Token::Opaque,
            "if" => Token::If,
            _ => Token::Id(text),
        }
    }

    /// Human-readable rendering used in parser diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Illegal(c) => format!("illegal character '{c}'"),
            Token::EndOfFile => "end of input".to_string(),
            Token::Real(r) => format!("real literal {r}"),
            Token::Integer(i) => format!("integer literal {i}"),
            Token::Id(s) => format!("identifier '{s}'"),
            Token::Filename(s) => format!("filename \"{s}\""),
            Token::OpenQASM => "OPENQASM".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Comma => "','".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::LSParen => "'['".to_string(),
            Token::RSParen => "']'".to_string(),
            Token::LCParen => "'{'".to_string(),
            Token::RCParen => "'}'".to_string(),
            Token::Arrow => "'->'".to_string(),
            Token::Equals => "'=='".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Times => "'*'".to_string(),
            Token::Divide => "'/'".to_string(),
            Token::Power => "'^'".to_string(),
            Token::Sin => "sin".to_string(),
            Token::Cos => "cos".to_string(),
            Token::Tan => "tan".to_string(),
            Token::Exp => "exp".to_string(),
            Token::Ln => "ln".to_string(),
            Token::Sqrt => "sqrt".to_string(),
            Token::Pi => "pi".to_string(),
            Token::QReg => "qreg".to_string(),
            Token::CReg => "creg".to_string(),
            Token::Barrier => "barrier".to_string(),
            Token::Gate => "gate".to_string(),
            Token::Measure => "measure".to_string(),
            Token::Reset => "reset".to_string(),
            Token::Include => "include".to_string(),
            Token::Opaque => "opaque".to_string(),
            Token::If => "if".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_resolves_all_keywords() {
        assert_eq!(Token::keyword_or_id("qreg".into()), Token::QReg);
        assert_eq!(Token::keyword_or_id("creg".into()), Token::CReg);
        assert_eq!(Token::keyword_or_id("measure".into()), Token::Measure);
        assert_eq!(Token::keyword_or_id("if".into()), Token::If);
        assert_eq!(Token::keyword_or_id("pi".into()), Token::Pi);
    }

    #[test]
    fn unrecognized_identifier_stays_id() {
        assert_eq!(Token::keyword_or_id("cx".into()), Token::Id("cx".into()));
    }
}
