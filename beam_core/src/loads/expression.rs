//! Load intensity expressions
//!
//! Free-form intensity written in terms of `x`, parsed once and evaluated by
//! walking the tree. Stored in study files as its source text.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('-' | '+') unary | power
//! power  := atom (('^' | '**') unary)?
//! atom   := number | 'x' | 'pi' | 'e' | name '(' expr ')' | '(' expr ')'
//! ```
//!
//! Powers are right-associative and bind tighter than negation, so
//! `-x^2` is `-(x^2)` and `2^-x` is `2^(-x)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BeamError, BeamResult};

/// Functions callable from an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Log10,
    Sqrt,
    Abs,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Builtin::Sin,
            "cos" => Builtin::Cos,
            "tan" => Builtin::Tan,
            "asin" => Builtin::Asin,
            "acos" => Builtin::Acos,
            "atan" => Builtin::Atan,
            "sinh" => Builtin::Sinh,
            "cosh" => Builtin::Cosh,
            "tanh" => Builtin::Tanh,
            "exp" => Builtin::Exp,
            "ln" | "log" => Builtin::Ln,
            "log10" => Builtin::Log10,
            "sqrt" => Builtin::Sqrt,
            "abs" => Builtin::Abs,
            _ => return None,
        })
    }

    fn apply(self, v: f64) -> f64 {
        match self {
            Builtin::Sin => v.sin(),
            Builtin::Cos => v.cos(),
            Builtin::Tan => v.tan(),
            Builtin::Asin => v.asin(),
            Builtin::Acos => v.acos(),
            Builtin::Atan => v.atan(),
            Builtin::Sinh => v.sinh(),
            Builtin::Cosh => v.cosh(),
            Builtin::Tanh => v.tanh(),
            Builtin::Exp => v.exp(),
            Builtin::Ln => v.ln(),
            Builtin::Log10 => v.log10(),
            Builtin::Sqrt => v.sqrt(),
            Builtin::Abs => v.abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Number(f64),
    Variable,
    Negate(Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
    Call(Builtin, Box<Node>),
}

impl Node {
    fn eval(&self, x: f64) -> f64 {
        match self {
            Node::Number(v) => *v,
            Node::Variable => x,
            Node::Negate(inner) => -inner.eval(x),
            Node::Binary(op, lhs, rhs) => {
                let (l, r) = (lhs.eval(x), rhs.eval(x));
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Pow => l.powf(r),
                }
            }
            Node::Call(func, arg) => func.apply(arg.eval(x)),
        }
    }

    fn first_non_finite_literal(&self) -> Option<f64> {
        match self {
            Node::Number(v) if !v.is_finite() => Some(*v),
            Node::Number(_) | Node::Variable => None,
            Node::Negate(inner) | Node::Call(_, inner) => inner.first_non_finite_literal(),
            Node::Binary(_, lhs, rhs) => lhs
                .first_non_finite_literal()
                .or_else(|| rhs.first_non_finite_literal()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, String> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        match c {
            ' ' | '\t' => {
                i += 1;
                continue;
            }
            '+' => tokens.push((start, Token::Plus)),
            '-' => tokens.push((start, Token::Minus)),
            '/' => tokens.push((start, Token::Slash)),
            '^' => tokens.push((start, Token::Caret)),
            '(' => tokens.push((start, Token::LParen)),
            ')' => tokens.push((start, Token::RParen)),
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    i += 1;
                    tokens.push((start, Token::Caret));
                } else {
                    tokens.push((start, Token::Star));
                }
            }
            c if c.is_ascii_digit() || c == '.' => {
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent only when digits follow, so `2e` stays an error rather than eating `e`
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number '{}' at position {}", text, start))?;
                tokens.push((start, Token::Number(value)));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push((start, Token::Name(name)));
                continue;
            }
            other => return Err(format!("unexpected character '{}' at position {}", other, start)),
        }
        i += 1;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(at, _)| *at)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn expect(&mut self, wanted: Token) -> Result<(), String> {
        let at = self.offset();
        match self.advance() {
            Some(ref t) if *t == wanted => Ok(()),
            Some(t) => Err(format!("expected {:?}, found {:?} at position {}", wanted, t, at)),
            None => Err(format!("expected {:?} at end of input", wanted)),
        }
    }

    fn expr(&mut self) -> Result<Node, String> {
        let mut node = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(node),
            };
            self.pos += 1;
            node = Node::Binary(op, Box::new(node), Box::new(self.term()?));
        }
    }

    fn term(&mut self) -> Result<Node, String> {
        let mut node = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(node),
            };
            self.pos += 1;
            node = Node::Binary(op, Box::new(node), Box::new(self.unary()?));
        }
    }

    fn unary(&mut self) -> Result<Node, String> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Node::Negate(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node, String> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Node::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Node, String> {
        let at = self.offset();
        match self.advance() {
            Some(Token::Number(v)) => Ok(Node::Number(v)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Name(name)) => match name.as_str() {
                "x" => Ok(Node::Variable),
                "pi" => Ok(Node::Number(std::f64::consts::PI)),
                "e" => Ok(Node::Number(std::f64::consts::E)),
                _ => {
                    let func = Builtin::from_name(&name)
                        .ok_or_else(|| format!("unknown name '{}' at position {}", name, at))?;
                    self.expect(Token::LParen)?;
                    let arg = self.expr()?;
                    self.expect(Token::RParen)?;
                    Ok(Node::Call(func, Box::new(arg)))
                }
            },
            Some(t) => Err(format!("unexpected {:?} at position {}", t, at)),
            None => Err("unexpected end of input".to_string()),
        }
    }
}

fn parse(source: &str) -> Result<Node, String> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err("expression is empty".to_string());
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.chars().count(),
    };
    let node = parser.expr()?;
    if parser.pos < parser.tokens.len() {
        return Err(format!("unexpected trailing input at position {}", parser.offset()));
    }
    Ok(node)
}

/// Serialized form of an [`Expression`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionSource {
    pub source: String,
}

/// A parsed intensity expression in `x`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ExpressionSource", into = "ExpressionSource")]
pub struct Expression {
    source: String,
    tree: Node,
}

impl Expression {
    /// Parse `source`, reporting the offending position on failure
    pub fn parse(source: impl Into<String>) -> BeamResult<Self> {
        let source = source.into();
        match parse(&source) {
            Ok(tree) => Ok(Expression { source, tree }),
            Err(reason) => Err(BeamError::validation("function.source", source, reason)),
        }
    }

    /// Source text as written
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate at `x`
    pub fn eval(&self, x: f64) -> f64 {
        self.tree.eval(x)
    }

    /// Reject literals that overflow to infinity, e.g. `1e999`
    pub fn validate(&self, field: &str) -> BeamResult<()> {
        match self.tree.first_non_finite_literal() {
            Some(v) => Err(BeamError::validation(
                format!("{}.source", field),
                self.source.clone(),
                format!("Literal {} is not finite", v),
            )),
            None => Ok(()),
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl TryFrom<ExpressionSource> for Expression {
    type Error = BeamError;

    fn try_from(value: ExpressionSource) -> Result<Self, Self::Error> {
        Expression::parse(value.source)
    }
}

impl From<Expression> for ExpressionSource {
    fn from(value: Expression) -> Self {
        ExpressionSource { source: value.source }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
