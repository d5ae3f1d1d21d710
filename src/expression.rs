use std::fmt;

use compact_str::{CompactString, ToCompactString};

use crate::calculator::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Low,
    High,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "×",
            Operator::Div => "÷",
        }
    }

    /// Keypad character for an operator. `*`/`x` and `/` are accepted as
    /// aliases of `×` and `÷`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '×' | '*' | 'x' => Some(Operator::Mul),
            '÷' | '/' => Some(Operator::Div),
            _ => None,
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            Operator::Add | Operator::Sub => Precedence::Low,
            Operator::Mul | Operator::Div => Precedence::High,
        }
    }

    /// IEEE semantics: dividing by zero yields an infinity (or NaN for `0 ÷ 0`).
    pub fn apply(self, l: f64, r: f64) -> f64 {
        match self {
            Operator::Add => l + r,
            Operator::Sub => l - r,
            Operator::Mul => l * r,
            Operator::Div => l / r,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Keypad digits and at most one decimal point.
pub(crate) fn is_number_text(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| c.is_ascii_digit() || c == '.')
        && text.matches('.').count() <= 1
}

/// Operand text as typed, e.g. `12`, `-3.` or a lone `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(CompactString);

impl Literal {
    fn sign() -> Self {
        Literal(Operator::Sub.symbol().to_compact_string())
    }

    /// Lone leading minus, treated as an operator by every guard.
    pub fn is_pending_sign(&self) -> bool {
        self.0 == Operator::Sub.symbol()
    }

    pub fn has_decimal_point(&self) -> bool {
        self.0.contains('.')
    }

    pub fn value(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Operand(Literal),
    Operator(Operator),
    Equals,
}

impl Token {
    fn is_operator_like(&self) -> bool {
        match self {
            Token::Operator(_) => true,
            Token::Operand(literal) => literal.is_pending_sign(),
            Token::Equals => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(literal) => literal.fmt(f),
            Token::Operator(op) => op.fmt(f),
            Token::Equals => f.write_str("="),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    tokens: Vec<Token>,
}

impl Expression {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Operand, operator, operand.
    pub fn has_enough_tokens(&self) -> bool {
        self.tokens.len() >= 3
    }

    pub fn last_is_operator(&self) -> bool {
        self.tokens.last().is_some_and(Token::is_operator_like)
    }

    pub fn can_append_operator(&self) -> bool {
        !self.is_empty() && !self.last_is_operator()
    }

    /// A minus may open a negative operand at the very start or right after
    /// `+`, `×` or `÷`, but never after another minus or a digit.
    pub fn can_prefix_minus(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(Token::Operator(op)) => *op != Operator::Sub,
            Some(_) => false,
        }
    }

    pub fn has_result(&self) -> bool {
        self.tokens.contains(&Token::Equals)
    }

    pub fn already_evaluated(&self) -> bool {
        self.tokens.iter().any(|token| matches!(token, Token::Equals))
    }

    pub fn is_well_formed(&self) -> bool {
        !self.last_is_operator()
    }

    pub(crate) fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Merges digits into the operand being typed.
    pub(crate) fn push_digits(&mut self, text: &str) -> Result<(), EngineError> {
        if !is_number_text(text) {
            return Err(EngineError::InvalidNumber);
        }

        match self.tokens.last_mut() {
            Some(Token::Operand(literal)) => {
                if literal.has_decimal_point() && text.contains('.') {
                    return Err(EngineError::InvalidNumber);
                }
                literal.0.push_str(text);
            }
            _ => self.tokens.push(Token::Operand(Literal(text.to_compact_string()))),
        }
        Ok(())
    }

    pub(crate) fn push_prefix_minus(&mut self) {
        self.tokens.push(Token::Operand(Literal::sign()));
    }

    pub(crate) fn push_operator(&mut self, op: Operator) {
        self.tokens.push(Token::Operator(op));
    }

    pub(crate) fn push_result(&mut self, result: CompactString) {
        self.tokens.push(Token::Equals);
        self.tokens.push(Token::Operand(Literal(result)));
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = self.tokens.iter();
        if let Some(first) = tokens.next() {
            first.fmt(f)?;
        }
        for token in tokens {
            write!(f, " {token}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator(key: &str) -> Option<Operator> {
        let mut chars = key.chars();
        let op = chars.next().and_then(Operator::from_char);
        op.filter(|_| chars.next().is_none())
    }

    fn typed(keys: &[&str]) -> Expression {
        let mut expression = Expression::default();
        for key in keys {
            match operator(key) {
                Some(Operator::Sub) if expression.can_prefix_minus() => {
                    expression.push_prefix_minus();
                }
                Some(op) => expression.push_operator(op),
                None => expression.push_digits(key).unwrap(),
            }
        }
        expression
    }

    #[test]
    fn test_digits_merge_into_operand() {
        let expression = typed(&["1", "2", "+", "3", ".", "5"]);
        assert_eq!(expression.to_string(), "12 + 3.5");
        assert_eq!(expression.tokens().len(), 3);
        assert!(expression.has_enough_tokens());
    }

    #[test]
    fn test_pending_sign_behaves_like_operator() {
        let expression = typed(&["2", "×", "-"]);
        assert_eq!(expression.to_string(), "2 × -");
        assert!(expression.last_is_operator());
        assert!(!expression.is_well_formed());
        assert!(!expression.can_prefix_minus());
        assert!(!expression.can_append_operator());

        let expression = typed(&["2", "×", "-", "5"]);
        assert_eq!(expression.to_string(), "2 × -5");
        assert!(expression.is_well_formed());
    }

    #[test]
    fn test_prefix_minus_guard() {
        assert!(Expression::default().can_prefix_minus());
        assert!(typed(&["2", "+"]).can_prefix_minus());
        assert!(typed(&["2", "÷"]).can_prefix_minus());
        assert!(!typed(&["2", "-"]).can_prefix_minus());
        assert!(!typed(&["2"]).can_prefix_minus());
    }

    #[test]
    fn test_append_operator_guard() {
        assert!(!Expression::default().can_append_operator());
        assert!(typed(&["7"]).can_append_operator());
        assert!(!typed(&["7", "+"]).can_append_operator());
    }

    #[test]
    fn test_second_decimal_point_rejected() {
        let mut expression = typed(&["3", "."]);
        assert_eq!(expression.push_digits("1."), Err(EngineError::InvalidNumber));
        assert_eq!(expression.to_string(), "3.");

        let mut expression = typed(&["3.1", "+"]);
        assert_eq!(expression.push_digits("."), Ok(()));
        assert_eq!(expression.to_string(), "3.1 + .");
    }

    #[test]
    fn test_non_digit_text_rejected() {
        let mut expression = Expression::default();
        assert_eq!(expression.push_digits("1e5"), Err(EngineError::InvalidNumber));
        assert_eq!(expression.push_digits(""), Err(EngineError::InvalidNumber));
        assert_eq!(expression.push_digits("1.2.3"), Err(EngineError::InvalidNumber));
        assert!(expression.is_empty());
    }

    #[test]
    fn test_result_marks_evaluated() {
        let mut expression = typed(&["1", "+", "1"]);
        assert!(!expression.has_result());
        expression.push_result("2".into());
        assert!(expression.has_result());
        assert!(expression.already_evaluated());
        assert_eq!(expression.to_string(), "1 + 1 = 2");
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!(Operator::from_char('x'), Some(Operator::Mul));
        assert_eq!(Operator::from_char('/'), Some(Operator::Div));
        assert_eq!(Operator::from_char('÷'), Some(Operator::Div));
        assert_eq!(Operator::from_char('%'), None);
        assert_eq!(operator("++"), None);
        assert_eq!(Operator::Div.to_string(), "÷");
        assert!(Operator::Mul.precedence() > Operator::Sub.precedence());
    }
}
