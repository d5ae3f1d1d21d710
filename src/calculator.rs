use compact_str::{CompactString, ToCompactString};
use thiserror::Error;
use tracing::debug;

use crate::expression::{is_number_text, Expression, Operator, Precedence, Token};
use crate::format::format_result;
use crate::presenter::Presenter;

#[derive(Debug)]
pub struct ExpressionEngine<P> {
    expression: Expression,
    presenter: P,
}

impl<P: Presenter> ExpressionEngine<P> {
    pub fn new(presenter: P) -> Self {
        Self {
            expression: Expression::default(),
            presenter,
        }
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Typing after a result starts a new calculation.
    pub fn append_number(&mut self, text: &str) -> Result<(), EngineError> {
        if !is_number_text(text) {
            return self.publish(Err(EngineError::InvalidNumber));
        }
        if self.expression.has_result() {
            self.expression.clear();
        }
        let outcome = self.expression.push_digits(text);
        self.publish(outcome)
    }

    /// A minus typed where an operand is expected becomes its sign.
    pub fn append_operator(&mut self, op: Operator) -> Result<(), EngineError> {
        if self.expression.has_result() {
            self.expression.clear();
        }

        let outcome = if op == Operator::Sub && self.expression.can_prefix_minus() {
            self.expression.push_prefix_minus();
            Ok(())
        } else if self.expression.can_append_operator() {
            self.expression.push_operator(op);
            Ok(())
        } else {
            Err(EngineError::OperatorAlreadyPresent)
        };
        self.publish(outcome)
    }

    /// Rejections leave the expression untouched and only report the error.
    pub fn evaluate(&mut self) -> Result<(), EngineError> {
        let result = self.control_doability().and_then(|()| {
            let value = reduce(snapshot(&self.expression)?);
            format_result(value).ok_or(EngineError::DivisionByZero)
        });

        match result {
            Ok(formatted) => {
                debug!(result = %formatted, "evaluated");
                self.expression.push_result(formatted);
                self.publish(Ok(()))
            }
            Err(error) => Err(self.reject(error)),
        }
    }

    pub fn clear(&mut self) {
        self.expression.clear();
        let _ = self.publish(Ok(()));
    }

    fn control_doability(&self) -> Result<(), EngineError> {
        if !self.expression.is_well_formed() {
            return Err(EngineError::TrailingOperator);
        }
        if !self.expression.has_enough_tokens() || self.expression.already_evaluated() {
            return Err(EngineError::NewCalculationRequired);
        }
        Ok(())
    }

    fn publish(&mut self, outcome: Result<(), EngineError>) -> Result<(), EngineError> {
        let serialized = self.expression.to_compact_string();
        debug!(expression = %serialized, "operation changed");
        self.presenter.operation_changed(&serialized);
        outcome.map_err(|error| self.reject(error))
    }

    fn reject(&mut self, error: EngineError) -> EngineError {
        debug!(%error, expression = %self.expression, "rejected");
        self.presenter.error(&error);
        error
    }
}

/// Rejections surfaced to the presenter. Two kinds share the operator
/// message but come from different guards.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("an operator is already present")]
    OperatorAlreadyPresent,
    #[error("an operator is already present")]
    TrailingOperator,
    #[error("start a new calculation")]
    NewCalculationRequired,
    #[error("division by zero is not allowed")]
    DivisionByZero,
    #[error("invalid number")]
    InvalidNumber,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Term {
    Number(f64),
    Operator(Operator),
}

fn snapshot(expression: &Expression) -> Result<Vec<Term>, EngineError> {
    expression
        .tokens()
        .iter()
        .map(|token| match token {
            Token::Operand(literal) => literal
                .value()
                .map(Term::Number)
                .ok_or(EngineError::InvalidNumber),
            Token::Operator(op) => Ok(Term::Operator(*op)),
            Token::Equals => unreachable!("evaluating an expression that already has a result"),
        })
        .collect()
}

/// Collapses `×`/`÷` first, then `+`/`-`, each tier left to right.
fn reduce(mut terms: Vec<Term>) -> f64 {
    while let Some(at) = terms.iter().position(
        |term| matches!(term, Term::Operator(op) if op.precedence() == Precedence::High),
    ) {
        collapse(&mut terms, at);
    }
    while terms.len() > 1 {
        collapse(&mut terms, 1);
    }

    match terms.as_slice() {
        [Term::Number(value)] => *value,
        rest => unreachable!("reduction ended with {rest:?}"),
    }
}

fn collapse(terms: &mut Vec<Term>, at: usize) {
    let value = match terms.get(at.wrapping_sub(1)..at + 2) {
        Some(&[Term::Number(l), Term::Operator(op), Term::Number(r)]) => op.apply(l, r),
        window => unreachable!("malformed reduction window at {at}: {window:?}"),
    };
    terms[at - 1] = Term::Number(value);
    terms.drain(at..at + 2);
}
