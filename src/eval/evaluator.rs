use thiserror::Error;

use crate::domain::VariableLookup;
use crate::expression::SyntaxNode;
use crate::tokenizer::Operator;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("NaN obtained during computation at node '{node}'")]
    NotANumber { node: String },
    #[error("Division by zero at node '{node}'")]
    DivisionByZero { node: String },
    #[error("Undefined result (0/0) at node '{node}'")]
    ZeroOverZero { node: String },
    #[error("Invalid variable '{0}'")]
    UnknownVariable(String),
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Tree-walking evaluator bound to one variable layout.
pub struct Evaluator<'a, L: VariableLookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: VariableLookup + ?Sized> Evaluator<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    /// Evaluates `node` against one tuple. Children are evaluated left then
    /// right before the operator's own checks run.
    pub fn evaluate(&self, node: &SyntaxNode, tuple: &[f64]) -> EvalResult<f64> {
        match node {
            SyntaxNode::Constant(value) => Ok(*value),
            SyntaxNode::Variable(name) => self
                .lookup
                .variable_index(name)
                .and_then(|i| tuple.get(i).copied())
                .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
            SyntaxNode::BinaryOp { op, left, right } => {
                let left_val = self.evaluate(left, tuple)?;
                let right_val = self.evaluate(right, tuple)?;
                Self::eval_binary_op(node, *op, left_val, right_val)
            }
        }
    }

    fn eval_binary_op(node: &SyntaxNode, op: Operator, left: f64, right: f64) -> EvalResult<f64> {
        if left.is_nan() || right.is_nan() {
            return Err(EvalError::NotANumber {
                node: node.to_string(),
            });
        }
        if op == Operator::Divide && right == 0.0 {
            return Err(if left == 0.0 {
                EvalError::ZeroOverZero {
                    node: node.to_string(),
                }
            } else {
                EvalError::DivisionByZero {
                    node: node.to_string(),
                }
            });
        }
        let value = op.apply(left, right);
        // e.g. a negative base under a fractional power, or inf - inf
        if value.is_nan() {
            return Err(EvalError::NotANumber {
                node: node.to_string(),
            });
        }
        Ok(value)
    }
}
