//! `SymbolicValue` variants (spec.md §3 "Symbolic State").

use serde::{Deserialize, Serialize};

use crate::features::smt::domain::{ConcreteValue, Formula, Sort};
use crate::shared::ir::Operator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SymbolicValue {
    Concrete(ConcreteValue),
    Symbolic(String, Sort),
    Expr(Operator, Vec<SymbolicValue>),
}

impl SymbolicValue {
    pub fn concrete_int(value: i64) -> Self {
        SymbolicValue::Concrete(ConcreteValue::Int(value))
    }

    pub fn symbolic(name: impl Into<String>, sort: Sort) -> Self {
        SymbolicValue::Symbolic(name.into(), sort)
    }

    /// Best-effort sort inference — the IR carries no static types, so a
    /// fresh symbolic introduced without further context defaults to
    /// [`Sort::Int`] (spec.md §4.6 O3: calls beyond `max_depth_calls` are
    /// havocked to "a fresh symbolic of the declared or inferred sort";
    /// absent a type system, `Int` is the inferred sort).
    pub fn sort(&self) -> Sort {
        match self {
            SymbolicValue::Concrete(c) => c.sort(),
            SymbolicValue::Symbolic(_, sort) => sort.clone(),
            SymbolicValue::Expr(op, operands) => match op {
                Operator::Eq
                | Operator::Ne
                | Operator::Lt
                | Operator::Le
                | Operator::Gt
                | Operator::Ge
                | Operator::And
                | Operator::Or
                | Operator::Not
                | Operator::In
                | Operator::Is => Sort::Bool,
                _ => operands.first().map(|o| o.sort()).unwrap_or(Sort::Int),
            },
        }
    }

    /// Lowers to the constraint-language [`Formula`] the solver consumes.
    pub fn to_formula(&self) -> Formula {
        match self {
            SymbolicValue::Concrete(c) => Formula::Const(c.clone()),
            SymbolicValue::Symbolic(name, sort) => Formula::Var(name.clone(), sort.clone()),
            SymbolicValue::Expr(op, operands) => match operands.as_slice() {
                [a] => Formula::UnaryOp(*op, Box::new(a.to_formula())),
                [a, b] => Formula::BinaryOp(*op, Box::new(a.to_formula()), Box::new(b.to_formula())),
                _ => Formula::True,
            },
        }
    }
}
