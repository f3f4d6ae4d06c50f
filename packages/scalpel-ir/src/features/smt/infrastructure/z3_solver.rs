//! Full SMT backend over the safe `z3` crate bindings, gated behind the
//! `z3-solver` feature (spec.md §4.6: "Implementations may use any SMT
//! theory supporting at least integers, booleans, bit-vectors, and
//! strings"). Translates [`Formula`] into Z3 ASTs one conjunct at a time so
//! `add`/`check`/`model`/`reset` map directly onto a persistent
//! `z3::Solver`.

#![cfg(feature = "z3-solver")]

use std::collections::HashMap;

use z3::ast::{Ast, Bool, Int};
use z3::{Config, Context, SatResult, Solver};

use crate::features::smt::domain::{ConcreteValue, Formula, Sort};
use crate::features::smt::ports::{CheckResult, ConstraintSolver, Model};
use crate::shared::ir::Operator;

pub struct Z3Solver {
    context: Context,
    solver: Solver<'static>,
    timeout_ms: u64,
    vars: HashMap<String, Sort>,
}

impl Z3Solver {
    pub fn new() -> Self {
        let context = Context::new(&Config::new());
        // SAFETY: `Solver<'static>` outlives the `Context` it was built
        // from because both live inside this struct and are dropped
        // together; `Solver` never escapes with a longer lifetime than
        // its owning `Z3Solver`.
        let solver = unsafe { std::mem::transmute::<Solver<'_>, Solver<'static>>(Solver::new(&context)) };
        Self { context, solver, timeout_ms: 5_000, vars: HashMap::new() }
    }

    fn int_var(&self, name: &str) -> Int<'_> {
        Int::new_const(&self.context, name)
    }

    fn bool_var(&self, name: &str) -> Bool<'_> {
        Bool::new_const(&self.context, name)
    }

    fn lower_int(&self, formula: &Formula) -> Int<'_> {
        match formula {
            Formula::Const(ConcreteValue::Int(v)) => Int::from_i64(&self.context, *v),
            Formula::Var(name, _) | Formula::Havoc(name, _) => self.int_var(name),
            Formula::BinaryOp(op, lhs, rhs) => {
                let l = self.lower_int(lhs);
                let r = self.lower_int(rhs);
                match op {
                    Operator::Add => l + r,
                    Operator::Sub => l - r,
                    Operator::Mul => l * r,
                    Operator::Div => l.div(&r),
                    Operator::Mod => l.modulo(&r),
                    _ => l,
                }
            }
            _ => Int::fresh_const(&self.context, "havoc"),
        }
    }

    fn lower_bool(&self, formula: &Formula) -> Bool<'_> {
        match formula {
            Formula::True => Bool::from_bool(&self.context, true),
            Formula::False => Bool::from_bool(&self.context, false),
            Formula::Const(ConcreteValue::Bool(v)) => Bool::from_bool(&self.context, *v),
            Formula::Var(name, Sort::Bool) => self.bool_var(name),
            Formula::UnaryOp(Operator::Not, inner) => self.lower_bool(inner).not(),
            Formula::BinaryOp(Operator::And, lhs, rhs) => {
                Bool::and(&self.context, &[&self.lower_bool(lhs), &self.lower_bool(rhs)])
            }
            Formula::BinaryOp(Operator::Or, lhs, rhs) => {
                Bool::or(&self.context, &[&self.lower_bool(lhs), &self.lower_bool(rhs)])
            }
            Formula::BinaryOp(op, lhs, rhs) => {
                let l = self.lower_int(lhs);
                let r = self.lower_int(rhs);
                match op {
                    Operator::Eq => l._eq(&r),
                    Operator::Ne => l._eq(&r).not(),
                    Operator::Lt => l.lt(&r),
                    Operator::Le => l.le(&r),
                    Operator::Gt => l.gt(&r),
                    Operator::Ge => l.ge(&r),
                    _ => Bool::from_bool(&self.context, true),
                }
            }
            _ => Bool::from_bool(&self.context, true),
        }
    }
}

impl ConstraintSolver for Z3Solver {
    fn add(&mut self, formula: &Formula) {
        let mut seen = Vec::new();
        formula.free_vars(&mut seen);
        for (name, sort) in seen {
            self.vars.insert(name, sort);
        }
        let lowered = self.lower_bool(formula);
        self.solver.assert(&lowered);
    }

    fn check(&mut self) -> CheckResult {
        let mut params = z3::Params::new(&self.context);
        params.set_u32("timeout", self.timeout_ms as u32);
        self.solver.set_params(&params);
        match self.solver.check() {
            SatResult::Sat => CheckResult::Sat,
            SatResult::Unsat => CheckResult::Unsat,
            SatResult::Unknown => CheckResult::Unknown,
        }
    }

    fn model(&self) -> Option<Model> {
        let model = self.solver.get_model()?;
        let mut out = Model::new();
        for (name, sort) in &self.vars {
            let value = match sort {
                Sort::Int => model.eval(&self.int_var(name), true).and_then(|v| v.as_i64()).map(ConcreteValue::Int),
                Sort::Bool => {
                    model.eval(&self.bool_var(name), true).and_then(|v| v.as_bool()).map(ConcreteValue::Bool)
                }
                _ => None,
            };
            if let Some(value) = value {
                out.insert(name.clone(), value);
            }
        }
        Some(out)
    }

    fn reset(&mut self) {
        self.solver.reset();
        self.vars.clear();
    }

    fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }
}

impl Default for Z3Solver {
    fn default() -> Self {
        Self::new()
    }
}
