//! Expression evaluator.
//!
//! Evaluation is pure with respect to the run: it reads the bindings and
//! queries the world but never mutates either, and it never suspends.

use std::fmt;

use maze_types::program::{ArithOp, CompareOp, Expr};
use maze_world::World;
use serde::{Deserialize, Serialize};

use crate::env::Bindings;
use crate::error::{EvalResult, Fault};

// ══════════════════════════════════════════════════════════════════════════════
// Values
// ══════════════════════════════════════════════════════════════════════════════

/// A run-time value.
///
/// Booleans take part in arithmetic and comparisons as `0`/`1`; integers are
/// truthy when non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
}

impl Value {
    pub fn truthy(self) -> bool {
        match self {
            Value::Bool(b) => b,
            Value::Int(n) => n != 0,
        }
    }

    /// Numeric view of the value.
    pub fn as_int(self) -> i64 {
        match self {
            Value::Bool(b) => i64::from(b),
            Value::Int(n) => n,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Evaluation
// ══════════════════════════════════════════════════════════════════════════════

/// Evaluate `expr` against the current bindings and world.
///
/// `and`/`or` short-circuit and yield the operand that decided the result.
pub fn evaluate(expr: &Expr, bindings: &Bindings, world: &World) -> EvalResult<Value> {
    match expr {
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Int(n) => Ok(Value::Int(*n)),
        Expr::Var { name, line } => bindings.get(name).ok_or_else(|| Fault::UndefinedVariable {
            name: name.clone(),
            line: *line,
        }),
        Expr::Predicate(predicate) => Ok(Value::Bool(world.query(*predicate))),
        Expr::Not(operand) => Ok(Value::Bool(!evaluate(operand, bindings, world)?.truthy())),
        Expr::Neg { operand, line } => {
            let value = evaluate(operand, bindings, world)?.as_int();
            value
                .checked_neg()
                .map(Value::Int)
                .ok_or(Fault::IntegerOverflow { line: *line })
        }
        Expr::And(operands) => {
            let mut result = Value::Bool(true);
            for operand in operands {
                result = evaluate(operand, bindings, world)?;
                if !result.truthy() {
                    break;
                }
            }
            Ok(result)
        }
        Expr::Or(operands) => {
            let mut result = Value::Bool(false);
            for operand in operands {
                result = evaluate(operand, bindings, world)?;
                if result.truthy() {
                    break;
                }
            }
            Ok(result)
        }
        Expr::Compare { left, op, right } => {
            let left = evaluate(left, bindings, world)?;
            let right = evaluate(right, bindings, world)?;
            Ok(Value::Bool(compare(*op, left, right)))
        }
        Expr::Arith {
            left,
            op,
            right,
            line,
        } => {
            let left = evaluate(left, bindings, world)?;
            let right = evaluate(right, bindings, world)?;
            arith(*op, left, right, *line)
        }
    }
}

/// Apply an arithmetic operator with overflow and zero-divisor checks.
pub fn arith(op: ArithOp, left: Value, right: Value, line: u32) -> EvalResult<Value> {
    let (a, b) = (left.as_int(), right.as_int());
    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::FloorDiv | ArithOp::Mod if b == 0 => {
            return Err(Fault::DivisionByZero { line });
        }
        ArithOp::FloorDiv => floor_div(a, b),
        ArithOp::Mod => floor_mod(a, b),
    };
    result
        .map(Value::Int)
        .ok_or(Fault::IntegerOverflow { line })
}

/// Compare numerically; `True == 1`.
pub fn compare(op: CompareOp, left: Value, right: Value) -> bool {
    let (a, b) = (left.as_int(), right.as_int());
    match op {
        CompareOp::Eq => a == b,
        CompareOp::NotEq => a != b,
        CompareOp::Lt => a < b,
        CompareOp::Le => a <= b,
        CompareOp::Gt => a > b,
        CompareOp::Ge => a >= b,
    }
}

/// Division rounding toward negative infinity. `None` on overflow.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Some(quotient - 1)
    } else {
        Some(quotient)
    }
}

/// Remainder with the sign of the divisor, consistent with [`floor_div`].
fn floor_mod(a: i64, b: i64) -> Option<i64> {
    if b == -1 {
        return Some(0);
    }
    let remainder = a.checked_rem(b)?;
    if remainder != 0 && (remainder < 0) != (b < 0) {
        Some(remainder + b)
    } else {
        Some(remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use maze_types::program::Predicate;
    use maze_world::MazeGrid;

    fn world() -> World {
        World::new(Arc::new(MazeGrid::parse("####\n#SG#\n####").unwrap()))
    }

    fn int(n: i64) -> Value {
        Value::Int(n)
    }

    #[test]
    fn test_floor_division_and_modulo_signs() {
        let cases = [
            (7, 2, 3, 1),
            (-7, 2, -4, 1),
            (7, -2, -4, -1),
            (-7, -2, 3, -1),
            (6, 3, 2, 0),
            (-6, 3, -2, 0),
        ];
        for (a, b, q, r) in cases {
            assert_eq!(arith(ArithOp::FloorDiv, int(a), int(b), 1), Ok(int(q)), "{a} // {b}");
            assert_eq!(arith(ArithOp::Mod, int(a), int(b), 1), Ok(int(r)), "{a} % {b}");
        }
    }

    #[test]
    fn test_division_by_zero_and_overflow() {
        assert_eq!(
            arith(ArithOp::FloorDiv, int(1), int(0), 7),
            Err(Fault::DivisionByZero { line: 7 })
        );
        assert_eq!(
            arith(ArithOp::Mod, int(1), Value::Bool(false), 2),
            Err(Fault::DivisionByZero { line: 2 })
        );
        assert_eq!(
            arith(ArithOp::Add, int(i64::MAX), int(1), 3),
            Err(Fault::IntegerOverflow { line: 3 })
        );
        assert_eq!(
            arith(ArithOp::FloorDiv, int(i64::MIN), int(-1), 4),
            Err(Fault::IntegerOverflow { line: 4 })
        );
        assert_eq!(arith(ArithOp::Mod, int(i64::MIN), int(-1), 4), Ok(int(0)));
    }

    #[test]
    fn test_booleans_coerce_in_arithmetic_and_comparison() {
        assert_eq!(
            arith(ArithOp::Add, Value::Bool(true), Value::Bool(true), 1),
            Ok(int(2))
        );
        assert!(compare(CompareOp::Eq, Value::Bool(true), int(1)));
        assert!(compare(CompareOp::Lt, Value::Bool(false), Value::Bool(true)));
        assert!(!int(0).truthy());
        assert!(int(-3).truthy());
    }

    #[test]
    fn test_short_circuit_skips_faulting_operand() {
        let w = world();
        let bindings = Bindings::new();
        let missing = Expr::Var {
            name: "missing".into(),
            line: 1,
        };
        let and = Expr::And(vec![Expr::Bool(false), missing.clone()]);
        assert_eq!(evaluate(&and, &bindings, &w), Ok(Value::Bool(false)));
        let or = Expr::Or(vec![Expr::Predicate(Predicate::PathAhead), missing.clone()]);
        assert_eq!(evaluate(&or, &bindings, &w), Ok(Value::Bool(true)));
        let faulting = Expr::And(vec![Expr::Bool(true), missing]);
        assert_eq!(
            evaluate(&faulting, &bindings, &w),
            Err(Fault::UndefinedVariable {
                name: "missing".into(),
                line: 1
            })
        );
    }

    #[test]
    fn test_bool_ops_yield_deciding_operand() {
        let w = world();
        let mut bindings = Bindings::new();
        bindings.set("n", int(5));
        let or = Expr::Or(vec![
            Expr::Int(0),
            Expr::Var {
                name: "n".into(),
                line: 1,
            },
        ]);
        assert_eq!(evaluate(&or, &bindings, &w), Ok(int(5)));
        let and = Expr::And(vec![Expr::Int(3), Expr::Int(0), Expr::Int(9)]);
        assert_eq!(evaluate(&and, &bindings, &w), Ok(int(0)));
    }

    #[test]
    fn test_predicates_and_negation() {
        let w = world();
        let bindings = Bindings::new();
        let at_goal = Expr::Predicate(Predicate::AtGoal);
        assert_eq!(evaluate(&at_goal, &bindings, &w), Ok(Value::Bool(false)));
        let not_goal = Expr::Not(Box::new(at_goal));
        assert_eq!(evaluate(&not_goal, &bindings, &w), Ok(Value::Bool(true)));
        let neg = Expr::Neg {
            operand: Box::new(Expr::Bool(true)),
            line: 1,
        };
        assert_eq!(evaluate(&neg, &bindings, &w), Ok(int(-1)));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(int(-4).to_string(), "-4");
    }
}
