//! Maths operation dispatcher
//!
//! Maps an operation code plus string operands to exactly one result:
//! a computed `OperationResult` (value or validation error), an
//! unrecognised-operation signal, a request for the fallback page, or
//! notice that a long computation was cancelled. Dispatch never panics.

pub mod ops;
pub mod params;
pub mod result;

pub use result::{OpValue, OperationResult, Outcome, Special};

use std::sync::atomic::AtomicBool;

use crate::http::query::QueryParams;
use params::{parse_integer, parse_number};

/// Supported operations, keyed by their query-string code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulus,
    Factorial,
    IsPrime,
    NthPrime,
}

impl Operation {
    /// Look up an operation by its `op` code
    ///
    /// Addition is a space: `op=+` arrives form-decoded.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            " " => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            "%" => Some(Self::Modulus),
            "!" => Some(Self::Factorial),
            "p" => Some(Self::IsPrime),
            "np" => Some(Self::NthPrime),
            _ => None,
        }
    }

    /// Symbol echoed back in the `op` field
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulus => "%",
            Self::Factorial => "!",
            Self::IsPrime => "p",
            Self::NthPrime => "np",
        }
    }
}

/// Optional bounds on expensive operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Largest `n` accepted by the nth-prime scan (unbounded when `None`)
    pub max_nth_prime: Option<u64>,
}

/// What the endpoint should do with a request
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Operation ran; the record holds a value or a validation error
    Computed(OperationResult),
    /// `op` names no known operation
    InvalidOperation,
    /// No `op` given; serve the example page instead
    Fallback,
    /// `cancelled` was set before a long computation finished
    Cancelled,
}

/// Dispatch a request's parameters to the selected operation
///
/// `cancelled` is polled by the nth-prime scan so an abandoned request
/// releases its thread.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn dispatch(params: &QueryParams, limits: &Limits, cancelled: &AtomicBool) -> Dispatch {
    let Some(code) = params.get("op").filter(|code| !code.is_empty()) else {
        return Dispatch::Fallback;
    };

    let Some(op) = Operation::from_code(code) else {
        return Dispatch::InvalidOperation;
    };

    // Validated `n` is a non-negative integer; the casts saturate past u64
    let computed = match op {
        Operation::Add => Some(evaluate_binary(op, params, ops::add)),
        Operation::Subtract => Some(evaluate_binary(op, params, ops::subtract)),
        Operation::Multiply => Some(evaluate_binary(op, params, ops::multiply)),
        Operation::Divide => Some(evaluate_binary(op, params, ops::divide)),
        Operation::Modulus => Some(evaluate_binary(op, params, ops::modulus)),
        Operation::Factorial => evaluate_unary(op, params, validate_factorial, |n| {
            Some(ops::factorial(n as u64))
        }),
        Operation::IsPrime => evaluate_unary(op, params, validate_is_prime, |n| {
            Some(OpValue::Bool(ops::is_prime_value(n)))
        }),
        Operation::NthPrime => evaluate_unary(
            op,
            params,
            |raw| validate_nth_prime(raw, limits),
            |n| ops::nth_prime(n as u64, cancelled).map(|p| OpValue::Number(p as f64)),
        ),
    };

    computed.map_or(Dispatch::Cancelled, Dispatch::Computed)
}

/// Validate `x` and `y`, then apply `compute`
///
/// Every invalid operand is named in the error, not just the first.
fn evaluate_binary(
    op: Operation,
    params: &QueryParams,
    compute: fn(f64, f64) -> OpValue,
) -> OperationResult {
    let raw_x = params.get("x");
    let raw_y = params.get("y");

    let (x, y) = if op == Operation::Modulus {
        (
            parse_integer(raw_x),
            parse_integer(raw_y).filter(|y| *y != 0.0),
        )
    } else {
        (parse_number(raw_x), parse_number(raw_y))
    };

    let outcome = match (x, y) {
        (Some(x), Some(y)) => Outcome::Value(compute(x, y)),
        (x, y) => {
            let invalid: Vec<&str> = [("x", x.is_none()), ("y", y.is_none())]
                .into_iter()
                .filter_map(|(name, bad)| bad.then_some(name))
                .collect();
            let mut message = format!("Invalid parameters: {}", invalid.join(", "));
            if op == Operation::Modulus {
                message.push_str(". Must be an Integer");
            }
            Outcome::Error(message)
        }
    };

    OperationResult::binary(op.symbol(), raw_x, raw_y, outcome)
}

/// Validate `n`, then apply `compute`; `None` when the computation gave up
fn evaluate_unary<V, C>(
    op: Operation,
    params: &QueryParams,
    validate: V,
    compute: C,
) -> Option<OperationResult>
where
    V: FnOnce(Option<&str>) -> Result<f64, String>,
    C: FnOnce(f64) -> Option<OpValue>,
{
    let raw_n = params.get("n");
    let outcome = match validate(raw_n) {
        Ok(n) => Outcome::Value(compute(n)?),
        Err(message) => Outcome::Error(message),
    };
    Some(OperationResult::unary(op.symbol(), raw_n, outcome))
}

fn validate_factorial(raw: Option<&str>) -> Result<f64, String> {
    parse_integer(raw)
        .filter(|n| *n >= 0.0)
        .ok_or_else(|| "Invalid parameter: n. It must be a non-negative integer.".to_string())
}

fn validate_is_prime(raw: Option<&str>) -> Result<f64, String> {
    parse_integer(raw)
        .filter(|n| *n >= 1.0)
        .ok_or_else(|| "Invalid parameter: n. It must be an integer greater than 0.".to_string())
}

#[allow(clippy::cast_precision_loss)]
fn validate_nth_prime(raw: Option<&str>, limits: &Limits) -> Result<f64, String> {
    let n = parse_integer(raw).filter(|n| *n > 0.0);
    match limits.max_nth_prime {
        Some(max) => n.filter(|n| *n <= max as f64).ok_or_else(|| {
            format!("Invalid parameter: n. It must be a positive integer no greater than {max}.")
        }),
        None => n.ok_or_else(|| "Invalid parameter: n. It must be a positive integer.".to_string()),
    }
}
