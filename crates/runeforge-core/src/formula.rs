//! Arithmetic formula evaluation
//!
//! Effect parameters are frequently written as small formulas over the
//! trigger's variables, e.g. `"damage * (0.15 + {level} * 0.1)"`. The language
//! is deliberately tiny:
//!
//! - numerals, `+ - * /` and parentheses
//! - `{level}` and bare variable names, replaced textually before evaluation
//! - `*` and `/` bind tighter than `+` and `-`; both groups reduce left to right
//! - a `-` directly after a digit is subtraction, anywhere else it is the sign
//!   of the numeral that follows
//!
//! Anything that does not reduce to a single finite numeral evaluates to `0.0`.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::trace;

/// Numeric variables visible to a formula, substituted in insertion order
pub type Variables = IndexMap<String, f64>;

/// Reasons a formula collapses to zero; never surfaced to callers
#[derive(Error, Debug, Clone, PartialEq)]
enum FormulaError {
    #[error("unbalanced parentheses")]
    Unbalanced,

    #[error("missing operand around '{0}'")]
    MissingOperand(char),

    #[error("not a number: '{0}'")]
    NotANumber(String),

    #[error("result is not finite")]
    NotFinite,
}

/// Evaluate `formula` against `vars`
///
/// Never fails: malformed input yields `0.0`.
pub fn evaluate(formula: &str, vars: &Variables) -> f64 {
    let expr = substitute(formula, vars);
    match reduce(expr) {
        Ok(value) => value,
        Err(err) => {
            trace!(formula, %err, "formula evaluated to zero");
            0.0
        }
    }
}

/// Replace `{level}` and then every variable name with its numeral, dropping whitespace
fn substitute(formula: &str, vars: &Variables) -> String {
    let mut expr = formula.to_string();
    if let Some(level) = vars.get("level") {
        expr = expr.replace("{level}", &numeral(*level));
    }
    for (name, value) in vars {
        if !name.is_empty() {
            expr = expr.replace(name.as_str(), &numeral(*value));
        }
    }
    expr.retain(|c| !c.is_whitespace());
    expr
}

fn numeral(value: f64) -> String {
    format!("{}", value)
}

/// Resolve innermost parentheses first, then the flat remainder
fn reduce(mut expr: String) -> Result<f64, FormulaError> {
    while let Some(open) = expr.rfind('(') {
        let close = expr[open..]
            .find(')')
            .map(|offset| open + offset)
            .ok_or(FormulaError::Unbalanced)?;
        let inner = reduce_flat(&expr[open + 1..close])?;
        expr.replace_range(open..=close, &numeral(inner));
    }
    if expr.contains(')') {
        return Err(FormulaError::Unbalanced);
    }
    reduce_flat(&expr)
}

fn reduce_flat(expr: &str) -> Result<f64, FormulaError> {
    let mut expr = expr.to_string();
    reduce_operators(&mut expr, &['*', '/'])?;
    reduce_operators(&mut expr, &['+', '-'])?;
    parse_numeral(&expr)
}

/// Repeatedly fold the leftmost binary operator from `ops` until none remain
fn reduce_operators(expr: &mut String, ops: &[char]) -> Result<(), FormulaError> {
    while let Some(at) = find_operator(expr, ops) {
        let bytes = expr.as_bytes();
        let op = bytes[at] as char;

        let mut start = at;
        while start > 0 && is_numeral_byte(bytes[start - 1]) {
            start -= 1;
        }
        if start > 0 && bytes[start - 1] == b'-' && (start == 1 || !is_numeral_byte(bytes[start - 2])) {
            start -= 1;
        }

        let mut end = at + 1;
        if end < bytes.len() && bytes[end] == b'-' {
            end += 1;
        }
        while end < bytes.len() && is_numeral_byte(bytes[end]) {
            end += 1;
        }

        if start == at || end == at + 1 {
            return Err(FormulaError::MissingOperand(op));
        }
        let lhs = parse_numeral(&expr[start..at])?;
        let rhs = parse_numeral(&expr[at + 1..end])?;
        let value = match op {
            '*' => lhs * rhs,
            '/' => lhs / rhs,
            '+' => lhs + rhs,
            _ => lhs - rhs,
        };
        if !value.is_finite() {
            return Err(FormulaError::NotFinite);
        }
        expr.replace_range(start..end, &numeral(value));
    }
    Ok(())
}

/// Position of the leftmost operator from `ops` that acts as a binary operator
fn find_operator(expr: &str, ops: &[char]) -> Option<usize> {
    let bytes = expr.as_bytes();
    (0..bytes.len()).find(|&i| {
        let c = bytes[i] as char;
        if !ops.contains(&c) {
            return false;
        }
        match c {
            '+' | '-' => i > 0 && bytes[i - 1].is_ascii_digit(),
            _ => true,
        }
    })
}

fn is_numeral_byte(b: u8) -> bool {
    b.is_ascii_digit() || b == b'.'
}

fn parse_numeral(s: &str) -> Result<f64, FormulaError> {
    let value: f64 = s
        .parse()
        .map_err(|_| FormulaError::NotANumber(s.to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NotFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, f64)]) -> Variables {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_level_formula() {
        assert_eq!(evaluate("3.0 + {level} * 1.0", &vars(&[("level", 2.0)])), 5.0);
        assert_eq!(evaluate("{level}", &vars(&[("level", 3.0)])), 3.0);
        assert_eq!(evaluate("{level} - 1", &vars(&[("level", 1.0)])), 0.0);
    }

    #[test]
    fn test_precedence_and_associativity() {
        let empty = Variables::new();
        assert_eq!(evaluate("1 + 2 * 3", &empty), 7.0);
        assert_eq!(evaluate("10 - 4 - 3", &empty), 3.0);
        assert_eq!(evaluate("12 / 3 / 2", &empty), 2.0);
        assert_eq!(evaluate("2 * 3 + 4 * 5", &empty), 26.0);
        assert_eq!(evaluate("(1 + 2) * 3", &empty), 9.0);
        assert_eq!(evaluate("2 * ((1 + 1) * (3 - 1))", &empty), 8.0);
    }

    #[test]
    fn test_negative_numerals() {
        let empty = Variables::new();
        assert_eq!(evaluate("-3 + 5", &empty), 2.0);
        assert_eq!(evaluate("2 * -3", &empty), -6.0);
        assert_eq!(evaluate("5 - -3", &empty), 8.0);
        assert_eq!(evaluate("1 - 2 * 3", &empty), -5.0);
        assert_eq!(evaluate("2 * -3 + 1", &empty), -5.0);
        assert_eq!(evaluate("0 - (2 + 3)", &empty), -5.0);
        // A negative variable substitutes as a signed numeral
        assert_eq!(evaluate("damage * 2", &vars(&[("damage", -1.5)])), -3.0);
    }

    #[test]
    fn test_variables() {
        let v = vars(&[("level", 3.0), ("damage", 8.0), ("maxHealth", 20.0)]);
        assert_eq!(evaluate("damage * 0.25", &v), 2.0);
        assert_eq!(evaluate("damage * (0.15 + {level} * 0.1)", &v), 8.0 * (0.15 + 3.0 * 0.1));
        assert_eq!(evaluate("maxHealth / 4", &v), 5.0);
        assert_eq!(evaluate("8 + {level} * 4", &v), 20.0);
    }

    #[test]
    fn test_malformed_is_zero() {
        let empty = Variables::new();
        assert_eq!(evaluate("abc", &empty), 0.0);
        assert_eq!(evaluate("(1+2", &empty), 0.0);
        assert_eq!(evaluate("1+2)", &empty), 0.0);
        assert_eq!(evaluate("", &empty), 0.0);
        assert_eq!(evaluate("()", &empty), 0.0);
        assert_eq!(evaluate("3 *", &empty), 0.0);
        assert_eq!(evaluate("* 3", &empty), 0.0);
        assert_eq!(evaluate("1 / 0", &empty), 0.0);
        // Unknown variable stays as text
        assert_eq!(evaluate("damage * 2", &empty), 0.0);
        // {level} without a level variable
        assert_eq!(evaluate("{level} + 1", &empty), 0.0);
    }

    #[test]
    fn test_plain_numeral() {
        let empty = Variables::new();
        assert_eq!(evaluate("0.80", &empty), 0.8);
        assert_eq!(evaluate("  42 ", &empty), 42.0);
    }
}
