//! Arithmetic operations: `+ - * / %`.
//!
//! All five are binary over Numbers. `/` and `%` round toward negative
//! infinity (floor division), not toward zero — see DESIGN.md's Open
//! Question decisions.

use crate::env::Environment;
use crate::error::MalError;
use crate::value::Value;
use std::rc::Rc;

fn binary_numbers(name: &str, args: &[Value]) -> Result<(i64, i64), MalError> {
    if args.len() != 2 {
        return Err(MalError::arity(name, "2", args.len()));
    }
    let a = match &args[0] {
        Value::Number(n) => *n,
        other => return Err(MalError::type_error(name, "number", other.type_name())),
    };
    let b = match &args[1] {
        Value::Number(n) => *n,
        other => return Err(MalError::type_error(name, "number", other.type_name())),
    };
    Ok((a, b))
}

fn div_floor(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn mod_floor(a: i64, b: i64) -> i64 {
    a - div_floor(a, b) * b
}

pub fn add(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers("+", args)?;
    Ok(Value::Number(a + b))
}

pub fn sub(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers("-", args)?;
    Ok(Value::Number(a - b))
}

pub fn mul(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers("*", args)?;
    Ok(Value::Number(a * b))
}

pub fn div(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers("/", args)?;
    if b == 0 {
        return Err(MalError::type_error("/", "a non-zero divisor", "0"));
    }
    Ok(Value::Number(div_floor(a, b)))
}

pub fn rem(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers("%", args)?;
    if b == 0 {
        return Err(MalError::type_error("%", "a non-zero divisor", "0"));
    }
    Ok(Value::Number(mod_floor(a, b)))
}

pub fn register(env: &Rc<Environment>) {
    env.set("+", Value::builtin("+", add));
    env.set("-", Value::builtin("-", sub));
    env.set("*", Value::builtin("*", mul));
    env.set("/", Value::builtin("/", div));
    env.set("%", Value::builtin("%", rem));
}
