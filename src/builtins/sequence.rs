//! Sequence operations: `list list? empty? count car cdr cons`.
//!
//! `car`/`cdr` operate on Lists only, not Vectors — §9's resolved Open
//! Question. `cons` is not in the literal pre-defined-symbols table but is
//! included alongside its car/cdr siblings; see DESIGN.md.

use crate::env::Environment;
use crate::error::MalError;
use crate::value::Value;
use std::rc::Rc;

pub fn list(args: &[Value]) -> Result<Value, MalError> {
    Ok(Value::List(args.to_vec()))
}

pub fn list_p(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("list?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::List(_))))
}

pub fn empty_p(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("empty?", "1", args.len()));
    }
    match args[0].as_sequence() {
        Some(items) => Ok(Value::Bool(items.is_empty())),
        None => Err(MalError::type_error(
            "empty?",
            "a list or vector",
            args[0].type_name(),
        )),
    }
}

pub fn count(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("count", "1", args.len()));
    }
    match &args[0] {
        Value::Nil => Ok(Value::Number(0)),
        other => match other.as_sequence() {
            Some(items) => Ok(Value::Number(items.len() as i64)),
            None => Err(MalError::type_error(
                "count",
                "a list, vector, or nil",
                other.type_name(),
            )),
        },
    }
}

pub fn car(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("car", "1", args.len()));
    }
    match &args[0] {
        Value::List(items) if !items.is_empty() => Ok(items[0].clone()),
        Value::List(_) => Err(MalError::type_error("car", "a non-empty list", "()")),
        other => Err(MalError::type_error("car", "a list", other.type_name())),
    }
}

pub fn cdr(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("cdr", "1", args.len()));
    }
    match &args[0] {
        Value::List(items) if !items.is_empty() => Ok(Value::List(items[1..].to_vec())),
        Value::List(_) => Err(MalError::type_error("cdr", "a non-empty list", "()")),
        other => Err(MalError::type_error("cdr", "a list", other.type_name())),
    }
}

pub fn cons(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 2 {
        return Err(MalError::arity("cons", "2", args.len()));
    }
    match &args[1] {
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len() + 1);
            out.push(args[0].clone());
            out.extend(items.iter().cloned());
            Ok(Value::List(out))
        }
        other => Err(MalError::type_error("cons", "a list", other.type_name())),
    }
}

pub fn register(env: &Rc<Environment>) {
    env.set("list", Value::builtin("list", list));
    env.set("list?", Value::builtin("list?", list_p));
    env.set("empty?", Value::builtin("empty?", empty_p));
    env.set("count", Value::builtin("count", count));
    env.set("car", Value::builtin("car", car));
    env.set("cdr", Value::builtin("cdr", cdr));
    env.set("cons", Value::builtin("cons", cons));
}
