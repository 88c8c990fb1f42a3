//! I/O glue: `read-string` and `slurp`.
//!
//! `slurp` goes straight to `std::fs` — the host filesystem is an external
//! collaborator referenced only through its interface (§1), not a subject
//! of this crate's own design.

use std::fs;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::MalError;
use crate::reader;
use crate::value::Value;

pub fn read_string(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("read-string", "1", args.len()));
    }
    let source = match &args[0] {
        Value::String(s) => s,
        other => return Err(MalError::type_error("read-string", "a string", other.type_name())),
    };
    let (value, _remainder) =
        reader::read_str(source).map_err(|e| MalError::ReadError(e.to_string()))?;
    Ok(value)
}

pub fn slurp(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("slurp", "1", args.len()));
    }
    let path = match &args[0] {
        Value::String(s) => s,
        other => return Err(MalError::type_error("slurp", "a string", other.type_name())),
    };
    fs::read_to_string(path)
        .map(Value::String)
        .map_err(|e| MalError::Io(format!("{}: {}", path, e)))
}

pub fn register(env: &Rc<Environment>) {
    env.set("read-string", Value::builtin("read-string", read_string));
    env.set("slurp", Value::builtin("slurp", slurp));
}
