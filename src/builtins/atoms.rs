//! Mutable reference cells: `atom atom? deref reset! swap!`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::env::Environment;
use crate::error::MalError;
use crate::eval::eval;
use crate::value::{Callable, Value};

pub fn atom(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("atom", "1", args.len()));
    }
    Ok(Value::Atom(Rc::new(RefCell::new(args[0].clone()))))
}

pub fn atom_p(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("atom?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Atom(_))))
}

pub fn deref(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 1 {
        return Err(MalError::arity("deref", "1", args.len()));
    }
    match &args[0] {
        Value::Atom(cell) => Ok(cell.borrow().clone()),
        other => Err(MalError::type_error("deref", "an atom", other.type_name())),
    }
}

pub fn reset(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 2 {
        return Err(MalError::arity("reset!", "2", args.len()));
    }
    match &args[0] {
        Value::Atom(cell) => {
            *cell.borrow_mut() = args[1].clone();
            Ok(args[1].clone())
        }
        other => Err(MalError::type_error("reset!", "an atom", other.type_name())),
    }
}

/// `(swap! atom fn args...)`: applies `fn` to the atom's current value
/// followed by `args`, stores and returns the result. Accepts either a
/// primitive or a user closure as `fn`.
pub fn swap(args: &[Value]) -> Result<Value, MalError> {
    if args.len() < 2 {
        return Err(MalError::arity("swap!", "at least 2", args.len()));
    }
    let cell = match &args[0] {
        Value::Atom(cell) => cell,
        other => return Err(MalError::type_error("swap!", "an atom", other.type_name())),
    };

    let mut call_args = Vec::with_capacity(args.len() - 1);
    call_args.push(cell.borrow().clone());
    call_args.extend(args[2..].iter().cloned());

    let result = match &args[1] {
        Value::Callable(Callable::Builtin { func, .. }) => func(&call_args)?,
        Value::Callable(Callable::Closure(closure)) => {
            let call_env = Environment::make_bound(
                closure.env.clone(),
                &closure.params,
                closure.variadic.as_deref(),
                &call_args,
            )?;
            eval(closure.body.clone(), call_env)?
        }
        other => return Err(MalError::type_error("swap!", "a function", other.type_name())),
    };

    *cell.borrow_mut() = result.clone();
    Ok(result)
}

pub fn register(env: &Rc<Environment>) {
    env.set("atom", Value::builtin("atom", atom));
    env.set("atom?", Value::builtin("atom?", atom_p));
    env.set("deref", Value::builtin("deref", deref));
    env.set("reset!", Value::builtin("reset!", reset));
    env.set("swap!", Value::builtin("swap!", swap));
}
