//! `= < <= > >=`. The relational operators are binary over Numbers; `=`
//! uses the full structural contract in `value::value_eq`, including the
//! List/Vector cross-variant case.

use crate::env::Environment;
use crate::error::MalError;
use crate::value::{value_eq, Value};
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

pub fn eq(args: &[Value]) -> Result<Value, MalError> {
    if args.len() != 2 {
        return Err(MalError::arity("=", "2", args.len()));
    }
    Ok(Value::Bool(value_eq(&args[0], &args[1])))
}

pub fn lt(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers("<", args)?;
    Ok(Value::Bool(a < b))
}

pub fn le(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers("<=", args)?;
    Ok(Value::Bool(a <= b))
}

pub fn gt(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers(">", args)?;
    Ok(Value::Bool(a > b))
}

pub fn ge(args: &[Value]) -> Result<Value, MalError> {
    let (a, b) = binary_numbers(">=", args)?;
    Ok(Value::Bool(a >= b))
}

pub fn register(env: &Rc<Environment>) {
    env.set("=", Value::builtin("=", eq));
    env.set("<", Value::builtin("<", lt));
    env.set("<=", Value::builtin("<=", le));
    env.set(">", Value::builtin(">", gt));
    env.set(">=", Value::builtin(">=", ge));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert!(matches!(lt(&[Value::Number(1), Value::Number(2)]), Ok(Value::Bool(true))));
        assert!(matches!(ge(&[Value::Number(2), Value::Number(2)]), Ok(Value::Bool(true))));
    }

    #[test]
    fn equality_treats_list_and_vector_alike() {
        let list = Value::List(vec![Value::Number(1), Value::Number(2), Value::Number(3)]);
        let vector = Value::Vector(vec![Value::Number(1), Value::Number(2), Value::Number(3)]);
        assert!(matches!(eq(&[list, vector]), Ok(Value::Bool(true))));
    }

    #[test]
    fn empty_list_is_not_equal_to_nil() {
        assert!(matches!(
            eq(&[Value::List(vec![]), Value::Nil]),
            Ok(Value::Bool(false))
        ));
    }

    #[test]
    fn comparisons_reject_non_numbers() {
        assert!(lt(&[Value::Number(1), Value::String("x".into())]).is_err());
    }
}
