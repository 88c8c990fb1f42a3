//! Printing: `pr-str str prn println`.

use crate::env::Environment;
use crate::error::MalError;
use crate::value::{to_readable_string, Value};
use std::rc::Rc;

pub fn pr_str(args: &[Value]) -> Result<Value, MalError> {
    let joined = args
        .iter()
        .map(to_readable_string)
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Value::String(joined))
}

pub fn str_fn(args: &[Value]) -> Result<Value, MalError> {
    let joined = args.iter().map(|v| format!("{}", v)).collect::<String>();
    Ok(Value::String(joined))
}

pub fn prn(args: &[Value]) -> Result<Value, MalError> {
    let joined = args
        .iter()
        .map(to_readable_string)
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", joined);
    Ok(Value::Nil)
}

pub fn println_fn(args: &[Value]) -> Result<Value, MalError> {
    let joined = args
        .iter()
        .map(|v| format!("{}", v))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", joined);
    Ok(Value::Nil)
}

pub fn register(env: &Rc<Environment>) {
    env.set("pr-str", Value::builtin("pr-str", pr_str));
    env.set("str", Value::builtin("str", str_fn));
    env.set("prn", Value::builtin("prn", prn));
    env.set("println", Value::builtin("println", println_fn));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_str_quotes_and_escapes_strings() {
        let result = pr_str(&[Value::String("a\nb".to_string())]).unwrap();
        assert!(matches!(result, Value::String(ref s) if s == "\"a\\nb\""));
    }

    #[test]
    fn str_joins_unreadable_with_no_separator() {
        let result = str_fn(&[Value::String("a".to_string()), Value::String("b".to_string())]).unwrap();
        assert!(matches!(result, Value::String(ref s) if s == "ab"));
    }

    #[test]
    fn pr_str_joins_multiple_args_with_spaces() {
        let result = pr_str(&[Value::Number(1), Value::Number(2)]).unwrap();
        assert!(matches!(result, Value::String(ref s) if s == "1 2"));
    }
}
