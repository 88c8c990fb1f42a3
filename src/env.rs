//! A chained symbol table. Lookups walk the outer chain; only `set` ever
//! mutates a table, and only the table of the environment it's called on.

use crate::error::MalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    /// A fresh top-level environment with no outer scope.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        })
    }

    /// `make(outer)`: an empty child scope.
    pub fn make(outer: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer),
        })
    }

    /// `make_bound(outer, params, args)`: a child scope with `params` zipped
    /// against `args`. `variadic`, when present, is the name bound to a List
    /// of every argument from the non-variadic prefix's length onward.
    pub fn make_bound(
        outer: Rc<Environment>,
        params: &[String],
        variadic: Option<&str>,
        args: &[Value],
    ) -> Result<Rc<Self>, MalError> {
        if variadic.is_none() && args.len() != params.len() {
            return Err(MalError::arity("fn*", params.len().to_string(), args.len()));
        }
        if variadic.is_some() && args.len() < params.len() {
            return Err(MalError::arity(
                "fn*",
                format!("at least {}", params.len()),
                args.len(),
            ));
        }

        let env = Environment::make(outer);
        for (name, value) in params.iter().zip(args.iter()) {
            env.set(name, value.clone());
        }
        if let Some(rest_name) = variadic {
            let rest = args[params.len()..].to_vec();
            env.set(rest_name, Value::List(rest));
        }
        Ok(env)
    }

    /// `set(env, name, value)`: define or overwrite in this scope only.
    pub fn set(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    /// `find(env, name)`: the nearest enclosing binding, or `None`.
    pub fn find(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.outer.as_ref().and_then(|outer| outer.find(name))
    }

    /// `get(env, name)`: `find`, or *symbol not found*.
    pub fn get(&self, name: &str) -> Result<Value, MalError> {
        self.find(name)
            .ok_or_else(|| MalError::SymbolNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_get() {
        let env = Environment::new();
        env.set("x", Value::Number(42));
        assert!(matches!(env.get("x"), Ok(Value::Number(42))));
    }

    #[test]
    fn undefined_symbol_errors_with_quoted_name() {
        let env = Environment::new();
        match env.get("missing") {
            Err(MalError::SymbolNotFound(name)) => assert_eq!(name, "missing"),
            other => panic!("expected SymbolNotFound, got {:?}", other),
        }
    }

    #[test]
    fn child_shadows_parent() {
        let parent = Environment::new();
        parent.set("x", Value::Number(1));
        let child = Environment::make(parent.clone());
        child.set("x", Value::Number(2));
        assert!(matches!(child.get("x"), Ok(Value::Number(2))));
        assert!(matches!(parent.get("x"), Ok(Value::Number(1))));
    }

    #[test]
    fn child_sees_parent_bindings() {
        let parent = Environment::new();
        parent.set("x", Value::Number(42));
        let child = Environment::make(parent);
        assert!(matches!(child.get("x"), Ok(Value::Number(42))));
    }

    #[test]
    fn three_level_chain() {
        let grandparent = Environment::new();
        grandparent.set("a", Value::Number(1));
        let parent = Environment::make(grandparent);
        parent.set("b", Value::Number(2));
        let child = Environment::make(parent);
        child.set("c", Value::Number(3));

        assert!(matches!(child.get("a"), Ok(Value::Number(1))));
        assert!(matches!(child.get("b"), Ok(Value::Number(2))));
        assert!(matches!(child.get("c"), Ok(Value::Number(3))));
    }

    #[test]
    fn make_bound_zips_params_and_args() {
        let root = Environment::new();
        let env =
            Environment::make_bound(root, &["a".into(), "b".into()], None, &[Value::Number(1), Value::Number(2)])
                .unwrap();
        assert!(matches!(env.get("a"), Ok(Value::Number(1))));
        assert!(matches!(env.get("b"), Ok(Value::Number(2))));
    }

    #[test]
    fn make_bound_rejects_wrong_arity_without_variadic() {
        let root = Environment::new();
        let result = Environment::make_bound(root, &["a".into()], None, &[]);
        assert!(result.is_err());
    }

    #[test]
    fn make_bound_collects_variadic_rest_into_a_list() {
        let root = Environment::new();
        let env = Environment::make_bound(
            root,
            &["a".into()],
            Some("rest"),
            &[Value::Number(1), Value::Number(2), Value::Number(3)],
        )
        .unwrap();
        assert!(matches!(env.get("a"), Ok(Value::Number(1))));
        match env.get("rest") {
            Ok(Value::List(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected a List, got {:?}", other),
        }
    }

    #[test]
    fn let_star_bindings_do_not_leak_into_outer_scope() {
        let outer = Environment::new();
        let inner = Environment::make(outer.clone());
        inner.set("local", Value::Number(9));
        assert!(outer.get("local").is_err());
    }
}
