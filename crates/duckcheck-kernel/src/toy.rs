//! Toy candidate objects for conformance fixtures.
//!
//! Each toy is built against the math interface
//! `{ add: [numOne, numTwo], subtract: [numOne, numTwo] }` and exercises one
//! lookup or arity situation.
//!
//! ## Objects
//!
//! - **with_extra_functions**: own `add`, `subtract` and an undeclared
//!   `multiply`. Conforms.
//! - **on_prototype**: instance whose prototype defines `add` and
//!   `subtract`. Conforms.
//! - **on_superclass_prototype**: instance of a sub-prototype that adds
//!   `multiply`; `add`/`subtract` live one level further up. Conforms.
//! - **misspelled**: `addd` instead of `add`. Missing function.
//! - **extra_params**: `add` declared with three parameters.
//! - **missing_params**: `subtract` declared with one parameter.
//! - **not_a_function**: `add` is a number.
//! - **empty**: no members at all.

use crate::definition::InterfaceDefinition;
use crate::error::{CallError, DefinitionError};
use crate::object::{Callable, Object, Prototype};
use serde_json::{Value, json};

/// Every toy name accepted by [`get_object`].
pub const OBJECT_NAMES: &[&str] = &[
    "with_extra_functions",
    "on_prototype",
    "on_superclass_prototype",
    "misspelled",
    "extra_params",
    "missing_params",
    "not_a_function",
    "empty",
];

/// Get a toy object by name (matching fixture "object" field).
pub fn get_object(name: &str) -> Option<Object> {
    match name {
        "with_extra_functions" => Some(
            Object::new()
                .with("add", add())
                .with("subtract", subtract())
                .with("multiply", multiply()),
        ),
        "on_prototype" => Some(Object::instance_of(&math_prototype())),
        "on_superclass_prototype" => {
            let sub = Prototype::extends(&math_prototype());
            sub.set("multiply", multiply());
            Some(Object::instance_of(&sub))
        }
        "misspelled" => Some(
            Object::new()
                .with("addd", add())
                .with("subtract", subtract()),
        ),
        "extra_params" => Some(
            Object::new()
                .with("add", add_three())
                .with("subtract", subtract()),
        ),
        "missing_params" => Some(
            Object::new()
                .with("add", add())
                .with("subtract", identity()),
        ),
        "not_a_function" => Some(
            Object::new()
                .with("add", json!(2))
                .with("subtract", subtract()),
        ),
        "empty" => Some(Object::new()),
        _ => None,
    }
}

/// The interface every toy is written against.
pub fn math_interface() -> Result<InterfaceDefinition, DefinitionError> {
    InterfaceDefinition::new()
        .with_function("add", ["numOne", "numTwo"])?
        .with_function("subtract", ["numOne", "numTwo"])
}

/// A prototype carrying `add` and `subtract`, like a class body.
pub fn math_prototype() -> Prototype {
    let proto = Prototype::new();
    proto.set("add", add());
    proto.set("subtract", subtract());
    proto
}

fn number(args: &[Value], index: usize, function: &str) -> Result<f64, CallError> {
    let arg = args.get(index).ok_or_else(|| CallError::MissingArgument {
        function: function.to_string(),
        index,
    })?;
    arg.as_f64().ok_or(CallError::ArgumentType {
        index,
        expected: "number",
    })
}

pub fn add() -> Callable {
    Callable::new(2, |args| {
        Ok(json!(number(args, 0, "add")? + number(args, 1, "add")?))
    })
}

pub fn subtract() -> Callable {
    Callable::new(2, |args| {
        Ok(json!(
            number(args, 0, "subtract")? - number(args, 1, "subtract")?
        ))
    })
}

pub fn multiply() -> Callable {
    Callable::new(2, |args| {
        Ok(json!(
            number(args, 0, "multiply")? * number(args, 1, "multiply")?
        ))
    })
}

pub fn identity() -> Callable {
    Callable::new(1, |args| Ok(args.first().cloned().unwrap_or(Value::Null)))
}

pub fn add_three() -> Callable {
    Callable::new(3, |args| {
        let sum = number(args, 0, "add")? + number(args, 1, "add")? + number(args, 2, "add")?;
        Ok(json!(sum))
    })
}
