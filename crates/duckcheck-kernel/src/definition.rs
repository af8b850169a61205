//! Interface definitions: named functions with declared parameter lists.
//!
//! A definition maps each function name to an ordered list of parameter
//! names. The names are labels for diagnostics; only their count is
//! checked. Function order is preserved exactly as declared because it
//! fixes the order of diagnostic messages.
//!
//! The literal shape matches what callers write by hand:
//!
//! ```json
//! { "add": ["numOne", "numTwo"], "subtract": ["numOne", "numTwo"] }
//! ```

use crate::error::DefinitionError;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// One function of an interface: its name and declared parameter names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSignature {
    name: String,
    params: Vec<String>,
}

impl FunctionSignature {
    /// Parameter names are labels only; any strings are accepted.
    pub fn new<N, I, P>(name: N, params: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))
    }
}

/// An ordered set of function signatures that a candidate must provide.
///
/// Function names are unique within a definition. Definitions are never
/// mutated by the conformance operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceDefinition {
    functions: Vec<FunctionSignature>,
}

impl InterfaceDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`InterfaceDefinition::insert`].
    pub fn with_function<N, I, P>(mut self, name: N, params: I) -> Result<Self, DefinitionError>
    where
        N: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.insert(FunctionSignature::new(name, params))?;
        Ok(self)
    }

    /// Append a signature. Fails if a function of the same name exists.
    pub fn insert(&mut self, signature: FunctionSignature) -> Result<(), DefinitionError> {
        if self.get(signature.name()).is_some() {
            return Err(DefinitionError::invalid(format!(
                "duplicate function `{}` in interface definition",
                signature.name()
            )));
        }
        self.functions.push(signature);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.functions.iter().find(|sig| sig.name == name)
    }

    /// Signatures in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FunctionSignature> {
        self.functions.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(|sig| sig.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl<'a> IntoIterator for &'a InterfaceDefinition {
    type Item = &'a FunctionSignature;
    type IntoIter = std::slice::Iter<'a, FunctionSignature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<&Value> for InterfaceDefinition {
    type Error = DefinitionError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value.as_object().ok_or_else(|| {
            DefinitionError::invalid(format!(
                "interface definition must be a mapping of function name to parameter names, got {}",
                json_kind(value)
            ))
        })?;

        let mut definition = Self::new();
        for (name, params) in map {
            let items = params.as_array().ok_or_else(|| {
                DefinitionError::invalid(format!(
                    "parameters of `{name}` must be a list of names, got {}",
                    json_kind(params)
                ))
            })?;
            let names = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    item.as_str().ok_or_else(|| {
                        DefinitionError::invalid(format!(
                            "parameter {index} of `{name}` must be a string, got {}",
                            json_kind(item)
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            definition.insert(FunctionSignature::new(name.as_str(), names))?;
        }
        Ok(definition)
    }
}

impl TryFrom<Value> for InterfaceDefinition {
    type Error = DefinitionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

impl Serialize for InterfaceDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.functions.len()))?;
        for sig in &self.functions {
            map.serialize_entry(&sig.name, &sig.params)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for InterfaceDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DefinitionVisitor)
    }
}

/// Visits entries in document order so declaration order survives parsing.
struct DefinitionVisitor;

impl<'de> Visitor<'de> for DefinitionVisitor {
    type Value = InterfaceDefinition;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of function name to a list of parameter names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut definition = InterfaceDefinition::new();
        while let Some(name) = access.next_key::<String>()? {
            let params = access.next_value::<Vec<String>>()?;
            definition
                .insert(FunctionSignature::new(name, params))
                .map_err(de::Error::custom)?;
        }
        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn math() -> InterfaceDefinition {
        InterfaceDefinition::new()
            .with_function("add", ["numOne", "numTwo"])
            .and_then(|d| d.with_function("subtract", ["numOne", "numTwo"]))
            .expect("valid definition")
    }

    #[test]
    fn signature_display_lists_params() {
        let def = math();
        let add = def.get("add").expect("add declared");
        assert_eq!(add.to_string(), "add(numOne, numTwo)");
        assert_eq!(add.arity(), 2);

        let zero = FunctionSignature::new("reset", Vec::<String>::new());
        assert_eq!(zero.to_string(), "reset()");
        assert_eq!(zero.arity(), 0);
    }

    #[test]
    fn duplicate_function_is_rejected() {
        let err = math()
            .with_function("add", ["x"])
            .expect_err("duplicate must fail");
        assert!(matches!(err, DefinitionError::InvalidArgument(_)));
        assert!(err.to_string().contains("duplicate function `add`"));
    }

    #[test]
    fn parameter_names_are_free_form_labels() {
        let def = InterfaceDefinition::try_from(&json!({
            "f": ["x", "x"],
            "g": [""],
            "": ["a"],
        }))
        .expect("labels are not validated");
        assert_eq!(def.get("f").map(FunctionSignature::arity), Some(2));
        assert_eq!(def.get("f").map(ToString::to_string).as_deref(), Some("f(x, x)"));
        assert_eq!(def.get("g").map(FunctionSignature::arity), Some(1));
        assert_eq!(def.get("").map(FunctionSignature::arity), Some(1));
    }

    #[test]
    fn try_from_json_preserves_declaration_order() {
        let value = json!({
            "subtract": ["numOne", "numTwo"],
            "add": ["numOne", "numTwo"],
            "negate": ["n"],
        });
        let def = InterfaceDefinition::try_from(&value).expect("valid definition");
        assert_eq!(def.names().collect::<Vec<_>>(), ["subtract", "add", "negate"]);
    }

    #[test]
    fn try_from_json_rejects_malformed_shapes() {
        for bad in [
            json!(["add"]),
            json!("add"),
            json!({"add": "numOne"}),
            json!({"add": ["numOne", 2]}),
            json!({"add": null}),
        ] {
            let err = InterfaceDefinition::try_from(&bad).expect_err("malformed must fail");
            assert!(
                matches!(err, DefinitionError::InvalidArgument(_)),
                "unexpected error for {bad}: {err}"
            );
        }
    }

    #[test]
    fn deserialize_keeps_document_order_and_rejects_duplicates() {
        let def: InterfaceDefinition =
            serde_json::from_str(r#"{"b": [], "a": ["x"]}"#).expect("valid json");
        assert_eq!(def.names().collect::<Vec<_>>(), ["b", "a"]);

        let err = serde_json::from_str::<InterfaceDefinition>(r#"{"a": [], "a": ["x"]}"#)
            .expect_err("duplicate key must fail");
        assert!(err.to_string().contains("duplicate function `a`"));
    }

    #[test]
    fn serialize_round_trips_literal_shape() {
        let value = serde_json::to_value(math()).expect("serializable");
        assert_eq!(
            value,
            json!({"add": ["numOne", "numTwo"], "subtract": ["numOne", "numTwo"]})
        );
    }
}
