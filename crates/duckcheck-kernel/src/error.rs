//! Error types for duckcheck kernel operations.

use crate::conformance::Reason;

/// A candidate does not structurally satisfy an interface definition.
///
/// The message is every diagnostic fragment joined with `" | "`, in the
/// order the definition declares its functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConformanceError {
    message: String,
    reasons: Vec<Reason>,
}

impl ConformanceError {
    pub(crate) fn from_reasons(reasons: Vec<Reason>) -> Self {
        let message = join_reasons(&reasons);
        Self { message, reasons }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The structured reasons behind the message.
    pub fn reasons(&self) -> &[Reason] {
        &self.reasons
    }
}

pub(crate) fn join_reasons(reasons: &[Reason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Errors arising while building or loading an interface definition.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// The definition (or one of its entries) is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl DefinitionError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Failure raised by a callable member when invoked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("no member named `{0}`")]
    NoSuchMember(String),

    #[error("`{0}` is not a function")]
    NotCallable(String),

    #[error("missing argument {index} for `{function}`")]
    MissingArgument { function: String, index: usize },

    #[error("argument {index} has the wrong type: expected {expected}")]
    ArgumentType { index: usize, expected: &'static str },
}

/// Errors arising from malformed candidate object graphs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// Linking the prototype would make the delegation chain loop.
    #[error("invalid argument: prototype chain would form a cycle")]
    PrototypeCycle,
}

/// Umbrella error for callers that mix definition loading with checks.
#[derive(Debug, thiserror::Error)]
pub enum DuckcheckError {
    #[error(transparent)]
    Conformance(#[from] ConformanceError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error(transparent)]
    Call(#[from] CallError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::FunctionSignature;

    #[test]
    fn message_joins_reasons_in_order() {
        let add = FunctionSignature::new("add", ["numOne", "numTwo"]);
        let subtract = FunctionSignature::new("subtract", ["numOne", "numTwo"]);
        let err = ConformanceError::from_reasons(vec![
            Reason::IncorrectParameterCount {
                actual: 3,
                signature: add,
            },
            Reason::MissingFunction {
                signature: subtract,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Incorrect number of parameters (3) in implementation for function: add(numOne, numTwo) | Missing Function: subtract(numOne, numTwo)"
        );
        assert_eq!(err.reasons().len(), 2);
    }

    #[test]
    fn umbrella_error_is_transparent() {
        let err: DuckcheckError = DefinitionError::invalid("definition must be a mapping").into();
        assert_eq!(err.to_string(), "invalid argument: definition must be a mapping");
    }
}
