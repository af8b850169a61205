//! The conformance engine.
//!
//! Given a candidate and an [`InterfaceDefinition`], every declared function
//! is resolved on the candidate (own members first, then its delegation
//! chain) and classified:
//!
//! - absent (or falsy)            → [`Reason::MissingFunction`]
//! - present but not callable      → [`Reason::NotAFunction`]
//! - callable with another arity   → [`Reason::IncorrectParameterCount`]
//! - callable with the same arity  → conforms
//!
//! Arity is compared for exact equality. Reasons come out in the order the
//! definition declares its functions.
//!
//! [`diagnose`] is the primitive; [`conforms`], [`assert_conforms`] and
//! [`apply`] are layered on it. None of them keep state between calls.

use crate::definition::{FunctionSignature, InterfaceDefinition};
use crate::error::{ConformanceError, join_reasons};
use crate::object::{Callable, Candidate, Member, Target};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::fmt;
use tracing::{debug, trace};

/// Reason class constants, as they appear in serialized diagnoses.
pub mod reason_class {
    pub const MISSING_FUNCTION: &str = "missing_function";
    pub const NOT_A_FUNCTION: &str = "not_a_function";
    pub const INCORRECT_PARAMETER_COUNT: &str = "incorrect_parameter_count";
}

/// Why one declared function is not satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    MissingFunction {
        signature: FunctionSignature,
    },
    NotAFunction {
        signature: FunctionSignature,
    },
    IncorrectParameterCount {
        /// Arity the candidate's callable declares.
        actual: usize,
        signature: FunctionSignature,
    },
}

impl Reason {
    pub fn signature(&self) -> &FunctionSignature {
        match self {
            Reason::MissingFunction { signature }
            | Reason::NotAFunction { signature }
            | Reason::IncorrectParameterCount { signature, .. } => signature,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Reason::MissingFunction { .. } => reason_class::MISSING_FUNCTION,
            Reason::NotAFunction { .. } => reason_class::NOT_A_FUNCTION,
            Reason::IncorrectParameterCount { .. } => reason_class::INCORRECT_PARAMETER_COUNT,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::MissingFunction { signature } => {
                write!(f, "Missing Function: {signature}")
            }
            Reason::NotAFunction { signature } => {
                write!(f, "Not a function: {}", signature.name())
            }
            Reason::IncorrectParameterCount { actual, signature } => write!(
                f,
                "Incorrect number of parameters ({actual}) in implementation for function: {signature}"
            ),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReasonRecord<'a> {
    class: &'static str,
    function: &'a str,
    expected_arity: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    declared_arity: Option<usize>,
    message: String,
}

impl Serialize for Reason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let declared_arity = match self {
            Reason::IncorrectParameterCount { actual, .. } => Some(*actual),
            _ => None,
        };
        ReasonRecord {
            class: self.class(),
            function: self.signature().name(),
            expected_arity: self.signature().arity(),
            declared_arity,
            message: self.to_string(),
        }
        .serialize(serializer)
    }
}

/// The ordered reasons a candidate fails a definition. Empty means it
/// conforms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    reasons: Vec<Reason>,
}

impl Diagnosis {
    pub fn reasons(&self) -> &[Reason] {
        &self.reasons
    }

    pub fn is_conforming(&self) -> bool {
        self.reasons.is_empty()
    }

    /// One human-readable message per failing function.
    pub fn messages(&self) -> Vec<String> {
        self.reasons.iter().map(ToString::to_string).collect()
    }

    /// All messages joined with `" | "`, or `None` when conforming.
    pub fn joined(&self) -> Option<String> {
        (!self.is_conforming()).then(|| join_reasons(&self.reasons))
    }

    pub fn into_result(self) -> Result<(), ConformanceError> {
        if self.is_conforming() {
            Ok(())
        } else {
            Err(ConformanceError::from_reasons(self.reasons))
        }
    }

    /// Stable JSON surface used by fixtures and tooling.
    pub fn to_json(&self) -> Value {
        json!({
            "schema": 1,
            "result": if self.is_conforming() { "conforms" } else { "rejected" },
            "messages": self.messages(),
            "reasons": self.reasons,
        })
    }
}

impl IntoIterator for Diagnosis {
    type Item = Reason;
    type IntoIter = std::vec::IntoIter<Reason>;

    fn into_iter(self) -> Self::IntoIter {
        self.reasons.into_iter()
    }
}

enum Inspection {
    Conforms(Callable),
    Fails(Reason),
}

fn inspect<C: Candidate + ?Sized>(object: &C, signature: &FunctionSignature) -> Inspection {
    let member = object
        .resolve(signature.name())
        .filter(|member| !member.is_absent());
    let inspection = match member {
        None => Inspection::Fails(Reason::MissingFunction {
            signature: signature.clone(),
        }),
        Some(Member::Value(_)) => Inspection::Fails(Reason::NotAFunction {
            signature: signature.clone(),
        }),
        Some(Member::Function(callable)) if callable.arity() != signature.arity() => {
            Inspection::Fails(Reason::IncorrectParameterCount {
                actual: callable.arity(),
                signature: signature.clone(),
            })
        }
        Some(Member::Function(callable)) => Inspection::Conforms(callable),
    };
    match &inspection {
        Inspection::Conforms(_) => trace!(function = %signature, "function conforms"),
        Inspection::Fails(reason) => {
            trace!(function = %signature, class = reason.class(), "function rejected")
        }
    }
    inspection
}

/// Resolve every declared function in one pass. Either all of them
/// conform and their callables are returned, or the reasons are.
fn resolve_all<'d, C: Candidate + ?Sized>(
    object: &C,
    definition: &'d InterfaceDefinition,
) -> Result<Vec<(&'d FunctionSignature, Callable)>, Vec<Reason>> {
    let mut resolved = Vec::with_capacity(definition.len());
    let mut reasons = Vec::new();
    for signature in definition {
        match inspect(object, signature) {
            Inspection::Conforms(callable) => resolved.push((signature, callable)),
            Inspection::Fails(reason) => reasons.push(reason),
        }
    }
    debug!(
        functions = definition.len(),
        failures = reasons.len(),
        "diagnosed candidate"
    );
    if reasons.is_empty() {
        Ok(resolved)
    } else {
        Err(reasons)
    }
}

/// Compute why `object` does not conform to `definition`.
pub fn diagnose<C: Candidate + ?Sized>(object: &C, definition: &InterfaceDefinition) -> Diagnosis {
    match resolve_all(object, definition) {
        Ok(_) => Diagnosis::default(),
        Err(reasons) => Diagnosis { reasons },
    }
}

/// Whether `object` provides every declared function with the declared arity.
pub fn conforms<C: Candidate + ?Sized>(object: &C, definition: &InterfaceDefinition) -> bool {
    diagnose(object, definition).is_conforming()
}

/// Fail with a [`ConformanceError`] carrying every reason if `object` does
/// not conform.
pub fn assert_conforms<C: Candidate + ?Sized>(
    object: &C,
    definition: &InterfaceDefinition,
) -> Result<(), ConformanceError> {
    diagnose(object, definition).into_result()
}

/// Copy `candidate`'s implementation of `definition` onto `target`.
///
/// The candidate is checked first; if it does not conform the error is
/// returned and `target` is not touched. Otherwise each declared function
/// is defined on `target` as the same callable the candidate resolves it
/// to, overwriting any existing member of that name.
pub fn apply<T, C>(
    target: &mut T,
    definition: &InterfaceDefinition,
    candidate: &C,
) -> Result<(), ConformanceError>
where
    T: Target + ?Sized,
    C: Candidate + ?Sized,
{
    let resolved = resolve_all(candidate, definition).map_err(ConformanceError::from_reasons)?;
    for (signature, callable) in resolved {
        target.define(signature.name(), callable);
    }
    debug!(functions = definition.len(), "applied implementation");
    Ok(())
}
