//! # Duckcheck Kernel
//!
//! Runtime interface conformance: a candidate object satisfies an interface
//! exactly when every declared function resolves on it (directly or through
//! its delegation chain) to a callable declaring the same number of
//! parameters.
//!
//! This crate is **host-agnostic**: it does not prescribe what candidates
//! are. Anything implementing [`Candidate`] can be checked, and anything
//! implementing [`Target`] can receive an implementation.
//!
//! ## Architecture
//!
//! ```text
//! InterfaceDefinition   ← name → [param names], declaration order kept
//!     │
//! Candidate / Target    ← chain-aware lookup, member definition
//!     │
//! diagnose              ← ordered Reasons (the primitive)
//!     ├── conforms          ← no reasons
//!     └── assert_conforms   ← ConformanceError with reasons joined by " | "
//!             └── apply     ← validate, then copy callables onto a target
//! ```

pub mod conformance;
pub mod contract;
pub mod definition;
pub mod error;
pub mod object;
pub mod toy;

pub use conformance::{Diagnosis, Reason, apply, assert_conforms, conforms, diagnose};
pub use contract::{
    ContractFormat, definition_from_json_str, definition_from_toml_str, load_definition,
};
pub use definition::{FunctionSignature, InterfaceDefinition};
pub use error::{CallError, ConformanceError, DefinitionError, DuckcheckError, ObjectError};
pub use object::{Callable, Candidate, Member, Object, Prototype, Target};
