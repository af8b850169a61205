//! Loading interface definitions from contract files.
//!
//! A contract is a plain mapping of function name to parameter names, in
//! either JSON or TOML:
//!
//! ```toml
//! add = ["numOne", "numTwo"]
//! subtract = ["numOne", "numTwo"]
//! ```
//!
//! Declaration order in the file is the order diagnostics are reported in.

use crate::definition::InterfaceDefinition;
use crate::error::DefinitionError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Supported contract encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    Json,
    Toml,
}

impl ContractFormat {
    /// Pick the format from a file extension (`.json` or `.toml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

pub fn definition_from_json_str(text: &str) -> Result<InterfaceDefinition, DefinitionError> {
    parse_json(text, "<inline>")
}

pub fn definition_from_toml_str(text: &str) -> Result<InterfaceDefinition, DefinitionError> {
    parse_toml(text, "<inline>")
}

/// Read and parse a contract file, choosing the format by extension.
pub fn load_definition(path: impl AsRef<Path>) -> Result<InterfaceDefinition, DefinitionError> {
    let path = path.as_ref();
    let format = ContractFormat::from_path(path).ok_or_else(|| {
        DefinitionError::invalid(format!(
            "unsupported contract file `{}` (expected .json or .toml)",
            display_path(path)
        ))
    })?;
    let text = fs::read_to_string(path).map_err(|source| DefinitionError::ReadFile {
        path: display_path(path),
        source,
    })?;
    let definition = match format {
        ContractFormat::Json => parse_json(&text, &display_path(path))?,
        ContractFormat::Toml => parse_toml(&text, &display_path(path))?,
    };
    debug!(
        path = %path.display(),
        functions = definition.len(),
        "loaded interface contract"
    );
    Ok(definition)
}

fn parse_json(text: &str, path: &str) -> Result<InterfaceDefinition, DefinitionError> {
    serde_json::from_str(text).map_err(|source| DefinitionError::ParseJson {
        path: path.to_string(),
        source,
    })
}

fn parse_toml(text: &str, path: &str) -> Result<InterfaceDefinition, DefinitionError> {
    toml::from_str(text).map_err(|source| DefinitionError::ParseToml {
        path: path.to_string(),
        source,
    })
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempDirGuard {
        path: PathBuf,
    }

    impl TempDirGuard {
        fn new(prefix: &str) -> Self {
            let unique = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock should be after unix epoch")
                .as_nanos();
            let path = std::env::temp_dir().join(format!(
                "duckcheck-{prefix}-{}-{unique}",
                std::process::id()
            ));
            fs::create_dir_all(&path).expect("temp dir should be created");
            Self { path }
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn toml_contract_keeps_declaration_order() {
        let def = definition_from_toml_str(
            r#"
            subtract = ["numOne", "numTwo"]
            add = ["numOne", "numTwo"]
            reset = []
            "#,
        )
        .expect("valid toml contract");
        assert_eq!(def.names().collect::<Vec<_>>(), ["subtract", "add", "reset"]);
        assert_eq!(def.get("reset").map(|sig| sig.arity()), Some(0));
    }

    #[test]
    fn malformed_json_contract_is_a_parse_error() {
        let err = definition_from_json_str(r#"{"add": "numOne"}"#).expect_err("must fail");
        assert!(matches!(err, DefinitionError::ParseJson { .. }));
    }

    #[test]
    fn loads_contract_files_by_extension() {
        let dir = TempDirGuard::new("contract");
        let json_path = dir.path.join("math.json");
        let toml_path = dir.path.join("math.toml");
        fs::write(&json_path, r#"{"add": ["numOne", "numTwo"]}"#).expect("write json");
        fs::write(&toml_path, "add = [\"numOne\", \"numTwo\"]\n").expect("write toml");

        let from_json = load_definition(&json_path).expect("json contract");
        let from_toml = load_definition(&toml_path).expect("toml contract");
        assert_eq!(from_json, from_toml);
    }

    #[test]
    fn unsupported_or_missing_files_fail() {
        let dir = TempDirGuard::new("contract-missing");
        let err = load_definition(dir.path.join("math.yaml")).expect_err("unsupported");
        assert!(matches!(err, DefinitionError::InvalidArgument(_)));

        let err = load_definition(dir.path.join("absent.json")).expect_err("missing");
        assert!(matches!(err, DefinitionError::ReadFile { .. }));
    }
}
