//! Reading and writing version descriptor files.

use crate::domain::{DescriptorFile, VersionDescriptor};
use crate::error::{Result, VersionizeError};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Read and validate the descriptor stored at `path`
pub fn read_descriptor(path: &Path) -> Result<VersionDescriptor> {
    let content = fs::read_to_string(path)
        .map_err(|e| VersionizeError::invalid_descriptor(path, format!("cannot be read: {}", e)))?;

    let raw: DescriptorFile = serde_json::from_str(&content).map_err(|e| {
        VersionizeError::invalid_descriptor(path, format!("is not a valid version file: {}", e))
    })?;

    VersionDescriptor::parse(raw, path)
}

/// Write `descriptor` to `path`.
///
/// Only `version`, `scopeName` and `parentScopes` are replaced; other
/// top-level keys of an existing file are kept. `parentScopes` is only
/// written when non-empty or already present.
pub fn write_descriptor(path: &Path, descriptor: &VersionDescriptor) -> Result<()> {
    let mut document = match fs::read_to_string(path) {
        Ok(existing) => match serde_json::from_str::<Value>(&existing) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
        Err(e) => return Err(e.into()),
    };

    let file = descriptor.to_file();
    document.insert("version".to_string(), Value::from(descriptor.version.to_string()));
    match file.scope_name {
        Some(scope) => {
            document.insert("scopeName".to_string(), Value::from(scope));
        }
        None => {
            document.remove("scopeName");
        }
    }
    if !file.parent_scopes.is_empty() || document.contains_key("parentScopes") {
        document.insert(
            "parentScopes".to_string(),
            Value::from(file.parent_scopes),
        );
    }

    let mut content = serde_json::to_string_pretty(&Value::Object(document))?;
    content.push('\n');
    fs::write(path, content)?;

    log::debug!(
        "Wrote version {} to {}",
        descriptor.version,
        path.display()
    );
    Ok(())
}
