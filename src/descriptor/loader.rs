//! Descriptor discovery and loading.

use crate::descriptor::schema::ProjectDescriptor;
use crate::error::{PreflightError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional descriptor file names, in lookup order.
const DESCRIPTOR_FILES: &[&str] = &["azure.yaml", "azure.yml"];

/// Find the descriptor file in `dir`, trying `azure.yaml` then `azure.yml`.
pub fn find_descriptor(dir: &Path) -> Option<PathBuf> {
    DESCRIPTOR_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Load and parse the project descriptor from `dir`.
///
/// # Errors
///
/// Returns `DescriptorNotFound` when neither conventional file name exists,
/// and `DescriptorParseError` when the YAML is malformed.
pub fn load_descriptor(dir: &Path) -> Result<ProjectDescriptor> {
    let path = find_descriptor(dir).ok_or_else(|| PreflightError::DescriptorNotFound {
        dir: dir.to_path_buf(),
    })?;

    let content = fs::read_to_string(&path)?;
    parse_descriptor(&content, &path)
}

/// Parse YAML content into a descriptor.
///
/// `source_path` is used for error reporting only.
pub fn parse_descriptor(content: &str, source_path: &Path) -> Result<ProjectDescriptor> {
    serde_yaml::from_str(content).map_err(|e| PreflightError::DescriptorParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_prefers_yaml_over_yml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("azure.yaml"), "name: from-yaml").unwrap();
        fs::write(temp.path().join("azure.yml"), "name: from-yml").unwrap();

        let d = load_descriptor(temp.path()).unwrap();
        assert_eq!(d.name, "from-yaml");
    }

    #[test]
    fn load_falls_back_to_yml() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("azure.yml"), "name: from-yml").unwrap();

        let d = load_descriptor(temp.path()).unwrap();
        assert_eq!(d.name, "from-yml");
    }

    #[test]
    fn missing_descriptor_is_typed_error() {
        let temp = TempDir::new().unwrap();
        let err = load_descriptor(temp.path()).unwrap_err();
        assert!(matches!(err, PreflightError::DescriptorNotFound { .. }));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("azure.yaml"), "services: [unclosed").unwrap();

        let err = load_descriptor(temp.path()).unwrap_err();
        assert!(matches!(err, PreflightError::DescriptorParseError { .. }));
    }

    #[test]
    fn find_descriptor_returns_none_when_absent() {
        let temp = TempDir::new().unwrap();
        assert!(find_descriptor(temp.path()).is_none());
    }
}
