//! Component marker file (`compass.yml`) parsing.
//!
//! A marker file declares its containing directory as an externally-tracked
//! component. The only required field is `id`, an Atlassian Resource
//! Identifier (ARI) of the form
//! `ari:cloud:compass:<cloudId>:component/<siteUuid>/<componentUuid>`.

use crate::error::{PulseError, Result};
use serde::Deserialize;
use std::path::Path;

/// Raw marker file contents. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct MarkerFile {
    id: Option<String>,
}

/// A component identifier extracted from a marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    /// Full ARI, used to address the component in the Compass API.
    pub component_id: String,
    /// Atlassian cloud (site) id, the fourth `:`-separated ARI segment.
    pub cloud_id: String,
}

impl ComponentRef {
    /// Parse a marker file's YAML content.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let marker: MarkerFile =
            serde_yaml::from_str(content).map_err(|e| PulseError::Yaml(e.to_string()))?;
        let ari = marker
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PulseError::MarkerInvalid("id not found in marker file".to_string()))?;

        let segments: Vec<&str> = ari.split(':').collect();
        if segments.len() < 4 {
            return Err(PulseError::MarkerInvalid(format!(
                "id is not a valid ARI: {ari}"
            )));
        }

        Ok(ComponentRef {
            cloud_id: segments[3].to_string(),
            component_id: ari,
        })
    }

    /// Read and parse a marker file from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ARI: &str =
        "ari:cloud:compass:a1fe6479-0253-4bf2-8cb9-3c7c70456ae4:component/6769ddfe/49d4738d";

    #[test]
    fn parses_id_and_cloud_id() {
        let yaml = format!("id: {ARI}\nname: auth-service\n");
        let component = ComponentRef::from_yaml_str(&yaml).unwrap();
        assert_eq!(component.component_id, ARI);
        assert_eq!(component.cloud_id, "a1fe6479-0253-4bf2-8cb9-3c7c70456ae4");
    }

    #[test]
    fn missing_id_is_rejected() {
        let err = ComponentRef::from_yaml_str("name: auth-service\n").unwrap_err();
        assert!(matches!(err, PulseError::MarkerInvalid(_)));
    }

    #[test]
    fn short_ari_is_rejected() {
        let err = ComponentRef::from_yaml_str("id: not-an-ari\n").unwrap_err();
        assert!(matches!(err, PulseError::MarkerInvalid(_)));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let err = ComponentRef::from_yaml_str(": [unbalanced").unwrap_err();
        assert!(matches!(err, PulseError::Yaml(_)));
    }

    #[test]
    fn reads_marker_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id: {ARI}").unwrap();
        let component = ComponentRef::from_file(file.path()).unwrap();
        assert_eq!(component.component_id, ARI);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ComponentRef::from_file(Path::new("/nonexistent/compass.yml")).unwrap_err();
        assert!(matches!(err, PulseError::Io(_)));
    }
}
