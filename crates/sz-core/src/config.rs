//! Config file loading
//!
//! Engine configs are plain serde structs. Files are picked by extension:
//! `.json` through serde_json, `.yaml` / `.yml` through serde_yml.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{SzError, SzResult};

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect from a file extension
    pub fn from_path(path: &Path) -> SzResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(SzError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse config text in the given format
pub fn parse_config<T: DeserializeOwned>(text: &str, format: ConfigFormat) -> SzResult<T> {
    match format {
        ConfigFormat::Json => {
            serde_json::from_str(text).map_err(|e| SzError::Serialization(e.to_string()))
        }
        ConfigFormat::Yaml => {
            serde_yml::from_str(text).map_err(|e| SzError::Serialization(e.to_string()))
        }
    }
}

/// Read and parse a config file
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> SzResult<T> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    log::debug!("[Config] Loading {} ({:?})", path.display(), format);
    parse_config(&text, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        #[serde(default)]
        chance: f64,
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("slot.json")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("slot.YML")).unwrap(),
            ConfigFormat::Yaml
        );
        assert!(ConfigFormat::from_path(Path::new("slot.toml")).is_err());
        assert!(ConfigFormat::from_path(Path::new("slot")).is_err());
    }

    #[test]
    fn test_parse_both_formats() {
        let json: Sample =
            parse_config(r#"{"name":"wheel","chance":0.5}"#, ConfigFormat::Json).unwrap();
        let yaml: Sample = parse_config("name: wheel\nchance: 0.5\n", ConfigFormat::Yaml).unwrap();
        assert_eq!(json, yaml);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cases.yaml");
        std::fs::write(&path, "name: cases\n").unwrap();

        let loaded: Sample = load_config(&path).unwrap();
        assert_eq!(loaded.name, "cases");
        assert_eq!(loaded.chance, 0.0);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config::<Sample>("{not json", ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, SzError::Serialization(_)));
    }
}
