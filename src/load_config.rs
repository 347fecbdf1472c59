/// `load_config` module: builds the immutable [`ConvertConfig`] from layered sources.
///
/// Layers, lowest precedence first:
/// 1. built-in defaults
/// 2. an optional YAML file (`--config`)
/// 3. environment variables (`MD_TO_CSV_FOLDER`, `MD_TO_CSV_OUTPUT`, `MD_TO_CSV_BASE_URL`)
/// 4. flags given on the command line
///
/// Every layer is a [`ConfigLayer`] whose unset fields fall through to the layer below.
///
/// # Errors
/// Loading uses `anyhow::Error` for context-rich diagnostics; failures are surfaced at the CLI boundary.
///
/// Accepted YAML keys mirror the long flag names:
///
/// ```yaml
/// folder: docs
/// csv: out/docs.csv
/// ismkdoc: true
/// base: https://docs.example.org/
/// recursive: true
/// text: body        # or: document
/// ```
use crate::contract::{ConvertConfig, TextSource};
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const ENV_FOLDER: &str = "MD_TO_CSV_FOLDER";
pub const ENV_OUTPUT: &str = "MD_TO_CSV_OUTPUT";
pub const ENV_BASE_URL: &str = "MD_TO_CSV_BASE_URL";

/// One configuration source. `None` means "not set here".
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub folder: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub ismkdoc: Option<bool>,
    pub base: Option<String>,
    pub recursive: Option<bool>,
    pub text: Option<TextSource>,
}

impl ConfigLayer {
    /// Read the supported environment variables. Empty values are ignored.
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.trim().is_empty())
        }

        let layer = ConfigLayer {
            folder: var(ENV_FOLDER).map(PathBuf::from),
            csv: var(ENV_OUTPUT).map(PathBuf::from),
            base: var(ENV_BASE_URL),
            ..ConfigLayer::default()
        };
        debug!(?layer, "Configuration from environment");
        layer
    }

    /// Fields set in `higher` win over fields set in `self`.
    pub fn merge(self, higher: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            folder: higher.folder.or(self.folder),
            csv: higher.csv.or(self.csv),
            ismkdoc: higher.ismkdoc.or(self.ismkdoc),
            base: higher.base.or(self.base),
            recursive: higher.recursive.or(self.recursive),
            text: higher.text.or(self.text),
        }
    }

    /// Fill remaining gaps with defaults.
    pub fn into_convert_config(self) -> ConvertConfig {
        let defaults = ConvertConfig::default();
        ConvertConfig {
            root: self.folder.unwrap_or(defaults.root),
            output: self.csv.unwrap_or(defaults.output),
            recursive: self.recursive.unwrap_or(defaults.recursive),
            site_mode: self.ismkdoc.unwrap_or(defaults.site_mode),
            base_url: self.base.unwrap_or(defaults.base_url),
            text_source: self.text.unwrap_or(defaults.text_source),
        }
    }
}

/// Loads a YAML config file into a [`ConfigLayer`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ConfigLayer> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(ConfigLayer::default());
    }

    match serde_yaml::from_str::<ConfigLayer>(&config_content) {
        Ok(layer) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(layer)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML {:?}: {e}", path_ref))
        }
    }
}

/// Resolve every layer into the final configuration.
///
/// `file` is the path given with `--config`, if any; `flags` holds the values
/// given explicitly on the command line.
pub fn resolve_config(file: Option<&Path>, flags: ConfigLayer) -> Result<ConvertConfig> {
    let from_file = match file {
        Some(path) => load_config(path)?,
        None => ConfigLayer::default(),
    };
    let config = from_file
        .merge(ConfigLayer::from_env())
        .merge(flags)
        .into_convert_config();

    info!(
        root = %config.root.display(),
        output = %config.output.display(),
        site_mode = config.site_mode,
        "Configuration resolved"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_higher_layer_and_keeps_lower_fallbacks() {
        let lower = ConfigLayer {
            folder: Some("docs".into()),
            base: Some("https://lower/".into()),
            recursive: Some(true),
            ..ConfigLayer::default()
        };
        let higher = ConfigLayer {
            base: Some("https://higher/".into()),
            ismkdoc: Some(true),
            ..ConfigLayer::default()
        };

        let merged = lower.merge(higher);
        assert_eq!(merged.folder, Some(PathBuf::from("docs")));
        assert_eq!(merged.base.as_deref(), Some("https://higher/"));
        assert_eq!(merged.recursive, Some(true));
        assert_eq!(merged.ismkdoc, Some(true));
    }

    #[test]
    fn empty_layer_yields_defaults() {
        assert_eq!(
            ConfigLayer::default().into_convert_config(),
            ConvertConfig::default()
        );
    }

    #[test]
    fn yaml_keys_map_onto_the_layer() {
        let layer: ConfigLayer =
            serde_yaml::from_str("folder: docs\ncsv: out.csv\nismkdoc: true\ntext: document\n")
                .unwrap();
        let config = layer.into_convert_config();
        assert_eq!(config.root, PathBuf::from("docs"));
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert!(config.site_mode);
        assert!(!config.recursive);
        assert_eq!(config.text_source, TextSource::FullDocument);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_yaml::from_str::<ConfigLayer>("folderr: docs\n").is_err());
    }
}
