use crate::cli::EditArgs;
use crate::error::{CliError, Result};
use chemspecies::core::models::element::Element;
use chemspecies::workflows::{EditConfig, EditConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialRemoveConfig {
    elements: Option<Vec<String>>,
    #[serde(rename = "lone-atoms")]
    lone_atoms: Option<bool>,
    #[serde(rename = "min-island-atoms")]
    min_island_atoms: Option<usize>,
}

/// Edit settings read from a TOML file, before command-line overrides.
///
/// ```toml
/// recenter = true
///
/// [remove]
/// elements = ["H", "Na"]
/// lone-atoms = true
/// min-island-atoms = 3
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialEditConfig {
    remove: Option<PartialRemoveConfig>,
    recenter: Option<bool>,
}

impl PartialEditConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content, path)
    }

    fn from_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::ConfigFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Combines file settings with `args`; flags given on the command line win,
    /// and element lists from both sources are joined.
    pub fn merge_with_cli(self, args: &EditArgs) -> Result<EditConfig> {
        let remove = self.remove.unwrap_or_default();

        let file_elements = remove
            .elements
            .unwrap_or_default()
            .iter()
            .map(|symbol| symbol.parse::<Element>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid entry in `remove.elements`: {}", e))?;

        let mut builder = EditConfigBuilder::new()
            .remove_elements(file_elements)
            .remove_elements(args.remove_elements.iter().copied())
            .remove_lone_atoms(args.remove_lone_atoms || remove.lone_atoms.unwrap_or(false))
            .recenter(args.recenter || self.recenter.unwrap_or(false));

        if let Some(min) = args.min_island_atoms.or(remove.min_island_atoms) {
            builder = builder.min_island_atoms(min);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemspecies::workflows::ConfigError;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn args() -> EditArgs {
        EditArgs {
            input: PathBuf::from("in.mol2"),
            output: PathBuf::from("out.mol2"),
            config: None,
            remove_elements: Vec::new(),
            remove_lone_atoms: false,
            min_island_atoms: None,
            recenter: false,
        }
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_settings_are_applied() {
        let file = write_config(
            r#"
recenter = true

[remove]
elements = ["h", "Na"]
lone-atoms = true
min-island-atoms = 3
"#,
        );

        let config = PartialEditConfig::from_file(file.path())
            .unwrap()
            .merge_with_cli(&args())
            .unwrap();

        assert!(config.recenter);
        assert!(config.remove_lone_atoms);
        assert_eq!(config.min_island_atoms, 3);
        assert!(config.remove_elements.contains(&Element::H));
        assert!(config.remove_elements.contains(&Element::Na));
    }

    #[test]
    fn cli_overrides_file_values() {
        let file = write_config("[remove]\nmin-island-atoms = 3\nelements = [\"H\"]\n");
        let mut cli = args();
        cli.min_island_atoms = Some(5);
        cli.remove_elements = vec![Element::Cl];

        let config = PartialEditConfig::from_file(file.path())
            .unwrap()
            .merge_with_cli(&cli)
            .unwrap();

        assert_eq!(config.min_island_atoms, 5);
        assert_eq!(config.remove_elements.len(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("[remove]\nwater = true\n");
        let result = PartialEditConfig::from_file(file.path());
        assert!(matches!(result, Err(CliError::ConfigFile { .. })));
    }

    #[test]
    fn invalid_element_symbol_is_reported() {
        let file = write_config("[remove]\nelements = [\"Qq\"]\n");
        let result = PartialEditConfig::from_file(file.path())
            .unwrap()
            .merge_with_cli(&args());
        assert!(matches!(result, Err(CliError::Other(_))));
    }

    #[test]
    fn empty_configuration_requests_no_edit() {
        let result = PartialEditConfig::default().merge_with_cli(&args());
        assert!(matches!(
            result,
            Err(CliError::Config(ConfigError::NoOperation))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PartialEditConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
