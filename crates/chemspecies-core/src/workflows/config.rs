use crate::core::models::element::Element;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    Invalid {
        parameter: &'static str,
        reason: String,
    },
    #[error("Configuration does not request any edit")]
    NoOperation,
}

/// Structural edits applied by [`run`](super::edit::run), in this order:
/// element removal, island filtering, recentering.
#[derive(Debug, Clone, PartialEq)]
pub struct EditConfig {
    pub remove_elements: BTreeSet<Element>,
    pub remove_lone_atoms: bool,
    /// Islands with fewer atoms than this are dropped; `1` keeps everything.
    pub min_island_atoms: usize,
    pub recenter: bool,
}

impl EditConfig {
    pub fn builder() -> EditConfigBuilder {
        EditConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct EditConfigBuilder {
    remove_elements: BTreeSet<Element>,
    remove_lone_atoms: Option<bool>,
    min_island_atoms: Option<usize>,
    recenter: Option<bool>,
}

impl EditConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_element(mut self, element: Element) -> Self {
        self.remove_elements.insert(element);
        self
    }
    pub fn remove_elements(mut self, elements: impl IntoIterator<Item = Element>) -> Self {
        self.remove_elements.extend(elements);
        self
    }
    pub fn remove_lone_atoms(mut self, enabled: bool) -> Self {
        self.remove_lone_atoms = Some(enabled);
        self
    }
    pub fn min_island_atoms(mut self, count: usize) -> Self {
        self.min_island_atoms = Some(count);
        self
    }
    pub fn recenter(mut self, enabled: bool) -> Self {
        self.recenter = Some(enabled);
        self
    }

    pub fn build(self) -> Result<EditConfig, ConfigError> {
        let min_island_atoms = self.min_island_atoms.unwrap_or(1);
        if min_island_atoms == 0 {
            return Err(ConfigError::Invalid {
                parameter: "min_island_atoms",
                reason: "must be at least 1".to_string(),
            });
        }

        let config = EditConfig {
            remove_elements: self.remove_elements,
            remove_lone_atoms: self.remove_lone_atoms.unwrap_or(false),
            min_island_atoms,
            recenter: self.recenter.unwrap_or(false),
        };
        if config.remove_elements.is_empty()
            && !config.remove_lone_atoms
            && config.min_island_atoms == 1
            && !config.recenter
        {
            return Err(ConfigError::NoOperation);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = EditConfig::builder().recenter(true).build().unwrap();
        assert!(config.remove_elements.is_empty());
        assert!(!config.remove_lone_atoms);
        assert_eq!(config.min_island_atoms, 1);
        assert!(config.recenter);
    }

    #[test]
    fn builder_collects_elements() {
        let config = EditConfig::builder()
            .remove_element(Element::H)
            .remove_elements([Element::Na, Element::H])
            .build()
            .unwrap();
        assert_eq!(
            config.remove_elements.into_iter().collect::<Vec<_>>(),
            vec![Element::H, Element::Na]
        );
    }

    #[test]
    fn zero_island_size_is_invalid() {
        let result = EditConfig::builder().min_island_atoms(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                parameter: "min_island_atoms",
                ..
            })
        ));
    }

    #[test]
    fn empty_configuration_is_rejected() {
        assert_eq!(
            EditConfig::builder().min_island_atoms(1).build().unwrap_err(),
            ConfigError::NoOperation
        );
    }
}
