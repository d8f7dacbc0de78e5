use annot_core::{AnnotError, Result};
use annot_plugin::{Catalog, PluginArguments};
use std::collections::BTreeMap;
use tracing::debug;

use crate::directives::ConfigurationArgument;

/// Cross-checks plugin arguments against the final candidate set.
///
/// Runs after exclusion, so an argument aimed at a plugin that was enabled
/// and then excluded is dangling just like one aimed at a plugin that was
/// never enabled.
pub struct DependencyValidator<'a> {
    catalog: &'a Catalog,
    enabled: BTreeMap<&'a str, &'a PluginArguments>,
}

impl<'a> DependencyValidator<'a> {
    pub fn new(
        catalog: &'a Catalog,
        enabled: impl IntoIterator<Item = (&'a str, &'a PluginArguments)>,
    ) -> Self {
        Self {
            catalog,
            enabled: enabled.into_iter().collect(),
        }
    }

    /// Dangling arguments first, then each enabled plugin's configuration.
    pub fn validate(&self, arguments: &[ConfigurationArgument]) -> Result<()> {
        self.check_dangling(arguments)?;
        self.check_configurations()?;
        debug!(enabled = self.enabled.len(), "Dependency validation passed");
        Ok(())
    }

    pub fn check_dangling(&self, arguments: &[ConfigurationArgument]) -> Result<()> {
        match arguments
            .iter()
            .find(|arg| !self.enabled.contains_key(arg.plugin.as_str()))
        {
            Some(arg) => Err(AnnotError::DanglingArgument {
                plugin: arg.plugin.clone(),
                argument: arg.argument.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Schema and required-argument checks, in name order.
    pub fn check_configurations(&self) -> Result<()> {
        for (&name, &arguments) in &self.enabled {
            let class = self
                .catalog
                .selectable(name)
                .ok_or_else(|| AnnotError::UnknownPlugin {
                    name: name.to_string(),
                })?;

            class.check_arguments(arguments)?;

            if let Some(spec) = class.missing_required(arguments) {
                return Err(AnnotError::MissingRequiredArgument {
                    plugin: name.to_string(),
                    argument: spec.name.clone(),
                });
            }
        }
        Ok(())
    }
}
