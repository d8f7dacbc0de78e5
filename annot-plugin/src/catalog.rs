use annot_core::{AnnotError, Result};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::class::PluginClass;
use crate::validation::validate_class;

/// Every plugin class known to the host tool, keyed by display name.
///
/// Built once at startup through explicit [`Catalog::register`] calls and
/// read-only afterwards, so a shared reference can serve any number of
/// concurrent resolutions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: IndexMap<String, PluginClass>,
    /// Argument flag name -> owning class name.
    argument_owners: IndexMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class. Names must be unique, and argument names must be unique
    /// across the whole catalog so a bare `--flag` maps to exactly one plugin.
    pub fn register(&mut self, class: PluginClass) -> Result<()> {
        let report = validate_class(&class);
        for warning in &report.warnings {
            warn!("{}", warning);
        }
        if !report.is_valid {
            return Err(AnnotError::Config(format!(
                "Invalid annotation '{}': {}",
                class.name(),
                report.summary()
            )));
        }

        if self.classes.contains_key(class.name()) {
            return Err(AnnotError::DuplicatePlugin {
                name: class.name().to_string(),
            });
        }

        for spec in class.arguments() {
            if let Some(owner) = self.argument_owners.get(&spec.name) {
                return Err(AnnotError::DuplicateArgumentName {
                    argument: spec.name.clone(),
                    first: owner.clone(),
                    second: class.name().to_string(),
                });
            }
        }
        for spec in class.arguments() {
            self.argument_owners
                .insert(spec.name.clone(), class.name().to_string());
        }

        debug!(plugin = class.name(), "Registered annotation");
        self.classes.insert(class.name().to_string(), class);
        Ok(())
    }

    /// Chaining form of [`Catalog::register`].
    pub fn with(mut self, class: PluginClass) -> Result<Self> {
        self.register(class)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&PluginClass> {
        self.classes.get(name)
    }

    /// Looks up a class that may be enabled by name. Markers are not
    /// selectable.
    pub fn selectable(&self, name: &str) -> Option<&PluginClass> {
        self.get(name).filter(|c| c.is_executable())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &PluginClass> {
        self.classes.values()
    }

    pub fn executable(&self) -> impl Iterator<Item = &PluginClass> {
        self.classes().filter(|c| c.is_executable())
    }

    /// Class declaring the argument `flag`, if any.
    pub fn argument_owner(&self, flag: &str) -> Option<&PluginClass> {
        self.argument_owners
            .get(flag)
            .and_then(|owner| self.classes.get(owner))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Attributes, InfoAnnotation};
    use crate::record::VariantRecord;
    use crate::types::{ArgumentKind, ArgumentSpec, PluginArguments};

    #[derive(Debug)]
    struct Noop;

    impl InfoAnnotation for Noop {
        fn annotate(&self, _record: &VariantRecord) -> Attributes {
            Attributes::new()
        }
    }

    fn noop(_: &PluginArguments) -> anyhow::Result<Box<dyn InfoAnnotation>> {
        Ok(Box::new(Noop))
    }

    #[test]
    fn test_register_and_lookup() -> Result<()> {
        let catalog = Catalog::new()
            .with(PluginClass::info("Coverage", noop).describe("depth"))?
            .with(PluginClass::marker("Reducible"))?;

        assert_eq!(catalog.len(), 2);
        assert!(catalog.selectable("Coverage").is_some());
        assert!(catalog.get("Reducible").is_some());
        assert!(catalog.selectable("Reducible").is_none());
        assert!(catalog.selectable("Missing").is_none());
        assert_eq!(catalog.executable().count(), 1);
        Ok(())
    }

    #[test]
    fn test_duplicate_name_rejected() -> Result<()> {
        let mut catalog = Catalog::new().with(PluginClass::info("Coverage", noop))?;
        let err = catalog
            .register(PluginClass::info("Coverage", noop))
            .expect_err("duplicate");
        assert!(matches!(err, AnnotError::DuplicatePlugin { .. }));
        Ok(())
    }

    #[test]
    fn test_argument_names_are_catalog_wide() -> Result<()> {
        let mut catalog = Catalog::new().with(
            PluginClass::info("A", noop)
                .with_argument(ArgumentSpec::optional("threshold", ArgumentKind::Float)),
        )?;
        let err = catalog
            .register(
                PluginClass::info("B", noop)
                    .with_argument(ArgumentSpec::optional("threshold", ArgumentKind::Float)),
            )
            .expect_err("shared argument name");
        assert!(
            matches!(err, AnnotError::DuplicateArgumentName { ref first, ref second, .. } if first == "A" && second == "B")
        );
        assert!(catalog.get("B").is_none(), "failed registration leaves no trace");
        assert_eq!(catalog.argument_owner("threshold").map(|c| c.name()), Some("A"));
        Ok(())
    }

    #[test]
    fn test_invalid_class_rejected() {
        let mut catalog = Catalog::new();
        let err = catalog
            .register(PluginClass::info("has space", noop))
            .expect_err("invalid name");
        assert!(matches!(err, AnnotError::Config(_)));
    }

    #[test]
    fn test_host_flag_name_rejected() {
        let mut catalog = Catalog::new();
        let err = catalog
            .register(
                PluginClass::info("Windowed", noop)
                    .with_argument(ArgumentSpec::optional("profile", ArgumentKind::Text)),
            )
            .expect_err("--profile belongs to the host");
        assert!(matches!(err, AnnotError::Config(ref msg) if msg.contains("reserved")));
        assert!(catalog.argument_owner("profile").is_none());
    }
}
