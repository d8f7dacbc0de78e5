use annot_core::Result;
use annot_plugin::{Catalog, GroupRegistry, GroupTag};
use tracing::debug;

use crate::defaults::ToolDefaults;
use crate::directives::Directives;
use crate::resolved::ResolvedSet;
use crate::resolver;

/// Startup-validated inputs shared by every resolution in one process.
///
/// Building the context checks the tool defaults once; invalid defaults are
/// a startup failure rather than a per-invocation one. The context only
/// borrows the catalog and is `Sync`, so threads may resolve concurrently.
#[derive(Debug, Clone)]
pub struct ResolutionContext<'c> {
    catalog: &'c Catalog,
    groups: GroupRegistry,
    defaults: ToolDefaults,
}

impl<'c> ResolutionContext<'c> {
    pub fn new(catalog: &'c Catalog, defaults: ToolDefaults) -> Result<Self> {
        let groups = GroupRegistry::build(catalog)?;
        Self::with_groups(catalog, groups, defaults)
    }

    /// Like [`ResolutionContext::new`] but only `allowed` groups may be
    /// requested, by the defaults or by the user.
    pub fn restricted(
        catalog: &'c Catalog,
        defaults: ToolDefaults,
        allowed: impl IntoIterator<Item = GroupTag>,
    ) -> Result<Self> {
        let groups = GroupRegistry::build(catalog)?.restrict(allowed);
        Self::with_groups(catalog, groups, defaults)
    }

    fn with_groups(
        catalog: &'c Catalog,
        groups: GroupRegistry,
        defaults: ToolDefaults,
    ) -> Result<Self> {
        defaults.validate(catalog, &groups)?;
        debug!(
            annotations = defaults.annotations.len(),
            groups = defaults.groups.len(),
            "Tool defaults validated"
        );
        Ok(Self {
            catalog,
            groups,
            defaults,
        })
    }

    pub fn resolve(&self, directives: &Directives) -> Result<ResolvedSet> {
        resolver::resolve(self.catalog, &self.groups, &self.defaults, directives)
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn groups(&self) -> &GroupRegistry {
        &self.groups
    }

    pub fn defaults(&self) -> &ToolDefaults {
        &self.defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DefaultAnnotation;
    use annot_core::AnnotError;

    fn catalog() -> &'static Catalog {
        annot_builtins::standard_catalog().expect("catalog builds")
    }

    #[test]
    fn test_invalid_defaults_fail_at_startup() {
        let defaults = ToolDefaults::new().group("Reducible");
        assert!(matches!(
            ResolutionContext::new(catalog(), defaults),
            Err(AnnotError::InvalidGroup { .. })
        ));
    }

    #[test]
    fn test_restriction_applies_to_defaults_and_users() -> Result<()> {
        let restricted = ResolutionContext::restricted(
            catalog(),
            ToolDefaults::new().group("StandardAnnotation"),
            [GroupTag::from("StandardAnnotation")],
        )?;
        assert!(!restricted.resolve(&Directives::new())?.is_empty());
        assert!(matches!(
            restricted.resolve(&Directives::new().include_group("StandardHCAnnotation")),
            Err(AnnotError::InvalidGroup { .. })
        ));

        let outside = ResolutionContext::restricted(
            catalog(),
            ToolDefaults::new().group("StandardHCAnnotation"),
            [GroupTag::from("StandardAnnotation")],
        );
        assert!(outside.is_err());
        Ok(())
    }

    #[test]
    fn test_context_resolves_defaults() -> Result<()> {
        let context = ResolutionContext::new(
            catalog(),
            ToolDefaults::new().annotation(DefaultAnnotation::new("Coverage")),
        )?;
        let set = context.resolve(&Directives::new())?;
        assert_eq!(set.names().collect::<Vec<_>>(), ["Coverage"]);
        Ok(())
    }
}
