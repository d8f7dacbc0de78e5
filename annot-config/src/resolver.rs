//! The resolution engine.
//!
//! Precedence, lowest to highest: tool defaults (instances, then default
//! groups), user groups, explicit names, exclusion. Within one kind the
//! order of directives has no effect.

use annot_core::{AnnotError, Result};
use annot_plugin::{Catalog, GroupRegistry, GroupTag, PluginArguments, PluginClass};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::defaults::ToolDefaults;
use crate::dependency::DependencyValidator;
use crate::directives::Directives;
use crate::resolved::{Origin, PluginInstance, ResolvedSet};

/// A plugin selected for the final set but not yet instantiated.
struct Candidate<'c> {
    class: &'c PluginClass,
    arguments: PluginArguments,
    origin: Origin,
    /// Argument names the user has set; the first user value for a name
    /// replaces whatever the default configuration held.
    user_configured: HashSet<String>,
}

impl<'c> Candidate<'c> {
    fn new(class: &'c PluginClass, arguments: PluginArguments, origin: Origin) -> Self {
        Self {
            class,
            arguments,
            origin,
            user_configured: HashSet::new(),
        }
    }

    fn fresh(class: &'c PluginClass, origin: Origin) -> Self {
        Self::new(class, PluginArguments::new(), origin)
    }

    fn configure(&mut self, argument: &str, value: &str) {
        if self.user_configured.insert(argument.to_string()) {
            self.arguments.set(argument, vec![value.to_string()]);
        } else {
            self.arguments.push(argument, value);
        }
    }
}

fn lookup<'c>(catalog: &'c Catalog, name: &str) -> Result<&'c PluginClass> {
    catalog
        .selectable(name)
        .ok_or_else(|| AnnotError::UnknownPlugin {
            name: name.to_string(),
        })
}

/// Adds every member of `tag` that is not already a candidate.
fn include_group<'c>(
    catalog: &'c Catalog,
    groups: &GroupRegistry,
    candidates: &mut IndexMap<String, Candidate<'c>>,
    tag: &GroupTag,
    origin: impl Fn(&GroupTag) -> Origin,
) -> Result<()> {
    for member in groups.check(tag)? {
        if candidates.contains_key(member) {
            continue;
        }
        let class = lookup(catalog, member)?;
        debug!(plugin = %member, group = %tag, "Enabled by group");
        candidates.insert(member.clone(), Candidate::fresh(class, origin(tag)));
    }
    Ok(())
}

/// Computes the final annotation set.
///
/// Fails without a partial result on the first violation: an unknown or
/// twice-requested name, an invalid group, a dangling or malformed argument,
/// or an enabled plugin missing a required argument.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve(
    catalog: &Catalog,
    groups: &GroupRegistry,
    defaults: &ToolDefaults,
    directives: &Directives,
) -> Result<ResolvedSet> {
    let mut candidates: IndexMap<String, Candidate> = IndexMap::new();

    if directives.defaults_disabled() {
        debug!("Tool default annotations disabled");
    } else {
        for default in &defaults.annotations {
            let class = lookup(catalog, &default.name)?;
            candidates.insert(
                default.name.clone(),
                Candidate::new(class, default.arguments.clone(), Origin::ToolDefault),
            );
        }
        for tag in &defaults.groups {
            include_group(catalog, groups, &mut candidates, tag, |t| {
                Origin::DefaultGroup(t.clone())
            })?;
        }
    }

    for tag in directives.groups() {
        include_group(catalog, groups, &mut candidates, tag, |t| {
            Origin::UserGroup(t.clone())
        })?;
    }

    let mut explicit = HashSet::new();
    for name in directives.includes() {
        let class = lookup(catalog, name)?;
        if !explicit.insert(name) {
            return Err(AnnotError::DuplicateExplicitInclusion {
                name: name.to_string(),
            });
        }
        if let Some(previous) = candidates.insert(
            name.to_string(),
            Candidate::fresh(class, Origin::Explicit),
        ) {
            debug!(plugin = %name, replaced = %previous.origin, "Explicit annotation replaces earlier configuration");
        }
    }

    for argument in directives.arguments() {
        if let Some(candidate) = candidates.get_mut(&argument.plugin) {
            candidate.configure(&argument.argument, &argument.value);
        }
    }

    for name in directives.excludes() {
        if catalog.selectable(name).is_none() {
            return Err(AnnotError::UnknownExcludedPlugin {
                name: name.to_string(),
            });
        }
        match candidates.shift_remove(name) {
            Some(removed) => debug!(plugin = %name, origin = %removed.origin, "Excluded"),
            None => warn!(plugin = %name, "Excluded annotation was not enabled"),
        }
    }

    DependencyValidator::new(
        catalog,
        candidates
            .iter()
            .map(|(name, candidate)| (name.as_str(), &candidate.arguments)),
    )
    .validate(directives.arguments())?;

    let instances = candidates
        .into_iter()
        .map(|(name, candidate)| {
            let arguments = candidate.arguments.normalized();
            let annotator = candidate.class.instantiate(&arguments)?;
            Ok(PluginInstance::new(name, arguments, candidate.origin, annotator))
        })
        .collect::<Result<Vec<_>>>()?;

    let resolved = ResolvedSet::from_instances(instances);
    info!(count = resolved.len(), "Resolved annotation set");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DefaultAnnotation;

    fn standard() -> (&'static Catalog, &'static GroupRegistry) {
        (
            annot_builtins::standard_catalog().expect("catalog builds"),
            annot_builtins::standard_groups().expect("groups build"),
        )
    }

    fn names(set: &ResolvedSet) -> Vec<&str> {
        set.names().collect()
    }

    #[test]
    fn test_empty_inputs_resolve_to_empty_set() -> Result<()> {
        let (catalog, groups) = standard();
        let set = resolve(catalog, groups, &ToolDefaults::new(), &Directives::new())?;
        assert!(set.is_empty());
        Ok(())
    }

    #[test]
    fn test_group_keeps_configured_default() -> Result<()> {
        let (catalog, groups) = standard();
        let defaults = ToolDefaults::new()
            .annotation(DefaultAnnotation::new("InbreedingCoeff").with_argument("founderID", "s1"));
        let set = resolve(
            catalog,
            groups,
            &defaults,
            &Directives::new().include_group("StandardAnnotation"),
        )?;
        let inbreeding = set.get("InbreedingCoeff").expect("default stays enabled");
        assert_eq!(inbreeding.origin(), &Origin::ToolDefault);
        assert_eq!(inbreeding.arguments().values("founderID"), ["s1"]);
        Ok(())
    }

    #[test]
    fn test_explicit_discards_default_configuration() -> Result<()> {
        let (catalog, groups) = standard();
        let defaults = ToolDefaults::new()
            .annotation(DefaultAnnotation::new("InbreedingCoeff").with_argument("founderID", "s1"));
        let set = resolve(
            catalog,
            groups,
            &defaults,
            &Directives::new().include("InbreedingCoeff"),
        )?;
        let inbreeding = set.get("InbreedingCoeff").expect("still enabled");
        assert_eq!(inbreeding.origin(), &Origin::Explicit);
        assert!(inbreeding.arguments().is_empty());
        Ok(())
    }

    #[test]
    fn test_user_argument_replaces_default_values() -> Result<()> {
        let (catalog, groups) = standard();
        let defaults = ToolDefaults::new().annotation(
            DefaultAnnotation::new("InbreedingCoeff")
                .with_argument("founderID", "s1")
                .with_argument("founderID", "s2"),
        );
        let directives = Directives::new()
            .argument("InbreedingCoeff", "founderID", "s3")
            .argument("InbreedingCoeff", "founderID", "s4");
        let set = resolve(catalog, groups, &defaults, &directives)?;
        let inbreeding = set.get("InbreedingCoeff").expect("default enabled");
        assert_eq!(inbreeding.arguments().values("founderID"), ["s3", "s4"]);
        Ok(())
    }

    #[test]
    fn test_exclusion_beats_explicit_inclusion() -> Result<()> {
        let (catalog, groups) = standard();
        let directives = Directives::new().include("Coverage").exclude("Coverage");
        let set = resolve(catalog, groups, &ToolDefaults::new(), &directives)?;
        assert!(set.is_empty());
        Ok(())
    }

    #[test]
    fn test_excluding_absent_plugin_is_not_an_error() -> Result<()> {
        let (catalog, groups) = standard();
        let set = resolve(
            catalog,
            groups,
            &ToolDefaults::new().annotation(DefaultAnnotation::new("Coverage")),
            &Directives::new().exclude("RMSMappingQuality"),
        )?;
        assert_eq!(names(&set), ["Coverage"]);
        Ok(())
    }

    #[test]
    fn test_markers_cannot_be_selected() {
        let (catalog, groups) = standard();
        let result = resolve(
            catalog,
            groups,
            &ToolDefaults::new(),
            &Directives::new().include(annot_builtins::REDUCIBLE_MARKER),
        );
        assert!(matches!(result, Err(AnnotError::UnknownPlugin { .. })));
    }

    #[test]
    fn test_disabled_defaults_ignore_default_groups() -> Result<()> {
        let (catalog, groups) = standard();
        let defaults = ToolDefaults::new().group("StandardAnnotation");
        let set = resolve(
            catalog,
            groups,
            &defaults,
            &Directives::new().disable_tool_defaults().include("Coverage"),
        )?;
        assert_eq!(names(&set), ["Coverage"]);
        Ok(())
    }
}
